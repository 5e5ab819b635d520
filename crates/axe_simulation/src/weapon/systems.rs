//! ECS слой throwing weapon
//!
//! Порядок (FixedUpdate, chained sets):
//! 1. process_weapon_commands - ThrowWeaponCommand / RecallWeaponCommand → throw / recall
//! 2. tick_throwing_weapons - `ThrowingWeapon::tick` → Lodged / Caught события
//! 3. sync_weapon_transforms - pose → Transform, projectile → rapier Velocity
//!
//! Holder резолвится каждый раз: handle из weapon, иначе единственный Player.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{
    RecallWeaponCommand, ThrowWeaponCommand, ThrowingWeapon, ThrowingWeaponCaught,
    ThrowingWeaponLodged, WeaponContext, WeaponHolder,
};
use crate::player::{Player, PlayerRig};
use crate::trace::{LineTracer, TraceWorld};
use crate::{DeterministicRng, SimulationSet};

/// Игроки, пригодные как holder
pub type HolderCandidates<'w, 's> = Query<'w, 's, Entity, (With<Player>, With<PlayerRig>)>;

/// Валидный holder для weapon
///
/// Если handle потерян (entity удалён / без PlayerRig) - перепривязка
/// к единственному Player. Несколько Player → None.
pub fn resolve_holder(
    weapon: &mut ThrowingWeapon,
    rigs: &Query<&PlayerRig>,
    candidates: &HolderCandidates,
) -> Option<Entity> {
    if let Some(holder) = weapon.holder() {
        if rigs.contains(holder) {
            return Some(holder);
        }
    }

    let fallback = candidates.single().ok()?;
    weapon.bind_holder(fallback);
    crate::logger::log(&format!("Weapon holder re-resolved to {:?}", fallback));
    Some(fallback)
}

/// System: команды игрока → throw / recall
pub fn process_weapon_commands(
    mut throw_commands: EventReader<ThrowWeaponCommand>,
    mut recall_commands: EventReader<RecallWeaponCommand>,
    mut weapons: Query<&mut ThrowingWeapon>,
    rigs: Query<&PlayerRig>,
    candidates: HolderCandidates,
) {
    for command in throw_commands.read() {
        let Ok(mut weapon) = weapons.get_mut(command.weapon) else {
            crate::logger::log_warning(&format!("ThrowWeaponCommand: {:?} is not a weapon", command.weapon));
            continue;
        };

        match weapon.throw(
            command.camera_rotation,
            command.direction,
            command.camera_location,
            command.speed,
        ) {
            Ok(()) => crate::logger::log(&format!(
                "🪓 Weapon {:?} thrown: direction {:?}, speed {:.0}",
                command.weapon, command.direction, command.speed
            )),
            Err(rejected) => crate::logger::log(&format!("Weapon {:?}: {}", command.weapon, rejected)),
        }
    }

    for command in recall_commands.read() {
        let Ok(mut weapon) = weapons.get_mut(command.weapon) else {
            crate::logger::log_warning(&format!("RecallWeaponCommand: {:?} is not a weapon", command.weapon));
            continue;
        };

        let holder = resolve_holder(&mut weapon, &rigs, &candidates);
        let rig = holder.and_then(|entity| rigs.get(entity).ok());

        match weapon.recall(rig.map(|rig| rig as &dyn WeaponHolder)) {
            Ok(state) => crate::logger::log(&format!("Weapon {:?} recalled → {:?}", command.weapon, state)),
            Err(rejected) => crate::logger::log(&format!("Weapon {:?}: {}", command.weapon, rejected)),
        }
    }
}

/// System: fixed tick всех weapon
pub fn tick_throwing_weapons(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    trace_world: Option<Res<TraceWorld>>,
    mut weapons: Query<(Entity, &mut ThrowingWeapon)>,
    rigs: Query<&PlayerRig>,
    candidates: HolderCandidates,
    mut lodged_events: EventWriter<ThrowingWeaponLodged>,
    mut caught_events: EventWriter<ThrowingWeaponCaught>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    let empty_world = TraceWorld::default();
    let tracer: &dyn LineTracer = match trace_world.as_deref() {
        Some(world) => world,
        None => &empty_world,
    };

    for (entity, mut weapon) in weapons.iter_mut() {
        let holder = resolve_holder(&mut weapon, &rigs, &candidates);
        let rig = holder.and_then(|holder| rigs.get(holder).ok());

        let mut ctx = WeaponContext {
            holder: rig.map(|rig| rig as &dyn WeaponHolder),
            tracer,
            rng: &mut rng.rng,
        };
        let outcome = weapon.tick(delta, &mut ctx);

        if let Some(impact) = outcome.lodged {
            lodged_events.write(ThrowingWeaponLodged {
                weapon: entity,
                impact_location: impact.location,
                impact_normal: impact.normal,
            });
        }

        if outcome.caught {
            crate::logger::log(&format!("Weapon {:?} returned to holder {:?}", entity, holder));
            caught_events.write(ThrowingWeaponCaught { weapon: entity, holder });
        }
    }
}

/// System: pose → Transform, projectile velocity → rapier Velocity
///
/// Rapier только отражает движение (kinematic), интегрирует симуляция.
pub fn sync_weapon_transforms(mut weapons: Query<(&ThrowingWeapon, &mut Transform, Option<&mut Velocity>)>) {
    for (weapon, mut transform, velocity) in weapons.iter_mut() {
        *transform = weapon.pose().to_transform();

        if let Some(mut velocity) = velocity {
            velocity.linvel = weapon.projectile().effective_velocity();
            velocity.angvel = Vec3::ZERO;
        }
    }
}

/// Компоненты weapon entity
pub fn throwing_weapon_bundle(weapon: ThrowingWeapon) -> impl Bundle {
    let transform = weapon.pose().to_transform();
    (
        weapon,
        transform,
        RigidBody::KinematicVelocityBased,
        Velocity::zero(),
    )
}

/// Weapon Plugin
///
/// Регистрирует события и системы в наборах SimulationSet
/// (порядок наборов задаёт SimulationPlugin).
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ThrowWeaponCommand>()
            .add_event::<RecallWeaponCommand>()
            .add_event::<ThrowingWeaponLodged>()
            .add_event::<ThrowingWeaponCaught>();

        app.add_systems(
            FixedUpdate,
            (
                process_weapon_commands.in_set(SimulationSet::WeaponCommands),
                tick_throwing_weapons.in_set(SimulationSet::WeaponTick),
                sync_weapon_transforms.in_set(SimulationSet::Sync),
            ),
        );
    }
}
