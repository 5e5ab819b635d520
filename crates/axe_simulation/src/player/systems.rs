//! Player systems: intents → weapon команды, catch, камера

use bevy::prelude::*;

use super::{AimIntent, LaunchWeaponIntent, Player, PlayerCharacter, PlayerRig, RecallWeaponIntent};
use crate::weapon::{
    throwing_weapon_bundle, RecallWeaponCommand, ThrowWeaponCommand, ThrowingWeapon, ThrowingWeaponCaught,
    ThrowingWeaponConfig, WeaponHolder,
};

/// System: aim / launch / recall intents
///
/// Порядок внутри tick: aim → launch → recall (aim + launch в одном
/// tick дают бросок).
pub fn process_player_intents(
    mut aim_intents: EventReader<AimIntent>,
    mut launch_intents: EventReader<LaunchWeaponIntent>,
    mut recall_intents: EventReader<RecallWeaponIntent>,
    mut players: Query<(&PlayerRig, &mut PlayerCharacter), With<Player>>,
    mut throw_commands: EventWriter<ThrowWeaponCommand>,
    mut recall_commands: EventWriter<RecallWeaponCommand>,
) {
    for intent in aim_intents.read() {
        let Ok((_, mut character)) = players.get_mut(intent.player) else {
            continue;
        };
        if intent.aiming {
            character.aim();
        } else {
            character.stop_aim();
        }
    }

    for intent in launch_intents.read() {
        let Ok((rig, mut character)) = players.get_mut(intent.player) else {
            continue;
        };
        match character.try_launch(rig) {
            Some(command) => {
                throw_commands.write(command);
            }
            None => crate::logger::log(&format!(
                "Player {:?}: launch ignored (aiming: {}, launched: {})",
                intent.player, character.is_aiming, character.is_weapon_launched
            )),
        }
    }

    for intent in recall_intents.read() {
        let Ok((_, mut character)) = players.get_mut(intent.player) else {
            continue;
        };
        match character.try_recall() {
            Some(command) => {
                recall_commands.write(command);
            }
            None => crate::logger::log(&format!(
                "Player {:?}: recall ignored (launched: {}, latch consumed: {})",
                intent.player,
                character.is_weapon_launched,
                character.recall_latch.is_consumed()
            )),
        }
    }
}

/// System: weapon вернулся → attach к grip socket + сброс player state
///
/// Holder из события без PlayerCharacter (или None) → ищем владельца
/// по `PlayerCharacter.weapon`, иначе latch игрока не сбросится.
pub fn handle_weapon_caught(
    mut caught_events: EventReader<ThrowingWeaponCaught>,
    mut weapons: Query<&mut ThrowingWeapon>,
    mut players: Query<(Entity, &PlayerRig, &mut PlayerCharacter), With<Player>>,
) {
    for event in caught_events.read() {
        let Ok(mut weapon) = weapons.get_mut(event.weapon) else {
            continue;
        };

        let owner = event.holder.filter(|holder| players.contains(*holder)).or_else(|| {
            players
                .iter()
                .find(|(_, _, character)| character.weapon == Some(event.weapon))
                .map(|(entity, _, _)| entity)
        });

        if owner != event.holder {
            crate::logger::log_warning(&format!(
                "Weapon {:?} caught by {:?}, owner resolved to {:?}",
                event.weapon, event.holder, owner
            ));
        }

        let player = match owner {
            Some(owner) => players.get_mut(owner).ok(),
            None => None,
        };
        match player {
            Some((_, rig, mut character)) => {
                weapon.attach_to_holder(Some(rig as &dyn WeaponHolder));
                character.on_weapon_caught();
            }
            None => weapon.attach_to_holder(None),
        }

        crate::logger::log_info(&format!("🤚 Weapon {:?} caught by {:?}", event.weapon, owner));
    }
}

/// System: ranged camera timeline → boom length
pub fn tick_player_cameras(time: Res<Time<Fixed>>, mut players: Query<&mut PlayerCharacter>) {
    let delta = time.delta_secs();
    for mut character in players.iter_mut() {
        character.tick_camera(delta);
    }
}

/// Spawn игрока + его weapon (weapon сразу в руке)
pub fn spawn_player_with_weapon(
    world: &mut World,
    rig: PlayerRig,
    config: ThrowingWeaponConfig,
) -> (Entity, Entity) {
    let character = PlayerCharacter {
        throw_speed: config.throw_speed,
        ..Default::default()
    };
    let player = world.spawn((Player, rig, character)).id();

    let mut weapon = ThrowingWeapon::new(config).with_holder(player);
    weapon.attach_to_holder(Some(&rig));
    let weapon = world.spawn(throwing_weapon_bundle(weapon)).id();

    if let Some(mut character) = world.get_mut::<PlayerCharacter>(player) {
        character.weapon = Some(weapon);
    }

    crate::logger::log(&format!("Spawned player {:?} with weapon {:?}", player, weapon));
    (player, weapon)
}
