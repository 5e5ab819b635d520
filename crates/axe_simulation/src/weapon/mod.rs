//! Throwing weapon (axe) - flight / lodge / return state machine
//!
//! Architecture:
//! - `ThrowingWeapon` = весь state одного weapon (Component)
//! - Логика - обычные методы + `tick(dt, ctx)`, без ECS внутри
//!   (flight.rs, lodge.rs, recall.rs)
//! - ECS слой (systems.rs): events → throw/recall, FixedUpdate → tick,
//!   tick outcome → ThrowingWeaponLodged / ThrowingWeaponCaught
//!
//! Rig (иерархия как у prefab):
//! root (actor pose) → pivot point → lodge point → mesh
//!
//! Четыре независимых timeline: rotation (spin), flight trace, return, wiggle.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::geometry::{Pose, Rotator};
use crate::timeline::{DeferredFlag, Timeline};
use crate::trace::LineTracer;

pub mod config;
pub mod events;
pub mod flight;
pub mod holder;
pub mod lodge;
pub mod recall;
pub mod state;
pub mod systems;


pub use config::{ConfigError, PitchRange, ThrowingWeaponConfig};
pub use events::{RecallWeaponCommand, ThrowWeaponCommand, ThrowingWeaponCaught, ThrowingWeaponLodged};
pub use holder::{HolderView, WeaponHolder};
pub use lodge::{adjust_impact_location, impact_pitch_offset};
pub use recall::{clamped_distance_from_player, return_timeline_rate};
pub use state::ThrowingWeaponState;
pub use systems::{throwing_weapon_bundle, WeaponPlugin};

/// Команда отклонена (guarded no-op, не ошибка симуляции)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandRejected {
    #[error("throw ignored: weapon is {0:?}, expected Idle")]
    NotIdle(ThrowingWeaponState),

    #[error("recall ignored: weapon is {0:?}, expected Launched or Lodged")]
    NotRecallable(ThrowingWeaponState),

    #[error("recall ignored: holder is not resolved")]
    NoHolder,
}

/// Snapshot камеры в момент броска (перезаписывается следующим броском)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowGeometry {
    pub camera_rotation: Rotator,
    /// Unit vector
    pub direction: Vec3,
    pub camera_location: Vec3,
    pub speed: f32,
}

/// Попадание flight trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactRecord {
    pub location: Vec3,
    pub normal: Vec3,
}

/// Параметры текущего возврата (пересчитываются на каждый recall)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReturnContext {
    pub initial_location: Vec3,
    pub initial_rotation: Rotator,
    /// Rotation камеры игрока в момент recall
    pub holder_camera_rotation: Rotator,
    pub optimal_distance: f32,
    /// Clamped в [0, max_calculation_distance]
    pub distance_from_player: f32,
    /// Текущая интерполированная позиция возврата
    pub target_location: Vec3,
    /// Play rate return timeline
    pub rate: f32,
}

/// Relative poses rig'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponRig {
    /// Относительно root
    pub pivot: Pose,
    /// Относительно pivot
    pub lodge_point: Pose,
    /// Относительно lodge point
    pub mesh_rotation: Rotator,
    pub mesh_visible: bool,
}

impl WeaponRig {
    pub fn new(pivot_offset: Vec3, lodge_point_offset: Vec3) -> Self {
        Self {
            pivot: Pose::from_location(pivot_offset),
            lodge_point: Pose::from_location(lodge_point_offset),
            mesh_rotation: Rotator::ZERO,
            mesh_visible: true,
        }
    }

    /// World location lodge point для заданной root pose
    pub fn lodge_point_world_location(&self, actor: &Pose) -> Vec3 {
        actor.transform_point(self.pivot.transform_point(self.lodge_point.location))
    }

    /// Сброс relative rotations (weapon в руке)
    pub fn reset_rotations(&mut self) {
        self.pivot.rotation = Rotator::ZERO;
        self.lodge_point.rotation = Rotator::ZERO;
        self.mesh_rotation = Rotator::ZERO;
    }
}

/// Projectile motion (velocity интегрируем сами)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileMotion {
    pub velocity: Vec3,
    pub active: bool,
    pub rotation_follows_velocity: bool,
    /// Z-ускорение
    pub gravity: f32,
    /// Множитель gravity (управляется trace curve)
    pub gravity_scale: f32,
}

impl ProjectileMotion {
    pub fn new(gravity: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            active: false,
            rotation_follows_velocity: false,
            gravity,
            gravity_scale: 1.0,
        }
    }

    pub fn activate(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.gravity_scale = 1.0;
        self.active = true;
    }

    /// Velocity сохраняется (нужна lodge для ориентации)
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Velocity для физического движка (0 если неактивен)
    pub fn effective_velocity(&self) -> Vec3 {
        if self.active {
            self.velocity
        } else {
            Vec3::ZERO
        }
    }

    fn integrate(&mut self, dt: f32, actor: &mut Pose) {
        if !self.active {
            return;
        }
        self.velocity.z += self.gravity * self.gravity_scale * dt;
        actor.location += self.velocity * dt;

        if self.rotation_follows_velocity && self.velocity.length_squared() > f32::EPSILON {
            actor.rotation = Rotator::from_direction(self.velocity);
        }
    }
}

/// Внешний мир для одного tick
pub struct WeaponContext<'a> {
    /// None = игрок не резолвится (return/attach пропускаются)
    pub holder: Option<&'a dyn WeaponHolder>,
    pub tracer: &'a dyn LineTracer,
    pub rng: &'a mut ChaCha8Rng,
}

/// Что случилось за tick (ECS превращает в события)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    pub lodged: Option<ImpactRecord>,
    /// Return завершён → уведомить игрока (ровно один раз за возврат)
    pub caught: bool,
}

#[derive(Component, Debug, Clone)]
pub struct ThrowingWeapon {
    config: ThrowingWeaponConfig,
    state: ThrowingWeaponState,
    /// Non-owning handle на игрока
    holder: Option<Entity>,
    /// Прикреплён к grip socket
    attached: bool,

    actor: Pose,
    rig: WeaponRig,
    projectile: ProjectileMotion,

    rotation_timeline: Timeline,
    trace_timeline: Timeline,
    return_timeline: Timeline,
    wiggle_timeline: Timeline,

    /// Guard повторного wiggle
    wiggle_reset: DeferredFlag,
    return_delay: DeferredFlag,
    return_delay_finished: bool,

    geometry: Option<ThrowGeometry>,
    impact: Option<ImpactRecord>,
    return_ctx: ReturnContext,
    lodge_base_rotation: Rotator,

    /// Lodge уже был в этом полёте
    flight_lodged: bool,
    /// Catch уже отправлен для текущего возврата
    catch_notified: bool,
}

impl ThrowingWeapon {
    pub fn new(config: ThrowingWeaponConfig) -> Self {
        let length = config.default_timeline_length;

        let mut rotation_timeline = Timeline::new(length);
        rotation_timeline.set_curve(config.rotation_forward_curve.clone());

        let mut trace_timeline = Timeline::new(length);
        trace_timeline.set_curve(config.throw_trace_curve.clone());
        trace_timeline.set_looping(config.trace_looping);

        let mut return_timeline = Timeline::new(length);
        return_timeline.set_curve(config.return_speed_curve.clone());

        let mut wiggle_timeline = Timeline::new(length);
        wiggle_timeline.set_curve(config.wiggle_curve.clone());

        Self {
            state: ThrowingWeaponState::Idle,
            holder: None,
            attached: true,
            actor: Pose::default(),
            rig: WeaponRig::new(config.pivot_offset, config.lodge_point_offset),
            projectile: ProjectileMotion::new(config.projectile_gravity),
            rotation_timeline,
            trace_timeline,
            return_timeline,
            wiggle_timeline,
            wiggle_reset: DeferredFlag::default(),
            return_delay: DeferredFlag::default(),
            return_delay_finished: false,
            geometry: None,
            impact: None,
            return_ctx: ReturnContext::default(),
            lodge_base_rotation: Rotator::ZERO,
            flight_lodged: false,
            catch_notified: false,
            config,
        }
    }

    pub fn with_holder(mut self, holder: Entity) -> Self {
        self.holder = Some(holder);
        self
    }

    pub fn config(&self) -> &ThrowingWeaponConfig {
        &self.config
    }

    pub fn state(&self) -> ThrowingWeaponState {
        self.state
    }

    pub fn holder(&self) -> Option<Entity> {
        self.holder
    }

    /// Перепривязка handle (если старый игрок исчез)
    pub fn bind_holder(&mut self, holder: Entity) {
        self.holder = Some(holder);
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn pose(&self) -> &Pose {
        &self.actor
    }

    pub fn rig(&self) -> &WeaponRig {
        &self.rig
    }

    pub fn projectile(&self) -> &ProjectileMotion {
        &self.projectile
    }

    pub fn throw_geometry(&self) -> Option<&ThrowGeometry> {
        self.geometry.as_ref()
    }

    pub fn impact(&self) -> Option<&ImpactRecord> {
        self.impact.as_ref()
    }

    pub fn return_context(&self) -> &ReturnContext {
        &self.return_ctx
    }

    pub fn return_delay_finished(&self) -> bool {
        self.return_delay_finished
    }

    pub fn rotation_timeline(&self) -> &Timeline {
        &self.rotation_timeline
    }

    pub fn trace_timeline(&self) -> &Timeline {
        &self.trace_timeline
    }

    pub fn return_timeline(&self) -> &Timeline {
        &self.return_timeline
    }

    pub fn wiggle_timeline(&self) -> &Timeline {
        &self.wiggle_timeline
    }

    /// Хоть один timeline играет
    pub fn any_timeline_playing(&self) -> bool {
        self.rotation_timeline.is_playing()
            || self.trace_timeline.is_playing()
            || self.return_timeline.is_playing()
            || self.wiggle_timeline.is_playing()
    }

    /// Один simulation tick
    ///
    /// Порядок фиксирован: deferred timers → projectile → rotation →
    /// flight trace → return → wiggle → attachment follow.
    pub fn tick(&mut self, dt: f32, ctx: &mut WeaponContext) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        self.tick_deferred(dt);
        self.projectile.integrate(dt, &mut self.actor);
        self.tick_rotation(dt);
        outcome.lodged = self.tick_flight_trace(dt, ctx);
        outcome.caught = self.tick_return(dt, ctx.holder);
        self.tick_wiggle(dt);

        if self.attached && self.state == ThrowingWeaponState::Idle {
            if let Some(holder) = ctx.holder {
                self.snap_to_grip(holder);
            }
        }

        outcome
    }

    /// Прикрепить к grip socket после catch
    ///
    /// Сбрасывает полёт целиком: timelines, projectile, rig, state → Idle.
    pub fn attach_to_holder(&mut self, holder: Option<&dyn WeaponHolder>) {
        self.rotation_timeline.stop();
        self.trace_timeline.stop();
        self.return_timeline.stop();
        self.wiggle_timeline.stop();
        self.wiggle_reset.clear();
        self.return_delay.clear();

        self.projectile.deactivate();
        self.projectile.rotation_follows_velocity = false;
        self.rig.reset_rotations();
        self.rig.mesh_visible = true;

        self.state = ThrowingWeaponState::Idle;
        self.attached = true;

        if let Some(holder) = holder {
            self.snap_to_grip(holder);
        }
    }

    fn snap_to_grip(&mut self, holder: &dyn WeaponHolder) {
        self.actor = Pose::new(holder.grip_socket_location(), holder.grip_socket_rotation());
    }

    fn tick_deferred(&mut self, dt: f32) {
        // wiggle_reset: guard снимается сам (is_armed → false)
        self.wiggle_reset.tick(dt);

        if self.return_delay.tick(dt) {
            self.return_delay_finished = true;
        }
    }
}
