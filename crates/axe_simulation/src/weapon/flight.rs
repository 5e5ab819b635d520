//! Flight - бросок, spin, trace по forward оси
//!
//! Collision detection не зависит от curves: trace - сырой line trace
//! на `trace_probe_distance` вперёд от root каждый tick trace timeline.

use bevy::prelude::*;

use super::{CommandRejected, ImpactRecord, ThrowGeometry, ThrowingWeapon, ThrowingWeaponState, WeaponContext};
use crate::geometry::{Pose, Rotator};

impl ThrowingWeapon {
    /// Бросок из руки
    ///
    /// Только из Idle; иначе guarded no-op.
    pub fn throw(
        &mut self,
        camera_rotation: Rotator,
        direction: Vec3,
        camera_location: Vec3,
        speed: f32,
    ) -> Result<(), CommandRejected> {
        if self.state != ThrowingWeaponState::Idle {
            return Err(CommandRejected::NotIdle(self.state));
        }

        self.attached = false;
        self.geometry = Some(ThrowGeometry {
            camera_rotation,
            direction,
            camera_location,
            speed,
        });
        self.impact = None;
        self.flight_lodged = false;
        self.catch_notified = false;

        self.snap_to_start_position();
        self.trace_timeline.play_from_start();
        self.launch();

        Ok(())
    }

    /// Root в точку старта: впереди камеры, с компенсацией pivot offset
    fn snap_to_start_position(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let location = geometry.direction * self.config.throw_direction_multiplier
            + geometry.camera_location
            - self.rig.pivot.location;
        self.actor = Pose::new(location, geometry.camera_rotation);
    }

    fn launch(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };

        self.projectile.rotation_follows_velocity = true;
        self.state = ThrowingWeaponState::Launched;

        // Лезвием вперёд
        self.rig.mesh_rotation = Rotator::new(0.0, 180.0, 0.0);
        self.rig.mesh_visible = true;

        self.projectile.activate(geometry.direction * geometry.speed);

        self.start_rotation_forward();
    }

    fn start_rotation_forward(&mut self) {
        self.rotation_timeline.set_play_rate(self.config.spin_rate);
        self.rotation_timeline.set_looping(false);
        self.rotation_timeline.play_from_start();
    }

    /// Остановка spin (тот же handler что и natural finish)
    pub(super) fn stop_rotation(&mut self) {
        self.rotation_timeline.stop();
    }

    pub(super) fn stop_flight_trace(&mut self) {
        self.trace_timeline.stop();
    }

    pub(super) fn tick_rotation(&mut self, dt: f32) {
        let Some(step) = self.rotation_timeline.advance(dt) else {
            return;
        };

        self.rig.pivot.rotation = Rotator::new(step.value * self.config.rotation_multiplier, 0.0, 0.0);

        if step.finished {
            self.stop_rotation();
        }
    }

    /// Trace tick: Some(impact) если weapon застрял на этом tick
    pub(super) fn tick_flight_trace(&mut self, dt: f32, ctx: &mut WeaponContext) -> Option<ImpactRecord> {
        let step = self.trace_timeline.advance(dt)?;

        // Curve (если есть) управляет включением гравитации
        if self.trace_timeline.curve().is_some() {
            self.projectile.gravity_scale = step.value;
        }

        if self.state == ThrowingWeaponState::Launched && !self.flight_lodged {
            let start = self.actor.location;
            let end = start + self.actor.rotation.forward() * self.config.trace_probe_distance;

            if let Some(hit) = ctx.tracer.line_trace(start, end) {
                let impact = ImpactRecord {
                    location: hit.location,
                    normal: hit.normal,
                };
                self.impact = Some(impact);
                self.projectile.deactivate();
                self.stop_flight_trace();
                self.lodge(impact, ctx.rng);
                return Some(impact);
            }
        }

        if step.finished {
            self.on_flight_trace_finished();
        }
        None
    }

    /// Trace timeline закончился без попадания (только non-looping trace)
    fn on_flight_trace_finished(&mut self) {
        self.projectile.deactivate();
        self.stop_rotation();
        self.rig.mesh_visible = false;
    }
}
