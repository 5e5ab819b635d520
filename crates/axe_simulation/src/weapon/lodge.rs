//! Lodge - финальная pose weapon, застрявшего в поверхности
//!
//! - Rotation: ориентация velocity + pitch offset по pitch нормали
//! - Location: offset относительно lodge point, разный для
//!   "полоподобных" (нормаль вверх) и "стеноподобных" попаданий

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::{ImpactRecord, ThrowingWeapon, ThrowingWeaponState};
use crate::geometry::{normal_pitch, Rotator};

/// Pitch offset рукояти при lodge
///
/// Pitch нормали выше `near_vertical_threshold` (стены, полы, склоны) →
/// `forced_pitch`. Иначе (потолок) → `inclined_offset`, заранее выбранный
/// random sample.
pub fn impact_pitch_offset(
    normal: Vec3,
    inclined_offset: f32,
    near_vertical_threshold: f32,
    forced_pitch: f32,
) -> f32 {
    if normal_pitch(normal) > near_vertical_threshold {
        forced_pitch
    } else {
        inclined_offset
    }
}

/// Root location застрявшего weapon
///
/// Нормаль вверх: impact смещается на `normal.z` по всем осям, затем
/// root ставится так, чтобы lodge point сдвинулся на impact.
/// Иначе: зеркальный offset от lodge point до root.
pub fn adjust_impact_location(
    normal: Vec3,
    impact_location: Vec3,
    actor_location: Vec3,
    lodge_point_location: Vec3,
) -> Vec3 {
    if normal_pitch(normal) > 0.0 {
        let biased = impact_location + Vec3::splat(normal.z);
        lodge_point_location - actor_location + biased
    } else {
        actor_location - lodge_point_location + impact_location
    }
}

impl ThrowingWeapon {
    pub(super) fn lodge(&mut self, impact: ImpactRecord, rng: &mut ChaCha8Rng) {
        self.projectile.deactivate();
        self.stop_rotation();

        self.rig.pivot.rotation = Rotator::ZERO;
        if let Some(geometry) = self.geometry {
            self.actor.rotation = geometry.camera_rotation;
        }

        let inclined = self.config.inclined_pitch_range.sample(rng);

        let mut lodge_rotation = Rotator::from_direction(self.projectile.velocity);
        lodge_rotation.pitch += impact_pitch_offset(
            impact.normal,
            inclined,
            self.config.near_vertical_threshold,
            self.config.forced_lodge_pitch,
        );
        self.rig.lodge_point.rotation = lodge_rotation;

        let lodge_point_location = self.rig.lodge_point_world_location(&self.actor);
        self.actor.location = adjust_impact_location(
            impact.normal,
            impact.location,
            self.actor.location,
            lodge_point_location,
        );

        self.flight_lodged = true;
        self.state = ThrowingWeaponState::Lodged;

        crate::logger::log(&format!(
            "🪓 Weapon lodged at {:?} (normal {:?}, lodge pitch {:.1})",
            impact.location, impact.normal, lodge_rotation.pitch
        ));
    }
}
