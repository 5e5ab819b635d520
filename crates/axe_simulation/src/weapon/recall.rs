//! Recall - wiggle, возврат к grip socket, catch
//!
//! Return rate зависит от расстояния: дальний weapon проигрывает
//! return timeline быстрее, rate зажат в [return_rate_min, return_rate_max].

use bevy::prelude::*;

use super::{CommandRejected, ThrowingWeapon, ThrowingWeaponState, WeaponHolder};
use crate::geometry::{Pose, Rotator};

/// |weapon − grip| в [0, max_distance]
pub fn clamped_distance_from_player(weapon_location: Vec3, grip_location: Vec3, max_distance: f32) -> f32 {
    weapon_location
        .distance(grip_location)
        .max(0.0)
        .min(max_distance.max(0.0))
}

/// Play rate return timeline
///
/// `optimal_distance * return_speed / distance`, зажатый в [min_rate, max_rate].
/// Нулевое расстояние (или нечисловой результат) → max_rate.
pub fn return_timeline_rate(
    optimal_distance: f32,
    return_speed: f32,
    distance_from_player: f32,
    min_rate: f32,
    max_rate: f32,
) -> f32 {
    if distance_from_player <= 0.0 {
        return max_rate;
    }
    let raw = (optimal_distance * return_speed) / distance_from_player;
    if !raw.is_finite() {
        return max_rate;
    }
    raw.max(min_rate).min(max_rate)
}

impl ThrowingWeapon {
    /// Вернуть weapon игроку
    ///
    /// - Launched → Returning (сразу)
    /// - Lodged → Wiggle → Returning
    ///
    /// Возвращает новое состояние.
    pub fn recall(&mut self, holder: Option<&dyn WeaponHolder>) -> Result<ThrowingWeaponState, CommandRejected> {
        if !self.state.can_recall() {
            return Err(CommandRejected::NotRecallable(self.state));
        }
        let Some(holder) = holder else {
            return Err(CommandRejected::NoHolder);
        };

        self.stop_flight_trace();
        self.rig.mesh_visible = true;
        self.rig.mesh_rotation = Rotator::ZERO;
        self.adjust_return_location(holder);
        self.catch_notified = false;

        if self.state == ThrowingWeaponState::Launched {
            self.state = ThrowingWeaponState::Returning;
            self.projectile.deactivate();
            self.begin_return();
            self.stop_rotation();
            self.rig.pivot.rotation = Rotator::ZERO;
        } else {
            self.state = ThrowingWeaponState::Wiggle;
            self.wiggle_lodged();
            self.return_delay.arm(self.config.return_delay);
            self.begin_return();
        }

        Ok(self.state)
    }

    /// Snapshot стартовой pose возврата + расстояние до игрока
    fn adjust_return_location(&mut self, holder: &dyn WeaponHolder) {
        self.return_ctx.distance_from_player = clamped_distance_from_player(
            self.actor.location,
            holder.grip_socket_location(),
            self.config.max_calculation_distance,
        );
        self.return_ctx.initial_location = self.actor.location;
        self.return_ctx.initial_rotation = self.actor.rotation;
        self.return_ctx.holder_camera_rotation = holder.camera_rotation();
        self.rig.lodge_point.rotation = Rotator::ZERO;
    }

    fn begin_return(&mut self) {
        self.return_ctx.optimal_distance = self.config.optimal_distance;
        self.return_ctx.rate = return_timeline_rate(
            self.return_ctx.optimal_distance,
            self.config.return_speed,
            self.return_ctx.distance_from_player,
            self.config.return_rate_min,
            self.config.return_rate_max,
        );

        self.return_timeline.set_play_rate(self.return_ctx.rate);
        self.return_timeline.set_looping(false);
        self.return_timeline.play_from_start();

        crate::logger::log(&format!(
            "↩️ Weapon recall: distance {:.1}, return rate {:.3}",
            self.return_ctx.distance_from_player, self.return_ctx.rate
        ));
    }

    fn wiggle_lodged(&mut self) {
        if self.wiggle_reset.is_armed() {
            // Предыдущий wiggle ещё не отпущен - сразу в возврат
            self.state = ThrowingWeaponState::Returning;
            return;
        }

        self.lodge_base_rotation = self.rig.lodge_point.rotation;
        self.wiggle_reset.arm(self.config.wiggle_delay);

        self.wiggle_timeline.set_play_rate(self.config.wiggle_rate);
        self.wiggle_timeline.set_looping(false);
        self.wiggle_timeline.play_from_start();
    }

    pub(super) fn tick_wiggle(&mut self, dt: f32) {
        let Some(step) = self.wiggle_timeline.advance(dt) else {
            return;
        };

        let base = self.lodge_base_rotation;
        self.rig.lodge_point.rotation = Rotator::new(
            base.pitch + step.value * self.config.wiggle_pitch_amplitude,
            base.yaw,
            base.roll,
        );

        if step.finished && self.state == ThrowingWeaponState::Wiggle {
            self.state = ThrowingWeaponState::Returning;
        }
    }

    /// Return tick: true если возврат завершён и catch надо отправить
    pub(super) fn tick_return(&mut self, dt: f32, holder: Option<&dyn WeaponHolder>) -> bool {
        let Some(step) = self.return_timeline.advance(dt) else {
            return false;
        };

        if let Some(holder) = holder {
            self.calculate_return(step.value, holder);
        }

        if step.finished {
            return self.finish_return();
        }
        false
    }

    /// Lerp от стартовой pose к руке; rotation = grip socket
    fn calculate_return(&mut self, alpha: f32, holder: &dyn WeaponHolder) {
        self.return_delay_finished = false;

        let catch_location = holder.camera_right_vector() + holder.grip_socket_location();
        let location = self.return_ctx.initial_location.lerp(catch_location, alpha);

        self.return_ctx.target_location = location;
        self.actor = Pose::new(location, holder.grip_socket_rotation());
    }

    /// Завершение возврата
    ///
    /// Идемпотентно: true только при первом вызове за возврат.
    pub fn finish_return(&mut self) -> bool {
        self.projectile.deactivate();
        self.stop_rotation();
        self.return_delay_finished = true;

        if self.catch_notified || !self.state.is_returning() {
            return false;
        }
        self.catch_notified = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f32 = 0.4;
    const MAX: f32 = 0.7;

    #[test]
    fn test_rate_at_optimal_distance_equals_return_speed() {
        let rate = return_timeline_rate(1400.0, 0.5, 1400.0, MIN, MAX);
        assert!((rate - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rate_zero_distance_is_max() {
        assert_eq!(return_timeline_rate(1400.0, 0.5, 0.0, MIN, MAX), MAX);
        assert_eq!(return_timeline_rate(1400.0, 0.0, 0.0, MIN, MAX), MAX);
        assert_eq!(return_timeline_rate(1400.0, 0.5, 1e-3, MIN, MAX), MAX);
    }

    #[test]
    fn test_rate_far_distance_is_min() {
        // 1400 * 0.5 / 3000 ≈ 0.233 → 0.4
        assert_eq!(return_timeline_rate(1400.0, 0.5, 3000.0, MIN, MAX), MIN);
    }

    #[test]
    fn test_rate_bounded_for_all_positive_distances() {
        for return_speed in [0.1_f32, 0.5, 1.0, 2.0, 10.0] {
            let mut distance = 0.5_f32;
            while distance <= 3000.0 {
                let rate = return_timeline_rate(1400.0, return_speed, distance, MIN, MAX);
                assert!((MIN..=MAX).contains(&rate), "rate {} at d={}", rate, distance);
                distance *= 1.5;
            }
        }
    }

    #[test]
    fn test_rate_monotonic_in_distance() {
        let mut previous = f32::INFINITY;
        for step in 1..=60 {
            let distance = step as f32 * 50.0;
            let rate = return_timeline_rate(1400.0, 0.5, distance, MIN, MAX);
            assert!(rate <= previous);
            previous = rate;
        }
    }

    #[test]
    fn test_clamped_distance_bounds() {
        assert_eq!(clamped_distance_from_player(Vec3::ZERO, Vec3::ZERO, 3000.0), 0.0);
        assert_eq!(
            clamped_distance_from_player(Vec3::new(5000.0, 0.0, 0.0), Vec3::ZERO, 3000.0),
            3000.0
        );
        let d = clamped_distance_from_player(Vec3::new(3.0, 4.0, 0.0), Vec3::ZERO, 3000.0);
        assert!((d - 5.0).abs() < 1e-6);
    }
}
