//! Геометрия weapon: Rotator (pitch/yaw/roll в градусах) и Pose
//!
//! Конвенция осей симуляции: Z вверх, X вперёд, right-handed.
//! - yaw: вращение вокруг +Z (X → Y)
//! - pitch: положительный = нос вверх
//! - roll: вращение вокруг локального X
//!
//! Хост-движок конвертирует в свою систему координат в visual sync.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Euler rotation в градусах
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Ориентация вдоль направления (roll = 0)
    ///
    /// Нулевой вектор → ZERO.
    pub fn from_direction(direction: Vec3) -> Self {
        if direction.length_squared() <= f32::EPSILON {
            return Self::ZERO;
        }
        let horizontal = (direction.x * direction.x + direction.y * direction.y).sqrt();
        Self {
            pitch: direction.z.atan2(horizontal).to_degrees(),
            yaw: direction.y.atan2(direction.x).to_degrees(),
            roll: 0.0,
        }
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_rotation_z(self.yaw.to_radians())
            * Quat::from_rotation_y(-self.pitch.to_radians())
            * Quat::from_rotation_x(self.roll.to_radians())
    }

    pub fn forward(&self) -> Vec3 {
        self.to_quat() * Vec3::X
    }

    pub fn right(&self) -> Vec3 {
        self.to_quat() * Vec3::NEG_Y
    }

    pub fn up(&self) -> Vec3 {
        self.to_quat() * Vec3::Z
    }
}

/// Pitch rotation, построенной из `normal` как оси X
///
/// Используется для классификации поверхности при lodge:
/// пол ≈ 90, стена ≈ 0, потолок ≈ -90.
pub fn normal_pitch(normal: Vec3) -> f32 {
    Rotator::from_direction(normal.normalize_or_zero()).pitch
}

/// Location + rotation (world или relative к родителю)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub location: Vec3,
    pub rotation: Rotator,
}

impl Pose {
    pub const fn new(location: Vec3, rotation: Rotator) -> Self {
        Self { location, rotation }
    }

    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            rotation: Rotator::ZERO,
        }
    }

    /// Точка из локального пространства pose в пространство родителя
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.location + self.rotation.to_quat() * local
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.location).with_rotation(self.rotation.to_quat())
    }
}
