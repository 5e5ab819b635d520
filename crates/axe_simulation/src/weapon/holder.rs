//! Контракт weapon → игрок (collaborator)
//!
//! Weapon не владеет игроком: хранит только Entity handle и
//! читает grip socket / камеру через этот trait на каждом tick.
//! Catch уведомление идёт обратно событием `ThrowingWeaponCaught`.

use bevy::prelude::*;

use crate::geometry::{Pose, Rotator};

pub trait WeaponHolder {
    /// World location grip socket (где weapon лежит в руке)
    fn grip_socket_location(&self) -> Vec3;

    fn grip_socket_rotation(&self) -> Rotator;

    fn camera_rotation(&self) -> Rotator;

    fn camera_forward_vector(&self) -> Vec3 {
        self.camera_rotation().forward()
    }

    fn camera_right_vector(&self) -> Vec3 {
        self.camera_rotation().right()
    }
}

/// Snapshot holder'а (grip + камера) без ECS
///
/// Удобен для headless прогонов и unit тестов state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HolderView {
    pub grip_socket: Pose,
    pub camera_rotation: Rotator,
}

impl HolderView {
    pub fn new(grip_socket: Pose, camera_rotation: Rotator) -> Self {
        Self {
            grip_socket,
            camera_rotation,
        }
    }
}

impl WeaponHolder for HolderView {
    fn grip_socket_location(&self) -> Vec3 {
        self.grip_socket.location
    }

    fn grip_socket_rotation(&self) -> Rotator {
        self.grip_socket.rotation
    }

    fn camera_rotation(&self) -> Rotator {
        self.camera_rotation
    }
}
