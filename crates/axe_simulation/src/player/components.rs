//! Player components: marker, rig (grip + камера), character state
//!
//! `PlayerCharacter` держит gating логику броска/возврата как обычные
//! методы; ECS системы только переводят intents в weapon команды.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::{Pose, Rotator};
use crate::timeline::Timeline;
use crate::weapon::{RecallWeaponCommand, ThrowWeaponCommand, WeaponHolder};

/// Marker component для player-controlled entity
///
/// Weapon без валидного holder handle перепривязывается к
/// единственному entity с этим компонентом (+ `PlayerRig`).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Одноразовый latch: `try_consume` true только первый раз до `reset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoOnce {
    consumed: bool,
}

impl DoOnce {
    pub fn try_consume(&mut self) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        true
    }

    pub fn reset(&mut self) {
        self.consumed = false;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// World poses grip socket и камеры (хост обновляет каждый кадр)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRig {
    pub grip_socket: Pose,
    pub camera: Pose,
}

impl PlayerRig {
    pub fn new(grip_socket: Pose, camera: Pose) -> Self {
        Self { grip_socket, camera }
    }
}

impl WeaponHolder for PlayerRig {
    fn grip_socket_location(&self) -> Vec3 {
        self.grip_socket.location
    }

    fn grip_socket_rotation(&self) -> Rotator {
        self.grip_socket.rotation
    }

    fn camera_rotation(&self) -> Rotator {
        self.camera.rotation
    }
}

/// Spring arm камеры: длина blend'ится между idle и aimed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBoom {
    pub idle_length: f32,
    pub aimed_length: f32,
    pub current_length: f32,
}

impl Default for CameraBoom {
    fn default() -> Self {
        Self {
            idle_length: 300.0,
            aimed_length: 150.0,
            current_length: 300.0,
        }
    }
}

impl CameraBoom {
    /// 0 = idle, 1 = aimed
    pub fn blend(&mut self, alpha: f32) {
        self.current_length = self.idle_length + (self.aimed_length - self.idle_length) * alpha;
    }
}

/// Play rate ranged camera timeline
pub const RANGED_CAMERA_RATE: f32 = 8.0;

#[derive(Component, Debug, Clone)]
pub struct PlayerCharacter {
    /// Throwing weapon этого игрока
    pub weapon: Option<Entity>,

    pub is_aiming: bool,
    pub is_weapon_launched: bool,
    /// Один recall на бросок (сбрасывается при catch)
    pub recall_latch: DoOnce,
    pub rope_visible: bool,

    pub camera_boom: CameraBoom,
    pub ranged_camera: Timeline,

    pub walk_speed: f32,
    pub turn_rate: f32,
    pub idle_walk_speed: f32,
    pub aim_walk_speed: f32,
    pub idle_turn_rate: f32,
    pub aim_turn_rate: f32,

    pub throw_speed: f32,
}

impl Default for PlayerCharacter {
    fn default() -> Self {
        let mut ranged_camera = Timeline::default();
        ranged_camera.set_play_rate(RANGED_CAMERA_RATE);

        Self {
            weapon: None,
            is_aiming: false,
            is_weapon_launched: false,
            recall_latch: DoOnce::default(),
            rope_visible: false,
            camera_boom: CameraBoom::default(),
            ranged_camera,
            walk_speed: 500.0,
            turn_rate: 1.0,
            idle_walk_speed: 500.0,
            aim_walk_speed: 250.0,
            idle_turn_rate: 1.0,
            aim_turn_rate: 0.5,
            throw_speed: 2500.0,
        }
    }
}

impl PlayerCharacter {
    pub fn with_weapon(mut self, weapon: Entity) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn aim(&mut self) {
        self.is_aiming = true;
        self.walk_speed = self.aim_walk_speed;
        self.turn_rate = self.aim_turn_rate;
        self.ranged_camera.play();
    }

    pub fn stop_aim(&mut self) {
        self.is_aiming = false;
        self.walk_speed = self.idle_walk_speed;
        self.turn_rate = self.idle_turn_rate;
        self.ranged_camera.reverse();
    }

    /// Boom length по ranged camera timeline
    pub fn tick_camera(&mut self, dt: f32) {
        if let Some(step) = self.ranged_camera.advance(dt) {
            self.camera_boom.blend(step.value);
        }
    }

    /// Бросок: только в прицеливании и если weapon ещё в руке
    pub fn try_launch(&mut self, rig: &PlayerRig) -> Option<ThrowWeaponCommand> {
        let weapon = self.weapon?;
        if !self.is_aiming || self.is_weapon_launched {
            return None;
        }

        self.rope_visible = true;
        self.is_weapon_launched = true;

        Some(ThrowWeaponCommand {
            weapon,
            camera_rotation: rig.camera_rotation(),
            direction: rig.camera_forward_vector(),
            camera_location: rig.grip_socket_location(),
            speed: self.throw_speed,
        })
    }

    /// Recall: только после броска, один раз до catch
    pub fn try_recall(&mut self) -> Option<RecallWeaponCommand> {
        let weapon = self.weapon?;
        if !self.is_weapon_launched || !self.recall_latch.try_consume() {
            return None;
        }
        Some(RecallWeaponCommand { weapon })
    }

    /// Weapon вернулся в руку
    pub fn on_weapon_caught(&mut self) {
        self.rope_visible = false;
        self.is_weapon_launched = false;
        self.recall_latch.reset();
    }
}
