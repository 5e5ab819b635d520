//! Throwing weapon events
//!
//! # Architecture
//!
//! **Commands (player → weapon):**
//! - `ThrowWeaponCommand` → `ThrowingWeapon::throw` (только из Idle)
//! - `RecallWeaponCommand` → `ThrowingWeapon::recall` (Launched / Lodged)
//!
//! **Notifications (weapon → player / host):**
//! - `ThrowingWeaponLodged` → weapon застрял (host: звук, decal)
//! - `ThrowingWeaponCaught` → возврат завершён, игрок ловит weapon

use bevy::prelude::*;

use crate::geometry::Rotator;

/// Бросить weapon
///
/// Параметры камеры снимаются игроком в момент броска.
#[derive(Event, Debug, Clone, Copy)]
pub struct ThrowWeaponCommand {
    pub weapon: Entity,
    pub camera_rotation: Rotator,
    /// Unit vector (camera forward)
    pub direction: Vec3,
    pub camera_location: Vec3,
    pub speed: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RecallWeaponCommand {
    pub weapon: Entity,
}

/// Weapon застрял в поверхности (ровно один раз за полёт)
#[derive(Event, Debug, Clone, Copy)]
pub struct ThrowingWeaponLodged {
    pub weapon: Entity,
    pub impact_location: Vec3,
    pub impact_normal: Vec3,
}

/// Return завершён → catch (ровно один раз за возврат)
#[derive(Event, Debug, Clone, Copy)]
pub struct ThrowingWeaponCaught {
    pub weapon: Entity,
    /// Entity игрока (None если handle не резолвится)
    pub holder: Option<Entity>,
}
