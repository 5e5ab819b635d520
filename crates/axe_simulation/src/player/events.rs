//! Player input intents
//!
//! Хост (input layer) или тесты пишут intents, player системы
//! решают можно ли их выполнить (aim / launch / recall gating).

use bevy::prelude::*;

/// Начать / закончить прицеливание
#[derive(Event, Debug, Clone, Copy)]
pub struct AimIntent {
    pub player: Entity,
    pub aiming: bool,
}

/// Бросить weapon (игнорируется без прицеливания)
#[derive(Event, Debug, Clone, Copy)]
pub struct LaunchWeaponIntent {
    pub player: Entity,
}

/// Вернуть брошенный weapon
#[derive(Event, Debug, Clone, Copy)]
pub struct RecallWeaponIntent {
    pub player: Entity,
}
