//! Состояние throwing weapon (FSM phase)

use bevy::prelude::*;

/// Текущая фаза weapon
///
/// Мутируется только самим `ThrowingWeapon` (throw/lodge/recall/attach).
/// - Idle → Launched → Lodged → Wiggle → Returning → Idle
/// - Idle → Launched → Returning → Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum ThrowingWeaponState {
    /// В руке (или ждёт attach)
    #[default]
    Idle,
    /// Летит: projectile активен, trace каждый tick
    Launched,
    /// Застрял в поверхности
    Lodged,
    /// Короткое покачивание перед возвратом (только из Lodged)
    Wiggle,
    /// Летит обратно к grip socket
    Returning,
}

impl ThrowingWeaponState {
    /// Recall разрешён только из этих состояний
    pub fn can_recall(&self) -> bool {
        matches!(self, Self::Launched | Self::Lodged)
    }

    /// Weapon вне руки игрока
    pub fn is_away(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Return timeline управляет позицией (catch возможен)
    pub fn is_returning(&self) -> bool {
        matches!(self, Self::Wiggle | Self::Returning)
    }
}
