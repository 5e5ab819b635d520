//! Player - владелец throwing weapon
//!
//! ECS ответственность:
//! - Aim: camera boom + walk speed / turn rate
//! - Gating: launch только в прицеливании, один recall на бросок
//! - Catch: ThrowingWeaponCaught → weapon в руку, latch сброшен
//!
//! Weapon читает grip socket / камеру через `PlayerRig: WeaponHolder`.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;


pub use components::{CameraBoom, DoOnce, Player, PlayerCharacter, PlayerRig, RANGED_CAMERA_RATE};
pub use events::{AimIntent, LaunchWeaponIntent, RecallWeaponIntent};
pub use systems::spawn_player_with_weapon;

/// Player Plugin
///
/// Системы в FixedUpdate:
/// 1. process_player_intents (PlayerInput) - до weapon команд
/// 2. handle_weapon_caught (Catch) - после weapon tick
/// 3. tick_player_cameras (Camera)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AimIntent>()
            .add_event::<LaunchWeaponIntent>()
            .add_event::<RecallWeaponIntent>();

        app.add_systems(
            FixedUpdate,
            (
                systems::process_player_intents.in_set(SimulationSet::PlayerInput),
                systems::handle_weapon_caught.in_set(SimulationSet::Catch),
                systems::tick_player_cameras.in_set(SimulationSet::Camera),
            ),
        );
    }
}
