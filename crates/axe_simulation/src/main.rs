//! Headless симуляция броска топора
//!
//! Игрок целится, бросает в стену, вызывает возврат и ловит weapon.
//! Опционально: путь к RON конфигу weapon первым аргументом.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use axe_simulation::{
    create_headless_app, log_error, log_info, spawn_player_with_weapon, AimIntent, LaunchWeaponIntent, Pose,
    PlayerRig, RecallWeaponIntent, Rotator, SimulationPlugin, ThrowingWeapon, ThrowingWeaponConfig,
    ThrowingWeaponState, TraceWorld,
};

const MAX_TICKS: usize = 1200;

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    log_info(&format!("Starting axe headless simulation (seed: {})", seed));

    let config = match std::env::args().nth(1) {
        Some(path) => match ThrowingWeaponConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("Failed to load weapon config {}: {}", path, err));
                return;
            }
        },
        None => ThrowingWeaponConfig::default(),
    };

    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));

    // Стена в 1500 перед игроком
    let mut level = TraceWorld::new();
    level.add_plane(Vec3::new(1500.0, 0.0, 0.0), Vec3::NEG_X);
    app.insert_resource(level);

    let rig = PlayerRig::new(
        Pose::from_location(Vec3::new(0.0, 30.0, 120.0)),
        Pose::new(Vec3::new(-150.0, 0.0, 150.0), Rotator::ZERO),
    );
    let (player, weapon) = spawn_player_with_weapon(app.world_mut(), rig, config);

    app.world_mut().send_event(AimIntent { player, aiming: true });
    app.world_mut().send_event(LaunchWeaponIntent { player });

    let mut recalled = false;
    for tick in 0..MAX_TICKS {
        app.update();

        let Some(state) = app.world().get::<ThrowingWeapon>(weapon).map(|weapon| weapon.state()) else {
            log_error("Weapon entity disappeared");
            return;
        };

        if state == ThrowingWeaponState::Lodged && !recalled {
            log_info(&format!("Tick {}: weapon lodged, recalling", tick));
            app.world_mut().send_event(RecallWeaponIntent { player });
            recalled = true;
        }

        if recalled && state == ThrowingWeaponState::Idle {
            log_info(&format!("Tick {}: weapon caught", tick));
            break;
        }

        if tick % 60 == 0 {
            if let Some(weapon) = app.world().get::<ThrowingWeapon>(weapon) {
                log_info(&format!("Tick {}: {:?} at {:?}", tick, state, weapon.pose().location));
            }
        }
    }

    log_info("Simulation complete!");
}
