//! Axe Simulation Core
//!
//! ECS-симуляция throwing weapon на Bevy 0.16 (headless)
//!
//! Цикл: throw → flight → lodge → recall → wiggle → return → catch
//! - weapon: state machine + ECS системы
//! - player: gating броска/возврата, camera boom, catch
//! - timeline / curve: per-tick playback вместо host timelines
//! - trace: line trace seam + встроенный TraceWorld

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod curve;
pub mod geometry;
pub mod logger;
pub mod player;
pub mod timeline;
pub mod trace;
pub mod weapon;

// Re-export базовых типов для удобства
pub use curve::{CurveInterpolation, CurveKey, FloatCurve};
pub use geometry::{normal_pitch, Pose, Rotator};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use player::{
    spawn_player_with_weapon, AimIntent, DoOnce, LaunchWeaponIntent, Player, PlayerCharacter, PlayerPlugin,
    PlayerRig, RecallWeaponIntent,
};
pub use timeline::{DeferredFlag, Timeline, TimelineStep};
pub use trace::{LineTracer, TraceHit, TraceWorld};
pub use weapon::{
    CommandRejected, ConfigError, HolderView, RecallWeaponCommand, ThrowWeaponCommand, ThrowingWeapon,
    ThrowingWeaponCaught, ThrowingWeaponConfig, ThrowingWeaponLodged, ThrowingWeaponState, WeaponHolder,
    WeaponPlugin,
};

/// Фазы FixedUpdate (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Aim / launch / recall intents → weapon команды
    PlayerInput,
    /// throw / recall
    WeaponCommands,
    /// Timelines, projectile, trace, lodge, return
    WeaponTick,
    /// ThrowingWeaponCaught → attach
    Catch,
    /// Camera boom
    Camera,
    /// Transform + rapier Velocity
    Sync,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<TraceWorld>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::PlayerInput,
                    SimulationSet::WeaponCommands,
                    SimulationSet::WeaponTick,
                    SimulationSet::Catch,
                    SimulationSet::Camera,
                    SimulationSet::Sync,
                )
                    .chain(),
            )
            .add_plugins((WeaponPlugin, PlayerPlugin));

        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
