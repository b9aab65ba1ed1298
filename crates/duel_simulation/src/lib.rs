//! Duel Simulation Core
//!
//! ECS-симуляция дуэли на Bevy 0.16: враг с AI (комбо, уклонения, отступление,
//! стан) против игрока с двумя цепочками ударов и двумя способностями.
//!
//! Headless: всё в FixedUpdate, тик двигает только `step_simulation`.
//! Rendering/animation/input polling — вне этого crate (CombatCue события).

use std::time::Duration;

use bevy::prelude::*;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod player;
pub mod profile;
pub mod rng;

// Re-export базовых типов для удобства
pub use actor::{attach_profile, spawn_enemy, spawn_floor, spawn_player, spawn_wall};
pub use ai::{AIConfig, AIPlugin, AIState, ReactionModules};
pub use combat::{
    CombatCue, CombatPlugin, DamageBlocked, DamageDealt, DamageRequest, Dead, EntityDied,
    StunRequest,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use physics::{Body2d, PhysicsPlugin};
pub use player::{PlayerAction, PlayerCommand, PlayerPlugin};
pub use profile::{CombatProfile, PlayerProfile, ProfileError, ProfileSet};
pub use rng::{DeterministicRng, ReactionRng};

/// Фазы тика (строго последовательно)
///
/// Stun evaluation precedes movement/attack evaluation, resource consumption
/// precedes commitment. Physics steps first, so queries of this tick see
/// the positions the previous tick's decisions produced.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Rotate event buffers, check profiles
    Sense,
    /// Rapier step (gravity, ground/walls, combatant contacts) + Body2d sync
    Integrate,
    /// Player commands, strikes, abilities
    Input,
    /// Stun expiry and new stuns
    Interrupt,
    /// Stamina/health regeneration, bleed expiry
    Resources,
    /// AI decisions
    Decide,
    /// Maneuver progression
    Maneuver,
    /// Combo hits, damage pipeline
    Resolve,
    /// Despawn dead
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Reads `SimulationConfig` if already inserted, otherwise uses defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();
        logger::set_log_level(config.log_level);

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Sense,
                SimulationSet::Integrate,
                SimulationSet::Input,
                SimulationSet::Interrupt,
                SimulationSet::Resources,
                SimulationSet::Decide,
                SimulationSet::Maneuver,
                SimulationSet::Resolve,
                SimulationSet::Cleanup,
            )
                .chain(),
        )
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(ReactionRng::seeded(config.seed))
        .insert_resource(config)
        .add_plugins((PhysicsPlugin, CombatPlugin, AIPlugin, PlayerPlugin));
    }
}

/// System: ротация буфера событий.
///
/// Simulation events live in `FixedUpdate` only, so they are rotated at the
/// start of every tick instead of in `First`. After a tick, the events it
/// produced are readable via `iter_current_update_events`.
pub fn rotate_event_buffer<E: Event>(mut events: ResMut<Events<E>>) {
    events.update();
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_app_with_config(SimulationConfig::with_seed(seed))
}

pub fn create_app_with_config(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    // Startup: rapier context. Первый кадр с нулевым delta, FixedUpdate не идёт
    app.update();

    app
}

/// Один тик симуляции: сдвинуть `Time<Fixed>` на `dt` и прогнать FixedUpdate.
pub fn step_simulation(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
}

/// Прогнать `ticks` тиков с шагом из `SimulationConfig`.
pub fn run_ticks(app: &mut App, ticks: usize) {
    let dt = app
        .world()
        .get_resource::<SimulationConfig>()
        .map_or(1.0 / 60.0, SimulationConfig::tick_seconds);
    for _ in 0..ticks {
        step_simulation(app, dt);
    }
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

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
