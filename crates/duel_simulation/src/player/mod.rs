//! Player side of the duel.
//!
//! Input polling lives outside the simulation: intents arrive as `PlayerCommand`
//! events. The player's strike chains are the attack sources the enemy's
//! threat detector watches.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod systems;

pub use components::{
    ActionRefused, ActiveHazards, Barrier, ComboChain, Hazard, HealthRegen, PlayerOffense,
    SpikeCast, SpikePhase, SpikeTick, Strike, StrikeTick,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    /// Horizontal axis in [-1, 1], held until the next Move
    Move { axis: f32 },
    LightAttack,
    HeavyAttack,
    CastSpikes,
    RaiseBarrier,
    LowerBarrier,
}

/// Event: player intent for this tick
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerCommand {
    pub player: Entity,
    pub action: PlayerAction,
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerCommand>()
            .init_resource::<ActiveHazards>()
            .add_systems(
                FixedUpdate,
                crate::rotate_event_buffer::<PlayerCommand>.in_set(SimulationSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::read_player_commands,
                    systems::advance_player_strikes,
                    systems::advance_spike_casts,
                    systems::advance_barriers,
                    systems::move_player,
                )
                    .chain()
                    .in_set(SimulationSet::Input),
            )
            .add_systems(
                FixedUpdate,
                systems::regenerate_player_health.in_set(SimulationSet::Resources),
            );
    }
}
