//! AI decision engine.
//!
//! Один движок решений с включаемыми модулями реакций (`ReactionModules`):
//! dodge away, through-dodge, retreat, hazard avoidance, stamina flee.
//! Policy is pure (`policy`), systems gather ECS state and commit the result.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod policy;
pub mod systems;

#[cfg(test)]
mod policy_tests;

pub use components::{
    AIBrain, AIConfig, AIState, ActiveManeuver, AttackSignal, AttackSource, DodgeKind, Maneuver,
    ManeuverTick, ReactionModules, ThreatDetector, ThroughDodge,
};
pub use policy::{DodgeAborted, ThreatReaction};

/// AI Plugin
///
/// Decide: решения врагов (угрозы → реакции, движение, старт комбо)
/// Maneuver: продвижение активных уклонений
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AIState>()
            .add_systems(
                FixedUpdate,
                systems::decide_enemy_actions.in_set(SimulationSet::Decide),
            )
            .add_systems(
                FixedUpdate,
                systems::advance_maneuvers.in_set(SimulationSet::Maneuver),
            );
    }
}
