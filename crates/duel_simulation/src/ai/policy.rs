//! Decision policy (pure): threat reactions and movement precedence.
//!
//! No ECS access here. The decision system gathers a snapshot, asks the policy,
//! then commits the answer.

use thiserror::Error;

use super::components::{AIBrain, AIConfig, AIState, ReactionModules};
use crate::rng::RandomSource;

/// Why a chosen dodge fell back to a plain retreat at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DodgeAborted {
    #[error("stamina consumption failed ({available:.1} < {required:.1})")]
    StaminaConsumeFailed { required: f32, available: f32 },
}

/// Snapshot used by `choose_reaction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatAssessment {
    pub stunned: bool,
    pub fleeing_stamina: bool,
    pub wall_behind: bool,
    pub distance: f32,
    /// ground ray hit or |vy| below epsilon
    pub grounded: bool,
    pub dodge_ready: bool,
    pub stamina: f32,
    pub dodge_cost: f32,
}

impl ThreatAssessment {
    pub fn can_dodge(&self) -> bool {
        self.grounded && self.dodge_ready && self.stamina >= self.dodge_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatReaction {
    /// Stunned or fleeing from stamina loss
    Suppressed,
    /// Out of danger range, no wall behind
    Ignored,
    ThroughDodge,
    DodgeAway,
    /// Wall behind but gate or roll failed: nothing happens
    HoldPosition,
    /// Retreat at normal move speed
    FallbackRetreat,
}

/// One random draw, only when the dodge gate is open.
pub fn choose_reaction(
    assessment: &ThreatAssessment,
    config: &AIConfig,
    rng: &mut dyn RandomSource,
) -> ThreatReaction {
    if assessment.stunned || assessment.fleeing_stamina {
        return ThreatReaction::Suppressed;
    }

    if assessment.wall_behind && config.modules.contains(ReactionModules::THROUGH_DODGE) {
        if assessment.can_dodge() && roll(rng, config.dodge_chance) {
            ThreatReaction::ThroughDodge
        } else {
            ThreatReaction::HoldPosition
        }
    } else if assessment.distance <= config.danger_range {
        let enabled = config.modules.contains(ReactionModules::DODGE_AWAY);
        if enabled && assessment.can_dodge() && roll(rng, config.dodge_chance) {
            ThreatReaction::DodgeAway
        } else {
            ThreatReaction::FallbackRetreat
        }
    } else {
        ThreatReaction::Ignored
    }
}

fn roll(rng: &mut dyn RandomSource, chance: f32) -> bool {
    rng.next_unit() <= chance
}

/// Snapshot used by `decide_movement`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementContext {
    pub now: f32,
    pub distance: f32,
    /// Horizontal sign pointing away from the opponent
    pub away: f32,
    pub opponent_attacking: bool,
    /// Horizontal sign pointing away from the nearest threatening hazard
    pub hazard_away: Option<f32>,
    /// Own combo would be accepted right now
    pub can_attack: bool,
    pub move_speed: f32,
    pub chase_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementDecision {
    pub state: AIState,
    pub velocity_x: f32,
    pub start_combo: bool,
}

impl MovementDecision {
    fn moving(state: AIState, velocity_x: f32) -> Self {
        Self {
            state,
            velocity_x,
            start_combo: false,
        }
    }
}

/// Precedence: stamina flee > hazard flee > attack retreat (with floor) > range rules.
pub fn decide_movement(
    ctx: &MovementContext,
    brain: &mut AIBrain,
    config: &AIConfig,
) -> MovementDecision {
    if brain.fleeing_stamina && config.modules.contains(ReactionModules::STAMINA_FLEE) {
        let velocity_x = if ctx.distance < config.flee_distance {
            ctx.away * ctx.move_speed * config.flee_speed_multiplier
        } else {
            0.0
        };
        return MovementDecision::moving(AIState::FleeingStaminaLoss, velocity_x);
    }

    brain.fleeing_hazard = false;
    if config.modules.contains(ReactionModules::HAZARD_AVOIDANCE) {
        if let Some(away) = ctx.hazard_away {
            brain.fleeing_hazard = true;
            return MovementDecision::moving(AIState::FleeingHazard, away * ctx.chase_speed);
        }
    }

    let attacked =
        ctx.opponent_attacking && config.modules.contains(ReactionModules::ATTACK_RETREAT);
    if brain.should_retreat(attacked, ctx.now, config) {
        if !brain.retreating {
            brain.begin_retreat(ctx.now);
        }
        let velocity_x = if ctx.distance < config.retreat_distance {
            ctx.away * ctx.move_speed * config.retreat_speed_multiplier
        } else {
            0.0
        };
        return MovementDecision::moving(AIState::Retreat, velocity_x);
    }
    brain.retreating = false;

    if ctx.distance > config.detection_range {
        MovementDecision::moving(AIState::Idle, 0.0)
    } else if ctx.distance <= config.attack_range && ctx.can_attack {
        MovementDecision {
            state: AIState::Attacking,
            velocity_x: 0.0,
            start_combo: true,
        }
    } else if ctx.distance > config.attack_range {
        MovementDecision::moving(AIState::Approach, -ctx.away * ctx.chase_speed)
    } else {
        MovementDecision::moving(AIState::Idle, 0.0)
    }
}
