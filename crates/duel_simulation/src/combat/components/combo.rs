//! Combo attack state machine (enemy).
//!
//! Idle → Windup(step) → Recovery(step) → {Idle | Windup(step + 1)}
//!
//! Timing is explicit: `advance(now)` walks every transition whose deadline has
//! passed, so a long tick never skips a hit. Stamina is paid at step start.

use bevy::prelude::*;
use thiserror::Error;

use crate::components::Stamina;
use crate::profile::CombatProfile;

/// Why `start` refused a combo. Never escalates: the caller just keeps moving.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ComboRejected {
    #[error("already attacking")]
    AlreadyAttacking,
    #[error("combo on cooldown ({remaining:.2}s left)")]
    OnCooldown { remaining: f32 },
    #[error("insufficient stamina ({available:.1} < {required:.1})")]
    InsufficientStamina { required: f32, available: f32 },
    #[error("combo table is empty")]
    NoSteps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEnd {
    Completed,
    OutOfStamina,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComboEvent {
    StepStarted { step: usize, stamina_cost: f32 },
    HitApply { step: usize, damage: f32 },
    Ended(ComboEnd),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ComboPhase {
    #[default]
    Idle,
    /// Before the hit lands
    Windup { step: usize, started_at: f32 },
    /// Hit landed, waiting for step end
    Recovery { step: usize, started_at: f32 },
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct ComboAttack {
    pub phase: ComboPhase,
    pub last_combo_started_at: Option<f32>,
    pub target: Option<Entity>,
}

impl ComboAttack {
    pub fn is_attacking(&self) -> bool {
        !matches!(self.phase, ComboPhase::Idle)
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.phase {
            ComboPhase::Idle => None,
            ComboPhase::Windup { step, .. } | ComboPhase::Recovery { step, .. } => Some(step),
        }
    }

    pub fn cooldown_remaining(&self, cooldown: f32, now: f32) -> f32 {
        self.last_combo_started_at
            .map_or(0.0, |at| (at + cooldown - now).max(0.0))
    }

    pub fn check_start(
        &self,
        profile: &CombatProfile,
        stamina: &Stamina,
        now: f32,
    ) -> Result<(), ComboRejected> {
        if self.is_attacking() {
            return Err(ComboRejected::AlreadyAttacking);
        }
        let remaining = self.cooldown_remaining(profile.attack_cooldown, now);
        if remaining > 0.0 {
            return Err(ComboRejected::OnCooldown { remaining });
        }
        let first = profile.step(0).ok_or(ComboRejected::NoSteps)?;
        if !stamina.can_afford(first.stamina_cost) {
            return Err(ComboRejected::InsufficientStamina {
                required: first.stamina_cost,
                available: stamina.current,
            });
        }
        Ok(())
    }

    /// Starts step 0 against `target`. On rejection nothing changes.
    pub fn start(
        &mut self,
        target: Entity,
        profile: &CombatProfile,
        stamina: &mut Stamina,
        now: f32,
    ) -> Result<ComboEvent, ComboRejected> {
        self.check_start(profile, stamina, now)?;
        let first = profile.step(0).ok_or(ComboRejected::NoSteps)?;
        if !stamina.consume(first.stamina_cost, now) {
            return Err(ComboRejected::InsufficientStamina {
                required: first.stamina_cost,
                available: stamina.current,
            });
        }

        self.phase = ComboPhase::Windup {
            step: 0,
            started_at: now,
        };
        self.last_combo_started_at = Some(now);
        self.target = Some(target);

        Ok(ComboEvent::StepStarted {
            step: 0,
            stamina_cost: first.stamina_cost,
        })
    }

    /// Applies every transition due at `now`, in order.
    pub fn advance(
        &mut self,
        profile: &CombatProfile,
        stamina: &mut Stamina,
        now: f32,
    ) -> Vec<ComboEvent> {
        let mut events = Vec::new();

        loop {
            match self.phase {
                ComboPhase::Idle => break,
                ComboPhase::Windup { step, started_at } => {
                    let Some(current) = profile.step(step) else {
                        events.push(self.finish(ComboEnd::Completed));
                        break;
                    };
                    // A late damage_delay still lands no later than the step end
                    let hit_at = started_at + current.damage_delay.min(current.duration);
                    if now < hit_at {
                        break;
                    }
                    events.push(ComboEvent::HitApply {
                        step,
                        damage: current.damage,
                    });
                    self.phase = ComboPhase::Recovery { step, started_at };
                }
                ComboPhase::Recovery { step, started_at } => {
                    let Some(current) = profile.step(step) else {
                        events.push(self.finish(ComboEnd::Completed));
                        break;
                    };
                    let ends_at = started_at + current.duration;
                    if now < ends_at {
                        break;
                    }

                    let next = step + 1;
                    if next >= profile.combo_len() {
                        events.push(self.finish(ComboEnd::Completed));
                        break;
                    }
                    let Some(next_step) = profile.step(next) else {
                        events.push(self.finish(ComboEnd::Completed));
                        break;
                    };
                    if !stamina.consume(next_step.stamina_cost, ends_at) {
                        events.push(self.finish(ComboEnd::OutOfStamina));
                        break;
                    }

                    self.phase = ComboPhase::Windup {
                        step: next,
                        started_at: ends_at,
                    };
                    events.push(ComboEvent::StepStarted {
                        step: next,
                        stamina_cost: next_step.stamina_cost,
                    });
                }
            }
        }

        events
    }

    /// Drops the run without firing pending hits. Cooldown keeps counting.
    pub fn interrupt(&mut self) -> Option<ComboEvent> {
        if !self.is_attacking() {
            return None;
        }
        Some(self.finish(ComboEnd::Interrupted))
    }

    fn finish(&mut self, reason: ComboEnd) -> ComboEvent {
        self.phase = ComboPhase::Idle;
        self.target = None;
        ComboEvent::Ended(reason)
    }
}
