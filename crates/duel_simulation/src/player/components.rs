//! Player-side state: strike chains, abilities, regeneration, hazards.

use bevy::prelude::*;
use thiserror::Error;

use crate::ai::{AttackSignal, AttackSource};
use crate::profile::{BarrierProfile, ChainProfile, SpikeProfile};

/// Why a strike or ability press did nothing
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ActionRefused {
    #[error("already attacking")]
    Busy,
    #[error("blocked by the heavy chain")]
    BlockedByHeavy,
    #[error("on cooldown ({remaining:.2}s left)")]
    OnCooldown { remaining: f32 },
    #[error("no target in reach")]
    NoTarget,
}

/// Strike in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub index: usize,
    pub started_at: f32,
    pub hit_pending: bool,
}

/// Per-tick output of `ComboChain::tick`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrikeTick {
    /// Strike whose hit is due this tick
    pub hit: Option<usize>,
    pub finished: bool,
}

/// Player strike chain (light or heavy)
///
/// `combo_index` = индекс ПОСЛЕ инкремента (это видит ThreatDetector врага).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComboChain {
    pub combo_index: usize,
    pub strike: Option<Strike>,
    pub last_strike_at: Option<f32>,
}

impl ComboChain {
    pub fn is_attacking(&self) -> bool {
        self.strike.is_some()
    }

    /// Starts the next strike. Returns the strike index.
    pub fn try_strike(&mut self, profile: &ChainProfile, now: f32) -> Result<usize, ActionRefused> {
        if self.is_attacking() {
            return Err(ActionRefused::Busy);
        }

        // Окно комбо истекло → начинаем с нуля
        if self
            .last_strike_at
            .is_some_and(|at| now - at > profile.combo_window)
        {
            self.combo_index = 0;
        }

        let strikes = profile.strikes.max(1);
        let index = self.combo_index % strikes;
        self.combo_index = (index + 1) % strikes;
        self.last_strike_at = Some(now);
        self.strike = Some(Strike {
            index,
            started_at: now,
            hit_pending: true,
        });

        Ok(index)
    }

    /// Hit lands at `damage_delay`, strike ends at `duration`. A hit that is
    /// still pending at the end is delivered in the same tick.
    pub fn tick(&mut self, profile: &ChainProfile, now: f32) -> StrikeTick {
        let Some(mut strike) = self.strike else {
            return StrikeTick::default();
        };

        let elapsed = now - strike.started_at;
        let ends = elapsed >= profile.duration(strike.index);
        let mut result = StrikeTick::default();

        if strike.hit_pending && (elapsed >= profile.damage_delay(strike.index) || ends) {
            strike.hit_pending = false;
            result.hit = Some(strike.index);
        }

        if ends {
            self.strike = None;
            result.finished = true;
        } else {
            self.strike = Some(strike);
        }

        result
    }

    pub fn signal(&self, source: AttackSource) -> AttackSignal {
        AttackSignal {
            source,
            attacking: self.is_attacking(),
            combo_index: self.combo_index,
        }
    }

    pub fn cancel(&mut self) {
        self.strike = None;
    }
}

/// Обе цепочки ударов игрока
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerOffense {
    pub heavy: ComboChain,
    pub light: ComboChain,
}

impl PlayerOffense {
    /// Heavy first, then light (detector order).
    pub fn signals(&self) -> [AttackSignal; 2] {
        [
            self.heavy.signal(AttackSource::Heavy),
            self.light.signal(AttackSource::Light),
        ]
    }

    pub fn is_attacking(&self) -> bool {
        self.heavy.is_attacking() || self.light.is_attacking()
    }

    pub fn strike_light(&mut self, profile: &ChainProfile, now: f32) -> Result<usize, ActionRefused> {
        if self.heavy.is_attacking() {
            return Err(ActionRefused::BlockedByHeavy);
        }
        self.light.try_strike(profile, now)
    }

    pub fn strike_heavy(&mut self, profile: &ChainProfile, now: f32) -> Result<usize, ActionRefused> {
        self.heavy.try_strike(profile, now)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthRegen {
    pub last_damaged_at: Option<f32>,
}

impl HealthRegen {
    pub fn ready(&self, delay: f32, now: f32) -> bool {
        self.last_damaged_at.is_none_or(|at| now - at >= delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpikePhase {
    #[default]
    Ready,
    /// Zone follows the target horizontally
    Tracking {
        started_at: f32,
        position: Vec2,
        target: Entity,
    },
    /// Zone fixed, about to erupt
    Warning { started_at: f32, position: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpikeTick {
    Idle,
    Zone(Vec2),
    Erupted(Vec2),
}

/// Способность 1: шипы из земли
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct SpikeCast {
    pub phase: SpikePhase,
    pub cooldown_until: f32,
}

impl SpikeCast {
    pub fn begin(&mut self, target: Entity, position: Vec2, now: f32) -> Result<(), ActionRefused> {
        if self.phase != SpikePhase::Ready {
            return Err(ActionRefused::Busy);
        }
        if now < self.cooldown_until {
            return Err(ActionRefused::OnCooldown {
                remaining: self.cooldown_until - now,
            });
        }
        self.phase = SpikePhase::Tracking {
            started_at: now,
            position,
            target,
        };
        Ok(())
    }

    pub fn tracked_target(&self) -> Option<Entity> {
        match self.phase {
            SpikePhase::Tracking { target, .. } => Some(target),
            _ => None,
        }
    }

    /// `target_x` is the tracked target's current x (None if it is gone).
    pub fn advance(
        &mut self,
        profile: &SpikeProfile,
        target_x: Option<f32>,
        dt: f32,
        now: f32,
    ) -> SpikeTick {
        match self.phase {
            SpikePhase::Ready => SpikeTick::Idle,
            SpikePhase::Tracking {
                started_at,
                mut position,
                target,
            } => {
                if let Some(x) = target_x {
                    let step = profile.follow_speed * dt;
                    position.x += (x - position.x).clamp(-step, step);
                }
                self.phase = if now - started_at >= profile.cast_duration {
                    SpikePhase::Warning {
                        started_at: now,
                        position,
                    }
                } else {
                    SpikePhase::Tracking {
                        started_at,
                        position,
                        target,
                    }
                };
                SpikeTick::Zone(position)
            }
            SpikePhase::Warning {
                started_at,
                position,
            } => {
                if now - started_at >= profile.warning_duration {
                    self.phase = SpikePhase::Ready;
                    self.cooldown_until = now + profile.cooldown;
                    SpikeTick::Erupted(position)
                } else {
                    SpikeTick::Zone(position)
                }
            }
        }
    }
}

/// Способность 2: барьер
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Barrier {
    pub raised_at: Option<f32>,
    pub cooldown_until: f32,
}

impl Barrier {
    pub fn is_raised(&self) -> bool {
        self.raised_at.is_some()
    }

    pub fn raise(&mut self, now: f32) -> Result<(), ActionRefused> {
        if self.is_raised() {
            return Err(ActionRefused::Busy);
        }
        if now < self.cooldown_until {
            return Err(ActionRefused::OnCooldown {
                remaining: self.cooldown_until - now,
            });
        }
        self.raised_at = Some(now);
        Ok(())
    }

    /// Returns `(held, cooldown)` if the barrier was up.
    pub fn lower(&mut self, profile: &BarrierProfile, now: f32) -> Option<(f32, f32)> {
        let raised_at = self.raised_at.take()?;
        let held = (now - raised_at).max(0.0);
        let cooldown = profile.cooldown_after(held);
        self.cooldown_until = now + cooldown;
        Some((held, cooldown))
    }

    pub fn expired(&self, profile: &BarrierProfile, now: f32) -> bool {
        self.raised_at
            .is_some_and(|at| now - at >= profile.max_duration)
    }
}

/// Area hazard the AI avoids
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub owner: Entity,
    pub position: Vec2,
    pub radius: f32,
}

/// Активные опасные зоны (пересобираются каждый тик)
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveHazards {
    pub zones: Vec<Hazard>,
}

impl ActiveHazards {
    /// Nearest hazard whose center lies within `radius + margin` of `position`.
    pub fn threatening(&self, position: Vec2, margin: f32) -> Option<&Hazard> {
        self.zones
            .iter()
            .filter(|hazard| hazard.position.distance(position) <= hazard.radius + margin)
            .min_by(|a, b| {
                a.position
                    .distance(position)
                    .total_cmp(&b.position.distance(position))
            })
    }
}
