//! Timed, cancelable maneuvers: dodge away and dodge through the opponent.
//!
//! Explicit per-tick state: `tick(now)` advances, `cancel()` is just a state
//! transition. Physical cleanup (kinematic flag, collision groups) is done by
//! the caller in the same system call.

use bevy::prelude::*;

use crate::components::horizontal_sign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DodgeKind {
    Away,
    Through,
}

/// Controlled traversal past the opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughDodge {
    pub started_at: f32,
    pub duration: f32,
    pub start: Vec2,
    pub target: Vec2,
    pub opponent: Entity,
}

impl ThroughDodge {
    /// Target lies `overshoot` beyond the opponent on the far side; height is kept.
    pub fn plan(
        start: Vec2,
        opponent_position: Vec2,
        overshoot: f32,
        duration: f32,
        now: f32,
        opponent: Entity,
    ) -> Self {
        let direction = horizontal_sign(opponent_position.x - start.x);
        Self {
            started_at: now,
            duration,
            start,
            target: Vec2::new(opponent_position.x + direction * overshoot, start.y),
            opponent,
        }
    }

    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    pub fn position_at(&self, now: f32) -> Vec2 {
        self.start.lerp(self.target, self.progress(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveManeuver {
    /// Impulse away from the opponent, no invulnerability
    DodgeAway {
        started_at: f32,
        duration: f32,
        direction: f32,
    },
    ThroughDodge(ThroughDodge),
}

impl ActiveManeuver {
    pub fn kind(&self) -> DodgeKind {
        match self {
            ActiveManeuver::DodgeAway { .. } => DodgeKind::Away,
            ActiveManeuver::ThroughDodge(_) => DodgeKind::Through,
        }
    }
}

/// Per-tick result of `Maneuver::tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManeuverTick {
    Idle,
    /// Dodge-away still running
    Dodging,
    /// Through-dodge in progress, body should be at this position
    Moving(Vec2),
    /// Natural completion. For a through-dodge `snap_to` is the target.
    Finished { kind: DodgeKind, snap_to: Option<Vec2> },
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Maneuver {
    pub active: Option<ActiveManeuver>,
    /// Start time of the last committed dodge (either kind)
    pub last_dodge_at: Option<f32>,
}

impl Maneuver {
    pub fn is_dodging(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_dodging_away(&self) -> bool {
        matches!(self.active, Some(ActiveManeuver::DodgeAway { .. }))
    }

    pub fn is_through_dodging(&self) -> bool {
        matches!(self.active, Some(ActiveManeuver::ThroughDodge(_)))
    }

    /// Full immunity only during a through-dodge.
    pub fn is_damage_immune(&self) -> bool {
        self.is_through_dodging()
    }

    pub fn cooldown_ready(&self, cooldown: f32, now: f32) -> bool {
        self.last_dodge_at.is_none_or(|at| now - at >= cooldown)
    }

    pub fn begin_dodge_away(&mut self, direction: f32, duration: f32, now: f32) {
        self.active = Some(ActiveManeuver::DodgeAway {
            started_at: now,
            duration,
            direction,
        });
        self.last_dodge_at = Some(now);
    }

    pub fn begin_through_dodge(&mut self, plan: ThroughDodge) {
        self.last_dodge_at = Some(plan.started_at);
        self.active = Some(ActiveManeuver::ThroughDodge(plan));
    }

    pub fn tick(&mut self, now: f32) -> ManeuverTick {
        let Some(active) = self.active else {
            return ManeuverTick::Idle;
        };

        match active {
            ActiveManeuver::DodgeAway {
                started_at,
                duration,
                ..
            } => {
                if now - started_at >= duration {
                    self.active = None;
                    ManeuverTick::Finished {
                        kind: DodgeKind::Away,
                        snap_to: None,
                    }
                } else {
                    ManeuverTick::Dodging
                }
            }
            ActiveManeuver::ThroughDodge(plan) => {
                if plan.progress(now) >= 1.0 {
                    self.active = None;
                    ManeuverTick::Finished {
                        kind: DodgeKind::Through,
                        snap_to: Some(plan.target),
                    }
                } else {
                    ManeuverTick::Moving(plan.position_at(now))
                }
            }
        }
    }

    /// Stops wherever the maneuver currently is.
    pub fn cancel(&mut self) -> Option<DodgeKind> {
        self.active.take().map(|active| active.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opponent() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn test_through_dodge_plan_overshoots() {
        let plan = ThroughDodge::plan(Vec2::new(8.0, 0.5), Vec2::new(5.0, 0.5), 5.0, 0.4, 0.0, opponent());
        // Противник слева → цель 5.0 - 5.0 = 0.0
        assert_eq!(plan.target, Vec2::new(0.0, 0.5));
        assert_eq!(plan.target.x - plan.start.x, 5.0 - 8.0 - 5.0);

        let plan = ThroughDodge::plan(Vec2::new(0.0, 1.0), Vec2::new(3.0, 0.5), 5.0, 0.4, 0.0, opponent());
        assert_eq!(plan.target, Vec2::new(8.0, 1.0));
    }

    #[test]
    fn test_through_dodge_completes_at_target() {
        let mut maneuver = Maneuver::default();
        let plan = ThroughDodge::plan(Vec2::ZERO, Vec2::new(3.0, 0.0), 5.0, 0.4, 1.0, opponent());
        maneuver.begin_through_dodge(plan);
        assert!(maneuver.is_damage_immune());
        assert_eq!(maneuver.last_dodge_at, Some(1.0));

        let ManeuverTick::Moving(mid) = maneuver.tick(1.2) else {
            panic!("expected Moving");
        };
        assert!(mid.x > 0.0 && mid.x < 8.0);

        assert_eq!(
            maneuver.tick(1.5),
            ManeuverTick::Finished {
                kind: DodgeKind::Through,
                snap_to: Some(Vec2::new(8.0, 0.0)),
            }
        );
        assert!(!maneuver.is_dodging());
        assert!(!maneuver.is_damage_immune());
    }

    #[test]
    fn test_cancel_is_immediate() {
        let mut maneuver = Maneuver::default();
        maneuver.begin_dodge_away(-1.0, 0.2, 0.0);
        assert!(maneuver.is_dodging_away());
        assert_eq!(maneuver.cancel(), Some(DodgeKind::Away));
        assert_eq!(maneuver.tick(1.0), ManeuverTick::Idle);
        assert_eq!(maneuver.cancel(), None);
    }

    #[test]
    fn test_dodge_cooldown() {
        let mut maneuver = Maneuver::default();
        assert!(maneuver.cooldown_ready(0.5, 0.0));
        maneuver.begin_dodge_away(1.0, 0.2, 1.0);
        assert!(!maneuver.cooldown_ready(0.5, 1.25));
        assert!(maneuver.cooldown_ready(0.5, 1.5));
    }
}
