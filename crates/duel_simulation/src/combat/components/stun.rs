//! Stun record and the shared action gate.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StunOutcome {
    Applied,
    /// Already stunned: expiry pushed out, no second timer
    Extended,
}

/// Stun record
///
/// While `active` it owns the combatant's motion and attack state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct StunState {
    pub active: bool,
    pub expires_at: f32,
}

impl StunState {
    /// Re-applying keeps the later of the two expiry times.
    pub fn apply(&mut self, duration: f32, now: f32) -> StunOutcome {
        let until = now + duration.max(0.0);
        if self.active {
            self.expires_at = self.expires_at.max(until);
            StunOutcome::Extended
        } else {
            self.active = true;
            self.expires_at = until;
            StunOutcome::Applied
        }
    }

    /// Returns true on the tick the stun expires.
    pub fn tick(&mut self, now: f32) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
            return true;
        }
        false
    }

    pub fn remaining(&self, now: f32) -> f32 {
        if self.active {
            (self.expires_at - now).max(0.0)
        } else {
            0.0
        }
    }
}

/// Enable flag for the AI decision engine and the combo state machine.
///
/// Only the stun controller writes it; both subsystems check it before evaluating.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActionGate {
    pub enabled: bool,
}

impl Default for ActionGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stun_apply_and_expire() {
        let mut stun = StunState::default();
        assert_eq!(stun.apply(3.0, 1.0), StunOutcome::Applied);
        assert!(stun.active);
        assert_eq!(stun.expires_at, 4.0);

        assert!(!stun.tick(3.9));
        assert!(stun.tick(4.0));
        assert!(!stun.active);
        assert!(!stun.tick(4.1)); // Один раз
    }

    #[test]
    fn test_reapply_extends_not_shortens() {
        let mut stun = StunState::default();
        stun.apply(3.0, 0.0);
        assert_eq!(stun.apply(3.0, 2.0), StunOutcome::Extended);
        assert_eq!(stun.expires_at, 5.0);

        stun.apply(0.5, 2.5); // Короче текущего — не укорачиваем
        assert_eq!(stun.expires_at, 5.0);
        assert_eq!(stun.remaining(4.0), 1.0);
    }
}
