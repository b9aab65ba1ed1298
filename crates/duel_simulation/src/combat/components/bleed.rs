//! Bleed: every committed dodge costs health while it lasts.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Bleed {
    pub active: bool,
    pub expires_at: f32,
    pub damage_per_dodge: f32,
}

impl Bleed {
    /// Re-application refreshes both duration and damage.
    pub fn apply(&mut self, duration: f32, damage_per_dodge: f32, now: f32) {
        self.active = true;
        self.expires_at = now + duration.max(0.0);
        self.damage_per_dodge = damage_per_dodge;
    }

    /// Damage owed for a dodge committed at `now`.
    pub fn on_dodge(&self, now: f32) -> Option<f32> {
        (self.active && now < self.expires_at && self.damage_per_dodge > 0.0)
            .then_some(self.damage_per_dodge)
    }

    pub fn tick(&mut self, now: f32) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
            return true;
        }
        false
    }
}
