//! Combat events: damage requests/results, stun requests, presentation cues.

use bevy::prelude::*;

use crate::ai::DodgeKind;
use crate::combat::ComboEnd;

/// Что нанесло урон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    EnemyCombo { step: usize },
    LightStrike { index: usize },
    HeavyStrike { index: usize },
    Spikes,
    Bleed,
}

/// Event: raw damage to push through the damage pipeline
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub source: DamageSource,
}

/// Event: damage was applied
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Raw amount before mitigation
    pub raw: f32,
    /// Amount subtracted from Health
    pub damage: f32,
    pub source: DamageSource,
}

/// Event: damage fully absorbed (target immune)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageBlocked {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub raw: f32,
    pub source: DamageSource,
}

/// Event: entity died (Health reached 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Event: incapacitate `target` for `duration` seconds
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StunRequest {
    pub target: Entity,
    pub duration: f32,
    pub source: Option<Entity>,
}

/// Fire-and-forget notifications for the presentation layer
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CombatCue {
    AttackStep { entity: Entity, step: usize },
    ComboEnded { entity: Entity, reason: ComboEnd },
    DodgeStarted { entity: Entity, kind: DodgeKind },
    DodgeEnded { entity: Entity, kind: DodgeKind, cancelled: bool },
    StunApplied { entity: Entity, expires_at: f32, extended: bool },
    StunRemoved { entity: Entity },
    FacingChanged { entity: Entity, facing: f32 },
    HazardErupted { caster: Entity, position: Vec2 },
    BarrierRaised { entity: Entity },
    BarrierLowered { entity: Entity, held: f32, cooldown: f32 },
}
