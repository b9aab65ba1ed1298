//! Combat profiles: immutable per-archetype tuning data.
//!
//! Profiles are validated once and then shared read-only through `Arc`
//! (`CombatProfileRef`, `PlayerProfileRef`) across every combatant of the archetype.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

pub mod loader;

pub use loader::{EnemyArchetype, ProfileSet};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("combatant has no combat profile assigned")]
    Missing,
    #[error("combo table is empty")]
    EmptyCombo,
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("combo step {index}: {field} must be non-negative, got {value}")]
    InvalidStep {
        index: usize,
        field: &'static str,
        value: f32,
    },
    #[error("unknown enemy archetype '{0}'")]
    UnknownArchetype(String),
    #[error("failed to parse profile set: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(field: &'static str, value: f32) -> Result<(), ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProfileError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProfileError::Negative { field, value })
    }
}

/// Один удар комбо
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboStep {
    pub damage: f32,
    pub stamina_cost: f32,
    /// Step length (seconds from step start)
    pub duration: f32,
    /// Hit-apply moment (seconds from step start)
    pub damage_delay: f32,
}

impl ComboStep {
    fn validate(&self, index: usize) -> Result<(), ProfileError> {
        let fields = [
            ("damage", self.damage),
            ("stamina_cost", self.stamina_cost),
            ("duration", self.duration),
            ("damage_delay", self.damage_delay),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::InvalidStep {
                    index,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Тюнинг врага (архетип)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatProfile {
    pub max_health: f32,
    pub max_stamina: f32,
    pub stamina_regen_rate: f32,
    pub stamina_regen_delay: f32,
    pub dodge_stamina_cost: f32,
    /// Hit radius around the attack anchor
    pub attack_range: f32,
    pub attack_anchor_offset: f32,
    pub attack_cooldown: f32,
    pub combo: Vec<ComboStep>,
    pub move_speed: f32,
    pub chase_speed: f32,
}

impl Default for CombatProfile {
    fn default() -> Self {
        let slash = |damage, stamina_cost, duration, damage_delay| ComboStep {
            damage,
            stamina_cost,
            duration,
            damage_delay,
        };
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen_rate: 10.0,
            stamina_regen_delay: 2.0,
            dodge_stamina_cost: 30.0,
            attack_range: 2.5,
            attack_anchor_offset: 1.0,
            attack_cooldown: 1.5,
            combo: vec![
                slash(10.0, 20.0, 0.5, 0.2),
                slash(12.0, 25.0, 0.6, 0.25),
                slash(15.0, 30.0, 0.7, 0.3),
            ],
            move_speed: 2.0,
            chase_speed: 3.0,
        }
    }
}

impl CombatProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        positive("max_health", self.max_health)?;
        positive("max_stamina", self.max_stamina)?;
        non_negative("stamina_regen_rate", self.stamina_regen_rate)?;
        non_negative("stamina_regen_delay", self.stamina_regen_delay)?;
        non_negative("dodge_stamina_cost", self.dodge_stamina_cost)?;
        non_negative("attack_range", self.attack_range)?;
        non_negative("attack_cooldown", self.attack_cooldown)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("chase_speed", self.chase_speed)?;
        if self.combo.is_empty() {
            return Err(ProfileError::EmptyCombo);
        }
        for (index, step) in self.combo.iter().enumerate() {
            step.validate(index)?;
        }
        Ok(())
    }

    pub fn combo_len(&self) -> usize {
        self.combo.len()
    }

    /// Out-of-range indices fall back to step 0.
    pub fn step(&self, index: usize) -> Option<&ComboStep> {
        self.combo.get(index).or_else(|| self.combo.first())
    }
}

/// Тюнинг игрока
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub max_health: f32,
    pub health_regen_rate: f32,
    pub health_regen_delay: f32,
    pub move_speed: f32,
    pub armor: f32,
    /// Fraction (0..1) removed after armor
    pub flat_damage_reduction: f32,
    pub attack_range: f32,
    pub attack_anchor_offset: f32,
    pub light: ChainProfile,
    pub heavy: ChainProfile,
    /// Last heavy strike lands on the nearest enemy within this reach
    pub heavy_finisher_reach: f32,
    pub spikes: SpikeProfile,
    pub barrier: BarrierProfile,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            health_regen_rate: 5.0,
            health_regen_delay: 3.0,
            move_speed: 5.0,
            armor: 10.0,
            flat_damage_reduction: 0.1,
            attack_range: 2.0,
            attack_anchor_offset: 1.0,
            light: ChainProfile {
                strikes: 2,
                combo_window: 1.5,
                damage: vec![10.0, 12.0, 15.0],
                duration: vec![0.5, 0.6],
                damage_delay: vec![0.2, 0.25],
            },
            heavy: ChainProfile {
                strikes: 3,
                combo_window: 3.0,
                damage: vec![25.0, 35.0],
                duration: vec![1.0, 1.7, 1.8],
                damage_delay: vec![0.0, 0.0, 0.0],
            },
            heavy_finisher_reach: 28.5,
            spikes: SpikeProfile::default(),
            barrier: BarrierProfile::default(),
        }
    }
}

impl PlayerProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        positive("max_health", self.max_health)?;
        non_negative("health_regen_rate", self.health_regen_rate)?;
        non_negative("health_regen_delay", self.health_regen_delay)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("armor", self.armor)?;
        non_negative("flat_damage_reduction", self.flat_damage_reduction)?;
        if self.flat_damage_reduction > 1.0 {
            return Err(ProfileError::NonPositive {
                field: "1 - flat_damage_reduction",
                value: 1.0 - self.flat_damage_reduction,
            });
        }
        non_negative("attack_range", self.attack_range)?;
        self.light.validate()?;
        self.heavy.validate()?;
        self.spikes.validate()?;
        self.barrier.validate()
    }
}

/// Light/heavy strike chain. Per-strike tables index-clamp to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainProfile {
    pub strikes: usize,
    pub combo_window: f32,
    pub damage: Vec<f32>,
    pub duration: Vec<f32>,
    pub damage_delay: Vec<f32>,
}

fn clamped(table: &[f32], index: usize) -> f32 {
    table
        .get(index)
        .or_else(|| table.first())
        .copied()
        .unwrap_or(0.0)
}

impl ChainProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.strikes == 0 || self.damage.is_empty() || self.duration.is_empty() {
            return Err(ProfileError::EmptyCombo);
        }
        non_negative("combo_window", self.combo_window)?;
        let tables = [
            ("damage", &self.damage),
            ("duration", &self.duration),
            ("damage_delay", &self.damage_delay),
        ];
        for (field, table) in tables {
            for (index, value) in table.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(ProfileError::InvalidStep {
                        index,
                        field,
                        value: *value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn damage(&self, index: usize) -> f32 {
        clamped(&self.damage, index)
    }

    pub fn duration(&self, index: usize) -> f32 {
        clamped(&self.duration, index)
    }

    pub fn damage_delay(&self, index: usize) -> f32 {
        clamped(&self.damage_delay, index)
    }
}

/// Ability 1: tracking spike zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeProfile {
    pub cast_duration: f32,
    pub warning_duration: f32,
    pub cooldown: f32,
    pub follow_speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub bleed_duration: f32,
    pub bleed_damage_per_dodge: f32,
}

impl Default for SpikeProfile {
    fn default() -> Self {
        Self {
            cast_duration: 2.0,
            warning_duration: 0.5,
            cooldown: 10.0,
            follow_speed: 5.0,
            radius: 1.5,
            damage: 15.0,
            bleed_duration: 8.0,
            bleed_damage_per_dodge: 10.0,
        }
    }
}

impl SpikeProfile {
    fn validate(&self) -> Result<(), ProfileError> {
        non_negative("spikes.cast_duration", self.cast_duration)?;
        non_negative("spikes.warning_duration", self.warning_duration)?;
        non_negative("spikes.cooldown", self.cooldown)?;
        non_negative("spikes.radius", self.radius)?;
        non_negative("spikes.damage", self.damage)
    }
}

/// Ability 2: stunning barrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierProfile {
    pub max_duration: f32,
    pub max_cooldown: f32,
    pub min_cooldown: f32,
    pub min_hold: f32,
    pub stun_duration: f32,
    pub stun_radius: f32,
}

impl Default for BarrierProfile {
    fn default() -> Self {
        Self {
            max_duration: 5.0,
            max_cooldown: 15.0,
            min_cooldown: 5.0,
            min_hold: 0.5,
            stun_duration: 3.0,
            stun_radius: 3.0,
        }
    }
}

impl BarrierProfile {
    fn validate(&self) -> Result<(), ProfileError> {
        positive("barrier.max_duration", self.max_duration)?;
        non_negative("barrier.max_cooldown", self.max_cooldown)?;
        non_negative("barrier.min_cooldown", self.min_cooldown)?;
        non_negative("barrier.stun_duration", self.stun_duration)?;
        non_negative("barrier.stun_radius", self.stun_radius)
    }

    /// Cooldown after the barrier drops, based on how long it was held.
    pub fn cooldown_after(&self, held: f32) -> f32 {
        if held < self.min_hold {
            self.max_cooldown
        } else {
            let scaled = self.max_cooldown * (held / self.max_duration).min(1.0);
            scaled.max(self.min_cooldown)
        }
    }
}

/// Marker: configuration error. AI and combo systems skip this combatant
/// until a valid profile is attached.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct CombatDisabled {
    pub reason: String,
}

/// Component: shared, validated enemy profile
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CombatProfileRef(Arc<CombatProfile>);

impl CombatProfileRef {
    pub fn new(profile: CombatProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self(Arc::new(profile)))
    }

    pub fn shared(profile: Arc<CombatProfile>) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self(profile))
    }
}

impl Deref for CombatProfileRef {
    type Target = CombatProfile;

    fn deref(&self) -> &CombatProfile {
        &self.0
    }
}

/// Component: shared, validated player profile
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerProfileRef(Arc<PlayerProfile>);

impl PlayerProfileRef {
    pub fn new(profile: PlayerProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self(Arc::new(profile)))
    }
}

impl Deref for PlayerProfileRef {
    type Target = PlayerProfile;

    fn deref(&self) -> &PlayerProfile {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enemy_profile_is_valid() {
        let profile = CombatProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.combo_len(), 3);
        assert_eq!(profile.step(1).map(|s| s.damage), Some(12.0));
    }

    #[test]
    fn test_step_index_falls_back_to_zero() {
        let profile = CombatProfile::default();
        assert_eq!(profile.step(7), profile.step(0));
    }

    #[test]
    fn test_empty_combo_rejected() {
        let profile = CombatProfile {
            combo: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(profile.validate(), Err(ProfileError::EmptyCombo)));
        assert!(CombatProfileRef::new(profile).is_err());
    }

    #[test]
    fn test_negative_step_cost_rejected() {
        let mut profile = CombatProfile::default();
        profile.combo[1].stamina_cost = -1.0;
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidStep { index: 1, field: "stamina_cost", .. })
        ));
    }

    #[test]
    fn test_heavy_damage_table_clamps() {
        let profile = PlayerProfile::default();
        assert_eq!(profile.heavy.damage(1), 35.0);
        assert_eq!(profile.heavy.damage(2), 25.0);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_barrier_cooldown_scaling() {
        let barrier = BarrierProfile::default();
        assert_eq!(barrier.cooldown_after(0.2), 15.0);
        assert_eq!(barrier.cooldown_after(1.0), 5.0); // 15 × 0.2 = 3 → min 5
        assert_eq!(barrier.cooldown_after(2.5), 7.5);
        assert_eq!(barrier.cooldown_after(5.0), 15.0);
    }
}
