//! Damage pipeline (pure): immunity → flee reduction → armor.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Armor компонент (только у игрока)
///
/// reduction = armor / (armor + 100), затем flat fraction.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub armor: f32,
    pub flat_reduction: f32,
}

impl Armor {
    pub fn reduction(&self) -> f32 {
        let armor = self.armor.max(0.0);
        armor / (armor + 100.0)
    }

    pub fn mitigate(&self, amount: f32) -> f32 {
        amount * (1.0 - self.reduction()) * (1.0 - self.flat_reduction.clamp(0.0, 1.0))
    }
}

/// Target state relevant to mitigation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageModifiers {
    pub immune: bool,
    /// Multiplier while fleeing from stamina loss
    pub flee_reduction: Option<f32>,
    pub armor: Option<Armor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageResolution {
    Immune,
    Applied(f32),
}

pub fn resolve_damage(raw: f32, modifiers: &DamageModifiers) -> DamageResolution {
    if modifiers.immune {
        return DamageResolution::Immune;
    }

    let mut amount = raw.max(0.0);
    if let Some(factor) = modifiers.flee_reduction {
        amount *= factor;
    }
    if let Some(armor) = modifiers.armor {
        amount = armor.mitigate(amount);
    }

    DamageResolution::Applied(amount)
}

/// Marker: мертвый (Health == 0). Despawn в Cleanup того же тика.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;
