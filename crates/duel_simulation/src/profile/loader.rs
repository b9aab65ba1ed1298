//! JSON profile set: named enemy archetypes plus the player profile.
//!
//! ```json
//! {
//!   "enemies": { "grunt": { "profile": { "max_health": 80.0 }, "ai": { "dodge_chance": 0.5 } } },
//!   "player": { "armor": 20.0 }
//! }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{CombatProfile, CombatProfileRef, PlayerProfile, PlayerProfileRef, ProfileError};
use crate::ai::AIConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnemyArchetype {
    pub profile: CombatProfile,
    pub ai: AIConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileSet {
    pub enemies: BTreeMap<String, EnemyArchetype>,
    pub player: PlayerProfile,
}

impl ProfileSet {
    /// Parses and validates every profile in the document.
    pub fn from_json(text: &str) -> Result<Self, ProfileError> {
        let set: Self = serde_json::from_str(text)?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for archetype in self.enemies.values() {
            archetype.profile.validate()?;
        }
        self.player.validate()
    }

    pub fn enemy(&self, name: &str) -> Result<(CombatProfileRef, AIConfig), ProfileError> {
        let archetype = self
            .enemies
            .get(name)
            .ok_or_else(|| ProfileError::UnknownArchetype(name.to_string()))?;
        let profile = CombatProfileRef::shared(Arc::new(archetype.profile.clone()))?;
        Ok((profile, archetype.ai.clone()))
    }

    pub fn player(&self) -> Result<PlayerProfileRef, ProfileError> {
        PlayerProfileRef::new(self.player.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_archetype_uses_defaults() {
        let set = ProfileSet::from_json(
            r#"{ "enemies": { "grunt": { "profile": { "max_health": 80.0 }, "ai": { "dodge_chance": 0.5 } } } }"#,
        )
        .unwrap();

        let (profile, ai) = set.enemy("grunt").unwrap();
        assert_eq!(profile.max_health, 80.0);
        assert_eq!(profile.combo_len(), 3);
        assert_eq!(ai.dodge_chance, 0.5);
        assert_eq!(ai.detection_range, 15.0);
    }

    #[test]
    fn test_unknown_archetype() {
        let set = ProfileSet::default();
        assert!(matches!(
            set.enemy("boss"),
            Err(ProfileError::UnknownArchetype(name)) if name == "boss"
        ));
    }

    #[test]
    fn test_invalid_profile_rejected_on_load() {
        let result = ProfileSet::from_json(r#"{ "enemies": { "broken": { "profile": { "combo": [] } } } }"#);
        assert!(matches!(result, Err(ProfileError::EmptyCombo)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ProfileSet::from_json("{ enemies"),
            Err(ProfileError::Parse(_))
        ));
    }
}
