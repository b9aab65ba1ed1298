//! Simulation-wide configuration (tick rate, seed, log level).

use crate::logger::LogLevel;
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick rate must be a positive finite number, got {0}")]
    InvalidTickRate(f64),
}

/// Resource: параметры headless прогона
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_hz: f64,
    pub seed: u64,
    pub log_level: LogLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            log_level: LogLevel::Debug,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_hz.is_finite() || self.tick_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }
        Ok(())
    }

    pub fn tick_seconds(&self) -> f32 {
        (1.0 / self.tick_hz) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_hz, 60.0);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = SimulationConfig::from_json(r#"{ "tick_hz": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickRate(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SimulationConfig::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
