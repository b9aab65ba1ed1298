//! Decision engine components: observable state, tuning, reaction modules, memory.

use bevy::prelude::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Наблюдаемое состояние врага (пересчитывается каждый тик)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Вне detection range или ждёт (idle)
    #[default]
    Idle,
    /// Сближение на chase speed
    Approach,
    /// Отступление от атакующего игрока
    Retreat,
    /// Своё комбо (стоит на месте)
    Attacking,
    /// Рывок от игрока
    DodgingAway,
    /// Проход сквозь игрока (immune, без коллизии)
    ThroughDodging,
    /// Уход из зоны способности
    FleeingHazard,
    /// Бегство при низкой stamina
    FleeingStaminaLoss,
    /// Оглушён — всё остальное отключено
    Stunned,
}

bitflags! {
    /// Which reaction modules the single decision engine runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ReactionModules: u8 {
        const DODGE_AWAY = 1 << 0;
        const THROUGH_DODGE = 1 << 1;
        const ATTACK_RETREAT = 1 << 2;
        const HAZARD_AVOIDANCE = 1 << 3;
        const STAMINA_FLEE = 1 << 4;
    }
}

impl Default for ReactionModules {
    fn default() -> Self {
        Self::all()
    }
}

/// Параметры AI
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    pub detection_range: f32,
    /// Distance at which the enemy starts its own combo
    pub attack_range: f32,
    /// Threat reactions outside this range (and without a wall behind) are ignored
    pub danger_range: f32,
    pub retreat_distance: f32,
    pub retreat_speed_multiplier: f32,
    /// Minimum retreat floor (seconds)
    pub min_retreat_duration: f32,
    /// Roll succeeds when draw ≤ dodge_chance
    pub dodge_chance: f32,
    pub dodge_cooldown: f32,
    pub dodge_force: f32,
    pub dodge_duration: f32,
    pub through_dodge_distance: f32,
    pub through_dodge_duration: f32,
    pub wall_check_distance: f32,
    pub ground_check_distance: f32,
    /// |vy| below this counts as grounded
    pub grounded_velocity_epsilon: f32,
    pub flee_enter_ratio: f32,
    pub flee_exit_ratio: f32,
    pub flee_speed_multiplier: f32,
    pub flee_distance: f32,
    pub flee_damage_reduction: f32,
    pub hazard_margin: f32,
    pub modules: ReactionModules,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_range: 15.0,
            attack_range: 3.0,
            danger_range: 3.0,
            retreat_distance: 7.0,
            retreat_speed_multiplier: 2.0,
            min_retreat_duration: 0.4,
            dodge_chance: 0.8,
            dodge_cooldown: 0.5,
            dodge_force: 15.0,
            dodge_duration: 0.2,
            through_dodge_distance: 5.0,
            through_dodge_duration: 0.4,
            wall_check_distance: 2.0,
            ground_check_distance: 2.0,
            grounded_velocity_epsilon: 0.1,
            flee_enter_ratio: 0.2,
            flee_exit_ratio: 0.6,
            flee_speed_multiplier: 1.5,
            flee_distance: 10.0,
            flee_damage_reduction: 0.5,
            hazard_margin: 1.0,
            modules: ReactionModules::all(),
        }
    }
}

/// Transient decision memory (flee hysteresis, retreat floor)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct AIBrain {
    pub fleeing_stamina: bool,
    pub fleeing_hazard: bool,
    pub retreating: bool,
    pub retreat_started_at: f32,
}

impl AIBrain {
    /// Enter at `current ≤ enter × max`, leave only at `current / max ≥ exit`.
    ///
    /// Returns `Some(new_value)` on a transition.
    pub fn update_stamina_flee(&mut self, fraction: f32, config: &AIConfig) -> Option<bool> {
        if !config.modules.contains(ReactionModules::STAMINA_FLEE) {
            let was = std::mem::replace(&mut self.fleeing_stamina, false);
            return was.then_some(false);
        }
        if !self.fleeing_stamina && fraction <= config.flee_enter_ratio {
            self.fleeing_stamina = true;
            return Some(true);
        }
        if self.fleeing_stamina && fraction >= config.flee_exit_ratio {
            self.fleeing_stamina = false;
            return Some(false);
        }
        None
    }

    pub fn begin_retreat(&mut self, now: f32) {
        self.retreating = true;
        self.retreat_started_at = now;
    }

    /// True while the opponent attacks or the retreat floor has not elapsed.
    pub fn should_retreat(&self, opponent_attacking: bool, now: f32, config: &AIConfig) -> bool {
        opponent_attacking
            || (self.retreating && now - self.retreat_started_at < config.min_retreat_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_default() {
        let config = AIConfig::default();
        assert_eq!(config.detection_range, 15.0);
        assert_eq!(config.dodge_chance, 0.8);
        assert_eq!(config.through_dodge_distance, 5.0);
        assert_eq!(config.modules, ReactionModules::all());
    }

    #[test]
    fn test_stamina_flee_hysteresis() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();

        assert_eq!(brain.update_stamina_flee(0.5, &config), None);
        assert_eq!(brain.update_stamina_flee(0.2, &config), Some(true));
        // Между порогами — без дребезга
        assert_eq!(brain.update_stamina_flee(0.3, &config), None);
        assert_eq!(brain.update_stamina_flee(0.59, &config), None);
        assert!(brain.fleeing_stamina);
        assert_eq!(brain.update_stamina_flee(0.6, &config), Some(false));
        assert_eq!(brain.update_stamina_flee(0.3, &config), None);
    }

    #[test]
    fn test_stamina_flee_disabled_module() {
        let config = AIConfig {
            modules: ReactionModules::all() - ReactionModules::STAMINA_FLEE,
            ..Default::default()
        };
        let mut brain = AIBrain::default();
        assert_eq!(brain.update_stamina_flee(0.0, &config), None);
        assert!(!brain.fleeing_stamina);
    }

    #[test]
    fn test_retreat_floor() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();
        brain.begin_retreat(1.0);

        assert!(brain.should_retreat(false, 1.3, &config));
        assert!(!brain.should_retreat(false, 1.5, &config));
        assert!(brain.should_retreat(true, 5.0, &config));
    }
}
