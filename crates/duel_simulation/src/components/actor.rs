//! Базовые компоненты бойцов: Combatant, Enemy, Player, Health, Stamina

use bevy::prelude::*;

/// Боец (enemy или player) — базовый компонент для всех участников дуэли
///
/// Автоматически добавляет Health, Facing, Body2d, CollisionGroups, ActionGate через Required Components.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Health,
    crate::components::Facing,
    crate::physics::Body2d,
    bevy_rapier2d::prelude::CollisionGroups,
    crate::combat::ActionGate
)]
pub struct Combatant;

/// AI-controlled combatant.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Combatant,
    Stamina,
    crate::combat::StunState,
    crate::combat::ComboAttack,
    crate::combat::Bleed,
    crate::ai::Maneuver,
    crate::ai::ThreatDetector,
    crate::ai::AIState,
    crate::ai::AIBrain,
    crate::ai::AIConfig
)]
pub struct Enemy;

/// Player-controlled combatant (intents arrive as `PlayerCommand` events).
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Combatant,
    crate::components::MoveAxis,
    crate::player::PlayerOffense,
    crate::player::HealthRegen,
    crate::player::SpikeCast,
    crate::player::Barrier
)]
pub struct Player;

/// Designated opponent, resolved once at spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent(pub Entity);

/// Результат `Health::damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub applied: f32,
    /// true только на переходе в 0
    pub died: bool,
}

impl HealthChange {
    pub const NONE: Self = Self {
        applied: 0.0,
        died: false,
    };
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Clamps at 0. Once dead, further damage is a no-op.
    pub fn damage(&mut self, amount: f32) -> HealthChange {
        if !self.is_alive() || !(amount > 0.0) {
            return HealthChange::NONE;
        }

        let before = self.current;
        self.current = (self.current - amount).max(0.0);

        HealthChange {
            applied: before - self.current,
            died: self.current == 0.0,
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.is_alive() || !(amount > 0.0) {
            return;
        }
        self.current = (self.current + amount).min(self.max);
    }
}

/// Выносливость (stamina) для атак и уклонений
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Regen возобновляется только через `regen_delay` секунд после последнего consume.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    /// units per second
    pub regen_rate: f32,
    pub regen_delay: f32,
    pub last_consumed_at: Option<f32>,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0, 10.0, 2.0)
    }
}

impl Stamina {
    pub fn new(max: f32, regen_rate: f32, regen_delay: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            regen_delay,
            last_consumed_at: None,
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        cost.is_finite() && cost >= 0.0 && self.current >= cost
    }

    /// Fails without mutation when `current < cost`.
    pub fn consume(&mut self, cost: f32, now: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current = (self.current - cost).max(0.0);
        self.last_consumed_at = Some(now);
        true
    }

    pub fn regen_blocked(&self, now: f32) -> bool {
        self.last_consumed_at
            .is_some_and(|at| now - at < self.regen_delay)
    }

    pub fn regenerate(&mut self, delta_time: f32, now: f32) {
        if self.current >= self.max || self.regen_blocked(now) || !(delta_time > 0.0) {
            return;
        }
        self.current = (self.current + self.regen_rate * delta_time).min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);

        let change = health.damage(30.0);
        assert_eq!(change.applied, 30.0);
        assert!(!change.died);
        assert_eq!(health.current, 70.0);

        let change = health.damage(100.0); // Clamp at 0
        assert_eq!(change.applied, 70.0);
        assert!(change.died);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_death_reported_once() {
        let mut health = Health::new(10.0);
        assert!(health.damage(10.0).died);
        assert_eq!(health.damage(5.0), HealthChange::NONE);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.damage(50.0);

        health.heal(30.0);
        assert_eq!(health.current, 80.0);

        health.heal(100.0); // Clamped to max
        assert_eq!(health.current, 100.0);

        health.damage(100.0);
        health.heal(50.0); // Мертвых не лечим
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_stamina_consume() {
        let mut stamina = Stamina::new(100.0, 10.0, 2.0);

        assert!(stamina.consume(30.0, 1.0));
        assert_eq!(stamina.current, 70.0);
        assert_eq!(stamina.last_consumed_at, Some(1.0));

        assert!(!stamina.consume(80.0, 2.0)); // Недостаточно
        assert_eq!(stamina.current, 70.0); // Не изменилась
        assert_eq!(stamina.last_consumed_at, Some(1.0));
    }

    #[test]
    fn test_stamina_rejects_negative_cost() {
        let mut stamina = Stamina::new(100.0, 10.0, 2.0);
        assert!(!stamina.consume(-5.0, 0.0));
        assert!(!stamina.consume(f32::NAN, 0.0));
        assert_eq!(stamina.current, 100.0);
    }

    #[test]
    fn test_stamina_regen_waits_for_delay() {
        let mut stamina = Stamina::new(100.0, 10.0, 2.0);
        stamina.consume(50.0, 0.0);

        stamina.regenerate(1.0, 1.0); // Delay ещё не прошёл
        assert_eq!(stamina.current, 50.0);

        stamina.regenerate(2.0, 2.0); // 2 sec × 10 units/sec = +20
        assert_eq!(stamina.current, 70.0);

        stamina.regenerate(10.0, 12.0); // Clamp to max
        assert_eq!(stamina.current, 100.0);
    }
}
