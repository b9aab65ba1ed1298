//! Tests for the decision policy.

#[cfg(test)]
mod tests {
    use crate::ai::policy::{
        choose_reaction, decide_movement, MovementContext, ThreatAssessment, ThreatReaction,
    };
    use crate::ai::{AIBrain, AIConfig, AIState, ReactionModules};
    use crate::rng::{RandomSource, ScriptedRandom};

    fn assessment() -> ThreatAssessment {
        ThreatAssessment {
            stunned: false,
            fleeing_stamina: false,
            wall_behind: false,
            distance: 2.0,
            grounded: true,
            dodge_ready: true,
            stamina: 100.0,
            dodge_cost: 30.0,
        }
    }

    fn context() -> MovementContext {
        MovementContext {
            now: 10.0,
            distance: 5.0,
            away: 1.0,
            opponent_attacking: false,
            hazard_away: None,
            can_attack: true,
            move_speed: 2.0,
            chase_speed: 3.0,
        }
    }

    #[test]
    fn test_wall_behind_through_dodge_on_successful_roll() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.8); // ≤ dodge_chance
        let threat = ThreatAssessment {
            wall_behind: true,
            distance: 10.0, // Стена важнее дистанции
            ..assessment()
        };
        assert_eq!(choose_reaction(&threat, &config, &mut rng), ThreatReaction::ThroughDodge);
    }

    #[test]
    fn test_wall_behind_failed_roll_does_nothing() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.95);
        let threat = ThreatAssessment {
            wall_behind: true,
            ..assessment()
        };
        // Асимметрия: у стены проваленный бросок не даёт отступления
        assert_eq!(choose_reaction(&threat, &config, &mut rng), ThreatReaction::HoldPosition);
    }

    #[test]
    fn test_wall_behind_without_stamina_does_nothing_and_skips_roll() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let threat = ThreatAssessment {
            wall_behind: true,
            stamina: 10.0,
            ..assessment()
        };
        assert_eq!(choose_reaction(&threat, &config, &mut rng), ThreatReaction::HoldPosition);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_danger_range_dodge_away() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.1);
        assert_eq!(choose_reaction(&assessment(), &config, &mut rng), ThreatReaction::DodgeAway);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_danger_range_failed_roll_falls_back_to_retreat() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.81);
        assert_eq!(
            choose_reaction(&assessment(), &config, &mut rng),
            ThreatReaction::FallbackRetreat
        );
    }

    #[test]
    fn test_danger_range_gates_fall_back_to_retreat() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);

        let airborne = ThreatAssessment {
            grounded: false,
            ..assessment()
        };
        let cooling = ThreatAssessment {
            dodge_ready: false,
            ..assessment()
        };
        let tired = ThreatAssessment {
            stamina: 29.0,
            ..assessment()
        };
        for threat in [airborne, cooling, tired] {
            assert_eq!(
                choose_reaction(&threat, &config, &mut rng),
                ThreatReaction::FallbackRetreat
            );
        }
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_outside_danger_range_ignored() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let threat = ThreatAssessment {
            distance: 3.5,
            ..assessment()
        };
        assert_eq!(choose_reaction(&threat, &config, &mut rng), ThreatReaction::Ignored);
    }

    #[test]
    fn test_suppressed_when_stunned_or_fleeing() {
        let config = AIConfig::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let stunned = ThreatAssessment {
            stunned: true,
            ..assessment()
        };
        let fleeing = ThreatAssessment {
            fleeing_stamina: true,
            wall_behind: true,
            ..assessment()
        };
        assert_eq!(choose_reaction(&stunned, &config, &mut rng), ThreatReaction::Suppressed);
        assert_eq!(choose_reaction(&fleeing, &config, &mut rng), ThreatReaction::Suppressed);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_disabled_through_dodge_uses_danger_branch() {
        let config = AIConfig {
            modules: ReactionModules::all() - ReactionModules::THROUGH_DODGE,
            ..Default::default()
        };
        let mut rng = ScriptedRandom::constant(0.0);
        let threat = ThreatAssessment {
            wall_behind: true,
            ..assessment()
        };
        assert_eq!(choose_reaction(&threat, &config, &mut rng), ThreatReaction::DodgeAway);
    }

    #[test]
    fn test_movement_approach_then_attack() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();

        let decision = decide_movement(&context(), &mut brain, &config);
        assert_eq!(decision.state, AIState::Approach);
        assert_eq!(decision.velocity_x, -3.0); // К игроку на chase speed

        let close = MovementContext {
            distance: 2.5,
            ..context()
        };
        let decision = decide_movement(&close, &mut brain, &config);
        assert_eq!(decision.state, AIState::Attacking);
        assert!(decision.start_combo);
        assert_eq!(decision.velocity_x, 0.0);

        let close_on_cooldown = MovementContext {
            can_attack: false,
            ..close
        };
        let decision = decide_movement(&close_on_cooldown, &mut brain, &config);
        assert_eq!(decision.state, AIState::Idle);
        assert!(!decision.start_combo);
    }

    #[test]
    fn test_movement_idle_beyond_detection() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();
        let far = MovementContext {
            distance: 20.0,
            ..context()
        };
        assert_eq!(decide_movement(&far, &mut brain, &config).state, AIState::Idle);
    }

    #[test]
    fn test_movement_precedence() {
        let config = AIConfig::default();
        let mut brain = AIBrain {
            fleeing_stamina: true,
            ..Default::default()
        };
        let everything = MovementContext {
            opponent_attacking: true,
            hazard_away: Some(-1.0),
            ..context()
        };

        let decision = decide_movement(&everything, &mut brain, &config);
        assert_eq!(decision.state, AIState::FleeingStaminaLoss);
        assert_eq!(decision.velocity_x, 3.0); // 2 × 1.5

        brain.fleeing_stamina = false;
        let decision = decide_movement(&everything, &mut brain, &config);
        assert_eq!(decision.state, AIState::FleeingHazard);
        assert_eq!(decision.velocity_x, -3.0);

        let no_hazard = MovementContext {
            hazard_away: None,
            ..everything
        };
        let decision = decide_movement(&no_hazard, &mut brain, &config);
        assert_eq!(decision.state, AIState::Retreat);
        assert_eq!(decision.velocity_x, 4.0); // 2 × 2
        assert!(brain.retreating);
    }

    #[test]
    fn test_retreat_floor_prevents_reengage() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();
        let attacked = MovementContext {
            opponent_attacking: true,
            distance: 2.0,
            ..context()
        };
        decide_movement(&attacked, &mut brain, &config);

        // Атака закончилась, но 0.4s ещё не прошли
        let calm = MovementContext {
            opponent_attacking: false,
            now: 10.25,
            ..attacked
        };
        assert_eq!(decide_movement(&calm, &mut brain, &config).state, AIState::Retreat);

        let later = MovementContext { now: 10.5, ..calm };
        assert_eq!(decide_movement(&later, &mut brain, &config).state, AIState::Attacking);
        assert!(!brain.retreating);
    }

    #[test]
    fn test_retreat_holds_beyond_retreat_distance() {
        let config = AIConfig::default();
        let mut brain = AIBrain::default();
        let far = MovementContext {
            opponent_attacking: true,
            distance: 8.0,
            ..context()
        };
        let decision = decide_movement(&far, &mut brain, &config);
        assert_eq!(decision.state, AIState::Retreat);
        assert_eq!(decision.velocity_x, 0.0);
    }

    #[test]
    fn test_scripted_random_is_object_safe() {
        let mut rng = ScriptedRandom::new([0.3]);
        let dyn_rng: &mut dyn RandomSource = &mut rng;
        assert_eq!(dyn_rng.next_unit(), 0.3);
    }
}
