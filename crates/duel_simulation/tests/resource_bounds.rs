//! Property tests: resource pools stay within bounds under any operation sequence.

use duel_simulation::components::{Health, Stamina};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum StaminaOp {
    Consume(f32),
    Regenerate(f32),
}

fn stamina_op() -> impl Strategy<Value = StaminaOp> {
    prop_oneof![
        (-50.0f32..200.0).prop_map(StaminaOp::Consume),
        (0.0f32..1.0).prop_map(StaminaOp::Regenerate),
    ]
}

proptest! {
    #[test]
    fn stamina_never_leaves_bounds(ops in proptest::collection::vec(stamina_op(), 1..200)) {
        let mut stamina = Stamina::new(100.0, 10.0, 2.0);
        let mut now = 0.0f32;

        for op in ops {
            let before = stamina.current;
            match op {
                StaminaOp::Consume(cost) => {
                    let paid = stamina.consume(cost, now);
                    if !paid {
                        prop_assert_eq!(stamina.current, before);
                    }
                }
                StaminaOp::Regenerate(dt) => {
                    now += dt;
                    stamina.regenerate(dt, now);
                }
            }
            prop_assert!(stamina.current >= 0.0);
            prop_assert!(stamina.current <= stamina.max);
        }
    }

    #[test]
    fn health_dies_exactly_once(hits in proptest::collection::vec(-10.0f32..60.0, 1..50)) {
        let mut health = Health::new(100.0);
        let mut deaths = 0;

        for amount in hits {
            let change = health.damage(amount);
            if change.died {
                deaths += 1;
            }
            prop_assert!(change.applied >= 0.0);
            prop_assert!(health.current >= 0.0 && health.current <= health.max);
        }

        prop_assert!(deaths <= 1);
        prop_assert_eq!(deaths == 1, !health.is_alive());
    }

    #[test]
    fn heal_never_exceeds_max(damage in 0.0f32..99.0, heal in 0.0f32..500.0) {
        let mut health = Health::new(100.0);
        health.damage(damage);
        health.heal(heal);
        prop_assert!(health.current <= health.max);
        prop_assert!(health.is_alive());
    }
}
