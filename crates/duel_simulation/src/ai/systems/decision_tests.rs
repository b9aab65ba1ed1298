//! Tests for dodge commitment (payment first, then flags).

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::prelude::*;
    use bevy_rapier2d::prelude::CollisionGroups;

    use crate::actor::spawn_enemy;
    use crate::ai::policy::DodgeAborted;
    use crate::ai::systems::{attempt_dodge, commit_dodge, DodgeTarget, EnemyMind};
    use crate::ai::{AIBrain, AIConfig, DodgeKind, Maneuver};
    use crate::components::Stamina;
    use crate::physics::{contacts_suppressed, Body2d, CollisionLayers};
    use crate::profile::{CombatProfile, CombatProfileRef};

    /// Enemy at x = 2 with the player at x = 0 (dodge cost 30).
    fn enemy_with_stamina(stamina: f32) -> (World, Entity, DodgeTarget) {
        let mut world = World::new();
        let player = world.spawn_empty().id();
        let enemy = spawn_enemy(
            &mut world,
            Vec2::new(2.0, 0.5),
            player,
            CombatProfileRef::new(CombatProfile::default()).unwrap(),
            AIConfig::default(),
        );
        world.get_mut::<Stamina>(enemy).unwrap().current = stamina;

        let target = DodgeTarget {
            entity: player,
            position: Vec2::new(0.0, 0.5),
            layer: CollisionLayers::PLAYER.group(),
        };
        (world, enemy, target)
    }

    fn player_contacts_suppressed(world: &World, enemy: Entity) -> bool {
        contacts_suppressed(
            world.get::<CollisionGroups>(enemy).unwrap(),
            CollisionLayers::PLAYER.group(),
        )
    }

    #[test]
    fn test_failed_payment_commits_nothing() {
        for kind in [DodgeKind::Away, DodgeKind::Through] {
            let (mut world, enemy, target) = enemy_with_stamina(10.0);

            let result = world
                .run_system_once(move |mut enemies: Query<EnemyMind>| {
                    let mut mind = enemies.single_mut().unwrap();
                    commit_dodge(&mut mind, kind, target, 1.0, 0.5)
                })
                .unwrap();

            assert_eq!(
                result,
                Err(DodgeAborted::StaminaConsumeFailed {
                    required: 30.0,
                    available: 10.0,
                })
            );
            assert!(!world.get::<Maneuver>(enemy).unwrap().is_dodging(), "{:?}", kind);
            let body = world.get::<Body2d>(enemy).unwrap();
            assert!(!body.kinematic);
            assert_eq!(body.velocity, Vec2::ZERO);
            assert!(!player_contacts_suppressed(&world, enemy));
            assert_eq!(world.get::<Stamina>(enemy).unwrap().current, 10.0);
        }
    }

    #[test]
    fn test_aborted_dodge_falls_back_to_move_speed_retreat() {
        let (mut world, enemy, target) = enemy_with_stamina(10.0);

        let committed = world
            .run_system_once(move |mut enemies: Query<EnemyMind>| {
                let mut mind = enemies.single_mut().unwrap();
                attempt_dodge(&mut mind, DodgeKind::Through, target, 1.0, 0.5)
            })
            .unwrap();

        assert!(!committed);
        assert!(!world.get::<Maneuver>(enemy).unwrap().is_dodging());
        assert!(world.get::<AIBrain>(enemy).unwrap().retreating);
        let body = world.get::<Body2d>(enemy).unwrap();
        assert!(!body.kinematic);
        // move_speed профиля, не dodge_force
        assert_eq!(body.velocity.x, 2.0);
        assert!(!player_contacts_suppressed(&world, enemy));
    }

    #[test]
    fn test_paid_through_dodge_goes_kinematic_without_player_contacts() {
        let (mut world, enemy, target) = enemy_with_stamina(100.0);

        let committed = world
            .run_system_once(move |mut enemies: Query<EnemyMind>| {
                let mut mind = enemies.single_mut().unwrap();
                attempt_dodge(&mut mind, DodgeKind::Through, target, 1.0, 0.5)
            })
            .unwrap();

        assert!(committed);
        assert!(world.get::<Maneuver>(enemy).unwrap().is_through_dodging());
        assert!(world.get::<Body2d>(enemy).unwrap().kinematic);
        assert!(player_contacts_suppressed(&world, enemy));
        // Пол и стены остаются
        let groups = world.get::<CollisionGroups>(enemy).unwrap();
        assert!(!contacts_suppressed(groups, CollisionLayers::GROUND.group()));
        assert_eq!(world.get::<Stamina>(enemy).unwrap().current, 70.0);
    }
}
