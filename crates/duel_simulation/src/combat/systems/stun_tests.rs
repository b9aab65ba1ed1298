//! Tests for the stun/interrupt controller.

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::prelude::*;
    use bevy_rapier2d::prelude::CollisionGroups;
    use std::time::Duration;

    use crate::ai::{AIState, DodgeKind, Maneuver, ThroughDodge};
    use crate::combat::systems::{incapacitate, tick_stuns};
    use crate::combat::{ActionGate, CombatCue, ComboAttack, StunOutcome, StunState};
    use crate::components::Stamina;
    use crate::physics::{contacts_suppressed, suppress_contacts, Body2d, CollisionLayers};
    use crate::profile::CombatProfile;

    #[test]
    fn test_incapacitate_tears_down_everything() {
        let profile = CombatProfile::default();
        let mut stamina = Stamina::default();
        let mut combo = ComboAttack::default();
        combo
            .start(Entity::from_raw(1), &profile, &mut stamina, 0.0)
            .unwrap();

        let mut maneuver = Maneuver::default();
        maneuver.begin_through_dodge(ThroughDodge::plan(
            Vec2::new(3.0, 0.5),
            Vec2::ZERO,
            5.0,
            0.4,
            0.0,
            Entity::from_raw(1),
        ));
        let mut body = Body2d {
            kinematic: true,
            velocity: Vec2::new(4.0, 1.0),
            ..Body2d::at(Vec2::new(2.0, 0.5))
        };
        let mut groups = CollisionLayers::ENEMY.member_groups();
        suppress_contacts(&mut groups, CollisionLayers::PLAYER.group());
        let mut stun = StunState::default();
        let mut gate = ActionGate::default();

        let result = incapacitate(
            3.0,
            0.1,
            &mut stun,
            &mut gate,
            &mut combo,
            &mut maneuver,
            &mut body,
            &mut groups,
        );

        assert_eq!(result.outcome, StunOutcome::Applied);
        assert!(result.combo_interrupted);
        assert_eq!(result.maneuver_cancelled, Some(DodgeKind::Through));
        assert!(!combo.is_attacking());
        assert!(!maneuver.is_dodging());
        assert!(!body.kinematic);
        assert_eq!(body.velocity, Vec2::ZERO);
        // Остаётся на месте, без перескока к цели манёвра
        assert_eq!(body.position, Vec2::new(2.0, 0.5));
        assert!(!contacts_suppressed(&groups, CollisionLayers::PLAYER.group()));
        assert_eq!(groups, CollisionLayers::ENEMY.member_groups());
        assert!(!gate.enabled);
        assert!((stun.expires_at - 3.1).abs() < 1e-6);
    }

    #[test]
    fn test_incapacitate_idle_target() {
        let mut stun = StunState::default();
        let mut gate = ActionGate::default();
        let mut combo = ComboAttack::default();
        let mut maneuver = Maneuver::default();
        let mut body = Body2d::default();
        let mut groups = CollisionGroups::default();

        let result = incapacitate(
            1.0,
            0.0,
            &mut stun,
            &mut gate,
            &mut combo,
            &mut maneuver,
            &mut body,
            &mut groups,
        );
        assert!(!result.combo_interrupted);
        assert_eq!(result.maneuver_cancelled, None);
    }

    #[test]
    fn test_tick_stuns_reenables_gate_on_expiry() {
        let mut world = World::new();
        world.init_resource::<Time<Fixed>>();
        world.init_resource::<Events<CombatCue>>();
        let entity = world
            .spawn((
                StunState {
                    active: true,
                    expires_at: 1.0,
                },
                ActionGate { enabled: false },
                Body2d {
                    velocity: Vec2::new(3.0, 0.0),
                    ..Default::default()
                },
                AIState::Stunned,
            ))
            .id();

        world
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_millis(500));
        world.run_system_once(tick_stuns).unwrap();
        assert!(world.get::<StunState>(entity).unwrap().active);
        assert_eq!(world.get::<Body2d>(entity).unwrap().velocity, Vec2::ZERO);

        world
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_millis(500));
        world.run_system_once(tick_stuns).unwrap();
        assert!(!world.get::<StunState>(entity).unwrap().active);
        assert!(world.get::<ActionGate>(entity).unwrap().enabled);
        assert_eq!(*world.get::<AIState>(entity).unwrap(), AIState::Idle);

        let cues: Vec<CombatCue> = world
            .resource::<Events<CombatCue>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(cues, vec![CombatCue::StunRemoved { entity }]);
    }
}
