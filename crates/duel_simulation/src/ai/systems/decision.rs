//! AI decision engine system.
//!
//! Per enemy, per tick:
//! 1. gate closed (stunned) → not evaluated at all
//! 2. stamina flee hysteresis
//! 3. threat detector → reaction (skipped mid through-dodge or own combo;
//!    a running dodge-away still reacts, at most one new maneuver per tick)
//! 4. movement policy unless dodging/attacking; attacks are stationary

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionGroups, Group, ReadRapierContext};

use crate::ai::policy::{
    choose_reaction, decide_movement, DodgeAborted, MovementContext, ThreatAssessment,
    ThreatReaction,
};
use crate::ai::{AIBrain, AIConfig, AIState, DodgeKind, Maneuver, ThreatDetector, ThroughDodge};
use crate::combat::{
    ActionGate, Bleed, CombatCue, ComboAttack, DamageRequest, DamageSource, Dead, StunState,
};
use crate::components::{horizontal_sign, Enemy, Facing, Opponent, Stamina};
use crate::physics::{
    distance_to, is_grounded_below, is_wall_behind, suppress_contacts, Body2d,
};
use crate::player::{ActiveHazards, PlayerOffense};
use crate::profile::{CombatDisabled, CombatProfileRef};
use crate::rng::ReactionRng;

#[derive(QueryData)]
#[query_data(mutable)]
pub struct EnemyMind {
    entity: Entity,
    state: &'static mut AIState,
    brain: &'static mut AIBrain,
    config: &'static AIConfig,
    detector: &'static mut ThreatDetector,
    maneuver: &'static mut Maneuver,
    combo: &'static mut ComboAttack,
    stamina: &'static mut Stamina,
    profile: &'static CombatProfileRef,
    gate: &'static ActionGate,
    stun: &'static StunState,
    body: &'static mut Body2d,
    facing: &'static mut Facing,
    groups: &'static mut CollisionGroups,
    bleed: &'static Bleed,
    opponent: &'static Opponent,
}

/// System: главный цикл решений врага
#[allow(clippy::too_many_arguments)]
pub fn decide_enemy_actions(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    hazards: Res<ActiveHazards>,
    mut rng: ResMut<ReactionRng>,
    mut enemies: Query<EnemyMind, (With<Enemy>, Without<CombatDisabled>, Without<Dead>)>,
    opponents: Query<
        (&Body2d, &CollisionGroups, Option<&PlayerOffense>),
        (Without<Enemy>, Without<Dead>),
    >,
    mut damage: EventWriter<DamageRequest>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();
    let Ok(context) = rapier.single() else {
        return;
    };

    for mut enemy in enemies.iter_mut() {
        // Stun controller owns this combatant while the gate is closed
        if !enemy.gate.enabled {
            continue;
        }

        let Ok((opponent_body, opponent_groups, offense)) = opponents.get(enemy.opponent.0) else {
            enemy.body.stop_horizontal();
            set_state(enemy.entity, &mut enemy.state, AIState::Idle);
            continue;
        };
        let opponent_entity = enemy.opponent.0;
        let opponent_position = opponent_body.position;
        let opponent_layer = opponent_groups.memberships;
        let position = enemy.body.position;
        let distance = distance_to(position, opponent_position);
        let away = horizontal_sign(position.x - opponent_position.x);

        let fraction = enemy.stamina.fraction();
        if let Some(fleeing) = enemy.brain.update_stamina_flee(fraction, enemy.config) {
            crate::logger::log(&format!(
                "🤖 {:?}: stamina flee {} ({:.0}%)",
                enemy.entity,
                if fleeing { "entered" } else { "left" },
                fraction * 100.0
            ));
        }

        if !enemy.maneuver.is_through_dodging() && !enemy.combo.is_attacking() {
            let signals = offense.map(|o| o.signals().to_vec()).unwrap_or_default();
            let mut committed = false;
            for source in enemy.detector.observe(&signals) {
                // One committed maneuver per tick
                if committed {
                    break;
                }

                let grounded = is_grounded_below(
                    &context,
                    enemy.entity,
                    position,
                    enemy.config.ground_check_distance,
                ) || enemy.body.velocity.y.abs() < enemy.config.grounded_velocity_epsilon;
                let assessment = ThreatAssessment {
                    stunned: enemy.stun.active,
                    fleeing_stamina: enemy.brain.fleeing_stamina,
                    wall_behind: is_wall_behind(
                        &context,
                        position,
                        opponent_position,
                        enemy.config.wall_check_distance,
                    ),
                    distance,
                    grounded,
                    dodge_ready: enemy.maneuver.cooldown_ready(enemy.config.dodge_cooldown, now),
                    stamina: enemy.stamina.current,
                    dodge_cost: enemy.profile.dodge_stamina_cost,
                };

                let reaction = choose_reaction(&assessment, enemy.config, &mut *rng);
                crate::logger::log(&format!(
                    "🤖 {:?}: {:?} attack detected (distance {:.2}, wall behind: {}) → {:?}",
                    enemy.entity, source, distance, assessment.wall_behind, reaction
                ));

                match reaction {
                    ThreatReaction::ThroughDodge | ThreatReaction::DodgeAway => {
                        let kind = if reaction == ThreatReaction::ThroughDodge {
                            DodgeKind::Through
                        } else {
                            DodgeKind::Away
                        };
                        let target = DodgeTarget {
                            entity: opponent_entity,
                            position: opponent_position,
                            layer: opponent_layer,
                        };
                        if !attempt_dodge(&mut enemy, kind, target, away, now) {
                            continue;
                        }
                        committed = true;

                        cues.write(CombatCue::DodgeStarted {
                            entity: enemy.entity,
                            kind,
                        });
                        if let Some(amount) = enemy.bleed.on_dodge(now) {
                            damage.write(DamageRequest {
                                attacker: None,
                                target: enemy.entity,
                                amount,
                                source: DamageSource::Bleed,
                            });
                        }
                    }
                    ThreatReaction::FallbackRetreat => fallback_retreat(&mut enemy, away, now),
                    ThreatReaction::Suppressed
                    | ThreatReaction::Ignored
                    | ThreatReaction::HoldPosition => {}
                }
            }
        }

        let next_state = if enemy.maneuver.is_through_dodging() {
            AIState::ThroughDodging
        } else if enemy.maneuver.is_dodging_away() {
            AIState::DodgingAway
        } else if enemy.combo.is_attacking() {
            enemy.body.stop_horizontal();
            AIState::Attacking
        } else {
            let profile = enemy.profile;
            let hazard_away = hazards
                .threatening(position, enemy.config.hazard_margin)
                .map(|hazard| horizontal_sign(position.x - hazard.position.x));
            let ctx = MovementContext {
                now,
                distance,
                away,
                opponent_attacking: offense.is_some_and(|o| o.is_attacking()),
                hazard_away,
                can_attack: enemy
                    .combo
                    .check_start(profile, &enemy.stamina, now)
                    .is_ok(),
                move_speed: profile.move_speed,
                chase_speed: profile.chase_speed,
            };
            let decision = decide_movement(&ctx, &mut enemy.brain, enemy.config);
            enemy.body.velocity.x = decision.velocity_x;

            let facing = if decision.state == AIState::Approach || decision.start_combo {
                Facing::toward(position.x, opponent_position.x)
            } else if decision.velocity_x != 0.0 {
                Facing(horizontal_sign(decision.velocity_x))
            } else {
                *enemy.facing
            };
            if facing != *enemy.facing {
                *enemy.facing = facing;
                cues.write(CombatCue::FacingChanged {
                    entity: enemy.entity,
                    facing: facing.0,
                });
            }

            if decision.start_combo {
                match enemy
                    .combo
                    .start(opponent_entity, profile, &mut enemy.stamina, now)
                {
                    Ok(_) => {
                        cues.write(CombatCue::AttackStep {
                            entity: enemy.entity,
                            step: 0,
                        });
                        crate::logger::log(&format!(
                            "⚔️ {:?}: combo started against {:?} (stamina left {:.0})",
                            enemy.entity, opponent_entity, enemy.stamina.current
                        ));
                    }
                    Err(rejected) => {
                        crate::logger::log(&format!(
                            "⚔️ {:?}: combo rejected ({})",
                            enemy.entity, rejected
                        ));
                    }
                }
            }

            if decision.start_combo && !enemy.combo.is_attacking() {
                AIState::Idle
            } else {
                decision.state
            }
        };

        set_state(enemy.entity, &mut enemy.state, next_state);
    }
}

/// Opponent the dodge is measured against.
#[derive(Debug, Clone, Copy)]
pub struct DodgeTarget {
    pub entity: Entity,
    pub position: Vec2,
    /// Collision groups the opponent is a member of
    pub layer: Group,
}

/// Commits the dodge or, if payment fails, falls back to a plain retreat.
///
/// Returns true when the maneuver was committed.
pub fn attempt_dodge(
    enemy: &mut EnemyMindItem,
    kind: DodgeKind,
    target: DodgeTarget,
    away: f32,
    now: f32,
) -> bool {
    match commit_dodge(enemy, kind, target, away, now) {
        Ok(()) => true,
        Err(aborted) => {
            crate::logger::log(&format!(
                "🤖 {:?}: {:?} dodge aborted ({}), retreating",
                enemy.entity, kind, aborted
            ));
            fallback_retreat(enemy, away, now);
            false
        }
    }
}

/// Pays for the dodge, then commits it. A failed payment leaves nothing committed.
pub fn commit_dodge(
    enemy: &mut EnemyMindItem,
    kind: DodgeKind,
    target: DodgeTarget,
    away: f32,
    now: f32,
) -> Result<(), DodgeAborted> {
    let cost = enemy.profile.dodge_stamina_cost;
    if !enemy.stamina.consume(cost, now) {
        return Err(DodgeAborted::StaminaConsumeFailed {
            required: cost,
            available: enemy.stamina.current,
        });
    }

    match kind {
        DodgeKind::Away => {
            enemy
                .maneuver
                .begin_dodge_away(away, enemy.config.dodge_duration, now);
            enemy.brain.begin_retreat(now);
            enemy.body.velocity.x = away * enemy.config.dodge_force;
        }
        DodgeKind::Through => {
            let plan = ThroughDodge::plan(
                enemy.body.position,
                target.position,
                enemy.config.through_dodge_distance,
                enemy.config.through_dodge_duration,
                now,
                target.entity,
            );
            enemy.maneuver.begin_through_dodge(plan);
            suppress_contacts(&mut enemy.groups, target.layer);
            enemy.body.kinematic = true;
            enemy.body.velocity = Vec2::ZERO;
            crate::logger::log(&format!(
                "🌀 {:?}: through-dodge {:.2} → {:.2}",
                enemy.entity, plan.start.x, plan.target.x
            ));
        }
    }

    Ok(())
}

/// Plain retreat impulse at normal move speed.
fn fallback_retreat(enemy: &mut EnemyMindItem, away: f32, now: f32) {
    enemy.brain.begin_retreat(now);
    enemy.body.velocity.x = away * enemy.profile.move_speed;
}

fn set_state(entity: Entity, state: &mut AIState, next: AIState) {
    if *state != next {
        crate::logger::log(&format!("🤖 {:?}: {:?} → {:?}", entity, *state, next));
        *state = next;
    }
}
