use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionGroups;

use crate::ai::{AIState, DodgeKind, Maneuver, ManeuverTick};
use crate::combat::{CombatCue, Dead};
use crate::components::{Enemy, Facing, Opponent};
use crate::physics::{restore_contacts, Body2d};

/// System: продвинуть активные манёвры (dodge away / through-dodge)
///
/// Through-dodge moves the kinematic body along its planned path; on natural
/// completion the body snaps to the target and turns dynamic again, contacts
/// with the opponent come back and both combatants turn to face each other.
pub fn advance_maneuvers(
    time: Res<Time<Fixed>>,
    mut enemies: Query<
        (
            Entity,
            &mut Maneuver,
            &mut Body2d,
            &mut Facing,
            &mut CollisionGroups,
            &mut AIState,
            &Opponent,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    mut opponents: Query<(&Body2d, &mut Facing), Without<Enemy>>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();

    for (entity, mut maneuver, mut body, mut facing, mut groups, mut state, opponent) in
        enemies.iter_mut()
    {
        match maneuver.tick(now) {
            ManeuverTick::Idle | ManeuverTick::Dodging => {}
            ManeuverTick::Moving(position) => {
                body.position = position;
                body.velocity = Vec2::ZERO;
            }
            ManeuverTick::Finished { kind, snap_to } => {
                if let Some(target) = snap_to {
                    body.position = target;
                }
                body.velocity = Vec2::ZERO;
                body.kinematic = false;

                if kind == DodgeKind::Through {
                    restore_contacts(&mut groups);

                    if let Ok((opponent_body, mut opponent_facing)) =
                        opponents.get_mut(opponent.0)
                    {
                        let enemy_facing = Facing::toward(body.position.x, opponent_body.position.x);
                        if enemy_facing != *facing {
                            *facing = enemy_facing;
                            cues.write(CombatCue::FacingChanged {
                                entity,
                                facing: enemy_facing.0,
                            });
                        }

                        let turned = Facing::toward(opponent_body.position.x, body.position.x);
                        if turned != *opponent_facing {
                            *opponent_facing = turned;
                            cues.write(CombatCue::FacingChanged {
                                entity: opponent.0,
                                facing: turned.0,
                            });
                        }
                    }
                }

                *state = AIState::Idle;
                cues.write(CombatCue::DodgeEnded {
                    entity,
                    kind,
                    cancelled: false,
                });
                crate::logger::log(&format!(
                    "🌀 {:?}: {:?} dodge finished at {:.2}",
                    entity, kind, body.position.x
                ));
            }
        }
    }
}
