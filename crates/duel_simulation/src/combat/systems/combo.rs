//! Combo resolution: advance enemy combo runs, resolve hits as area queries.

use bevy::prelude::*;

use crate::combat::{ActionGate, CombatCue, ComboAttack, ComboEvent, DamageRequest, DamageSource};
use crate::components::{Enemy, Facing, Stamina};
use bevy_rapier2d::prelude::ReadRapierContext;

use crate::physics::{Body2d, CollisionLayers, SpatialQuery};
use crate::profile::{CombatDisabled, CombatProfileRef};

/// System: advance combo timers, turn hit-apply moments into DamageRequest events
///
/// A miss (empty overlap) is logged and otherwise ignored.
/// Every step re-aims at the combo target before its hit point is used.
#[allow(clippy::too_many_arguments)]
pub fn advance_enemy_combos(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut enemies: Query<
        (
            Entity,
            &mut ComboAttack,
            &mut Stamina,
            &CombatProfileRef,
            &ActionGate,
            &Body2d,
            &mut Facing,
        ),
        (With<Enemy>, Without<CombatDisabled>),
    >,
    targets: Query<&Body2d, Without<Enemy>>,
    mut damage: EventWriter<DamageRequest>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, mut combo, mut stamina, profile, gate, body, mut facing) in enemies.iter_mut() {
        if !gate.enabled || !combo.is_attacking() {
            continue;
        }

        for event in combo.advance(profile, &mut stamina, now) {
            match event {
                ComboEvent::StepStarted { step, stamina_cost } => {
                    if let Some(target) = combo.target.and_then(|t| targets.get(t).ok()) {
                        let aimed = Facing::toward(body.position.x, target.position.x);
                        if aimed != *facing {
                            *facing = aimed;
                            cues.write(CombatCue::FacingChanged {
                                entity,
                                facing: aimed.0,
                            });
                        }
                    }
                    cues.write(CombatCue::AttackStep { entity, step });
                    crate::logger::log(&format!(
                        "⚔️ {:?}: combo step {} started (stamina -{:.0}, left {:.0})",
                        entity, step, stamina_cost, stamina.current
                    ));
                }
                ComboEvent::HitApply { step, damage: amount } => {
                    let anchor = facing.anchor(body.position, profile.attack_anchor_offset);
                    let hits = context.overlap_circle(
                        anchor,
                        profile.attack_range,
                        CollisionLayers::PLAYER,
                    );
                    if hits.is_empty() {
                        crate::logger::log(&format!("⚔️ {:?}: combo step {} missed", entity, step));
                    }
                    for target in hits {
                        damage.write(DamageRequest {
                            attacker: Some(entity),
                            target,
                            amount,
                            source: DamageSource::EnemyCombo { step },
                        });
                    }
                }
                ComboEvent::Ended(reason) => {
                    cues.write(CombatCue::ComboEnded { entity, reason });
                    crate::logger::log(&format!("✅ {:?}: combo ended ({:?})", entity, reason));
                }
            }
        }
    }
}
