//! Damage pipeline systems: apply DamageRequest, mark and despawn the dead.

use bevy::prelude::*;

use crate::ai::{AIBrain, AIConfig, Maneuver};
use crate::combat::{
    resolve_damage, Armor, DamageBlocked, DamageDealt, DamageModifiers, DamageRequest,
    DamageResolution, Dead, EntityDied,
};
use crate::components::Health;
use crate::player::HealthRegen;

/// System: DamageRequest → immunity / flee reduction / armor → Health
///
/// Health reaching 0 inserts `Dead` and emits `EntityDied` exactly once.
pub fn apply_damage_requests(
    time: Res<Time<Fixed>>,
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<
        (
            &mut Health,
            Option<&Maneuver>,
            Option<&AIBrain>,
            Option<&AIConfig>,
            Option<&Armor>,
            Option<&mut HealthRegen>,
        ),
        Without<Dead>,
    >,
    mut commands: Commands,
    mut dealt: EventWriter<DamageDealt>,
    mut blocked: EventWriter<DamageBlocked>,
    mut died: EventWriter<EntityDied>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut health, maneuver, brain, config, armor, regen)) = targets.get_mut(request.target)
        else {
            continue;
        };
        // Dead marker is deferred; skip repeat hits within this tick
        if !health.is_alive() {
            continue;
        }

        let modifiers = DamageModifiers {
            immune: maneuver.is_some_and(|m| m.is_damage_immune()),
            flee_reduction: match (brain, config) {
                (Some(brain), Some(config)) if brain.fleeing_stamina => {
                    Some(config.flee_damage_reduction)
                }
                _ => None,
            },
            armor: armor.copied(),
        };

        let amount = match resolve_damage(request.amount, &modifiers) {
            DamageResolution::Immune => {
                blocked.write(DamageBlocked {
                    attacker: request.attacker,
                    target: request.target,
                    raw: request.amount,
                    source: request.source,
                });
                crate::logger::log(&format!(
                    "🛡️ Damage blocked: {:?} is immune ({:.1} from {:?})",
                    request.target, request.amount, request.source
                ));
                continue;
            }
            DamageResolution::Applied(amount) => amount,
        };

        let change = health.damage(amount);
        if let Some(mut regen) = regen {
            regen.last_damaged_at = Some(now);
        }

        dealt.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            raw: request.amount,
            damage: change.applied,
            source: request.source,
        });
        crate::logger::log(&format!(
            "💥 {:?} → {:?}: {:.1} damage ({:?}, raw {:.1}), HP {:.1}/{:.1}",
            request.attacker, request.target, change.applied, request.source, request.amount,
            health.current, health.max
        ));

        if change.died {
            commands.entity(request.target).insert(Dead);
            died.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });
            crate::logger::log_info(&format!(
                "💀 {:?} died (killer: {:?})",
                request.target, request.attacker
            ));
        }
    }
}

/// System: убрать мёртвых из симуляции
pub fn despawn_dead(mut commands: Commands, dead: Query<Entity, With<Dead>>) {
    for entity in dead.iter() {
        commands.entity(entity).despawn();
    }
}
