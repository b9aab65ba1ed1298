//! Stun/interrupt controller.
//!
//! Stun is a hard preemption boundary: the combo run, any in-flight maneuver,
//! velocity and collision suppression are all reset in one `incapacitate` call.

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionGroups;

use crate::ai::{AIState, DodgeKind, Maneuver};
use crate::combat::{
    ActionGate, CombatCue, ComboAttack, ComboEnd, ComboEvent, StunOutcome, StunRequest, StunState,
};
use crate::physics::{restore_contacts, Body2d};

/// What `incapacitate` tore down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incapacitation {
    pub outcome: StunOutcome,
    pub combo_interrupted: bool,
    pub maneuver_cancelled: Option<DodgeKind>,
}

/// Atomic cleanup applied on stun.
///
/// Cancel keeps the current position (no fast-forward to a maneuver target).
#[allow(clippy::too_many_arguments)]
pub fn incapacitate(
    duration: f32,
    now: f32,
    stun: &mut StunState,
    gate: &mut ActionGate,
    combo: &mut ComboAttack,
    maneuver: &mut Maneuver,
    body: &mut Body2d,
    groups: &mut CollisionGroups,
) -> Incapacitation {
    let outcome = stun.apply(duration, now);
    let combo_interrupted = matches!(
        combo.interrupt(),
        Some(ComboEvent::Ended(ComboEnd::Interrupted))
    );
    let maneuver_cancelled = maneuver.cancel();

    body.velocity = Vec2::ZERO;
    body.kinematic = false;
    restore_contacts(groups);
    gate.enabled = false;

    Incapacitation {
        outcome,
        combo_interrupted,
        maneuver_cancelled,
    }
}

/// System: expire stuns, keep stunned bodies pinned
pub fn tick_stuns(
    time: Res<Time<Fixed>>,
    mut query: Query<(Entity, &mut StunState, &mut ActionGate, &mut Body2d, &mut AIState)>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();

    for (entity, mut stun, mut gate, mut body, mut state) in query.iter_mut() {
        if !stun.active {
            continue;
        }

        if stun.tick(now) {
            gate.enabled = true;
            *state = AIState::Idle;
            cues.write(CombatCue::StunRemoved { entity });
            crate::logger::log_info(&format!("💫 Stun removed (entity: {:?})", entity));
        } else {
            body.velocity = Vec2::ZERO;
        }
    }
}

/// System: process StunRequest events
pub fn apply_stun_requests(
    time: Res<Time<Fixed>>,
    mut requests: EventReader<StunRequest>,
    mut targets: Query<(
        &mut StunState,
        &mut ActionGate,
        &mut ComboAttack,
        &mut Maneuver,
        &mut Body2d,
        &mut CollisionGroups,
        &mut AIState,
    )>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut stun, mut gate, mut combo, mut maneuver, mut body, mut groups, mut state)) =
            targets.get_mut(request.target)
        else {
            crate::logger::log_warning(&format!(
                "Stun request ignored: {:?} cannot be stunned",
                request.target
            ));
            continue;
        };

        let result = incapacitate(
            request.duration,
            now,
            &mut stun,
            &mut gate,
            &mut combo,
            &mut maneuver,
            &mut body,
            &mut groups,
        );

        if result.combo_interrupted {
            cues.write(CombatCue::ComboEnded {
                entity: request.target,
                reason: ComboEnd::Interrupted,
            });
        }
        if let Some(kind) = result.maneuver_cancelled {
            cues.write(CombatCue::DodgeEnded {
                entity: request.target,
                kind,
                cancelled: true,
            });
        }

        if *state != AIState::Stunned {
            crate::logger::log(&format!(
                "🤖 {:?}: {:?} → {:?}",
                request.target,
                *state,
                AIState::Stunned
            ));
            *state = AIState::Stunned;
        }

        let extended = result.outcome == StunOutcome::Extended;
        cues.write(CombatCue::StunApplied {
            entity: request.target,
            expires_at: stun.expires_at,
            extended,
        });
        crate::logger::log_info(&format!(
            "💫 Stun {} (entity: {:?}, until {:.2}s, combo interrupted: {}, maneuver cancelled: {:?})",
            if extended { "extended" } else { "applied" },
            request.target,
            stun.expires_at,
            result.combo_interrupted,
            result.maneuver_cancelled
        ));
    }
}
