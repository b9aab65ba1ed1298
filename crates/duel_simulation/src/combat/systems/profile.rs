//! Configuration check: combatants without a profile are disabled, not crashed.

use bevy::prelude::*;

use crate::combat::{ActionGate, ComboAttack};
use crate::components::{Enemy, Player};
use crate::physics::Body2d;
use crate::profile::{CombatDisabled, CombatProfileRef, PlayerProfileRef, ProfileError};

/// System: insert/remove `CombatDisabled` based on profile presence
pub fn check_combat_profiles(
    mut commands: Commands,
    mut missing_enemy: Query<
        (Entity, &mut Body2d, Option<&mut ComboAttack>),
        (With<Enemy>, Without<CombatProfileRef>, Without<CombatDisabled>),
    >,
    missing_player: Query<
        Entity,
        (With<Player>, Without<PlayerProfileRef>, Without<CombatDisabled>),
    >,
    restored: Query<
        (Entity, Option<&ActionGate>),
        (
            With<CombatDisabled>,
            Or<(
                (With<Enemy>, With<CombatProfileRef>),
                (With<Player>, With<PlayerProfileRef>),
            )>,
        ),
    >,
) {
    for (entity, mut body, combo) in missing_enemy.iter_mut() {
        body.stop_horizontal();
        if let Some(mut combo) = combo {
            combo.interrupt();
        }
        disable(&mut commands, entity, ProfileError::Missing);
    }

    for entity in missing_player.iter() {
        disable(&mut commands, entity, ProfileError::Missing);
    }

    for (entity, gate) in restored.iter() {
        commands.entity(entity).remove::<CombatDisabled>();
        crate::logger::log_info(&format!(
            "Combat re-enabled for {:?} (gate enabled: {})",
            entity,
            gate.is_none_or(|g| g.enabled)
        ));
    }
}

/// Disables `entity` with the error as the logged reason.
pub fn disable(commands: &mut Commands, entity: Entity, error: ProfileError) {
    crate::logger::log_error(&format!("❌ Combat disabled for {:?}: {}", entity, error));
    commands.entity(entity).insert(CombatDisabled {
        reason: error.to_string(),
    });
}
