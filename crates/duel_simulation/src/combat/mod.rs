//! Combat module
//!
//! - Combo state machine (enemy), stun/interrupt controller, bleed
//! - Damage pipeline: DamageRequest → immunity → flee reduction → armor → Health
//! - Events: DamageDealt, DamageBlocked, EntityDied, CombatCue
//!
//! Порядок в тике (SimulationSet):
//! Sense: проверка профилей → Interrupt: стан → Resources: stamina/bleed →
//! Resolve: комбо-удары и урон → Cleanup: despawn мёртвых

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod damage;
pub mod events;
pub mod systems;

pub use components::{
    ActionGate, Bleed, ComboAttack, ComboEnd, ComboEvent, ComboPhase, ComboRejected, StunOutcome,
    StunState,
};
pub use damage::{resolve_damage, Armor, DamageModifiers, DamageResolution, Dead};
pub use events::{
    CombatCue, DamageBlocked, DamageDealt, DamageRequest, DamageSource, EntityDied, StunRequest,
};
pub use systems::incapacitate;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<DamageBlocked>()
            .add_event::<EntityDied>()
            .add_event::<StunRequest>()
            .add_event::<CombatCue>()
            .register_type::<StunState>()
            .register_type::<Bleed>();

        app.add_systems(
            FixedUpdate,
            (
                crate::rotate_event_buffer::<DamageRequest>,
                crate::rotate_event_buffer::<DamageDealt>,
                crate::rotate_event_buffer::<DamageBlocked>,
                crate::rotate_event_buffer::<EntityDied>,
                crate::rotate_event_buffer::<StunRequest>,
                crate::rotate_event_buffer::<CombatCue>,
                systems::check_combat_profiles,
            )
                .chain()
                .in_set(SimulationSet::Sense),
        )
        .add_systems(
            FixedUpdate,
            (systems::tick_stuns, systems::apply_stun_requests)
                .chain()
                .in_set(SimulationSet::Interrupt),
        )
        .add_systems(
            FixedUpdate,
            (systems::regenerate_stamina, systems::tick_bleeds)
                .chain()
                .in_set(SimulationSet::Resources),
        )
        .add_systems(
            FixedUpdate,
            (systems::advance_enemy_combos, systems::apply_damage_requests)
                .chain()
                .in_set(SimulationSet::Resolve),
        )
        .add_systems(
            FixedUpdate,
            systems::despawn_dead.in_set(SimulationSet::Cleanup),
        );
    }
}
