//! Actor spawning: combatants and level geometry.
//!
//! Required components fill in the rest (Health, Stamina, AI state, ...),
//! the helpers only set what depends on the profile and the arena.

use bevy::prelude::*;

use crate::ai::AIConfig;
use crate::combat::Armor;
use crate::components::{Enemy, Health, Opponent, Player, Stamina};
use crate::physics::{combatant_body, static_body, CollisionLayers};
use crate::profile::{CombatProfile, CombatProfileRef, PlayerProfileRef, ProfileError};

/// Радиус капсулы бойца (в 2D — круг)
pub const COMBATANT_RADIUS: f32 = 0.5;

pub fn spawn_player(world: &mut World, position: Vec2, profile: PlayerProfileRef) -> Entity {
    let entity = world
        .spawn((
            Player,
            Health::new(profile.max_health),
            Armor {
                armor: profile.armor,
                flat_reduction: profile.flat_damage_reduction,
            },
            combatant_body(position, CollisionLayers::PLAYER),
            profile,
        ))
        .id();

    crate::logger::log_info(&format!("Player spawned: {:?} at {:?}", entity, position));
    entity
}

/// Enemy bound to `opponent` for its whole lifetime.
pub fn spawn_enemy(
    world: &mut World,
    position: Vec2,
    opponent: Entity,
    profile: CombatProfileRef,
    ai: AIConfig,
) -> Entity {
    let entity = world
        .spawn((
            Enemy,
            Health::new(profile.max_health),
            Stamina::new(
                profile.max_stamina,
                profile.stamina_regen_rate,
                profile.stamina_regen_delay,
            ),
            combatant_body(position, CollisionLayers::ENEMY),
            Opponent(opponent),
            ai,
            profile,
        ))
        .id();

    crate::logger::log_info(&format!(
        "Enemy spawned: {:?} at {:?} (opponent: {:?})",
        entity, position, opponent
    ));
    entity
}

/// Ground box, top face at `center.y + half_extents.y`.
pub fn spawn_floor(world: &mut World, center: Vec2, half_extents: Vec2) -> Entity {
    spawn_static(world, center, half_extents, CollisionLayers::GROUND)
}

pub fn spawn_wall(world: &mut World, center: Vec2, half_extents: Vec2) -> Entity {
    spawn_static(world, center, half_extents, CollisionLayers::WALL)
}

fn spawn_static(
    world: &mut World,
    center: Vec2,
    half_extents: Vec2,
    layer: CollisionLayers,
) -> Entity {
    world.spawn(static_body(center, half_extents, layer)).id()
}

/// Validates and attaches a combat profile (re-enables a disabled enemy next tick).
pub fn attach_profile(
    world: &mut World,
    entity: Entity,
    profile: CombatProfile,
) -> Result<(), ProfileError> {
    let profile = CombatProfileRef::new(profile)?;
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(profile);
    }
    Ok(())
}
