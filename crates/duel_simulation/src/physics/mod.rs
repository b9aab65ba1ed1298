//! Physics module (2D)
//!
//! Архитектура:
//! - Rapier для всего физического: gravity, ground/wall contacts, разведение бойцов
//! - `Body2d` — зеркало rapier body для AI/combat систем (позиция читается обратно,
//!   горизонтальная скорость командуется)
//! - Through-dodge: KinematicPositionBased + CollisionGroups без слоя противника
//!
//! Rapier step идёт в начале тика (`SimulationSet::Integrate`), так что spatial
//! queries видят коллайдеры, заспавненные до тика.

use bevy::prelude::*;
use bevy_rapier2d::plugin::PhysicsSet;
use bevy_rapier2d::prelude::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::actor::COMBATANT_RADIUS;
use crate::config::SimulationConfig;
use crate::SimulationSet;

pub mod spatial;


pub use spatial::{distance_to, is_grounded_below, is_wall_behind, RayHit, SpatialQuery};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        const GROUND = 1 << 0;
        const WALL = 1 << 1;
        const PLAYER = 1 << 2;
        const ENEMY = 1 << 3;
    }
}

impl CollisionLayers {
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }

    /// Member of this layer, collides with everything.
    pub fn member_groups(self) -> CollisionGroups {
        CollisionGroups::new(self.group(), Group::ALL)
    }

    /// Query filter groups: matches colliders that are members of any of these layers.
    pub fn query_groups(self) -> CollisionGroups {
        CollisionGroups::new(Group::ALL, self.group())
    }
}

/// Убрать контакты с `other`. Rapier требует совпадения с обеих сторон, одной стороны хватает.
pub fn suppress_contacts(groups: &mut CollisionGroups, other: Group) {
    groups.filters.remove(other);
}

pub fn restore_contacts(groups: &mut CollisionGroups) {
    groups.filters = Group::ALL;
}

pub fn contacts_suppressed(groups: &CollisionGroups, other: Group) -> bool {
    !other.is_empty() && !groups.filters.intersects(other)
}

/// Тело бойца: позиция/скорость в мировых координатах
///
/// `kinematic = true` — позицию пишет манёвр (KinematicPositionBased в rapier).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Body2d {
    pub position: Vec2,
    pub velocity: Vec2,
    pub kinematic: bool,
}

impl Body2d {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
    }
}

/// Rapier components for a combatant on `layer`.
///
/// Dynamic ball, rotation locked, frictionless (horizontal speed is commanded).
pub fn combatant_body(position: Vec2, layer: CollisionLayers) -> impl Bundle {
    (
        Body2d::at(position),
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Dynamic,
        Collider::ball(COMBATANT_RADIUS),
        layer.member_groups(),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
        Friction {
            coefficient: 0.0,
            combine_rule: CoefficientCombineRule::Min,
        },
    )
}

/// Level geometry: fixed box on `layer`.
pub fn static_body(center: Vec2, half_extents: Vec2, layer: CollisionLayers) -> impl Bundle {
    (
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(half_extents.x, half_extents.y),
        layer.member_groups(),
    )
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let dt = app
            .world()
            .get_resource::<SimulationConfig>()
            .map_or(1.0 / 60.0, SimulationConfig::tick_seconds);

        // TimestepMode до плагина: rapier в FixedUpdate ожидает Fixed
        app.insert_resource(TimestepMode::Fixed { dt, substeps: 1 })
            .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
            .configure_sets(
                FixedUpdate,
                (
                    PhysicsSet::SyncBackend,
                    PhysicsSet::StepSimulation,
                    PhysicsSet::Writeback,
                )
                    .in_set(SimulationSet::Integrate),
            )
            .add_systems(
                FixedUpdate,
                (
                    push_bodies_to_rapier.before(PhysicsSet::SyncBackend),
                    pull_bodies_from_rapier.after(PhysicsSet::Writeback),
                )
                    .in_set(SimulationSet::Integrate),
            );
    }
}

/// System: Body2d → rapier (body type, teleports, commanded velocity)
///
/// Transform пишется только при расхождении, иначе rapier change detection
/// сбрасывал бы позицию каждый тик.
pub fn push_bodies_to_rapier(
    mut bodies: Query<(&Body2d, &mut RigidBody, &mut Transform, &mut Velocity)>,
) {
    for (body, mut rigid_body, mut transform, mut velocity) in bodies.iter_mut() {
        let wanted = if body.kinematic {
            RigidBody::KinematicPositionBased
        } else {
            RigidBody::Dynamic
        };
        if *rigid_body != wanted {
            *rigid_body = wanted;
        }

        if transform.translation.truncate() != body.position {
            transform.translation = body.position.extend(transform.translation.z);
        }

        if !body.kinematic && velocity.linvel != body.velocity {
            velocity.linvel = body.velocity;
        }
    }
}

/// System: rapier → Body2d (после шага)
pub fn pull_bodies_from_rapier(mut bodies: Query<(&mut Body2d, &Transform, &Velocity)>) {
    for (mut body, transform, velocity) in bodies.iter_mut() {
        body.position = transform.translation.truncate();
        if !body.kinematic {
            body.velocity = velocity.linvel;
        }
    }
}
