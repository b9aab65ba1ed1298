//! Spatial query service: ray casts and circle overlaps against the collider set.
//!
//! `SpatialQuery` — контракт для AI (ground/wall лучи) и hit resolution.
//! Реализация — rapier query pipeline (обновляется каждым шагом физики).

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Collider, QueryFilter, RapierContext};

use super::CollisionLayers;
use crate::components::horizontal_sign;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec2,
    pub distance: f32,
}

/// Query contract used by the AI (ground/wall checks) and by attack hit resolution.
pub trait SpatialQuery {
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;

    /// Sorted by entity bits, no duplicates.
    fn overlap_circle(&self, point: Vec2, radius: f32, mask: CollisionLayers) -> Vec<Entity>;
}

impl SpatialQuery for RapierContext<'_> {
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let mut filter = QueryFilter::new().groups(mask.query_groups());
        if let Some(entity) = exclude {
            filter = filter.exclude_collider(entity);
        }

        // solid: луч из точки внутри коллайдера попадает на расстоянии 0
        let (entity, distance) = self.cast_ray(origin, direction, max_distance, true, filter)?;
        Some(RayHit {
            entity,
            point: origin + direction * distance,
            distance,
        })
    }

    fn overlap_circle(&self, point: Vec2, radius: f32, mask: CollisionLayers) -> Vec<Entity> {
        let shape = Collider::ball(radius);
        let filter = QueryFilter::new().groups(mask.query_groups());
        let mut hits = Vec::new();
        self.intersections_with_shape(point, 0.0, &shape, filter, |entity| {
            hits.push(entity);
            true
        });
        hits.sort_by_key(|e| e.to_bits());
        hits.dedup();
        hits
    }
}

pub fn distance_to(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// At least one `GROUND` hit straight down within `max_distance`, ignoring self.
pub fn is_grounded_below(
    query: &impl SpatialQuery,
    entity: Entity,
    position: Vec2,
    max_distance: f32,
) -> bool {
    query
        .ray_cast(position, Vec2::NEG_Y, max_distance, CollisionLayers::GROUND, Some(entity))
        .is_some()
}

/// Horizontal `WALL` ray pointing away from `other_position`.
pub fn is_wall_behind(
    query: &impl SpatialQuery,
    position: Vec2,
    other_position: Vec2,
    max_distance: f32,
) -> bool {
    let away = horizontal_sign(position.x - other_position.x);
    query
        .ray_cast(position, Vec2::new(away, 0.0), max_distance, CollisionLayers::WALL, None)
        .is_some()
}
