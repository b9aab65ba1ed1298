//! Movement компоненты: facing, horizontal input axis

use bevy::prelude::*;

/// Направление взгляда (+1 вправо, -1 влево)
///
/// Attack anchors are mirrored by this sign.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    /// Facing from `from_x` toward `to_x`. Zero offset faces right.
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        Self(horizontal_sign(to_x - from_x))
    }

    pub fn sign(&self) -> f32 {
        self.0
    }

    /// Attack anchor position for a given horizontal offset.
    pub fn anchor(&self, origin: Vec2, offset: f32) -> Vec2 {
        Vec2::new(origin.x + offset * self.0, origin.y)
    }
}

/// Sign of a horizontal offset; zero counts as positive.
pub fn horizontal_sign(delta: f32) -> f32 {
    if delta < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Player's held horizontal input (-1..1), set by `PlayerCommand::Move`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MoveAxis(pub f32);
