//! Bleed expiry.

use bevy::prelude::*;

use crate::combat::Bleed;

/// System: bleed истекает по времени
pub fn tick_bleeds(time: Res<Time<Fixed>>, mut query: Query<(Entity, &mut Bleed)>) {
    let now = time.elapsed_secs();

    for (entity, mut bleed) in query.iter_mut() {
        if bleed.tick(now) {
            crate::logger::log(&format!("🩸 Bleed expired (entity: {:?})", entity));
        }
    }
}
