//! Stamina regeneration system.

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::Stamina;

/// System: regenerate stamina (после regen_delay с последнего consume)
pub fn regenerate_stamina(time: Res<Time<Fixed>>, mut query: Query<&mut Stamina, Without<Dead>>) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for mut stamina in query.iter_mut() {
        stamina.regenerate(delta, now);
    }
}
