//! ECS Components для бойцов
//!
//! Организация по доменам:
//! - actor: Combatant/Enemy/Player markers, Opponent, Health, Stamina
//! - movement: Facing, MoveAxis

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
