//! Combat components (combo state machine, stun record, bleed).

pub mod bleed;
pub mod combo;
pub mod stun;


pub use bleed::Bleed;
pub use combo::{ComboAttack, ComboEnd, ComboEvent, ComboPhase, ComboRejected};
pub use stun::{ActionGate, StunOutcome, StunState};
