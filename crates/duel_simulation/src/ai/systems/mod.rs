//! AI systems

pub mod decision;
pub mod maneuver;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod decision_tests;

pub use decision::*;
pub use maneuver::*;
