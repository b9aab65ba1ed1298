//! Combat systems

pub mod bleed;
pub mod combo;
pub mod damage;
pub mod profile;
pub mod stamina;
pub mod stun;

#[cfg(test)]
mod stun_tests;

pub use bleed::*;
pub use combo::*;
pub use damage::*;
pub use profile::*;
pub use stamina::*;
pub use stun::*;
