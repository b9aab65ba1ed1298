//! AI components (state, tuning, threat memo, maneuvers).

pub mod brain;
pub mod maneuver;
pub mod threat;

pub use brain::{AIBrain, AIConfig, AIState, ReactionModules};
pub use maneuver::{ActiveManeuver, DodgeKind, Maneuver, ManeuverTick, ThroughDodge};
pub use threat::{AttackSignal, AttackSource, ThreatDetector};
