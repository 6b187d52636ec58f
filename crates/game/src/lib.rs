//! Mining sandbox on top of `delve-engine`: archetype catalog, configuration,
//! the player-facing mining session and its statistics.

pub mod archetype;
pub mod config;
pub mod session;
pub mod stats;
