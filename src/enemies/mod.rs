//! Enemies module - the ambush wave, hostile behavior, and spawning.

mod ai;
mod components;
mod spawning;
mod wave;

pub use ai::{update_behavior, HostileStrike};
pub use components::*;
pub use spawning::jittered_spawn_positions;
pub use wave::Wave;
