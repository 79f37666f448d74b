//! Combat module - player attack queries, cooldowns, and player health.

mod components;
mod resolver;

pub use components::*;
pub use resolver::{hitscan, melee_sweep};
