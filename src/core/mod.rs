//! Core game module - states, events, and the timing primitives everything
//! else builds on.

mod cooldown;
mod events;
mod plugin;
mod states;
mod timeline;

pub use cooldown::Cooldown;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use timeline::Timeline;
