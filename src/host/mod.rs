//! Host module - the bridge between the stage director and the Bevy world.

mod bevy_host;
mod magazine;
mod plugin;

pub use bevy_host::{BevyHost, HostCommand};
pub use magazine::Magazine;
pub use plugin::{ActiveStage, SoundEffects, StageEntity, StagePlugin, StageRenderable, StageSettings};
