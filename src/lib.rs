//! Outpost Stage - a scripted first-person mission stage in Bevy.
//!
//! The player approaches a storm-swept outpost, pulls the garrison logs from
//! a terminal, survives an ambush in the vehicle bay and leaves through an
//! escape hatch.
//!
//! # Architecture
//!
//! The stage itself is plain Rust and never touches the ECS:
//!
//! - **Core**: Game states, global events, cooldowns and the cue timeline
//! - **Stage**: Phase machine, trigger zones, narrative ledger, stage config and the `Stage` director
//! - **Enemies**: The ambush wave and hostile behavior
//! - **Combat**: Melee sweep and hitscan queries, player health
//! - **World**: Flickering lights and collectible supplies
//!
//! The Bevy side wraps it:
//!
//! - **Player**: First-person movement and camera
//! - **Host**: Bridge that owns the stage, ticks it and applies its requests
//! - **UI**: HUD and overlay screens

pub mod combat;
pub mod core;
pub mod enemies;
pub mod host;
pub mod player;
pub mod stage;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct OutpostPlugin;

impl Plugin for OutpostPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Stage bridge
            .add_plugins(host::StagePlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
