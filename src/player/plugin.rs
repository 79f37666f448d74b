//! Player plugin - movement, camera, and player-related systems.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player movement, camera and screen shake.
///
/// The stage bridge spawns the player itself, at the stage's start point.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
