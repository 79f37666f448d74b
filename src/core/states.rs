//! Game state definitions that control the overall flow of the game.
//!
//! The stage only exists while `InGame` is active: entering it builds the
//! stage, leaving it tears the stage down. Pausing is a sub-state so it
//! never rebuilds the stage.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading`
/// - `InGame` runs the mission stage
/// - `GameOver` when the player dies
/// - `StageComplete` once the player leaves through the hatch
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
    GameOver,
    StageComplete,
}

/// Sub-states for gameplay - only active when `GameState::InGame`.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// The stage ticks every frame
    #[default]
    Running,
    /// The stage is frozen but still rendered
    Paused,
}
