//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states
/// - Global events emitted by the stage bridge
/// - Pause handling
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_sub_state::<PlayState>()
            .add_event::<StageNotice>()
            .add_event::<ObjectiveChanged>()
            .add_event::<ObjectiveMarkerMoved>()
            .add_event::<CommsDelivered>()
            .add_event::<HealthDelta>()
            .add_event::<CombatToggled>()
            .add_event::<KillConfirmed>()
            .add_event::<ActionButtonsChanged>()
            .add_event::<HitFeedback>()
            .add_event::<PlayerHit>()
            .add_event::<EffectBurst>()
            // Nothing to load yet, go straight into the stage
            .add_systems(OnEnter(GameState::Loading), start_stage)
            .add_systems(Update, handle_pause_input.run_if(in_state(GameState::InGame)));
    }
}

fn start_stage(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Running => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Running),
        }
    }
}
