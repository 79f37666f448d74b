//! UI plugin - HUD plus pause, game-over and stage-complete overlays.

use bevy::prelude::*;

use super::hud;
use crate::core::{GameState, PlayState};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app
            // Pause overlay
            .add_systems(OnEnter(PlayState::Paused), setup_pause_overlay)
            .add_systems(OnExit(PlayState::Paused), cleanup_overlay::<PauseOverlay>)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_end_screen)

            // Stage complete
            .add_systems(OnEnter(GameState::StageComplete), setup_stage_complete)
            .add_systems(OnExit(GameState::StageComplete), cleanup_end_screen)

            .add_systems(
                Update,
                menu_input.run_if(
                    in_state(GameState::GameOver).or(in_state(GameState::StageComplete)),
                ),
            );
    }
}

#[derive(Component)]
struct PauseOverlay;

/// Marker for game-over and stage-complete UI entities.
#[derive(Component)]
struct EndScreen;

/// Camera for the end screens; the player camera is gone by then.
#[derive(Component)]
struct MenuCamera;

#[derive(Component)]
enum MenuButton {
    Retry,
    Quit,
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.2)),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn setup_pause_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            PauseOverlay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("PAUSED"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn spawn_end_screen(commands: &mut Commands, title: &str, color: Color, background: Color) {
    commands.spawn((Camera2d, MenuCamera));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            EndScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(color),
                Node {
                    margin: UiRect::bottom(Val::Px(60.0)),
                    ..default()
                },
            ));

            spawn_menu_button(parent, "Retry", MenuButton::Retry);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

fn setup_game_over(mut commands: Commands) {
    spawn_end_screen(
        &mut commands,
        "KILLED IN ACTION",
        Color::srgb(0.8, 0.2, 0.2),
        Color::srgba(0.1, 0.0, 0.0, 0.9),
    );
}

fn setup_stage_complete(mut commands: Commands) {
    spawn_end_screen(
        &mut commands,
        "OUTPOST CLEARED",
        Color::srgb(0.7, 0.85, 0.6),
        Color::srgba(0.02, 0.05, 0.03, 0.9),
    );
}

/// Handle end-screen button interactions.
fn menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = Color::srgb(0.3, 0.3, 0.35).into();
                match button {
                    MenuButton::Retry => next_state.set(GameState::InGame),
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = Color::srgb(0.25, 0.25, 0.3).into();
            }
            Interaction::None => {
                *bg_color = Color::srgb(0.15, 0.15, 0.2).into();
            }
        }
    }
}

fn cleanup_overlay<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn cleanup_end_screen(
    mut commands: Commands,
    ui_query: Query<Entity, With<EndScreen>>,
    camera_query: Query<Entity, With<MenuCamera>>,
) {
    for entity in ui_query.iter().chain(camera_query.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
