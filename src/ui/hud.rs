//! In-game HUD - health, objective, radio, notices, ammo and action buttons.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::*;
use crate::host::ActiveStage;
use crate::player::Player;
use crate::stage::{ActionGroup, ActionId, AmmoService};

const COMMS_SECS: f32 = 6.0;

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

#[derive(Component)]
struct ObjectiveText;

#[derive(Component)]
struct NoticeText;

#[derive(Component)]
struct CommsText;

#[derive(Component)]
struct AmmoText;

#[derive(Component)]
struct ActionText;

/// What the HUD currently shows, fed by stage events.
#[derive(Resource, Default)]
pub struct HudState {
    pub objective: String,
    pub detail: String,
    pub marker: Option<Vec3>,
    pub notice: Option<(String, Timer)>,
    pub comms: Option<(String, Timer)>,
    pub combat: bool,
    pub kills: u32,
    pub actions: Vec<ActionGroup>,
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.init_resource::<HudState>()
        .add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                collect_stage_events,
                tick_hud_timers,
                update_health_bar,
                update_objective_text,
                update_notice_text,
                update_comms_text,
                update_ammo_text,
                update_action_text,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn text_bundle(size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(""),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands, mut state: ResMut<HudState>) {
    *state = HudState::default();

    // Top-left: objective and radio
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                left: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                max_width: Val::Px(520.0),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((text_bundle(18.0, Color::srgb(0.9, 0.85, 0.6)), ObjectiveText));
            parent.spawn((text_bundle(16.0, Color::srgb(0.6, 0.85, 0.9)), CommsText));
        });

    // Centre: crosshair and notices
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(40.0),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
            parent.spawn((text_bundle(22.0, Color::srgb(0.95, 0.95, 0.95)), NoticeText));
        });

    // Bottom row: health, action buttons, ammo
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::End,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    width: Val::Px(200.0),
                    height: Val::Px(14.0),
                    ..default()
                })
                .insert(BackgroundColor(Color::srgb(0.1, 0.1, 0.1)))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.8, 0.2, 0.2)),
                        HealthBar,
                    ));
                });
            parent.spawn((text_bundle(14.0, Color::srgb(0.75, 0.75, 0.75)), ActionText));
            parent.spawn((text_bundle(20.0, Color::srgb(0.9, 0.9, 0.9)), AmmoText));
        });
}

/// Fold this frame's stage events into the HUD state.
#[allow(clippy::too_many_arguments)]
fn collect_stage_events(
    mut state: ResMut<HudState>,
    mut notices: EventReader<StageNotice>,
    mut objectives: EventReader<ObjectiveChanged>,
    mut markers: EventReader<ObjectiveMarkerMoved>,
    mut comms: EventReader<CommsDelivered>,
    mut combat: EventReader<CombatToggled>,
    mut kills: EventReader<KillConfirmed>,
    mut buttons: EventReader<ActionButtonsChanged>,
) {
    for notice in notices.read() {
        let seconds = notice.duration_ms as f32 / 1000.0;
        state.notice = Some((notice.text.clone(), Timer::from_seconds(seconds, TimerMode::Once)));
    }
    for objective in objectives.read() {
        state.objective = objective.text.clone();
        state.detail = objective.detail.clone();
    }
    for marker in markers.read() {
        state.marker = marker.0;
    }
    for line in comms.read() {
        let text = format!("[{}] {}: {}", line.callsign, line.sender, line.text);
        state.comms = Some((text, Timer::from_seconds(COMMS_SECS, TimerMode::Once)));
    }
    for toggle in combat.read() {
        state.combat = toggle.active;
    }
    let killed = kills.read().count() as u32;
    if killed > 0 {
        state.kills += killed;
    }
    if let Some(latest) = buttons.read().last() {
        state.actions = latest.groups.clone();
    }
}

fn tick_hud_timers(time: Res<Time>, mut state: ResMut<HudState>) {
    let delta = time.delta();
    if let Some((_, timer)) = state.notice.as_mut() {
        if timer.tick(delta).finished() {
            state.notice = None;
        }
    }
    if let Some((_, timer)) = state.comms.as_mut() {
        if timer.tick(delta).finished() {
            state.comms = None;
        }
    }
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&Health, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(health.percentage() * 100.0);
}

fn update_objective_text(
    state: Res<HudState>,
    player_query: Query<&Transform, With<Player>>,
    mut text_query: Query<&mut Text, With<ObjectiveText>>,
) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let distance = match (state.marker, player_query.get_single()) {
        (Some(marker), Ok(player)) => format!(" ({:.0}m)", player.translation.xz().distance(marker.xz())),
        _ => String::new(),
    };
    let combat = if state.combat {
        format!("\nHOSTILES ENGAGED - {} DOWN", state.kills)
    } else {
        String::new()
    };
    text.0 = format!("{}{}\n{}{}", state.objective, distance, state.detail, combat);
}

fn update_notice_text(state: Res<HudState>, mut text_query: Query<&mut Text, With<NoticeText>>) {
    if let Ok(mut text) = text_query.get_single_mut() {
        text.0 = state
            .notice
            .as_ref()
            .map(|(notice, _)| notice.clone())
            .unwrap_or_default();
    }
}

fn update_comms_text(state: Res<HudState>, mut text_query: Query<&mut Text, With<CommsText>>) {
    if let Ok(mut text) = text_query.get_single_mut() {
        text.0 = state
            .comms
            .as_ref()
            .map(|(line, _)| line.clone())
            .unwrap_or_default();
    }
}

fn update_ammo_text(
    stage: Option<Res<ActiveStage>>,
    mut text_query: Query<&mut Text, With<AmmoText>>,
) {
    let (Some(stage), Ok(mut text)) = (stage, text_query.get_single_mut()) else {
        return;
    };

    let ammo = stage.0.host().ammo_state();
    text.0 = if ammo.is_reloading {
        format!("RELOADING / {}", ammo.reserve)
    } else {
        format!("{} / {}", ammo.current, ammo.reserve)
    };
}

fn key_hint(action: ActionId) -> &'static str {
    match action {
        ActionId::Flashlight => "F",
        ActionId::Scanner => "Q",
        ActionId::Interact => "E",
        ActionId::Melee => "V",
        ActionId::Reload => "R",
        ActionId::Fire => "LMB",
    }
}

fn update_action_text(state: Res<HudState>, mut text_query: Query<&mut Text, With<ActionText>>) {
    if !state.is_changed() {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    text.0 = state
        .actions
        .iter()
        .map(|group| {
            let buttons: Vec<String> = group
                .buttons
                .iter()
                .map(|button| format!("[{}] {}", key_hint(button.action), button.label))
                .collect();
            format!("{}  {}", group.title, buttons.join("  "))
        })
        .collect::<Vec<_>>()
        .join("\n");
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
