//! Stage plugin - builds the stage on entering the game, drives it once per
//! frame, and applies what it asked for to the ECS world.

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_kira_audio::prelude::{AudioApp, AudioChannel, AudioControl};
use bevy_rapier3d::prelude::*;

use super::bevy_host::{BevyHost, HostCommand};
use super::magazine::Magazine;
use crate::combat::{Health, ScreenShake};
use crate::core::*;
use crate::player::{spawn_player, Flashlight, Player, PlayerCamera, PlayerConfig};
use crate::stage::{ActionId, AmmoService, LightHandle, Renderable, Stage, StageConfig};
use crate::world::PickupKind;

const FLASHLIGHT_LUMENS: f32 = 400_000.0;
const RAIN_HEIGHT: f32 = 12.0;

const RADIO_CHIRP: &str = "audio/radio_chirp.ogg";
const RIFLE_SHOT: &str = "audio/rifle_shot.ogg";
const RIFLE_RELOAD: &str = "audio/rifle_reload.ogg";

/// Keyboard bindings for the discrete stage actions.
const KEY_BINDINGS: [(KeyCode, ActionId); 5] = [
    (KeyCode::KeyF, ActionId::Flashlight),
    (KeyCode::KeyQ, ActionId::Scanner),
    (KeyCode::KeyE, ActionId::Interact),
    (KeyCode::KeyV, ActionId::Melee),
    (KeyCode::KeyR, ActionId::Reload),
];

/// Which stage to load and where its exit leads.
#[derive(Resource, Debug, Clone)]
pub struct StageSettings {
    pub stage_id: String,
    pub next_stage_id: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            stage_id: "outpost".to_string(),
            next_stage_id: "depot".to_string(),
        }
    }
}

/// The running stage. Only present while `GameState::InGame` is active.
#[derive(Resource)]
pub struct ActiveStage(pub Stage<BevyHost>);

/// Audio channel for one-shot stage sounds.
#[derive(Resource)]
pub struct SoundEffects;

/// Marker for everything spawned for the stage, despawned on exit.
#[derive(Component)]
pub struct StageEntity;

/// Links an entity back to the stage's handle for it.
#[derive(Component)]
pub struct StageRenderable(pub Renderable);

#[derive(Component)]
struct HatchDoor;

/// Rain sheet that follows the player.
#[derive(Component)]
struct RainVolume;

/// One-shot effect that despawns when its timer runs out.
#[derive(Component)]
struct Transient(Timer);

/// ECS entities behind the stage's renderable and light handles.
#[derive(Resource, Default)]
struct SceneEntities {
    renderables: HashMap<Renderable, Entity>,
    lights: HashMap<LightHandle, Entity>,
}

/// Procedural meshes for models that have no asset on disk.
#[derive(Resource)]
struct PlaceholderAssets {
    capsule: Handle<Mesh>,
    crate_box: Handle<Mesh>,
    spark: Handle<Mesh>,
    hostile: Handle<StandardMaterial>,
    supply: Handle<StandardMaterial>,
    flash: Handle<StandardMaterial>,
    blood: Handle<StandardMaterial>,
}

impl FromWorld for PlaceholderAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let capsule = meshes.add(Capsule3d::new(0.35, 1.1));
        let crate_box = meshes.add(Cuboid::new(0.6, 0.4, 0.6));
        let spark = meshes.add(Sphere::new(0.12));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self {
            capsule,
            crate_box,
            spark,
            hostile: materials.add(Color::srgb(0.45, 0.12, 0.1)),
            supply: materials.add(Color::srgb(0.3, 0.45, 0.25)),
            flash: materials.add(StandardMaterial {
                emissive: LinearRgba::rgb(8.0, 6.0, 2.0),
                ..default()
            }),
            blood: materials.add(Color::srgb(0.5, 0.0, 0.0)),
        }
    }
}

/// Stage plugin - owns the `ActiveStage` lifecycle.
pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageSettings>()
            .init_resource::<SceneEntities>()
            .init_resource::<PlaceholderAssets>()
            .add_audio_channel::<SoundEffects>()
            .add_systems(OnEnter(GameState::InGame), setup_stage)
            .add_systems(OnExit(GameState::InGame), teardown_stage)
            .add_systems(
                Update,
                drive_stage
                    .run_if(in_state(GameState::InGame))
                    .run_if(in_state(PlayState::Running)),
            )
            .add_systems(
                Update,
                (apply_host_commands, apply_health_deltas, expire_transients)
                    .chain()
                    .after(drive_stage)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

/// Where a model key's glTF lives under `assets/`.
fn model_path(key: &str) -> String {
    format!("models/{key}.glb")
}

/// Model keys with a glTF file on disk. Everything else gets a placeholder.
fn discover_models(config: &StageConfig) -> HashSet<String> {
    let keys = [
        config.hostiles.model_key.as_str(),
        PickupKind::Ammo.model_key(),
        PickupKind::Health.model_key(),
        PickupKind::Armor.model_key(),
    ];
    keys.into_iter()
        .filter(|key| Path::new("assets").join(model_path(key)).exists())
        .map(str::to_string)
        .collect()
}

/// Build static scenery and the player, then the stage itself.
fn setup_stage(
    mut commands: Commands,
    settings: Res<StageSettings>,
    player_config: Res<PlayerConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = StageConfig::load_or_default(StageConfig::path_for(&settings.stage_id));
    info!("Building stage '{}'", config.stage_id);

    let (min, max) = (config.bounds.min, config.bounds.max);
    let size = Vec2::new(max.0 - min.0, max.1 - min.1);
    let center = Vec3::new((min.0 + max.0) / 2.0, 0.0, (min.1 + max.1) / 2.0);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, 0.2, size.y))),
        MeshMaterial3d(materials.add(Color::srgb(0.22, 0.22, 0.24))),
        Transform::from_translation(center - Vec3::Y * 0.1),
        Collider::cuboid(size.x / 2.0, 0.1, size.y / 2.0),
        StageEntity,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 1.4, 0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.15, 0.2, 0.25),
            emissive: LinearRgba::rgb(0.0, 0.6, 0.9),
            ..default()
        })),
        Transform::from_translation(config.terminal_position() + Vec3::Y * 0.7),
        Collider::cuboid(0.5, 0.7, 0.25),
        StageEntity,
    ));

    // Pivot on the hinge so progress rotates the door open
    commands
        .spawn((
            HatchDoor,
            Transform::from_translation(config.hatch_position()),
            Visibility::default(),
            StageEntity,
        ))
        .with_children(|hinge| {
            hinge.spawn((
                Mesh3d(meshes.add(Cuboid::new(2.0, 0.15, 2.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.35, 0.33, 0.3))),
                Transform::from_xyz(0.0, 0.1, -1.0),
            ));
        });

    commands.spawn((
        RainVolume,
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.05, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.6, 0.65, 0.75, 0.15),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(config.player_start() + Vec3::Y * RAIN_HEIGHT),
        StageEntity,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.5, 0.55, 0.7),
        brightness: 60.0,
    });

    let player = spawn_player(&mut commands, config.player_start(), &player_config);
    commands.entity(player).insert(StageEntity);

    let host = BevyHost::new(discover_models(&config), Magazine::default());
    commands.insert_resource(ActiveStage(Stage::new(config, host)));
}

/// Feed input and the player snapshot to the stage and advance it one frame.
fn drive_stage(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<StageSettings>,
    stage: Option<ResMut<ActiveStage>>,
    mut player_query: Query<&mut Transform, With<Player>>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut stage) = stage else {
        return;
    };
    let Ok(mut player) = player_query.get_single_mut() else {
        return;
    };
    let stage = &mut stage.0;
    let delta = time.delta_secs();

    let facing = camera_query
        .get_single()
        .map_or(player.forward().as_vec3(), |camera| camera.forward().as_vec3());
    let host = stage.host_mut();
    host.sync_player(player.translation, facing);
    if host.tick_weapon(delta) {
        debug!("Reload complete");
    }

    for (key, action) in KEY_BINDINGS {
        if keyboard.just_pressed(key) {
            stage.handle_action(action);
        }
    }
    if mouse.just_pressed(MouseButton::Right) {
        stage.handle_action(ActionId::Melee);
    }
    // Held trigger while rounds remain, the ranged cooldown paces the shots.
    // An empty magazine only answers a fresh press.
    let firing = if stage.host().ammo_state().current > 0 {
        mouse.pressed(MouseButton::Left)
    } else {
        mouse.just_pressed(MouseButton::Left)
    };
    if firing {
        stage.handle_action(ActionId::Fire);
    }

    stage.tick(delta);

    if let Some(position) = stage.host_mut().take_requested_position() {
        player.translation = position;
    }

    let hatch = stage.config().hatch_position();
    let near_hatch = player.translation.xz().distance(hatch.xz()) <= stage.config().interact_radius;
    if near_hatch && stage.can_exit(&settings.next_stage_id) {
        info!("Leaving for '{}'", settings.next_stage_id);
        next_state.set(GameState::StageComplete);
    }
}

/// Event writers for everything the HUD listens to.
#[derive(SystemParam)]
struct StageEvents<'w> {
    notices: EventWriter<'w, StageNotice>,
    objectives: EventWriter<'w, ObjectiveChanged>,
    markers: EventWriter<'w, ObjectiveMarkerMoved>,
    comms: EventWriter<'w, CommsDelivered>,
    health: EventWriter<'w, HealthDelta>,
    combat: EventWriter<'w, CombatToggled>,
    kills: EventWriter<'w, KillConfirmed>,
    buttons: EventWriter<'w, ActionButtonsChanged>,
    hits: EventWriter<'w, HitFeedback>,
    player_hits: EventWriter<'w, PlayerHit>,
    effects: EventWriter<'w, EffectBurst>,
}

/// World access needed to realise scene commands.
#[derive(SystemParam)]
struct StageWorld<'w, 's> {
    commands: Commands<'w, 's>,
    scene: ResMut<'w, SceneEntities>,
    placeholders: Res<'w, PlaceholderAssets>,
    asset_server: Res<'w, AssetServer>,
    screen_shake: ResMut<'w, ScreenShake>,
    sfx: Res<'w, AudioChannel<SoundEffects>>,
    point_lights: Query<'w, 's, &'static mut PointLight>,
    flashlight: Query<'w, 's, &'static mut SpotLight, With<Flashlight>>,
    hatch: Query<'w, 's, &'static mut Transform, (With<HatchDoor>, Without<RainVolume>)>,
    rain: Query<'w, 's, &'static mut Transform, (With<RainVolume>, Without<HatchDoor>)>,
}

impl StageWorld<'_, '_> {
    fn spawn_renderable(&mut self, handle: Renderable, key: &str, position: Vec3, placeholder: bool) {
        let transform = Transform::from_translation(position);
        let mut entity = if placeholder {
            let (mesh, material) = if key.starts_with("pickup_") {
                (&self.placeholders.crate_box, &self.placeholders.supply)
            } else {
                (&self.placeholders.capsule, &self.placeholders.hostile)
            };
            self.commands.spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                transform,
            ))
        } else {
            let scene = self.asset_server.load(format!("{}#Scene0", model_path(key)));
            self.commands.spawn((SceneRoot(scene), transform))
        };
        entity.insert((StageRenderable(handle), StageEntity));
        let entity = entity.id();
        self.scene.renderables.insert(handle, entity);
    }

    fn spawn_effect(&mut self, kind: EffectKind, position: Vec3) {
        let (material, scale, seconds) = match kind {
            EffectKind::MuzzleFlash => (&self.placeholders.flash, 0.6, 0.05),
            EffectKind::Splatter => (&self.placeholders.blood, 0.8, 0.3),
            EffectKind::DeathBurst => (&self.placeholders.blood, 3.0, 0.6),
        };
        self.commands.spawn((
            Mesh3d(self.placeholders.spark.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            Transient(Timer::from_seconds(seconds, TimerMode::Once)),
            StageEntity,
        ));
    }

    fn play(&self, path: &'static str) {
        self.sfx.play(self.asset_server.load(path));
    }
}

/// Apply every command the stage recorded this frame.
fn apply_host_commands(
    stage: Option<ResMut<ActiveStage>>,
    mut world: StageWorld,
    mut events: StageEvents,
) {
    let Some(mut stage) = stage else {
        return;
    };

    for command in stage.0.host_mut().drain_commands() {
        match command {
            HostCommand::Notify { text, duration_ms } => {
                events.notices.send(StageNotice { text, duration_ms });
            }
            HostCommand::Objective { text, detail } => {
                events.objectives.send(ObjectiveChanged { text, detail });
            }
            HostCommand::Marker(marker) => {
                events.markers.send(ObjectiveMarkerMoved(marker));
            }
            HostCommand::Comms(line) => {
                world.play(RADIO_CHIRP);
                events.comms.send(CommsDelivered {
                    sender: line.sender,
                    callsign: line.callsign,
                    portrait: line.portrait,
                    text: line.text,
                });
            }
            HostCommand::HealthDelta(amount) => {
                events.health.send(HealthDelta { amount });
            }
            HostCommand::CombatActive(active) => {
                events.combat.send(CombatToggled { active });
            }
            HostCommand::Kill => {
                events.kills.send(KillConfirmed);
            }
            HostCommand::Buttons(groups) => {
                events.buttons.send(ActionButtonsChanged { groups });
            }
            HostCommand::HitFeedback { target, damage, direction } => {
                if let Some(&entity) = world.scene.renderables.get(&target) {
                    events.hits.send(HitFeedback { target: entity, damage, direction });
                }
                world.screen_shake.shake(0.03, 0.08);
            }
            HostCommand::PlayerHit(damage) => {
                world.screen_shake.shake(0.1 + damage as f32 * 0.01, 0.25);
                events.player_hits.send(PlayerHit { damage });
            }
            HostCommand::Effect { kind, position, direction } => {
                if kind == EffectKind::MuzzleFlash {
                    world.play(RIFLE_SHOT);
                }
                world.spawn_effect(kind, position);
                events.effects.send(EffectBurst { kind, position, direction });
            }
            HostCommand::Reload => world.play(RIFLE_RELOAD),
            HostCommand::Instantiate { handle, key, position, placeholder } => {
                world.spawn_renderable(handle, &key, position, placeholder);
            }
            HostCommand::Place { handle, position, yaw, scale } => {
                if let Some(&entity) = world.scene.renderables.get(&handle) {
                    world.commands.entity(entity).insert(
                        Transform::from_translation(position)
                            .with_rotation(Quat::from_rotation_y(yaw))
                            .with_scale(Vec3::splat(scale)),
                    );
                }
            }
            HostCommand::SetVisible { handle, visible } => {
                if let Some(&entity) = world.scene.renderables.get(&handle) {
                    let visibility = if visible {
                        Visibility::Inherited
                    } else {
                        Visibility::Hidden
                    };
                    world.commands.entity(entity).insert(visibility);
                }
            }
            HostCommand::Release(handle) => {
                if let Some(entity) = world.scene.renderables.remove(&handle) {
                    world.commands.entity(entity).despawn_recursive();
                }
            }
            HostCommand::SpawnLight { light, position, color, intensity, range } => {
                let entity = world
                    .commands
                    .spawn((
                        PointLight {
                            color: Color::srgb(color.0, color.1, color.2),
                            intensity,
                            range,
                            shadows_enabled: false,
                            ..default()
                        },
                        Transform::from_translation(position),
                        StageEntity,
                    ))
                    .id();
                world.scene.lights.insert(light, entity);
            }
            HostCommand::LightIntensity { light, intensity } => {
                let Some(&entity) = world.scene.lights.get(&light) else {
                    continue;
                };
                if let Ok(mut point) = world.point_lights.get_mut(entity) {
                    point.intensity = intensity;
                }
            }
            HostCommand::ReleaseLight(light) => {
                if let Some(entity) = world.scene.lights.remove(&light) {
                    world.commands.entity(entity).despawn_recursive();
                }
            }
            HostCommand::Flashlight(on) => {
                for mut spot in world.flashlight.iter_mut() {
                    spot.intensity = if on { FLASHLIGHT_LUMENS } else { 0.0 };
                }
            }
            HostCommand::Environment(player) => {
                for mut transform in world.rain.iter_mut() {
                    transform.translation = player + Vec3::Y * RAIN_HEIGHT;
                }
            }
            HostCommand::HatchProgress(progress) => {
                for mut transform in world.hatch.iter_mut() {
                    transform.rotation = Quat::from_rotation_x(progress * FRAC_PI_2);
                }
            }
        }
    }
}

/// Apply health changes to the player and end the run on death.
fn apply_health_deltas(
    mut deltas: EventReader<HealthDelta>,
    mut player_query: Query<&mut Health, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok(mut health) = player_query.get_single_mut() else {
        return;
    };

    for delta in deltas.read() {
        health.apply_delta(delta.amount as f32);
    }

    if health.is_dead() {
        info!("Player died! Transitioning to Game Over...");
        next_state.set(GameState::GameOver);
    }
}

fn expire_transients(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transient)>,
) {
    for (entity, mut transient) in query.iter_mut() {
        if transient.0.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Tear the stage down and despawn everything it spawned.
fn teardown_stage(
    mut commands: Commands,
    stage: Option<ResMut<ActiveStage>>,
    mut scene: ResMut<SceneEntities>,
    query: Query<Entity, With<StageEntity>>,
) {
    if let Some(mut stage) = stage {
        stage.0.teardown();
        stage.0.host_mut().drain_commands();
    }
    commands.remove_resource::<ActiveStage>();

    scene.renderables.clear();
    scene.lights.clear();
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
