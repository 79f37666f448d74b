//! Collaborator interfaces the stage is constructed with.
//!
//! Everything outside the orchestration core (camera, HUD, weapon, effects,
//! asset instantiation) is reached through these traits. All calls are
//! fire-and-forget except the few queries that return values.

use bevy::prelude::*;

use super::actions::ActionGroup;
use super::narrative::CommsLine;

/// Opaque handle to a renderable owned by the scene service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Renderable(pub u32);

/// Opaque handle to a light owned by the scene service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightHandle(pub u32);

/// Snapshot of the player's weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmmoState {
    pub current: u32,
    pub max: u32,
    pub reserve: u32,
    pub is_reloading: bool,
}

/// Player position and view.
pub trait PlayerProvider {
    fn position(&self) -> Vec3;
    /// Unit view direction, including pitch.
    fn facing(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// HUD, objectives and radio.
pub trait StageUi {
    fn notify(&mut self, text: &str, duration_ms: u32);
    fn set_objective(&mut self, text: &str, detail: &str);
    fn set_objective_marker(&mut self, marker: Option<Vec3>);
    fn deliver_comms(&mut self, line: &CommsLine);
    fn set_health_delta(&mut self, amount: i32);
    fn set_combat_active(&mut self, active: bool);
    fn on_kill_feedback(&mut self);
    fn set_action_buttons(&mut self, groups: &[ActionGroup]);
}

/// The player's weapon and ammunition.
pub trait AmmoService {
    fn try_consume_ammo(&mut self) -> bool;
    fn request_reload(&mut self);
    fn ammo_state(&self) -> AmmoState;
    fn add_reserve(&mut self, amount: u32);
}

/// Cosmetic hit reactions: knockback, screen shake, floating numbers.
pub trait FeedbackService {
    fn apply_hit_feedback(&mut self, target: Renderable, damage: i32, direction: Vec3);
    fn apply_player_hit_feedback(&mut self, damage: i32);
}

/// One-shot particle effects.
pub trait EffectsService {
    fn death_burst(&mut self, position: Vec3);
    fn splatter(&mut self, position: Vec3, direction: Vec3);
    fn muzzle_flash(&mut self, position: Vec3, direction: Vec3);
}

/// Asset instantiation and per-frame scene updates.
pub trait SceneService {
    /// Instantiate the asset registered under `key`, or `None` if it is unavailable.
    fn instantiate(&mut self, key: &str, position: Vec3) -> Option<Renderable>;
    /// Build a procedural stand-in for `key`. Never fails.
    fn build_placeholder(&mut self, key: &str, position: Vec3) -> Renderable;
    fn place(&mut self, handle: Renderable, position: Vec3, yaw: f32, scale: f32);
    fn set_visible(&mut self, handle: Renderable, visible: bool);
    fn release(&mut self, handle: Renderable);
    fn spawn_light(&mut self, position: Vec3, color: (f32, f32, f32), intensity: f32, range: f32) -> LightHandle;
    fn set_light_intensity(&mut self, light: LightHandle, intensity: f32);
    fn release_light(&mut self, light: LightHandle);
    fn set_flashlight(&mut self, on: bool);
    /// Move player-following environment volumes (rain, fog) to the player.
    fn sync_environment(&mut self, player: Vec3);
    /// Hatch opening progress in `0.0..=1.0`.
    fn set_hatch_progress(&mut self, progress: f32);
}

/// Every capability the stage needs from its host.
pub trait StageHost:
    PlayerProvider + StageUi + AmmoService + FeedbackService + EffectsService + SceneService
{
}

impl<T> StageHost for T where
    T: PlayerProvider + StageUi + AmmoService + FeedbackService + EffectsService + SceneService
{
}

/// Instantiate `key`, falling back to a placeholder when the asset is missing.
pub fn instantiate_or_placeholder<H: SceneService + ?Sized>(
    host: &mut H,
    key: &str,
    position: Vec3,
) -> Renderable {
    match host.instantiate(key, position) {
        Some(handle) => handle,
        None => {
            warn!("Asset '{}' unavailable, using placeholder", key);
            host.build_placeholder(key, position)
        }
    }
}
