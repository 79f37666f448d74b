//! The stage's view of the Bevy world.
//!
//! [`BevyHost`] answers queries from snapshots taken at the start of the frame
//! and records every side effect as a [`HostCommand`]. The stage plugin drains
//! the commands after the stage has ticked and applies them to the ECS.

use std::collections::HashSet;

use bevy::prelude::*;

use super::magazine::Magazine;
use crate::core::EffectKind;
use crate::stage::{
    ActionGroup, AmmoService, AmmoState, CommsLine, EffectsService, FeedbackService, LightHandle,
    PlayerProvider, Renderable, SceneService, StageUi,
};

/// A side effect requested by the stage, waiting to be applied to the world.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Notify { text: String, duration_ms: u32 },
    Objective { text: String, detail: String },
    Marker(Option<Vec3>),
    Comms(CommsLine),
    HealthDelta(i32),
    CombatActive(bool),
    Kill,
    Buttons(Vec<ActionGroup>),
    HitFeedback { target: Renderable, damage: i32, direction: Vec3 },
    PlayerHit(i32),
    Effect { kind: EffectKind, position: Vec3, direction: Option<Vec3> },
    Reload,
    /// Spawn a renderable. `placeholder` means no asset exists for `key`.
    Instantiate { handle: Renderable, key: String, position: Vec3, placeholder: bool },
    Place { handle: Renderable, position: Vec3, yaw: f32, scale: f32 },
    SetVisible { handle: Renderable, visible: bool },
    Release(Renderable),
    SpawnLight { light: LightHandle, position: Vec3, color: (f32, f32, f32), intensity: f32, range: f32 },
    LightIntensity { light: LightHandle, intensity: f32 },
    ReleaseLight(LightHandle),
    Flashlight(bool),
    Environment(Vec3),
    HatchProgress(f32),
}

/// Collaborator object handed to the stage by the stage plugin.
#[derive(Debug, Default)]
pub struct BevyHost {
    position: Vec3,
    facing: Vec3,
    requested_position: Option<Vec3>,
    magazine: Magazine,
    known_models: HashSet<String>,
    next_handle: u32,
    next_light: u32,
    commands: Vec<HostCommand>,
}

impl BevyHost {
    /// A host that can instantiate every model key in `known_models`.
    pub fn new(known_models: HashSet<String>, magazine: Magazine) -> Self {
        Self {
            facing: Vec3::NEG_Z,
            known_models,
            magazine,
            ..default()
        }
    }

    /// Refresh the player snapshot from the ECS.
    pub fn sync_player(&mut self, position: Vec3, facing: Vec3) {
        self.position = position;
        self.facing = facing;
    }

    /// Advance the weapon. Returns true when a reload finished this frame.
    pub fn tick_weapon(&mut self, delta: f32) -> bool {
        self.magazine.tick(delta)
    }

    /// A teleport requested by the stage since the last call.
    pub fn take_requested_position(&mut self) -> Option<Vec3> {
        self.requested_position.take()
    }

    /// Every command recorded since the last call, in call order.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    fn allocate(&mut self) -> Renderable {
        self.next_handle += 1;
        Renderable(self.next_handle)
    }

    fn push(&mut self, command: HostCommand) {
        self.commands.push(command);
    }
}

impl PlayerProvider for BevyHost {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn facing(&self) -> Vec3 {
        self.facing
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.requested_position = Some(position);
    }
}

impl StageUi for BevyHost {
    fn notify(&mut self, text: &str, duration_ms: u32) {
        self.push(HostCommand::Notify {
            text: text.to_string(),
            duration_ms,
        });
    }

    fn set_objective(&mut self, text: &str, detail: &str) {
        self.push(HostCommand::Objective {
            text: text.to_string(),
            detail: detail.to_string(),
        });
    }

    fn set_objective_marker(&mut self, marker: Option<Vec3>) {
        self.push(HostCommand::Marker(marker));
    }

    fn deliver_comms(&mut self, line: &CommsLine) {
        self.push(HostCommand::Comms(line.clone()));
    }

    fn set_health_delta(&mut self, amount: i32) {
        self.push(HostCommand::HealthDelta(amount));
    }

    fn set_combat_active(&mut self, active: bool) {
        self.push(HostCommand::CombatActive(active));
    }

    fn on_kill_feedback(&mut self) {
        self.push(HostCommand::Kill);
    }

    fn set_action_buttons(&mut self, groups: &[ActionGroup]) {
        self.push(HostCommand::Buttons(groups.to_vec()));
    }
}

impl AmmoService for BevyHost {
    fn try_consume_ammo(&mut self) -> bool {
        self.magazine.try_consume()
    }

    fn request_reload(&mut self) {
        if self.magazine.request_reload() {
            self.push(HostCommand::Reload);
        }
    }

    fn ammo_state(&self) -> AmmoState {
        self.magazine.state()
    }

    fn add_reserve(&mut self, amount: u32) {
        self.magazine.add_reserve(amount);
    }
}

impl FeedbackService for BevyHost {
    fn apply_hit_feedback(&mut self, target: Renderable, damage: i32, direction: Vec3) {
        self.push(HostCommand::HitFeedback {
            target,
            damage,
            direction,
        });
    }

    fn apply_player_hit_feedback(&mut self, damage: i32) {
        self.push(HostCommand::PlayerHit(damage));
    }
}

impl EffectsService for BevyHost {
    fn death_burst(&mut self, position: Vec3) {
        self.push(HostCommand::Effect {
            kind: EffectKind::DeathBurst,
            position,
            direction: None,
        });
    }

    fn splatter(&mut self, position: Vec3, direction: Vec3) {
        self.push(HostCommand::Effect {
            kind: EffectKind::Splatter,
            position,
            direction: Some(direction),
        });
    }

    fn muzzle_flash(&mut self, position: Vec3, direction: Vec3) {
        self.push(HostCommand::Effect {
            kind: EffectKind::MuzzleFlash,
            position,
            direction: Some(direction),
        });
    }
}

impl SceneService for BevyHost {
    fn instantiate(&mut self, key: &str, position: Vec3) -> Option<Renderable> {
        if !self.known_models.contains(key) {
            return None;
        }
        let handle = self.allocate();
        self.push(HostCommand::Instantiate {
            handle,
            key: key.to_string(),
            position,
            placeholder: false,
        });
        Some(handle)
    }

    fn build_placeholder(&mut self, key: &str, position: Vec3) -> Renderable {
        let handle = self.allocate();
        self.push(HostCommand::Instantiate {
            handle,
            key: key.to_string(),
            position,
            placeholder: true,
        });
        handle
    }

    fn place(&mut self, handle: Renderable, position: Vec3, yaw: f32, scale: f32) {
        self.push(HostCommand::Place {
            handle,
            position,
            yaw,
            scale,
        });
    }

    fn set_visible(&mut self, handle: Renderable, visible: bool) {
        self.push(HostCommand::SetVisible { handle, visible });
    }

    fn release(&mut self, handle: Renderable) {
        self.push(HostCommand::Release(handle));
    }

    fn spawn_light(&mut self, position: Vec3, color: (f32, f32, f32), intensity: f32, range: f32) -> LightHandle {
        self.next_light += 1;
        let light = LightHandle(self.next_light);
        self.push(HostCommand::SpawnLight {
            light,
            position,
            color,
            intensity,
            range,
        });
        light
    }

    fn set_light_intensity(&mut self, light: LightHandle, intensity: f32) {
        self.push(HostCommand::LightIntensity { light, intensity });
    }

    fn release_light(&mut self, light: LightHandle) {
        self.push(HostCommand::ReleaseLight(light));
    }

    fn set_flashlight(&mut self, on: bool) {
        self.push(HostCommand::Flashlight(on));
    }

    fn sync_environment(&mut self, player: Vec3) {
        self.push(HostCommand::Environment(player));
    }

    fn set_hatch_progress(&mut self, progress: f32) {
        self.push(HostCommand::HatchProgress(progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::instantiate_or_placeholder;

    fn host() -> BevyHost {
        let known = ["hostile_trooper".to_string()].into_iter().collect();
        BevyHost::new(known, Magazine::new(2, 0, 1.0))
    }

    #[test]
    fn unknown_models_fall_back_to_placeholders() {
        let mut host = host();
        let trooper = instantiate_or_placeholder(&mut host, "hostile_trooper", Vec3::ZERO);
        let crate_ = instantiate_or_placeholder(&mut host, "pickup_ammo", Vec3::X);
        assert_ne!(trooper, crate_);

        let commands = host.drain_commands();
        assert!(matches!(
            commands[0],
            HostCommand::Instantiate { placeholder: false, .. }
        ));
        assert!(matches!(
            commands[1],
            HostCommand::Instantiate { placeholder: true, .. }
        ));
        assert!(host.drain_commands().is_empty());
    }

    #[test]
    fn set_position_is_visible_immediately() {
        let mut host = host();
        host.set_position(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(host.position(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(host.take_requested_position(), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(host.take_requested_position(), None);
    }

    #[test]
    fn reload_is_recorded_only_when_it_starts() {
        let mut host = host();
        host.request_reload();
        assert!(host.drain_commands().is_empty());

        host.try_consume_ammo();
        host.add_reserve(5);
        host.request_reload();
        assert_eq!(host.drain_commands(), vec![HostCommand::Reload]);
        assert!(host.ammo_state().is_reloading);
    }
}
