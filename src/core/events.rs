//! Global events used for cross-system communication.
//!
//! The stage director never talks to the ECS directly. The host bridge turns
//! its fire-and-forget UI and feedback calls into these events so HUD, audio
//! and camera systems can subscribe without knowing about the stage.

use bevy::prelude::*;

use crate::stage::ActionGroup;

/// Transient player-facing notification.
#[derive(Event, Debug, Clone)]
pub struct StageNotice {
    pub text: String,
    pub duration_ms: u32,
}

/// The active objective changed.
#[derive(Event, Debug, Clone)]
pub struct ObjectiveChanged {
    pub text: String,
    pub detail: String,
}

/// The objective marker moved, or was cleared when `None`.
#[derive(Event, Debug, Clone)]
pub struct ObjectiveMarkerMoved(pub Option<Vec3>);

/// A scripted radio line reached the player.
#[derive(Event, Debug, Clone)]
pub struct CommsDelivered {
    pub sender: String,
    pub callsign: String,
    pub portrait: String,
    pub text: String,
}

/// Change to the player's health. Negative values are damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthDelta {
    pub amount: i32,
}

/// Combat UI switched on or off.
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatToggled {
    pub active: bool,
}

/// A hostile was killed by the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct KillConfirmed;

/// The set of available action buttons changed.
#[derive(Event, Debug, Clone)]
pub struct ActionButtonsChanged {
    pub groups: Vec<ActionGroup>,
}

/// A player attack connected with a hostile.
#[derive(Event, Debug, Clone, Copy)]
pub struct HitFeedback {
    pub target: Entity,
    pub damage: i32,
    pub direction: Vec3,
}

/// A hostile attack connected with the player.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHit {
    pub damage: i32,
}

/// Kind of one-shot visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    DeathBurst,
    Splatter,
    MuzzleFlash,
}

/// Request to play a one-shot visual effect.
#[derive(Event, Debug, Clone, Copy)]
pub struct EffectBurst {
    pub kind: EffectKind,
    pub position: Vec3,
    pub direction: Option<Vec3>,
}
