//! Stage configuration loaded from `assets/data/stages/<stage_id>.ron`.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes. The defaults describe the outpost stage.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

use super::error::StageConfigError;
use super::narrative::{flags, CommsLine, NarrativeScript};
use super::zones::{ZoneDef, ZoneKind};
use crate::combat::CombatRules;
use crate::enemies::HostileStats;
use crate::world::{FlickerLightDef, PickupDef, PickupKind};

/// Objective text shown on the HUD.
#[derive(Debug, Clone, Deserialize)]
pub struct Objective {
    pub text: String,
    pub detail: String,
}

impl Objective {
    fn new(text: &str, detail: &str) -> Self {
        Self {
            text: text.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Objectives set by the scripted flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectiveTexts {
    pub reach_courtyard: Objective,
    pub command_center: Objective,
    pub search_terminal: Objective,
    pub reach_hatch: Objective,
    pub extract: Objective,
}

impl Default for ObjectiveTexts {
    fn default() -> Self {
        Self {
            reach_courtyard: Objective::new(
                "REACH THE OUTPOST",
                "Approach the outpost courtyard",
            ),
            command_center: Objective::new(
                "COMMAND CENTER",
                "Make your way to the command center",
            ),
            search_terminal: Objective::new(
                "SEARCH THE COMMAND CENTER",
                "Find a working terminal and pull the garrison logs",
            ),
            reach_hatch: Objective::new(
                "FIND THE HATCH",
                "The logs mention a maintenance hatch behind the vehicle bay",
            ),
            extract: Objective::new("EXTRACT", "Go through the hatch"),
        }
    }
}

/// Delays of the scripted delay chains, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptTiming {
    pub intro_delay: f32,
    /// Between the vehicle bay warning and the ambush
    pub ambush_delay: f32,
    /// The three terminal log lines, measured from access
    pub terminal_lines: [f32; 3],
    /// Terminal access to `Discovery`
    pub terminal_complete: f32,
    pub hatch_line: f32,
    /// Hatch opened to `Exit`
    pub hatch_exit: f32,
    pub hatch_reminder: f32,
}

impl Default for ScriptTiming {
    fn default() -> Self {
        Self {
            intro_delay: 1.0,
            ambush_delay: 3.0,
            terminal_lines: [2.5, 8.0, 14.0],
            terminal_complete: 20.0,
            hatch_line: 1.5,
            hatch_exit: 6.0,
            hatch_reminder: 8.0,
        }
    }
}

/// Rectangle on the horizontal plane the player is kept inside.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StageBounds {
    pub min: (f32, f32),
    pub max: (f32, f32),
}

impl Default for StageBounds {
    fn default() -> Self {
        Self {
            min: (-60.0, -40.0),
            max: (60.0, 75.0),
        }
    }
}

impl StageBounds {
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min.0, self.max.0),
            position.y,
            position.z.clamp(self.min.1, self.max.1),
        )
    }
}

/// Complete description of one stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub stage_id: String,
    pub player_start: (f32, f32, f32),
    pub bounds: StageBounds,
    pub zones: Vec<ZoneDef>,
    pub terminal: (f32, f32, f32),
    pub hatch: (f32, f32, f32),
    /// Reach of the terminal and hatch
    pub interact_radius: f32,
    pub hostiles: HostileStats,
    pub spawn_points: Vec<(f32, f32, f32)>,
    pub combat: CombatRules,
    pub pickups: Vec<PickupDef>,
    pub pickup_radius: f32,
    /// Share of an armor plate's amount that becomes health
    pub armor_factor: f32,
    /// Reach of the scanner when reporting supplies
    pub scan_radius: f32,
    pub lights: Vec<FlickerLightDef>,
    pub timing: ScriptTiming,
    pub objectives: ObjectiveTexts,
    pub script: NarrativeScript,
    /// Fixed seed for jitter and flicker; random when absent
    pub rng_seed: Option<u64>,
}

fn zone(kind: ZoneKind, x: f32, z: f32, radius: f32) -> ZoneDef {
    ZoneDef {
        kind,
        center: (x, z),
        radius,
    }
}

fn pickup(kind: PickupKind, amount: u32, x: f32, z: f32) -> PickupDef {
    PickupDef {
        kind,
        amount,
        position: (x, 0.3, z),
    }
}

fn light(x: f32, y: f32, z: f32, intensity: f32, flicker_amount: f32) -> FlickerLightDef {
    FlickerLightDef {
        position: (x, y, z),
        color: (1.0, 0.85, 0.6),
        intensity,
        range: 12.0,
        flicker_speed: 8.0,
        flicker_amount,
    }
}

fn default_script() -> NarrativeScript {
    let mut script = NarrativeScript::default();
    let command = |text: &str| CommsLine::new("Cmdr. Hale", "OVERWATCH", "portrait_hale", text);
    let pilot = |text: &str| CommsLine::new("Lt. Reyes", "DUSTOFF-2", "portrait_reyes", text);
    let logs = |text: &str| CommsLine::new("Garrison Log", "OUTPOST-7", "portrait_terminal", text);

    script.insert(
        flags::INTRO,
        command("Outpost Seven went dark eighteen hours ago. Get eyes on the courtyard."),
    );
    script.insert(
        flags::COURTYARD,
        command("No movement on thermals. Head for the command center, the logs should tell us what happened."),
    );
    script.insert(
        flags::BARRACKS,
        pilot("Bunks are still made. Whatever hit them, they never saw it coming."),
    );
    script.insert(
        flags::TERMINAL_ONE,
        logs("Day 14. Perimeter sensors tripping all night. Patrols report nothing."),
    );
    script.insert(
        flags::TERMINAL_TWO,
        logs("Day 15. Lost contact with the vehicle bay crew. Sealing the lower levels."),
    );
    script.insert(
        flags::TERMINAL_THREE,
        logs("Day 16. They are inside. Survivors fall back through the maintenance hatch."),
    );
    script.insert(
        flags::AMBUSH_WARNING,
        command("Contacts on your position! Multiple signatures closing fast!"),
    );
    script.insert(
        flags::AMBUSH_CLEARED,
        command("Area's quiet. Good work. Keep moving."),
    );
    script.insert(
        flags::HATCH_OPEN,
        pilot("Hatch is open. I'll meet you at the far side of the tunnel."),
    );
    script
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            stage_id: "outpost".to_string(),
            player_start: (0.0, 1.0, 65.0),
            bounds: StageBounds::default(),
            zones: vec![
                zone(ZoneKind::Courtyard, 0.0, 30.0, 12.0),
                zone(ZoneKind::Command, 0.0, 0.0, 6.0),
                zone(ZoneKind::VehicleBay, 30.0, 0.0, 8.0),
                zone(ZoneKind::Barracks, -25.0, 10.0, 7.0),
            ],
            terminal: (2.0, 1.0, -2.0),
            hatch: (36.0, 0.0, -16.0),
            interact_radius: 4.0,
            hostiles: HostileStats::default(),
            spawn_points: vec![
                (40.0, 0.0, 6.0),
                (40.0, 0.0, -6.0),
                (22.0, 0.0, 12.0),
                (22.0, 0.0, -12.0),
                (31.0, 0.0, 16.0),
            ],
            combat: CombatRules::default(),
            pickups: vec![
                pickup(PickupKind::Ammo, 30, -22.0, 12.0),
                pickup(PickupKind::Health, 25, -27.0, 8.0),
                pickup(PickupKind::Armor, 50, 6.0, -5.0),
                pickup(PickupKind::Ammo, 30, 27.0, 4.0),
            ],
            pickup_radius: 1.2,
            armor_factor: 0.5,
            scan_radius: 25.0,
            lights: vec![
                light(0.0, 4.0, 30.0, 80_000.0, 0.2),
                light(0.0, 3.0, 0.0, 40_000.0, 0.6),
                light(-25.0, 3.0, 10.0, 30_000.0, 0.8),
                light(30.0, 5.0, 0.0, 60_000.0, 0.4),
            ],
            timing: ScriptTiming::default(),
            objectives: ObjectiveTexts::default(),
            script: default_script(),
            rng_seed: None,
        }
    }
}

fn vec3(t: (f32, f32, f32)) -> Vec3 {
    Vec3::new(t.0, t.1, t.2)
}

impl StageConfig {
    /// Conventional location of a stage's config file.
    pub fn path_for(stage_id: &str) -> PathBuf {
        PathBuf::from(format!("assets/data/stages/{stage_id}.ron"))
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StageConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(StageConfigError::FileNotFound(shown));
        }

        let contents = fs::read_to_string(path).map_err(|e| StageConfigError::ReadError {
            path: shown.clone(),
            details: e.to_string(),
        })?;

        let config = Self::from_ron(&contents).map_err(|e| match e {
            StageConfigError::ParseError { details, .. } => StageConfigError::ParseError {
                path: shown.clone(),
                details,
            },
            other => other,
        })?;

        info!("Loaded stage config from {}", shown);
        Ok(config)
    }

    /// Parse and validate a config from RON text.
    pub fn from_ron(contents: &str) -> Result<Self, StageConfigError> {
        let config: Self = ron::from_str(contents).map_err(|e| StageConfigError::ParseError {
            path: "<inline>".to_string(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config, falling back to the defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}. Using default stage config.", e);
                Self::default()
            }
        }
    }

    /// Reject configs that would make the stage unplayable.
    pub fn validate(&self) -> Result<(), StageConfigError> {
        let invalid = |reason: String| Err(StageConfigError::Invalid(reason));

        if self.hostiles.count == 0 {
            return invalid("hostile count must be at least 1".to_string());
        }
        if self.spawn_points.is_empty() {
            return invalid("at least one spawn point is required".to_string());
        }
        if self.hostiles.health <= 0 {
            return invalid("hostile health must be positive".to_string());
        }
        for (name, value) in [
            ("interact_radius", self.interact_radius),
            ("pickup_radius", self.pickup_radius),
            ("hostiles.attack_range", self.hostiles.attack_range),
            ("hostiles.attack_period", self.hostiles.attack_period),
            ("combat.melee_radius", self.combat.melee_radius),
            ("combat.melee_cooldown", self.combat.melee_cooldown),
            ("combat.ranged_range", self.combat.ranged_range),
            ("combat.ranged_cooldown", self.combat.ranged_cooldown),
        ] {
            if value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if let Some(zone) = self.zones.iter().find(|zone| zone.radius <= 0.0) {
            return invalid(format!("zone {:?} has non-positive radius", zone.kind));
        }
        if let Some(flag) = flags::ALL.iter().find(|flag| !self.script.contains(flag)) {
            return invalid(format!("script is missing line '{flag}'"));
        }
        Ok(())
    }

    pub fn player_start(&self) -> Vec3 {
        vec3(self.player_start)
    }

    pub fn terminal_position(&self) -> Vec3 {
        vec3(self.terminal)
    }

    pub fn hatch_position(&self) -> Vec3 {
        vec3(self.hatch)
    }

    pub fn spawn_positions(&self) -> Vec<Vec3> {
        self.spawn_points.iter().copied().map(vec3).collect()
    }

    pub fn pickup_position(def: &PickupDef) -> Vec3 {
        vec3(def.position)
    }

    pub fn light_position(def: &FlickerLightDef) -> Vec3 {
        vec3(def.position)
    }
}
