//! The stage director: owns all stage state and advances it once per frame.
//!
//! The director is constructed with a [`StageHost`] that supplies every
//! outside capability (camera, HUD, weapon, effects, assets). It exposes four
//! entry points: [`Stage::tick`], [`Stage::handle_action`],
//! [`Stage::can_exit`] and [`Stage::teardown`].
//!
//! Scripted delay chains are [`Cue`]s on a [`Timeline`] owned by the stage.
//! They are pumped at the top of each tick, so phase and flag changes made by
//! a cue are visible to everything later in the same tick.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::actions::{ActionButton, ActionGroup, ActionId};
use super::config::{Objective, StageConfig};
use super::interact::{Gates, Interactable};
use super::narrative::{flags, NarrativeLedger};
use super::phase::{Phase, PhaseMachine};
use super::services::{instantiate_or_placeholder, StageHost};
use super::zones::{ZoneKind, ZoneSet};
use crate::combat::{hitscan, melee_sweep, CombatCooldowns, HitReport};
use crate::core::Timeline;
use crate::enemies::{jittered_spawn_positions, update_behavior, Wave};
use crate::world::{Collectible, FlickerLight, PickupEffect, PickupRegistry};

/// Player-facing notification texts.
pub mod notices {
    pub const NO_AMMO: &str = "NO AMMO - RELOADING";
    pub const NOTHING_NEARBY: &str = "NOTHING TO INTERACT WITH";
    pub const TERMINAL_ACCESS: &str = "ACCESSING GARRISON LOGS...";
    pub const HATCH_RELEASED: &str = "HATCH RELEASED";
    pub const EXIT_REMINDER: &str = "GO THROUGH THE HATCH TO LEAVE THE OUTPOST";
    pub const AREA_SECURE: &str = "AREA SECURE";
    pub const MAGAZINE_FULL: &str = "MAGAZINE FULL";
    pub const NO_RESERVE: &str = "NO RESERVE AMMO";
    pub const RELOADING: &str = "RELOADING";
}

const NOTICE_MS: u32 = 2500;
const SHORT_NOTICE_MS: u32 = 1500;
const HATCH_OPEN_SECS: f32 = 1.5;

/// A scripted beat waiting on the stage timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Deliver the radio line with this flag.
    Line(&'static str),
    /// The terminal logs finished playing.
    TerminalDecoded,
    /// The hatch is open far enough to leave through.
    HatchEgress,
    ExitReminder,
    /// The vehicle bay warning has played; spring the ambush.
    AmbushSprung,
}

/// Runtime controller for one mission stage.
pub struct Stage<H: StageHost> {
    host: H,
    config: StageConfig,
    phase: PhaseMachine,
    zones: ZoneSet,
    ledger: NarrativeLedger,
    timeline: Timeline<Cue>,
    gates: Gates,
    wave: Wave,
    cooldowns: CombatCooldowns,
    pickups: PickupRegistry,
    lights: Vec<FlickerLight>,
    rng: StdRng,
    ambush_scheduled: bool,
    deferred: Vec<Phase>,
    objective_marker: Option<Vec3>,
    hatch_progress: Option<f32>,
    flashlight_on: bool,
    buttons: Vec<ActionGroup>,
    elapsed: f32,
    torn_down: bool,
}

impl<H: StageHost> Stage<H> {
    /// Build the stage: place supplies and lights, set the opening objective
    /// and queue the intro briefing.
    pub fn new(config: StageConfig, mut host: H) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut pickups = PickupRegistry::new(config.pickup_radius, config.armor_factor);
        for def in &config.pickups {
            let position = StageConfig::pickup_position(def);
            let handle = instantiate_or_placeholder(&mut host, def.kind.model_key(), position);
            pickups.add(Collectible::new(def.kind, def.amount, position, handle));
        }

        let lights = config
            .lights
            .iter()
            .map(|def| {
                let handle = host.spawn_light(
                    StageConfig::light_position(def),
                    def.color,
                    def.intensity,
                    def.range,
                );
                FlickerLight::from_def(handle, def)
            })
            .collect();

        let gates = Gates::new(
            config.terminal_position(),
            config.hatch_position(),
            config.interact_radius,
        );
        let zones = ZoneSet::from_defs(&config.zones);

        let mut stage = Self {
            host,
            phase: PhaseMachine::new(),
            zones,
            ledger: NarrativeLedger::new(),
            timeline: Timeline::new(),
            gates,
            wave: Wave::new(),
            cooldowns: CombatCooldowns::default(),
            pickups,
            lights,
            rng,
            ambush_scheduled: false,
            deferred: Vec::new(),
            objective_marker: None,
            hatch_progress: None,
            flashlight_on: false,
            buttons: Vec::new(),
            elapsed: 0.0,
            torn_down: false,
            config,
        };

        let opening = stage.config.objectives.reach_courtyard.clone();
        stage.set_objective(&opening);
        let courtyard = stage.zone_center(ZoneKind::Courtyard);
        stage.set_marker(courtyard);
        stage
            .timeline
            .schedule(stage.config.timing.intro_delay, Cue::Line(flags::INTRO));

        info!(
            "Stage '{}' ready: {} zones, {} supplies, {} lights",
            stage.config.stage_id,
            stage.config.zones.len(),
            stage.pickups.items().len(),
            stage.lights.len()
        );
        stage
    }

    // === Accessors ===

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    /// Seconds since the last phase transition.
    pub fn phase_time(&self) -> f32 {
        self.phase.phase_time()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn ledger(&self) -> &NarrativeLedger {
        &self.ledger
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn pickups(&self) -> &PickupRegistry {
        &self.pickups
    }

    pub fn lights(&self) -> &[FlickerLight] {
        &self.lights
    }

    pub fn cooldowns(&self) -> &CombatCooldowns {
        &self.cooldowns
    }

    pub fn logs_accessed(&self) -> bool {
        self.gates.logs_accessed()
    }

    pub fn hatch_open(&self) -> bool {
        self.gates.hatch_open()
    }

    pub fn ambush_triggered(&self) -> bool {
        self.wave.has_spawned()
    }

    pub fn flashlight_on(&self) -> bool {
        self.flashlight_on
    }

    pub fn action_groups(&self) -> &[ActionGroup] {
        &self.buttons
    }

    pub fn objective_marker(&self) -> Option<Vec3> {
        self.objective_marker
    }

    /// Cues still waiting on the timeline.
    pub fn pending_cues(&self) -> usize {
        self.timeline.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Combat queries only land during the ambush while hostiles stand.
    pub fn combat_live(&self) -> bool {
        self.phase.is(Phase::Ambush) && self.wave.is_live()
    }

    // === Entry points ===

    /// Advance the whole stage by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        if self.torn_down {
            return;
        }
        let delta = delta.max(0.0);

        self.elapsed += delta;
        self.phase.advance(delta);
        for cue in self.timeline.advance(delta) {
            self.run_cue(cue);
        }

        let player = self.host.position();
        self.host.sync_environment(player);
        self.update_lights(delta);
        self.evaluate_zones(player);
        self.refresh_action_buttons(player);
        self.update_hostiles(player, delta);
        self.cooldowns.tick(delta);
        self.animate(delta);
        self.clamp_player();
    }

    /// Perform a player action. Actions whose preconditions do not hold are
    /// ignored or answered with a notification.
    pub fn handle_action(&mut self, action: ActionId) {
        if self.torn_down {
            return;
        }
        match action {
            ActionId::Flashlight => self.toggle_flashlight(),
            ActionId::Scanner => self.scan(),
            ActionId::Interact => self.interact(),
            ActionId::Melee => self.melee(),
            ActionId::Reload => self.reload(),
            ActionId::Fire => self.fire(),
        }
    }

    /// Whether the player may leave for `next_stage_id`.
    pub fn can_exit(&self, next_stage_id: &str) -> bool {
        let ready = !self.torn_down && self.phase.is(Phase::Exit) && self.gates.hatch_open();
        debug!("Exit to '{}' requested: {}", next_stage_id, ready);
        ready
    }

    /// Release everything the stage owns and invalidate pending cues.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let dropped = self.timeline.invalidate();
        for hostile in self.wave.drain() {
            self.host.release(hostile.handle);
        }
        for item in self.pickups.items() {
            self.host.release(item.handle);
        }
        for light in self.lights.drain(..) {
            self.host.release_light(light.handle);
        }
        if self.flashlight_on {
            self.flashlight_on = false;
            self.host.set_flashlight(false);
        }

        info!(
            "Stage '{}' torn down, {} pending cues invalidated",
            self.config.stage_id, dropped
        );
    }

    /// Deliver the radio line for `flag` unless it was already delivered.
    /// Returns whether the line went out.
    pub fn deliver_line(&mut self, flag: &str) -> bool {
        let Some(line) = self.config.script.get(flag) else {
            warn!("No narrative line for flag '{}'", flag);
            return false;
        };
        if !self.ledger.mark(flag) {
            return false;
        }
        self.host.deliver_comms(line);
        true
    }

    /// Request a phase transition. Illegal requests are ignored; legal ones
    /// made while the ambush is still being fought wait until it is cleared.
    pub fn transition_to(&mut self, phase: Phase) -> bool {
        if phase != Phase::Ambush && self.combat_live() {
            if self.phase.can_enter(phase) && !self.deferred.contains(&phase) {
                info!("Deferring {:?} until the ambush is cleared", phase);
                self.deferred.push(phase);
            }
            return false;
        }
        if !self.phase.enter(phase) {
            return false;
        }

        match phase {
            Phase::Approach => {}
            Phase::Courtyard => {
                self.deliver_line(flags::COURTYARD);
                let objective = self.config.objectives.command_center.clone();
                self.set_objective(&objective);
                let command = self.zone_center(ZoneKind::Command);
                self.set_marker(command);
            }
            Phase::Investigation => {
                let objective = self.config.objectives.search_terminal.clone();
                self.set_objective(&objective);
                self.set_marker(Some(self.gates.terminal_position()));
            }
            Phase::Ambush => self.spring_ambush(),
            Phase::Discovery => {}
            Phase::Exit => self.set_marker(None),
        }
        true
    }

    // === Tick steps ===

    fn run_cue(&mut self, cue: Cue) {
        debug!("Cue {:?} at {:.2}s", cue, self.elapsed);
        match cue {
            Cue::Line(flag) => {
                self.deliver_line(flag);
            }
            Cue::TerminalDecoded => {
                let objective = self.config.objectives.reach_hatch.clone();
                self.set_objective(&objective);
                self.set_marker(Some(self.gates.hatch_position()));
                self.transition_to(Phase::Discovery);
            }
            Cue::HatchEgress => {
                let objective = self.config.objectives.extract.clone();
                self.set_objective(&objective);
                self.transition_to(Phase::Exit);
            }
            Cue::ExitReminder => self.host.notify(notices::EXIT_REMINDER, 4000),
            Cue::AmbushSprung => {
                self.transition_to(Phase::Ambush);
            }
        }
    }

    fn update_lights(&mut self, delta: f32) {
        for light in self.lights.iter_mut() {
            let intensity = light.update(delta, &mut self.rng);
            self.host.set_light_intensity(light.handle, intensity);
        }
    }

    fn evaluate_zones(&mut self, player: Vec3) {
        let phase = self.phase.current();
        let logs_accessed = self.gates.logs_accessed();
        let ambush_pending = !self.ambush_scheduled && !self.wave.has_spawned();

        let entered = self.zones.evaluate(player, |kind| match kind {
            ZoneKind::Courtyard => phase == Phase::Approach,
            ZoneKind::Command => phase == Phase::Courtyard,
            ZoneKind::VehicleBay => {
                logs_accessed
                    && ambush_pending
                    && matches!(phase, Phase::Investigation | Phase::Discovery)
            }
            ZoneKind::Barracks => true,
        });

        for kind in entered {
            self.on_zone_entered(kind);
        }
    }

    fn on_zone_entered(&mut self, kind: ZoneKind) {
        match kind {
            ZoneKind::Courtyard => {
                self.transition_to(Phase::Courtyard);
            }
            ZoneKind::Command => {
                self.transition_to(Phase::Investigation);
            }
            ZoneKind::VehicleBay => {
                if self.ambush_scheduled || self.wave.has_spawned() || !self.gates.logs_accessed() {
                    return;
                }
                self.ambush_scheduled = true;
                self.deliver_line(flags::AMBUSH_WARNING);
                self.timeline
                    .schedule(self.config.timing.ambush_delay, Cue::AmbushSprung);
            }
            ZoneKind::Barracks => {
                self.deliver_line(flags::BARRACKS);
            }
        }
    }

    fn refresh_action_buttons(&mut self, player: Vec3) {
        let light_label = if self.flashlight_on { "LIGHT OFF" } else { "LIGHT ON" };
        let mut groups = vec![ActionGroup::new(
            "UTILITY",
            vec![
                ActionButton::new(ActionId::Flashlight, light_label),
                ActionButton::new(ActionId::Scanner, "SCAN"),
            ],
        )];

        if self.combat_live() {
            groups.push(ActionGroup::new(
                "COMBAT",
                vec![
                    ActionButton::new(ActionId::Fire, "FIRE"),
                    ActionButton::new(ActionId::Melee, "MELEE"),
                    ActionButton::new(ActionId::Reload, "RELOAD"),
                ],
            ));
        } else if let Some(interaction) = self.gates.available(player, &self.phase) {
            groups.push(ActionGroup::new(
                "INTERACT",
                vec![ActionButton::new(ActionId::Interact, interaction.prompt())],
            ));
        } else if let Some(item) = self.pickups.nearest(player).and_then(|i| self.pickups.get(i)) {
            let label = format!("PICK UP {}", item.kind.label());
            groups.push(ActionGroup::new(
                "INTERACT",
                vec![ActionButton::new(ActionId::Interact, &label)],
            ));
        }

        if groups != self.buttons {
            self.host.set_action_buttons(&groups);
            self.buttons = groups;
        }
    }

    fn update_hostiles(&mut self, player: Vec3, delta: f32) {
        if !self.wave.has_spawned() || self.wave.is_cleared() {
            return;
        }

        self.reap_dead();

        let strikes = update_behavior(
            self.wave.actors_mut(),
            player,
            delta,
            &self.config.hostiles,
        );
        for strike in strikes {
            debug!("Hostile {} hit the player for {}", strike.attacker.0, strike.damage);
            self.host.set_health_delta(-strike.damage);
            self.host.apply_player_hit_feedback(strike.damage);
        }
    }

    fn animate(&mut self, delta: f32) {
        let grow_time = self.config.hostiles.grow_time;
        for actor in self.wave.actors_mut() {
            actor.age += delta;
            let scale = actor.spawn_scale(grow_time);
            self.host.place(actor.handle, actor.position, actor.yaw, scale);
        }

        if let Some(progress) = self.hatch_progress {
            if progress < 1.0 {
                let progress = (progress + delta / HATCH_OPEN_SECS).min(1.0);
                self.hatch_progress = Some(progress);
                self.host.set_hatch_progress(progress);
            }
        }
    }

    fn clamp_player(&mut self) {
        let position = self.host.position();
        let clamped = self.config.bounds.clamp(position);
        if clamped != position {
            self.host.set_position(clamped);
        }
    }

    // === Encounter ===

    fn spring_ambush(&mut self) {
        if self.wave.has_spawned() {
            return;
        }

        let stats = &self.config.hostiles;
        let positions = jittered_spawn_positions(
            &self.config.spawn_positions(),
            stats.count,
            stats.spawn_jitter,
            &mut self.rng,
        );

        let host = &mut self.host;
        let key = stats.model_key.as_str();
        self.wave.spawn(&positions, stats.health, |position| {
            instantiate_or_placeholder(host, key, position)
        });

        info!("Ambush sprung with {} hostiles", self.wave.live_count());
        self.host.set_combat_active(true);
    }

    /// Remove the dead, release their renderables, and settle the wave.
    fn reap_dead(&mut self) {
        for hostile in self.wave.reap() {
            info!("Hostile {} down ({} kills)", hostile.id.0, self.wave.kills());
            self.host.death_burst(hostile.position);
            self.host.on_kill_feedback();
            self.host.release(hostile.handle);
        }

        if self.wave.settle() {
            self.on_encounter_cleared();
        }
    }

    fn on_encounter_cleared(&mut self) {
        info!("Ambush cleared after {} kills", self.wave.kills());
        self.host.set_combat_active(false);
        self.deliver_line(flags::AMBUSH_CLEARED);
        self.host.notify(notices::AREA_SECURE, NOTICE_MS);

        for phase in std::mem::take(&mut self.deferred) {
            self.transition_to(phase);
        }
    }

    fn report_hits(&mut self, hits: &[HitReport]) {
        for hit in hits {
            debug!(
                "Hostile {} took {} ({} left)",
                hit.actor.0, hit.damage, hit.remaining_health
            );
            self.host.apply_hit_feedback(hit.handle, hit.damage, hit.direction);
            self.host.splatter(hit.position + Vec3::Y, hit.direction);
        }
    }

    // === Actions ===

    fn melee(&mut self) {
        if !self.combat_live() {
            return;
        }
        if !self.cooldowns.melee.try_trigger(self.config.combat.melee_cooldown) {
            return;
        }

        let player = self.host.position();
        let facing = self.host.facing();
        let hits = melee_sweep(self.wave.actors_mut(), player, facing, &self.config.combat);
        self.report_hits(&hits);
        self.reap_dead();
    }

    fn fire(&mut self) {
        if !self.combat_live() || !self.cooldowns.ranged.is_ready() {
            return;
        }
        if !self.host.try_consume_ammo() {
            if !self.host.ammo_state().is_reloading {
                self.host.notify(notices::NO_AMMO, SHORT_NOTICE_MS);
                self.host.request_reload();
            }
            return;
        }
        self.cooldowns.ranged.start(self.config.combat.ranged_cooldown);

        let origin = self.host.position();
        let facing = self.host.facing();
        self.host.muzzle_flash(origin + facing * 0.5, facing);

        if let Some(hit) = hitscan(self.wave.actors_mut(), origin, facing, &self.config.combat) {
            self.report_hits(&[hit]);
            self.reap_dead();
        }
    }

    fn reload(&mut self) {
        let ammo = self.host.ammo_state();
        if ammo.is_reloading {
            return;
        }
        if ammo.current >= ammo.max {
            self.host.notify(notices::MAGAZINE_FULL, SHORT_NOTICE_MS);
        } else if ammo.reserve == 0 {
            self.host.notify(notices::NO_RESERVE, SHORT_NOTICE_MS);
        } else {
            self.host.notify(notices::RELOADING, SHORT_NOTICE_MS);
            self.host.request_reload();
        }
    }

    fn toggle_flashlight(&mut self) {
        self.flashlight_on = !self.flashlight_on;
        self.host.set_flashlight(self.flashlight_on);
    }

    fn scan(&mut self) {
        let player = self.host.position();
        let text = if self.combat_live() {
            format!("SCAN: {} HOSTILES", self.wave.live_count())
        } else {
            let radius = self.config.scan_radius;
            let nearby = self
                .pickups
                .remaining()
                .filter(|item| flat_distance(player, item.position) <= radius)
                .count();
            match self.objective_marker {
                Some(marker) => format!(
                    "SCAN: {} SUPPLIES NEARBY - OBJECTIVE {:.0}M",
                    nearby,
                    flat_distance(player, marker)
                ),
                None => format!("SCAN: {} SUPPLIES NEARBY", nearby),
            }
        };
        self.host.notify(&text, NOTICE_MS);
    }

    fn interact(&mut self) {
        let player = self.host.position();

        if let Some(interaction) = self.gates.available(player, &self.phase) {
            match interaction {
                Interactable::Terminal => self.access_terminal(),
                Interactable::Hatch => self.open_hatch(),
            }
            return;
        }

        if let Some(index) = self.pickups.nearest(player) {
            self.collect_pickup(index);
            return;
        }

        self.host.notify(notices::NOTHING_NEARBY, SHORT_NOTICE_MS);
    }

    fn access_terminal(&mut self) {
        if !self.gates.access_logs() {
            return;
        }
        info!("Terminal accessed at {:.2}s", self.elapsed);
        self.host.notify(notices::TERMINAL_ACCESS, NOTICE_MS);

        let timing = self.config.timing.clone();
        let lines = [flags::TERMINAL_ONE, flags::TERMINAL_TWO, flags::TERMINAL_THREE];
        for (delay, flag) in timing.terminal_lines.into_iter().zip(lines) {
            self.timeline.schedule(delay, Cue::Line(flag));
        }
        self.timeline
            .schedule(timing.terminal_complete, Cue::TerminalDecoded);
    }

    fn open_hatch(&mut self) {
        if !self.gates.open_hatch() {
            return;
        }
        info!("Hatch opened at {:.2}s", self.elapsed);
        self.hatch_progress = Some(0.0);
        self.host.notify(notices::HATCH_RELEASED, NOTICE_MS);

        let timing = &self.config.timing;
        self.timeline
            .schedule(timing.hatch_line, Cue::Line(flags::HATCH_OPEN));
        self.timeline.schedule(timing.hatch_exit, Cue::HatchEgress);
        self.timeline
            .schedule(timing.hatch_reminder, Cue::ExitReminder);
    }

    fn collect_pickup(&mut self, index: usize) {
        let Some(effect) = self.pickups.collect(index) else {
            return;
        };
        let Some((handle, kind, amount)) = self
            .pickups
            .get(index)
            .map(|item| (item.handle, item.kind, item.amount))
        else {
            return;
        };

        self.host.set_visible(handle, false);
        match effect {
            PickupEffect::Ammo(rounds) => self.host.add_reserve(rounds),
            PickupEffect::Heal(amount) => self.host.set_health_delta(amount),
        }
        info!("Collected {:?} x{}", kind, amount);
        self.host
            .notify(&format!("+{} {}", amount, kind.label()), SHORT_NOTICE_MS);
    }

    // === Helpers ===

    fn zone_center(&self, kind: ZoneKind) -> Option<Vec3> {
        self.zones
            .iter()
            .find(|zone| zone.kind == kind)
            .map(|zone| Vec3::new(zone.center.x, 0.0, zone.center.y))
    }

    fn set_objective(&mut self, objective: &Objective) {
        self.host.set_objective(&objective.text, &objective.detail);
    }

    fn set_marker(&mut self, marker: Option<Vec3>) {
        self.objective_marker = marker;
        self.host.set_objective_marker(marker);
    }
}

fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
