//! Scenario tests for the stage director, driven through a recording host.

use bevy::prelude::*;

use super::*;
use crate::combat::CombatRules;
use crate::enemies::HostileStats;

const STEP: f32 = 0.25;

/// Host that records every request and answers queries from plain fields.
#[derive(Default)]
struct MockHost {
    position: Vec3,
    facing: Vec3,
    ammo: AmmoState,
    missing_assets: bool,
    next_handle: u32,
    next_light: u32,

    notices: Vec<String>,
    objectives: Vec<(String, String)>,
    markers: Vec<Option<Vec3>>,
    comms: Vec<CommsLine>,
    health_deltas: Vec<i32>,
    combat: Vec<bool>,
    kills: u32,
    buttons: Vec<Vec<ActionGroup>>,
    reload_requests: u32,
    reserve_added: u32,
    hit_feedback: Vec<(Renderable, i32)>,
    player_hits: Vec<i32>,
    bursts: u32,
    splatters: u32,
    muzzle_flashes: u32,
    placeholders: u32,
    hidden: Vec<Renderable>,
    released: Vec<Renderable>,
    lights: u32,
    released_lights: Vec<LightHandle>,
    flashlight: Option<bool>,
    hatch_progress: f32,
}

impl MockHost {
    fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 65.0),
            facing: Vec3::Z,
            ammo: AmmoState {
                current: 30,
                max: 30,
                reserve: 90,
                is_reloading: false,
            },
            ..default()
        }
    }

    fn handle(&mut self) -> Renderable {
        self.next_handle += 1;
        Renderable(self.next_handle)
    }

    fn notified(&self, text: &str) -> bool {
        self.notices.iter().any(|notice| notice == text)
    }
}

impl PlayerProvider for MockHost {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn facing(&self) -> Vec3 {
        self.facing
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

impl StageUi for MockHost {
    fn notify(&mut self, text: &str, _duration_ms: u32) {
        self.notices.push(text.to_string());
    }

    fn set_objective(&mut self, text: &str, detail: &str) {
        self.objectives.push((text.to_string(), detail.to_string()));
    }

    fn set_objective_marker(&mut self, marker: Option<Vec3>) {
        self.markers.push(marker);
    }

    fn deliver_comms(&mut self, line: &CommsLine) {
        self.comms.push(line.clone());
    }

    fn set_health_delta(&mut self, amount: i32) {
        self.health_deltas.push(amount);
    }

    fn set_combat_active(&mut self, active: bool) {
        self.combat.push(active);
    }

    fn on_kill_feedback(&mut self) {
        self.kills += 1;
    }

    fn set_action_buttons(&mut self, groups: &[ActionGroup]) {
        self.buttons.push(groups.to_vec());
    }
}

impl AmmoService for MockHost {
    fn try_consume_ammo(&mut self) -> bool {
        if self.ammo.current == 0 {
            return false;
        }
        self.ammo.current -= 1;
        true
    }

    fn request_reload(&mut self) {
        self.reload_requests += 1;
    }

    fn ammo_state(&self) -> AmmoState {
        self.ammo
    }

    fn add_reserve(&mut self, amount: u32) {
        self.reserve_added += amount;
        self.ammo.reserve += amount;
    }
}

impl FeedbackService for MockHost {
    fn apply_hit_feedback(&mut self, target: Renderable, damage: i32, _direction: Vec3) {
        self.hit_feedback.push((target, damage));
    }

    fn apply_player_hit_feedback(&mut self, damage: i32) {
        self.player_hits.push(damage);
    }
}

impl EffectsService for MockHost {
    fn death_burst(&mut self, _position: Vec3) {
        self.bursts += 1;
    }

    fn splatter(&mut self, _position: Vec3, _direction: Vec3) {
        self.splatters += 1;
    }

    fn muzzle_flash(&mut self, _position: Vec3, _direction: Vec3) {
        self.muzzle_flashes += 1;
    }
}

impl SceneService for MockHost {
    fn instantiate(&mut self, _key: &str, _position: Vec3) -> Option<Renderable> {
        if self.missing_assets {
            return None;
        }
        Some(self.handle())
    }

    fn build_placeholder(&mut self, _key: &str, _position: Vec3) -> Renderable {
        self.placeholders += 1;
        self.handle()
    }

    fn place(&mut self, _handle: Renderable, _position: Vec3, _yaw: f32, _scale: f32) {}

    fn set_visible(&mut self, handle: Renderable, visible: bool) {
        if !visible {
            self.hidden.push(handle);
        }
    }

    fn release(&mut self, handle: Renderable) {
        self.released.push(handle);
    }

    fn spawn_light(&mut self, _position: Vec3, _color: (f32, f32, f32), _intensity: f32, _range: f32) -> LightHandle {
        self.next_light += 1;
        self.lights += 1;
        LightHandle(self.next_light)
    }

    fn set_light_intensity(&mut self, _light: LightHandle, _intensity: f32) {}

    fn release_light(&mut self, light: LightHandle) {
        self.released_lights.push(light);
    }

    fn set_flashlight(&mut self, on: bool) {
        self.flashlight = Some(on);
    }

    fn sync_environment(&mut self, _player: Vec3) {}

    fn set_hatch_progress(&mut self, progress: f32) {
        self.hatch_progress = progress;
    }
}

// === Helpers ===

fn seeded_config() -> StageConfig {
    StageConfig {
        rng_seed: Some(7),
        ..default()
    }
}

/// Config with a small, unjittered wave placed around the vehicle bay.
fn wave_config(health: i32, spawn_points: Vec<(f32, f32, f32)>) -> StageConfig {
    StageConfig {
        hostiles: HostileStats {
            count: spawn_points.len(),
            health,
            spawn_jitter: 0.0,
            ..default()
        },
        spawn_points,
        combat: CombatRules::default(),
        ..seeded_config()
    }
}

fn stage_with(config: StageConfig) -> Stage<MockHost> {
    Stage::new(config, MockHost::new())
}

fn run(stage: &mut Stage<MockHost>, seconds: f32) {
    let steps = (seconds / STEP).round() as usize;
    for _ in 0..steps {
        stage.tick(STEP);
    }
}

fn move_to(stage: &mut Stage<MockHost>, x: f32, z: f32) {
    stage.host_mut().position = Vec3::new(x, 1.0, z);
    stage.tick(STEP);
}

fn line_count(stage: &Stage<MockHost>, flag: &str) -> usize {
    let Some(line) = stage.config().script.get(flag) else {
        return 0;
    };
    stage.host().comms.iter().filter(|c| *c == line).count()
}

/// Walk to the command center and pull the logs.
fn access_terminal(stage: &mut Stage<MockHost>) {
    move_to(stage, 0.0, 30.0);
    move_to(stage, 0.0, 0.0);
    move_to(stage, 2.0, -2.0);
    stage.handle_action(ActionId::Interact);
}

/// Pull the logs, walk into the vehicle bay and wait out the warning.
fn spring_ambush(stage: &mut Stage<MockHost>) {
    access_terminal(stage);
    move_to(stage, 30.0, 0.0);
    let delay = stage.config().timing.ambush_delay;
    run(stage, delay);
}

// === Construction ===

#[test]
fn new_stage_places_supplies_and_lights() {
    let stage = stage_with(seeded_config());

    assert_eq!(stage.phase(), Phase::Approach);
    assert_eq!(stage.pickups().items().len(), 4);
    assert_eq!(stage.host().lights, 4);
    assert_eq!(stage.host().placeholders, 0);
    assert_eq!(stage.host().objectives.len(), 1);
    assert_eq!(stage.objective_marker(), Some(Vec3::new(0.0, 0.0, 30.0)));
    assert_eq!(stage.pending_cues(), 1);
}

#[test]
fn missing_assets_fall_back_to_placeholders() {
    let mut host = MockHost::new();
    host.missing_assets = true;
    let stage = Stage::new(seeded_config(), host);

    assert_eq!(stage.host().placeholders, 4);
}

#[test]
fn intro_plays_after_its_delay() {
    let mut stage = stage_with(seeded_config());

    run(&mut stage, 0.75);
    assert_eq!(line_count(&stage, flags::INTRO), 0);

    run(&mut stage, 0.25);
    assert_eq!(line_count(&stage, flags::INTRO), 1);
}

// === Phases and zones ===

#[test]
fn approach_courtyard_investigation() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 0.0, 30.0);
    assert_eq!(stage.phase(), Phase::Courtyard);
    assert_eq!(line_count(&stage, flags::COURTYARD), 1);
    assert_eq!(stage.objective_marker(), Some(Vec3::ZERO));
    assert_eq!(stage.host().markers.last(), Some(&Some(Vec3::ZERO)));

    move_to(&mut stage, 0.0, 0.0);
    assert_eq!(stage.phase(), Phase::Investigation);
    assert_eq!(stage.objective_marker(), Some(stage.config().terminal_position()));
    let (text, _) = stage.host().objectives.last().cloned().unwrap_or_default();
    assert_eq!(text, stage.config().objectives.search_terminal.text);
}

#[test]
fn command_zone_waits_for_the_courtyard() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 0.0, 0.0);
    assert_eq!(stage.phase(), Phase::Approach);
    assert!(!stage.zones().is_triggered(ZoneKind::Command));

    move_to(&mut stage, 0.0, 30.0);
    move_to(&mut stage, 0.0, 0.0);
    assert_eq!(stage.phase(), Phase::Investigation);
}

#[test]
fn zones_fire_once() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, -25.0, 10.0);
    move_to(&mut stage, 0.0, 65.0);
    move_to(&mut stage, -25.0, 10.0);

    assert_eq!(line_count(&stage, flags::BARRACKS), 1);
    assert!(stage.zones().is_triggered(ZoneKind::Barracks));
}

#[test]
fn delivering_a_line_twice_is_a_no_op() {
    let mut stage = stage_with(seeded_config());

    assert!(stage.deliver_line(flags::BARRACKS));
    assert!(!stage.deliver_line(flags::BARRACKS));
    assert!(!stage.deliver_line("no_such_flag"));
    assert_eq!(stage.host().comms.len(), 1);
}

#[test]
fn illegal_transitions_are_ignored() {
    let mut stage = stage_with(seeded_config());

    assert!(!stage.transition_to(Phase::Exit));
    assert!(!stage.transition_to(Phase::Approach));
    assert_eq!(stage.phase(), Phase::Approach);
}

#[test]
fn player_is_kept_inside_the_bounds() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 100.0, 100.0);

    assert_eq!(stage.host().position, Vec3::new(60.0, 1.0, 75.0));
}

// === Terminal and hatch ===

#[test]
fn terminal_logs_play_on_schedule() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);

    assert!(stage.logs_accessed());
    assert!(stage.host().notified(notices::TERMINAL_ACCESS));

    run(&mut stage, 2.25);
    assert_eq!(line_count(&stage, flags::TERMINAL_ONE), 0);
    run(&mut stage, 0.25);
    assert_eq!(line_count(&stage, flags::TERMINAL_ONE), 1);

    run(&mut stage, 5.5);
    assert_eq!(line_count(&stage, flags::TERMINAL_TWO), 1);
    run(&mut stage, 6.0);
    assert_eq!(line_count(&stage, flags::TERMINAL_THREE), 1);
    assert_eq!(stage.phase(), Phase::Investigation);

    run(&mut stage, 6.0);
    assert_eq!(stage.phase(), Phase::Discovery);
    assert_eq!(stage.objective_marker(), Some(stage.config().hatch_position()));
}

#[test]
fn terminal_can_only_be_accessed_once() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);
    let pending = stage.pending_cues();

    stage.handle_action(ActionId::Interact);

    assert_eq!(stage.pending_cues(), pending);
}

#[test]
fn hatch_needs_the_logs() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 36.0, -16.0);
    stage.handle_action(ActionId::Interact);

    assert!(!stage.hatch_open());
    assert!(stage.host().notified(notices::NOTHING_NEARBY));
}

#[test]
fn exit_requires_phase_and_open_hatch() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);
    let decode = stage.config().timing.terminal_complete;
    run(&mut stage, decode);
    assert_eq!(stage.phase(), Phase::Discovery);
    assert!(!stage.can_exit("depot"));

    move_to(&mut stage, 36.0, -16.0);
    stage.handle_action(ActionId::Interact);
    assert!(stage.hatch_open());
    assert!(!stage.can_exit("depot"));

    run(&mut stage, 1.5);
    assert_eq!(line_count(&stage, flags::HATCH_OPEN), 1);

    run(&mut stage, 4.5);
    assert_eq!(stage.host().hatch_progress, 1.0);
    assert_eq!(stage.phase(), Phase::Exit);
    assert!(stage.can_exit("depot"));
    assert_eq!(stage.objective_marker(), None);

    run(&mut stage, 2.0);
    assert!(stage.host().notified(notices::EXIT_REMINDER));
}

// === Ambush ===

#[test]
fn vehicle_bay_waits_for_the_logs() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 30.0, 0.0);
    run(&mut stage, 5.0);
    assert!(!stage.ambush_triggered());
    assert_eq!(line_count(&stage, flags::AMBUSH_WARNING), 0);
    assert!(!stage.zones().is_triggered(ZoneKind::VehicleBay));
}

#[test]
fn ambush_springs_once_after_the_warning() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);

    move_to(&mut stage, 30.0, 0.0);
    assert_eq!(line_count(&stage, flags::AMBUSH_WARNING), 1);
    assert!(!stage.ambush_triggered());

    run(&mut stage, 2.75);
    assert!(!stage.ambush_triggered());

    run(&mut stage, 0.25);
    assert_eq!(stage.phase(), Phase::Ambush);
    assert_eq!(stage.wave().live_count(), 5);
    assert_eq!(stage.host().combat, vec![true]);

    let handles = stage.host().next_handle;
    move_to(&mut stage, 30.0, 30.0);
    move_to(&mut stage, 30.0, 0.0);
    assert_eq!(stage.host().next_handle, handles);
    assert_eq!(line_count(&stage, flags::AMBUSH_WARNING), 1);
}

#[test]
fn hostiles_close_in_and_strike() {
    let mut stage = stage_with(wave_config(60, vec![(30.0, 0.0, 6.0)]));
    spring_ambush(&mut stage);

    run(&mut stage, 1.0);

    let strikes = &stage.host().player_hits;
    assert!(!strikes.is_empty());
    assert!(stage.host().health_deltas.iter().all(|d| *d == -8));
}

#[test]
fn melee_hits_everything_in_the_sweep() {
    let points = vec![(29.0, 0.0, 3.0), (31.0, 0.0, 3.0), (30.0, 0.0, 4.0)];
    let mut stage = stage_with(wave_config(60, points));
    spring_ambush(&mut stage);
    assert_eq!(stage.wave().live_count(), 3);

    stage.handle_action(ActionId::Melee);
    assert_eq!(stage.host().hit_feedback.len(), 3);
    assert_eq!(stage.host().splatters, 3);
    assert!(stage.wave().actors().iter().all(|actor| actor.health() == 10));

    stage.handle_action(ActionId::Melee);
    assert_eq!(stage.host().hit_feedback.len(), 3);

    // Hostiles hold position once in attack range, still inside the sweep.
    run(&mut stage, 1.0);
    stage.handle_action(ActionId::Melee);
    assert_eq!(stage.host().hit_feedback.len(), 6);
    assert_eq!(stage.wave().live_count(), 0);
    assert_eq!(stage.wave().kills(), 3);
    assert_eq!(stage.host().kills, 3);
    assert!(stage.wave().is_cleared());
}

#[test]
fn ranged_fire_hits_the_closest_target_only() {
    let mut stage = stage_with(wave_config(60, vec![(30.0, 0.0, 5.0), (30.0, 0.0, 10.0)]));
    spring_ambush(&mut stage);

    stage.handle_action(ActionId::Fire);

    let near = stage.wave().actors()[0].handle;
    assert_eq!(stage.host().hit_feedback, vec![(near, 25)]);
    assert_eq!(stage.wave().actors()[0].health(), 35);
    assert_eq!(stage.wave().actors()[1].health(), 60);
    assert_eq!(stage.host().muzzle_flashes, 1);
    assert_eq!(stage.host().ammo.current, 29);

    stage.handle_action(ActionId::Fire);
    assert_eq!(stage.host().muzzle_flashes, 1);
}

#[test]
fn empty_magazine_requests_a_reload() {
    let mut stage = stage_with(wave_config(60, vec![(30.0, 0.0, 5.0)]));
    spring_ambush(&mut stage);
    stage.host_mut().ammo.current = 0;

    stage.handle_action(ActionId::Fire);

    assert!(stage.host().notified(notices::NO_AMMO));
    assert_eq!(stage.host().reload_requests, 1);
    assert_eq!(stage.host().muzzle_flashes, 0);
}

#[test]
fn combat_actions_need_a_live_ambush() {
    let mut stage = stage_with(seeded_config());

    stage.handle_action(ActionId::Fire);
    stage.handle_action(ActionId::Melee);

    assert_eq!(stage.host().ammo.current, 30);
    assert_eq!(stage.host().muzzle_flashes, 0);
    assert!(stage.host().hit_feedback.is_empty());
}

#[test]
fn clearing_the_ambush_applies_deferred_phases() {
    let mut stage = stage_with(wave_config(50, vec![(30.0, 0.0, 3.0)]));
    spring_ambush(&mut stage);
    assert_eq!(stage.phase(), Phase::Ambush);

    // The logs finish decoding while the hostile is still standing.
    run(&mut stage, 17.0);
    assert_eq!(stage.phase(), Phase::Ambush);
    assert!(stage.combat_live());

    stage.handle_action(ActionId::Melee);

    assert!(stage.wave().is_cleared());
    assert_eq!(stage.host().kills, 1);
    assert_eq!(stage.host().bursts, 1);
    assert_eq!(stage.host().combat, vec![true, false]);
    assert_eq!(line_count(&stage, flags::AMBUSH_CLEARED), 1);
    assert!(stage.host().notified(notices::AREA_SECURE));
    assert_eq!(stage.phase(), Phase::Discovery);
}

// === Supplies and utility ===

#[test]
fn supplies_are_collected_once() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, -27.0, 8.0);
    stage.handle_action(ActionId::Interact);
    stage.handle_action(ActionId::Interact);

    assert_eq!(stage.host().health_deltas, vec![25]);
    assert_eq!(stage.host().hidden.len(), 1);
    assert!(stage.host().notified("+25 MEDKIT"));
    assert!(stage.host().notified(notices::NOTHING_NEARBY));
}

#[test]
fn ammo_supplies_go_to_the_reserve() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, -22.0, 12.0);
    stage.handle_action(ActionId::Interact);

    assert_eq!(stage.host().reserve_added, 30);
    assert!(stage.host().health_deltas.is_empty());
}

#[test]
fn armor_heals_by_its_factor() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 6.0, -5.0);
    stage.handle_action(ActionId::Interact);

    assert_eq!(stage.host().health_deltas, vec![25]);
}

#[test]
fn scanner_reports_supplies_and_objective_distance() {
    let mut stage = stage_with(seeded_config());

    stage.handle_action(ActionId::Scanner);

    assert!(stage.host().notified("SCAN: 0 SUPPLIES NEARBY - OBJECTIVE 35M"));
}

#[test]
fn reload_answers_full_magazine() {
    let mut stage = stage_with(seeded_config());

    stage.handle_action(ActionId::Reload);
    assert!(stage.host().notified(notices::MAGAZINE_FULL));
    assert_eq!(stage.host().reload_requests, 0);

    stage.host_mut().ammo.current = 10;
    stage.handle_action(ActionId::Reload);
    assert_eq!(stage.host().reload_requests, 1);
}

#[test]
fn action_buttons_follow_context() {
    let mut stage = stage_with(seeded_config());
    stage.tick(STEP);
    assert_eq!(stage.action_groups().len(), 1);

    move_to(&mut stage, 0.0, 30.0);
    move_to(&mut stage, 0.0, 0.0);
    move_to(&mut stage, 2.0, -2.0);

    assert!(stage.host().buttons.len() >= 2);
    let interact = &stage.action_groups()[1];
    assert_eq!(interact.buttons[0].action, ActionId::Interact);
    assert_eq!(interact.buttons[0].label, Interactable::Terminal.prompt());
}

#[test]
fn flashlight_toggles() {
    let mut stage = stage_with(seeded_config());

    stage.handle_action(ActionId::Flashlight);
    assert!(stage.flashlight_on());
    assert_eq!(stage.host().flashlight, Some(true));

    stage.handle_action(ActionId::Flashlight);
    assert_eq!(stage.host().flashlight, Some(false));
}

// === Teardown ===

#[test]
fn teardown_drops_pending_cues_and_releases_everything() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);
    stage.handle_action(ActionId::Flashlight);
    let delivered = stage.host().comms.len();

    stage.teardown();
    run(&mut stage, 30.0);

    assert!(stage.is_torn_down());
    assert_eq!(stage.pending_cues(), 0);
    assert_eq!(stage.host().comms.len(), delivered);
    assert_eq!(stage.phase(), Phase::Investigation);
    assert_eq!(stage.host().released.len(), 4);
    assert_eq!(stage.host().released_lights.len(), 4);
    assert_eq!(stage.host().flashlight, Some(false));
    assert!(!stage.can_exit("depot"));
}

// === Out-of-order progress ===

/// Within reach of the terminal but outside the command zone.
const TERMINAL_SIDE: (f32, f32) = (4.5, -4.5);

#[test]
fn terminal_stays_locked_until_investigation() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, TERMINAL_SIDE.0, TERMINAL_SIDE.1);
    assert_eq!(stage.phase(), Phase::Approach);
    stage.handle_action(ActionId::Interact);
    assert!(!stage.logs_accessed());
    assert!(stage.host().notified(notices::NOTHING_NEARBY));

    move_to(&mut stage, 0.0, 30.0);
    move_to(&mut stage, TERMINAL_SIDE.0, TERMINAL_SIDE.1);
    assert_eq!(stage.phase(), Phase::Courtyard);
    stage.handle_action(ActionId::Interact);
    assert!(!stage.logs_accessed());

    run(&mut stage, 21.0);
    assert_eq!(stage.phase(), Phase::Courtyard);
    assert_eq!(line_count(&stage, flags::TERMINAL_ONE), 0);
}

#[test]
fn stage_completes_after_an_early_terminal_attempt() {
    let mut stage = stage_with(seeded_config());
    move_to(&mut stage, TERMINAL_SIDE.0, TERMINAL_SIDE.1);
    stage.handle_action(ActionId::Interact);
    run(&mut stage, 21.0);

    access_terminal(&mut stage);
    assert!(stage.logs_accessed());
    let decode = stage.config().timing.terminal_complete;
    run(&mut stage, decode);
    assert_eq!(stage.phase(), Phase::Discovery);

    move_to(&mut stage, 36.0, -16.0);
    stage.handle_action(ActionId::Interact);
    run(&mut stage, 6.0);

    assert_eq!(stage.phase(), Phase::Exit);
    assert!(stage.can_exit("depot"));
}

#[test]
fn early_vehicle_bay_visit_keeps_the_ambush() {
    let mut stage = stage_with(seeded_config());

    move_to(&mut stage, 0.0, 30.0);
    move_to(&mut stage, 30.0, 0.0);
    assert_eq!(stage.phase(), Phase::Courtyard);
    run(&mut stage, 5.0);
    assert_eq!(line_count(&stage, flags::AMBUSH_WARNING), 0);
    assert!(!stage.zones().is_triggered(ZoneKind::VehicleBay));

    move_to(&mut stage, 0.0, 0.0);
    move_to(&mut stage, 2.0, -2.0);
    stage.handle_action(ActionId::Interact);
    move_to(&mut stage, 30.0, 0.0);
    let delay = stage.config().timing.ambush_delay;
    run(&mut stage, delay);

    assert_eq!(stage.phase(), Phase::Ambush);
    assert_eq!(stage.wave().live_count(), 5);
}

#[test]
fn hatch_stays_shut_until_the_logs_are_decoded() {
    let mut stage = stage_with(seeded_config());
    access_terminal(&mut stage);

    move_to(&mut stage, 36.0, -16.0);
    stage.handle_action(ActionId::Interact);
    assert_eq!(stage.phase(), Phase::Investigation);
    assert!(!stage.hatch_open());
    assert!(stage.host().notified(notices::NOTHING_NEARBY));

    let decode = stage.config().timing.terminal_complete;
    run(&mut stage, decode);
    assert_eq!(stage.phase(), Phase::Discovery);

    stage.handle_action(ActionId::Interact);
    assert!(stage.hatch_open());
    run(&mut stage, 6.0);
    assert!(stage.can_exit("depot"));
}

#[test]
fn empty_magazine_stays_quiet_while_reloading() {
    let mut stage = stage_with(wave_config(60, vec![(30.0, 0.0, 5.0)]));
    spring_ambush(&mut stage);
    stage.host_mut().ammo.current = 0;
    stage.host_mut().ammo.is_reloading = true;

    stage.handle_action(ActionId::Fire);
    stage.handle_action(ActionId::Fire);

    assert!(!stage.host().notified(notices::NO_AMMO));
    assert_eq!(stage.host().reload_requests, 0);
    assert_eq!(stage.host().muzzle_flashes, 0);
}
