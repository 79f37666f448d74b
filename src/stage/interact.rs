//! Proximity-gated interactive objects: the log terminal and the escape hatch.

use bevy::prelude::*;

use super::phase::{Phase, PhaseMachine};

/// A gated interaction currently within reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactable {
    Terminal,
    Hatch,
}

impl Interactable {
    pub fn prompt(self) -> &'static str {
        match self {
            Interactable::Terminal => "ACCESS TERMINAL",
            Interactable::Hatch => "OPEN HATCH",
        }
    }
}

/// Monotonic gating flags plus where the gated objects stand.
#[derive(Debug, Clone)]
pub struct Gates {
    terminal: Vec3,
    hatch: Vec3,
    radius: f32,
    logs_accessed: bool,
    hatch_open: bool,
}

impl Gates {
    pub fn new(terminal: Vec3, hatch: Vec3, radius: f32) -> Self {
        Self {
            terminal,
            hatch,
            radius,
            logs_accessed: false,
            hatch_open: false,
        }
    }

    pub fn logs_accessed(&self) -> bool {
        self.logs_accessed
    }

    pub fn hatch_open(&self) -> bool {
        self.hatch_open
    }

    pub fn terminal_position(&self) -> Vec3 {
        self.terminal
    }

    pub fn hatch_position(&self) -> Vec3 {
        self.hatch
    }

    fn within_reach(&self, player: Vec3, object: Vec3) -> bool {
        Vec2::new(player.x - object.x, player.z - object.z).length() <= self.radius
    }

    /// The interaction the player could trigger right now, if any.
    ///
    /// The terminal unlocks once `Investigation` has been reached and the
    /// hatch once `Discovery` has, so the transitions their cues request are
    /// always reachable.
    pub fn available(&self, player: Vec3, phases: &PhaseMachine) -> Option<Interactable> {
        if !self.logs_accessed
            && phases.has_visited(Phase::Investigation)
            && self.within_reach(player, self.terminal)
        {
            return Some(Interactable::Terminal);
        }
        if self.logs_accessed
            && !self.hatch_open
            && phases.has_visited(Phase::Discovery)
            && self.within_reach(player, self.hatch)
        {
            return Some(Interactable::Hatch);
        }
        None
    }

    /// Flip `logs_accessed`. Returns `false` if it was already set.
    pub fn access_logs(&mut self) -> bool {
        if self.logs_accessed {
            return false;
        }
        self.logs_accessed = true;
        true
    }

    /// Flip `hatch_open`. Requires the logs; returns `false` if refused or already open.
    pub fn open_hatch(&mut self) -> bool {
        if !self.logs_accessed || self.hatch_open {
            return false;
        }
        self.hatch_open = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gates() -> Gates {
        Gates::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0), 4.0)
    }

    /// A machine walked forward through `path`.
    fn reached(path: &[Phase]) -> PhaseMachine {
        let mut phases = PhaseMachine::new();
        for &phase in path {
            assert!(phases.enter(phase));
        }
        phases
    }

    fn investigating() -> PhaseMachine {
        reached(&[Phase::Courtyard, Phase::Investigation])
    }

    fn discovered() -> PhaseMachine {
        reached(&[Phase::Courtyard, Phase::Investigation, Phase::Discovery])
    }

    #[test]
    fn terminal_only_within_radius() {
        let gates = gates();
        let phases = investigating();
        assert_eq!(gates.available(Vec3::new(3.0, 1.7, 0.0), &phases), Some(Interactable::Terminal));
        assert_eq!(gates.available(Vec3::new(5.0, 0.0, 0.0), &phases), None);
    }

    #[test]
    fn terminal_locked_before_investigation() {
        let gates = gates();
        let at_terminal = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(gates.available(at_terminal, &PhaseMachine::new()), None);
        assert_eq!(gates.available(at_terminal, &reached(&[Phase::Courtyard])), None);
    }

    #[test]
    fn hatch_requires_logs() {
        let mut gates = gates();
        let phases = discovered();
        let at_hatch = Vec3::new(19.0, 0.0, 0.0);
        assert_eq!(gates.available(at_hatch, &phases), None);
        assert!(!gates.open_hatch());
        assert!(!gates.hatch_open());

        assert!(gates.access_logs());
        assert_eq!(gates.available(at_hatch, &phases), Some(Interactable::Hatch));
        assert!(gates.open_hatch());
        assert_eq!(gates.available(at_hatch, &phases), None);
    }

    #[test]
    fn hatch_locked_until_discovery() {
        let mut gates = gates();
        assert!(gates.access_logs());
        let at_hatch = Vec3::new(19.0, 0.0, 0.0);
        assert_eq!(gates.available(at_hatch, &investigating()), None);
        assert_eq!(gates.available(at_hatch, &discovered()), Some(Interactable::Hatch));
    }

    #[test]
    fn flags_are_one_shot() {
        let mut gates = gates();
        assert!(gates.access_logs());
        assert!(!gates.access_logs());
        assert!(gates.open_hatch());
        assert!(!gates.open_hatch());
        assert!(gates.logs_accessed() && gates.hatch_open());
    }
}
