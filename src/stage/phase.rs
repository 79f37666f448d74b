//! Stage progression phases and the forward-only machine that holds them.

use bevy::prelude::*;
use serde::Deserialize;

/// A named step of the stage's scripted progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Phase {
    Approach,
    Courtyard,
    Investigation,
    Ambush,
    Discovery,
    Exit,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Approach,
        Phase::Courtyard,
        Phase::Investigation,
        Phase::Ambush,
        Phase::Discovery,
        Phase::Exit,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Phases that may directly follow this one.
    ///
    /// The ambush can land on either side of the terminal logs finishing, so
    /// `Ambush` and `Discovery` reach each other; the visited set still keeps
    /// either from being entered twice.
    pub fn successors(self) -> &'static [Phase] {
        match self {
            Phase::Approach => &[Phase::Courtyard],
            Phase::Courtyard => &[Phase::Investigation],
            Phase::Investigation => &[Phase::Ambush, Phase::Discovery],
            Phase::Ambush => &[Phase::Discovery, Phase::Exit],
            Phase::Discovery => &[Phase::Ambush, Phase::Exit],
            Phase::Exit => &[],
        }
    }
}

/// Current phase plus the time spent in it.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    current: Phase,
    phase_time: f32,
    visited: [bool; 6],
}

impl Default for PhaseMachine {
    fn default() -> Self {
        let mut visited = [false; 6];
        visited[Phase::Approach.index()] = true;
        Self {
            current: Phase::Approach,
            phase_time: 0.0,
            visited,
        }
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn is(&self, phase: Phase) -> bool {
        self.current == phase
    }

    /// Seconds since the last transition.
    pub fn phase_time(&self) -> f32 {
        self.phase_time
    }

    pub fn has_visited(&self, phase: Phase) -> bool {
        self.visited[phase.index()]
    }

    pub fn advance(&mut self, delta: f32) {
        self.phase_time += delta;
    }

    /// Whether `to` is a legal next phase.
    pub fn can_enter(&self, to: Phase) -> bool {
        !self.has_visited(to) && self.current.successors().contains(&to)
    }

    /// Move to `to` if legal. Illegal requests are ignored and return `false`.
    pub fn enter(&mut self, to: Phase) -> bool {
        if !self.can_enter(to) {
            debug!("Ignoring phase request {:?} -> {:?}", self.current, to);
            return false;
        }
        info!("Phase {:?} -> {:?}", self.current, to);
        self.current = to;
        self.phase_time = 0.0;
        self.visited[to.index()] = true;
        true
    }
}
