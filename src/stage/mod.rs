//! Stage module - the mission director and everything it orchestrates:
//! phases, trigger zones, gated interactions, the radio script and the
//! services the stage borrows from its host.

mod actions;
mod config;
mod director;
mod error;
mod interact;
mod narrative;
mod phase;
mod services;
mod zones;

pub use actions::{ActionButton, ActionGroup, ActionId, UnknownAction};
pub use config::{Objective, ObjectiveTexts, ScriptTiming, StageBounds, StageConfig};
pub use director::{notices, Cue, Stage};
pub use error::StageConfigError;
pub use interact::{Gates, Interactable};
pub use narrative::{flags, CommsLine, NarrativeLedger, NarrativeScript};
pub use phase::{Phase, PhaseMachine};
pub use services::*;
pub use zones::{TriggerZone, ZoneDef, ZoneKind, ZoneSet};

#[cfg(test)]
mod tests;
