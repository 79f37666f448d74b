//! Scripted radio lines and the ledger that keeps each one at-most-once.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// One radio transmission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommsLine {
    pub sender: String,
    pub callsign: String,
    pub portrait: String,
    pub text: String,
}

impl CommsLine {
    pub fn new(sender: &str, callsign: &str, portrait: &str, text: &str) -> Self {
        Self {
            sender: sender.to_string(),
            callsign: callsign.to_string(),
            portrait: portrait.to_string(),
            text: text.to_string(),
        }
    }
}

/// Flags of the lines the stage's own flow delivers.
pub mod flags {
    pub const INTRO: &str = "intro";
    pub const COURTYARD: &str = "courtyard_arrival";
    pub const BARRACKS: &str = "barracks_flavor";
    pub const TERMINAL_ONE: &str = "terminal_log_1";
    pub const TERMINAL_TWO: &str = "terminal_log_2";
    pub const TERMINAL_THREE: &str = "terminal_log_3";
    pub const AMBUSH_WARNING: &str = "ambush_warning";
    pub const AMBUSH_CLEARED: &str = "ambush_cleared";
    pub const HATCH_OPEN: &str = "hatch_open";

    /// Every flag the stage flow may deliver.
    pub const ALL: [&str; 9] = [
        INTRO,
        COURTYARD,
        BARRACKS,
        TERMINAL_ONE,
        TERMINAL_TWO,
        TERMINAL_THREE,
        AMBUSH_WARNING,
        AMBUSH_CLEARED,
        HATCH_OPEN,
    ];
}

/// Flag → line lookup loaded with the stage config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct NarrativeScript {
    lines: HashMap<String, CommsLine>,
}

impl NarrativeScript {
    pub fn get(&self, flag: &str) -> Option<&CommsLine> {
        self.lines.get(flag)
    }

    pub fn insert(&mut self, flag: &str, line: CommsLine) {
        self.lines.insert(flag.to_string(), line);
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.lines.contains_key(flag)
    }
}

/// Set of flags already delivered. Flags are never removed.
#[derive(Debug, Clone, Default)]
pub struct NarrativeLedger {
    delivered: HashSet<String>,
}

impl NarrativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-then-insert. Returns `true` only the first time `flag` is seen.
    pub fn mark(&mut self, flag: &str) -> bool {
        if self.delivered.contains(flag) {
            return false;
        }
        self.delivered.insert(flag.to_string())
    }

    pub fn was_delivered(&self, flag: &str) -> bool {
        self.delivered.contains(flag)
    }

    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_is_at_most_once() {
        let mut ledger = NarrativeLedger::new();
        assert!(ledger.mark("intro"));
        assert!(!ledger.mark("intro"));
        assert!(ledger.was_delivered("intro"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn flags_are_independent() {
        let mut ledger = NarrativeLedger::new();
        assert!(ledger.mark("a"));
        assert!(ledger.mark("b"));
        assert!(!ledger.was_delivered("c"));
    }

    #[test]
    fn script_parses_from_ron_map() {
        let script: NarrativeScript = ron::from_str(
            r#"{
                "intro": (sender: "HQ", callsign: "OVERWATCH", portrait: "hq", text: "Go."),
            }"#,
        )
        .expect("script should parse");
        assert_eq!(script.get("intro").map(|l| l.text.as_str()), Some("Go."));
        assert!(!script.contains("missing"));
    }
}
