//! Player action identifiers and the button groups offered to the HUD.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Something the player can ask the stage to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Flashlight,
    Scanner,
    Interact,
    Melee,
    Reload,
    /// Primary fire.
    Fire,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionId::Flashlight => "flashlight",
            ActionId::Scanner => "scanner",
            ActionId::Interact => "interact",
            ActionId::Melee => "melee",
            ActionId::Reload => "reload",
            ActionId::Fire => "fire",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an action identifier the stage does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionId {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flashlight" => Ok(ActionId::Flashlight),
            "scanner" => Ok(ActionId::Scanner),
            "interact" => Ok(ActionId::Interact),
            "melee" => Ok(ActionId::Melee),
            "reload" => Ok(ActionId::Reload),
            "fire" => Ok(ActionId::Fire),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// One button on the HUD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub action: ActionId,
    pub label: String,
}

impl ActionButton {
    pub fn new(action: ActionId, label: &str) -> Self {
        Self {
            action,
            label: label.to_string(),
        }
    }
}

/// A titled row of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroup {
    pub title: String,
    pub buttons: Vec<ActionButton>,
}

impl ActionGroup {
    pub fn new(title: &str, buttons: Vec<ActionButton>) -> Self {
        Self {
            title: title.to_string(),
            buttons,
        }
    }

    pub fn offers(&self, action: ActionId) -> bool {
        self.buttons.iter().any(|button| button.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        for action in [
            ActionId::Flashlight,
            ActionId::Scanner,
            ActionId::Interact,
            ActionId::Melee,
            ActionId::Reload,
            ActionId::Fire,
        ] {
            assert_eq!(action.as_str().parse::<ActionId>(), Ok(action));
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert_eq!(
            "dance".parse::<ActionId>(),
            Err(UnknownAction("dance".to_string()))
        );
    }
}
