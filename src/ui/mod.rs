//! UI module - HUD and overlay screens.

mod hud;
mod plugin;

pub use hud::{HealthBar, HudRoot, HudState};
pub use plugin::UiPlugin;
