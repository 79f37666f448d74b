//! World module - ambient stage furniture: failing lights and supplies.

mod lights;
mod pickups;

pub use lights::{flicker_noise, FlickerLight, FlickerLightDef};
pub use pickups::{Collectible, PickupDef, PickupEffect, PickupKind, PickupRegistry};
