//! Circular one-shot trigger zones evaluated against the player every tick.

use bevy::prelude::*;
use serde::Deserialize;

/// Which beat of the stage a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ZoneKind {
    Courtyard,
    Command,
    VehicleBay,
    Barracks,
}

/// Zone placement as written in the stage config.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneDef {
    pub kind: ZoneKind,
    /// Centre on the horizontal (x, z) plane.
    pub center: (f32, f32),
    pub radius: f32,
}

/// A circular region that fires once on first entry.
#[derive(Debug, Clone)]
pub struct TriggerZone {
    pub kind: ZoneKind,
    pub center: Vec2,
    pub radius: f32,
    triggered: bool,
}

impl TriggerZone {
    pub fn new(kind: ZoneKind, center: Vec2, radius: f32) -> Self {
        Self {
            kind,
            center,
            radius,
            triggered: false,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Strictly inside on the horizontal plane; height is ignored.
    pub fn contains(&self, position: Vec3) -> bool {
        Vec2::new(position.x, position.z).distance(self.center) < self.radius
    }
}

impl From<&ZoneDef> for TriggerZone {
    fn from(def: &ZoneDef) -> Self {
        Self::new(def.kind, Vec2::new(def.center.0, def.center.1), def.radius)
    }
}

/// All zones of a stage, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<TriggerZone>,
}

impl ZoneSet {
    pub fn new(zones: Vec<TriggerZone>) -> Self {
        Self { zones }
    }

    pub fn from_defs(defs: &[ZoneDef]) -> Self {
        Self::new(defs.iter().map(TriggerZone::from).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerZone> {
        self.zones.iter()
    }

    pub fn is_triggered(&self, kind: ZoneKind) -> bool {
        self.zones.iter().any(|zone| zone.kind == kind && zone.triggered)
    }

    /// Trigger every untriggered, armed zone the player stands in.
    ///
    /// Returns the kinds that fired this call, in registration order. A zone
    /// that is not armed is skipped without being consumed, so it can still
    /// fire once its precondition holds.
    pub fn evaluate(&mut self, player: Vec3, is_armed: impl Fn(ZoneKind) -> bool) -> Vec<ZoneKind> {
        let mut entered = Vec::new();
        for zone in self.zones.iter_mut() {
            if zone.triggered || !is_armed(zone.kind) {
                continue;
            }
            if zone.contains(player) {
                zone.triggered = true;
                info!("Zone {:?} entered", zone.kind);
                entered.push(zone.kind);
            }
        }
        entered
    }
}
