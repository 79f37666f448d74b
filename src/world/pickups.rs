//! Collectible supplies: ammo, medkits, and armor plates.

use bevy::prelude::*;
use serde::Deserialize;

use crate::stage::Renderable;

/// What a collectible gives the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PickupKind {
    Ammo,
    Health,
    Armor,
}

impl PickupKind {
    /// Asset key asked of the scene service.
    pub fn model_key(self) -> &'static str {
        match self {
            PickupKind::Ammo => "pickup_ammo",
            PickupKind::Health => "pickup_medkit",
            PickupKind::Armor => "pickup_armor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PickupKind::Ammo => "AMMO",
            PickupKind::Health => "MEDKIT",
            PickupKind::Armor => "ARMOR",
        }
    }
}

/// Collectible placement as written in the stage config.
#[derive(Debug, Clone, Deserialize)]
pub struct PickupDef {
    pub kind: PickupKind,
    pub amount: u32,
    pub position: (f32, f32, f32),
}

/// The single effect applied when a collectible is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    /// Rounds added to the reserve.
    Ammo(u32),
    /// Positive health delta.
    Heal(i32),
}

/// A placed collectible.
#[derive(Debug, Clone)]
pub struct Collectible {
    pub kind: PickupKind,
    pub amount: u32,
    pub position: Vec3,
    pub handle: Renderable,
    collected: bool,
}

impl Collectible {
    pub fn new(kind: PickupKind, amount: u32, position: Vec3, handle: Renderable) -> Self {
        Self {
            kind,
            amount,
            position,
            handle,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

/// Every collectible of the stage.
#[derive(Debug, Clone)]
pub struct PickupRegistry {
    items: Vec<Collectible>,
    discovery_radius: f32,
    armor_factor: f32,
}

impl PickupRegistry {
    pub fn new(discovery_radius: f32, armor_factor: f32) -> Self {
        Self {
            items: Vec::new(),
            discovery_radius,
            armor_factor,
        }
    }

    pub fn add(&mut self, item: Collectible) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Collectible> {
        self.items.get(index)
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter().filter(|item| !item.collected)
    }

    /// Index of the closest uncollected item within the discovery radius.
    pub fn nearest(&self, player: Vec3) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.collected)
            .map(|(index, item)| (index, flat_distance(player, item.position)))
            .filter(|(_, distance)| *distance <= self.discovery_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Mark item `index` collected and return its effect, or `None` if it
    /// does not exist or was already taken.
    pub fn collect(&mut self, index: usize) -> Option<PickupEffect> {
        let armor_factor = self.armor_factor;
        let item = self.items.get_mut(index)?;
        if item.collected {
            return None;
        }
        item.collected = true;

        let effect = match item.kind {
            PickupKind::Ammo => PickupEffect::Ammo(item.amount),
            PickupKind::Health => PickupEffect::Heal(item.amount as i32),
            PickupKind::Armor => PickupEffect::Heal((item.amount as f32 * armor_factor) as i32),
        };
        Some(effect)
    }
}

fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PickupRegistry {
        let mut registry = PickupRegistry::new(1.2, 0.5);
        registry.add(Collectible::new(PickupKind::Ammo, 30, Vec3::new(0.0, 0.0, 0.0), Renderable(1)));
        registry.add(Collectible::new(PickupKind::Health, 25, Vec3::new(1.0, 0.0, 0.0), Renderable(2)));
        registry.add(Collectible::new(PickupKind::Armor, 40, Vec3::new(10.0, 0.0, 0.0), Renderable(3)));
        registry
    }

    #[test]
    fn nearest_picks_closest_in_radius() {
        let registry = registry();
        assert_eq!(registry.nearest(Vec3::new(0.8, 1.7, 0.0)), Some(1));
        assert_eq!(registry.nearest(Vec3::new(0.2, 0.0, 0.0)), Some(0));
        assert_eq!(registry.nearest(Vec3::new(5.0, 0.0, 0.0)), None);
    }

    #[test]
    fn collection_is_idempotent() {
        let mut registry = registry();
        assert_eq!(registry.collect(0), Some(PickupEffect::Ammo(30)));
        assert_eq!(registry.collect(0), None);
        assert!(registry.items()[0].is_collected());
    }

    #[test]
    fn collected_items_are_not_discovered() {
        let mut registry = registry();
        registry.collect(1);
        assert_eq!(registry.nearest(Vec3::new(0.8, 0.0, 0.0)), Some(0));
        registry.collect(0);
        assert_eq!(registry.nearest(Vec3::new(0.8, 0.0, 0.0)), None);
    }

    #[test]
    fn armor_heals_by_half() {
        let mut registry = registry();
        assert_eq!(registry.collect(2), Some(PickupEffect::Heal(20)));
        assert_eq!(registry.collect(1), Some(PickupEffect::Heal(25)));
    }

    #[test]
    fn missing_index_is_ignored() {
        let mut registry = registry();
        assert_eq!(registry.collect(42), None);
    }
}
