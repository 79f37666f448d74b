//! Hostile actor data.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::Cooldown;
use crate::stage::Renderable;

/// Stable identifier of a spawned hostile within one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u32);

/// Two-state behavior: close the distance, then strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    #[default]
    Pursue,
    Attack,
}

/// Encounter tuning loaded from the stage config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostileStats {
    /// Hostiles spawned when the ambush starts
    pub count: usize,
    pub health: i32,
    pub attack_range: f32,
    pub attack_damage: i32,
    /// Seconds between attacks
    pub attack_period: f32,
    /// Units per second while pursuing
    pub move_speed: f32,
    /// Maximum random offset applied to each spawn point
    pub spawn_jitter: f32,
    /// Seconds for the spawn-in scale ramp
    pub grow_time: f32,
    /// Asset key asked of the scene service
    pub model_key: String,
}

impl Default for HostileStats {
    fn default() -> Self {
        Self {
            count: 5,
            health: 60,
            attack_range: 2.5,
            attack_damage: 8,
            attack_period: 1.5,
            move_speed: 4.0,
            spawn_jitter: 1.0,
            grow_time: 0.6,
            model_key: "hostile_trooper".to_string(),
        }
    }
}

/// One live hostile.
#[derive(Debug, Clone)]
pub struct Hostile {
    pub id: ActorId,
    pub handle: Renderable,
    pub position: Vec3,
    /// Rotation about +Y; zero faces +Z.
    pub yaw: f32,
    pub state: BehaviorState,
    pub attack_cooldown: Cooldown,
    /// Seconds since spawn, drives the cosmetic grow-in.
    pub age: f32,
    health: i32,
}

impl Hostile {
    pub fn new(id: ActorId, handle: Renderable, position: Vec3, health: i32) -> Self {
        Self {
            id,
            handle,
            position,
            yaw: 0.0,
            state: BehaviorState::Pursue,
            attack_cooldown: Cooldown::ready_now(),
            age: 0.0,
            health,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Subtract `amount` (negative amounts are ignored) and return the new health.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health -= amount.max(0);
        self.health
    }

    /// Flat vector from this hostile to `target`.
    pub fn offset_to(&self, target: Vec3) -> Vec3 {
        Vec3::new(target.x - self.position.x, 0.0, target.z - self.position.z)
    }

    /// Visual scale during the spawn-in ramp.
    pub fn spawn_scale(&self, grow_time: f32) -> f32 {
        if grow_time <= 0.0 {
            return 1.0;
        }
        let t = (self.age / grow_time).clamp(0.0, 1.0);
        0.1 + 0.9 * t
    }
}

/// Rotation about +Y that faces along `direction`.
pub fn yaw_towards(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}
