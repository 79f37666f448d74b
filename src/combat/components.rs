//! Combat tuning, cooldowns, hit reports, and player-side combat components.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::Cooldown;
use crate::enemies::ActorId;
use crate::stage::Renderable;

/// Player attack tuning loaded from the stage config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    pub melee_damage: i32,
    /// Radius of the melee sphere
    pub melee_radius: f32,
    /// Distance in front of the player where the melee sphere is centred
    pub melee_reach: f32,
    /// Seconds between swings
    pub melee_cooldown: f32,
    pub ranged_damage: i32,
    pub ranged_range: f32,
    /// Seconds between shots
    pub ranged_cooldown: f32,
    /// Minimum dot product between facing and target direction
    pub cone_dot: f32,
    /// Maximum distance of a target from the firing ray
    pub lateral_tolerance: f32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            melee_damage: 50,
            melee_radius: 3.0,
            melee_reach: 1.5,
            melee_cooldown: 0.8,
            ranged_damage: 25,
            ranged_range: 50.0,
            ranged_cooldown: 0.15,
            cone_dot: 0.9,
            lateral_tolerance: 1.0,
        }
    }
}

/// Independent gates for the two player attacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatCooldowns {
    pub melee: Cooldown,
    pub ranged: Cooldown,
}

impl CombatCooldowns {
    pub fn tick(&mut self, delta: f32) {
        self.melee.tick(delta);
        self.ranged.tick(delta);
    }
}

/// One hostile hit by a player attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub actor: ActorId,
    pub handle: Renderable,
    pub position: Vec3,
    pub damage: i32,
    pub remaining_health: i32,
    /// Unit direction the hit pushes the hostile.
    pub direction: Vec3,
}

/// Component for entities that can take damage. Used for the player.
#[derive(Component, Debug)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    /// Apply a signed change: negative damages, positive heals.
    pub fn apply_delta(&mut self, amount: f32) -> f32 {
        if amount < 0.0 {
            -self.take_damage(-amount)
        } else {
            self.heal(amount)
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

/// Screen shake effect resource, kicked by player hit feedback.
#[derive(Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub timer: f32,
}

impl ScreenShake {
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        // Only override if new shake is stronger
        if intensity > self.intensity || self.timer <= 0.0 {
            self.intensity = intensity;
            self.duration = duration;
            self.timer = duration;
        }
    }

    pub fn update(&mut self, delta: f32) -> Vec3 {
        if self.timer <= 0.0 {
            return Vec3::ZERO;
        }

        self.timer = (self.timer - delta).max(0.0);
        let progress = self.timer / self.duration;
        let current_intensity = self.intensity * progress;

        let x = (rand::random::<f32>() - 0.5) * 2.0 * current_intensity;
        let y = (rand::random::<f32>() - 0.5) * 2.0 * current_intensity;

        Vec3::new(x, y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldowns_tick_independently() {
        let mut cooldowns = CombatCooldowns::default();
        cooldowns.melee.start(0.8);
        cooldowns.ranged.start(0.15);
        cooldowns.tick(0.2);
        assert!(!cooldowns.melee.is_ready());
        assert!(cooldowns.ranged.is_ready());
    }

    #[test]
    fn health_delta_heals_and_damages() {
        let mut health = Health::new(100.0);
        assert_eq!(health.apply_delta(-30.0), -30.0);
        assert_eq!(health.apply_delta(50.0), 30.0);
        assert_eq!(health.current, 100.0);
        health.apply_delta(-500.0);
        assert!(health.is_dead());
    }

    #[test]
    fn shake_decays_to_rest() {
        let mut shake = ScreenShake::default();
        shake.shake(0.2, 0.1);
        shake.update(0.05);
        shake.update(0.1);
        assert_eq!(shake.update(0.1), Vec3::ZERO);
    }
}
