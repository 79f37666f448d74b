//! The ambush wave: the live hostile set and its lifecycle.

use bevy::prelude::*;

use super::components::{ActorId, Hostile};
use crate::stage::Renderable;

/// Live hostiles plus the one-shot spawn and clear flags.
#[derive(Debug, Clone, Default)]
pub struct Wave {
    actors: Vec<Hostile>,
    next_id: u32,
    spawned: bool,
    cleared: bool,
    kills: u32,
}

impl Wave {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_spawned(&self) -> bool {
        self.spawned
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Spawned, not yet cleared, and at least one hostile standing.
    pub fn is_live(&self) -> bool {
        self.spawned && !self.cleared && !self.actors.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.actors.len()
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn actors(&self) -> &[Hostile] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Hostile] {
        &mut self.actors
    }

    pub fn get(&self, id: ActorId) -> Option<&Hostile> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Spawn one hostile at each position. Only the first call does anything.
    ///
    /// `instantiate` is asked for a renderable per hostile.
    pub fn spawn(
        &mut self,
        positions: &[Vec3],
        health: i32,
        mut instantiate: impl FnMut(Vec3) -> Renderable,
    ) -> bool {
        if self.spawned {
            return false;
        }
        self.spawned = true;

        for &position in positions {
            let id = ActorId(self.next_id);
            self.next_id += 1;
            let handle = instantiate(position);
            info!("Spawned hostile {} at ({:.1}, {:.1})", id.0, position.x, position.z);
            self.actors.push(Hostile::new(id, handle, position, health));
        }
        true
    }

    /// Remove every hostile at or below zero health and count the kills.
    pub fn reap(&mut self) -> Vec<Hostile> {
        if self.actors.iter().all(|actor| !actor.is_dead()) {
            return Vec::new();
        }
        let (dead, alive): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.actors).into_iter().partition(Hostile::is_dead);
        self.actors = alive;
        self.kills += dead.len() as u32;
        dead
    }

    /// Mark the wave cleared the first time it is found empty after spawning.
    pub fn settle(&mut self) -> bool {
        if self.spawned && !self.cleared && self.actors.is_empty() {
            self.cleared = true;
            return true;
        }
        false
    }

    /// Remove every hostile without counting kills (teardown).
    pub fn drain(&mut self) -> Vec<Hostile> {
        std::mem::take(&mut self.actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned_wave(count: usize) -> Wave {
        let mut wave = Wave::new();
        let positions: Vec<Vec3> = (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mut next = 0;
        wave.spawn(&positions, 60, |_| {
            next += 1;
            Renderable(next)
        });
        wave
    }

    #[test]
    fn spawns_only_once() {
        let mut wave = spawned_wave(5);
        assert_eq!(wave.live_count(), 5);
        assert!(!wave.spawn(&[Vec3::ZERO], 60, |_| Renderable(99)));
        assert_eq!(wave.live_count(), 5);
    }

    #[test]
    fn spawned_hostiles_start_fresh() {
        let wave = spawned_wave(2);
        for actor in wave.actors() {
            assert_eq!(actor.health(), 60);
            assert!(actor.attack_cooldown.is_ready());
        }
    }

    #[test]
    fn reap_removes_dead_and_counts_kills() {
        let mut wave = spawned_wave(5);
        wave.actors_mut()[1].take_damage(60);
        wave.actors_mut()[3].take_damage(75);

        let dead = wave.reap();
        assert_eq!(dead.len(), 2);
        assert_eq!(wave.live_count(), 3);
        assert_eq!(wave.kills(), 2);
        assert!(wave.reap().is_empty());
        assert_eq!(wave.kills(), 2);
    }

    #[test]
    fn settles_once_when_emptied() {
        let mut wave = spawned_wave(1);
        assert!(!wave.settle());
        wave.actors_mut()[0].take_damage(60);
        wave.reap();
        assert!(wave.settle());
        assert!(!wave.settle());
        assert!(wave.is_cleared());
        assert!(!wave.is_live());
    }

    #[test]
    fn unspawned_wave_never_settles() {
        let mut wave = Wave::new();
        assert!(!wave.settle());
        assert!(!wave.is_live());
    }
}
