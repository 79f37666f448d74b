//! The player's rifle magazine with a timed reload.

use crate::stage::AmmoState;

/// Rounds in the magazine, rounds in reserve, and an optional reload in progress.
#[derive(Debug, Clone)]
pub struct Magazine {
    current: u32,
    capacity: u32,
    reserve: u32,
    reload_time: f32,
    /// Seconds left on the running reload.
    reloading: Option<f32>,
}

impl Default for Magazine {
    fn default() -> Self {
        Self::new(30, 90, 1.8)
    }
}

impl Magazine {
    /// A full magazine plus `reserve` spare rounds.
    pub fn new(capacity: u32, reserve: u32, reload_time: f32) -> Self {
        Self {
            current: capacity,
            capacity,
            reserve,
            reload_time,
            reloading: None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading.is_some()
    }

    /// Spend one round. Fails when empty or mid-reload.
    pub fn try_consume(&mut self) -> bool {
        if self.current == 0 || self.is_reloading() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Start a reload if there is room and spare ammo. Returns whether one started.
    pub fn request_reload(&mut self) -> bool {
        if self.is_reloading() || self.current >= self.capacity || self.reserve == 0 {
            return false;
        }
        self.reloading = Some(self.reload_time);
        true
    }

    /// Advance a running reload. Returns true on the tick it completes.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.reloading else {
            return false;
        };
        let remaining = remaining - delta;
        if remaining > 0.0 {
            self.reloading = Some(remaining);
            return false;
        }

        self.reloading = None;
        let moved = (self.capacity - self.current).min(self.reserve);
        self.current += moved;
        self.reserve -= moved;
        true
    }

    pub fn add_reserve(&mut self, amount: u32) {
        self.reserve = self.reserve.saturating_add(amount);
    }

    pub fn state(&self) -> AmmoState {
        AmmoState {
            current: self.current,
            max: self.capacity,
            reserve: self.reserve,
            is_reloading: self.is_reloading(),
        }
    }
}
