//! Countdown gate shared by melee, primary fire, hostile attacks and light outages.

/// A non-negative countdown in seconds.
///
/// Counting down never goes below zero, and the gate is ready exactly when
/// the remaining time is `<= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    /// A cooldown that is already ready.
    pub fn ready_now() -> Self {
        Self::default()
    }

    /// A cooldown that starts counting from `seconds`.
    pub fn from_secs(seconds: f32) -> Self {
        let mut cooldown = Self::default();
        cooldown.start(seconds);
        cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Restart the countdown. Negative durations are treated as zero.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    /// Count down by `delta` seconds, clamped at zero.
    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    /// Consume the gate if it is ready. Returns whether it was.
    pub fn try_trigger(&mut self, period: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.start(period);
        true
    }
}
