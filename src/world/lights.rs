//! Failing-light animation: noisy intensity with occasional short outages.

use rand::Rng;
use serde::Deserialize;

use crate::stage::LightHandle;

/// Chance per tick, scaled by `flicker_amount`, that a light cuts out.
const OUTAGE_CHANCE: f32 = 0.002;
const MIN_OUTAGE: f32 = 0.1;
const MAX_OUTAGE: f32 = 0.5;

fn default_light_color() -> (f32, f32, f32) {
    (1.0, 0.85, 0.6)
}

fn default_light_range() -> f32 {
    12.0
}

fn default_flicker_speed() -> f32 {
    8.0
}

fn default_flicker_amount() -> f32 {
    0.3
}

/// Light placement as written in the stage config.
#[derive(Debug, Clone, Deserialize)]
pub struct FlickerLightDef {
    pub position: (f32, f32, f32),
    #[serde(default = "default_light_color")]
    pub color: (f32, f32, f32),
    pub intensity: f32,
    #[serde(default = "default_light_range")]
    pub range: f32,
    #[serde(default = "default_flicker_speed")]
    pub flicker_speed: f32,
    #[serde(default = "default_flicker_amount")]
    pub flicker_amount: f32,
}

/// Product of three sines at 1x, 2.3x and 0.7x of `phase`, clamped at zero.
pub fn flicker_noise(phase: f32) -> f32 {
    (phase.sin() * (phase * 2.3).sin() * (phase * 0.7).sin()).max(0.0)
}

/// Per-light flicker state. Lights never share state.
#[derive(Debug, Clone)]
pub struct FlickerLight {
    pub handle: LightHandle,
    base_intensity: f32,
    flicker_speed: f32,
    flicker_amount: f32,
    phase: f32,
    off: bool,
    off_timer: f32,
    off_duration: f32,
    intensity: f32,
}

impl FlickerLight {
    pub fn new(handle: LightHandle, base_intensity: f32, flicker_speed: f32, flicker_amount: f32) -> Self {
        Self {
            handle,
            base_intensity,
            flicker_speed,
            flicker_amount,
            phase: 0.0,
            off: false,
            off_timer: 0.0,
            off_duration: 0.0,
            intensity: base_intensity,
        }
    }

    pub fn from_def(handle: LightHandle, def: &FlickerLightDef) -> Self {
        Self::new(handle, def.intensity, def.flicker_speed, def.flicker_amount)
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn is_off(&self) -> bool {
        self.off
    }

    /// Advance by `delta` seconds and return the new intensity.
    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> f32 {
        self.phase += delta * self.flicker_speed;

        if self.off {
            self.off_timer += delta;
            if self.off_timer > self.off_duration {
                self.off = false;
            }
        }

        if !self.off && rng.gen::<f32>() < OUTAGE_CHANCE * self.flicker_amount {
            self.off = true;
            self.off_timer = 0.0;
            self.off_duration = rng.gen_range(MIN_OUTAGE..MAX_OUTAGE);
        }

        self.intensity = if self.off {
            0.0
        } else {
            self.base_intensity + flicker_noise(self.phase) * self.flicker_amount * self.base_intensity
        };
        self.intensity
    }
}
