//! Spawn placement for the ambush wave.

use bevy::prelude::*;
use rand::Rng;

/// Pick `count` spawn positions by cycling through `points` and jittering
/// each one on the horizontal plane by up to `jitter` units per axis.
pub fn jittered_spawn_positions<R: Rng + ?Sized>(
    points: &[Vec3],
    count: usize,
    jitter: f32,
    rng: &mut R,
) -> Vec<Vec3> {
    if points.is_empty() {
        return Vec::new();
    }

    let jitter = jitter.max(0.0);
    (0..count)
        .map(|i| {
            let base = points[i % points.len()];
            if jitter == 0.0 {
                return base;
            }
            let dx = rng.gen_range(-jitter..=jitter);
            let dz = rng.gen_range(-jitter..=jitter);
            Vec3::new(base.x + dx, base.y, base.z + dz)
        })
        .collect()
}
