//! Player attack queries against the live hostile set.
//!
//! Both queries mutate hostile health immediately and report every hit.

use bevy::prelude::*;

use super::components::{CombatRules, HitReport};
use crate::enemies::Hostile;

/// Height above a hostile's feet that ranged fire aims at.
const AIM_HEIGHT: f32 = 1.0;

/// Swing at every hostile inside the melee sphere in front of the player.
///
/// Distances are measured on the horizontal plane. Every hostile inside the
/// radius takes damage.
pub fn melee_sweep(
    actors: &mut [Hostile],
    player: Vec3,
    facing: Vec3,
    rules: &CombatRules,
) -> Vec<HitReport> {
    let flat_facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
    let center = player + flat_facing * rules.melee_reach;

    let mut hits = Vec::new();
    for actor in actors.iter_mut() {
        if actor.is_dead() {
            continue;
        }
        let offset = Vec2::new(actor.position.x - center.x, actor.position.z - center.z);
        if offset.length() > rules.melee_radius {
            continue;
        }

        let away = Vec3::new(actor.position.x - player.x, 0.0, actor.position.z - player.z);
        let direction = if away.length_squared() > f32::EPSILON {
            away.normalize()
        } else {
            flat_facing
        };
        let remaining = actor.take_damage(rules.melee_damage);
        hits.push(HitReport {
            actor: actor.id,
            handle: actor.handle,
            position: actor.position,
            damage: rules.melee_damage,
            remaining_health: remaining,
            direction,
        });
    }
    hits
}

/// Approximate hitscan: damage the closest hostile inside a narrow cone
/// around `facing` whose perpendicular distance to the firing ray is small.
pub fn hitscan(
    actors: &mut [Hostile],
    origin: Vec3,
    facing: Vec3,
    rules: &CombatRules,
) -> Option<HitReport> {
    let facing = facing.normalize_or_zero();
    if facing == Vec3::ZERO {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, actor) in actors.iter().enumerate() {
        if actor.is_dead() {
            continue;
        }
        let to_target = actor.position + Vec3::Y * AIM_HEIGHT - origin;
        let distance = to_target.length();
        if distance > rules.ranged_range || distance <= f32::EPSILON {
            continue;
        }
        if (to_target / distance).dot(facing) <= rules.cone_dot {
            continue;
        }
        let along = to_target.dot(facing);
        let lateral = (to_target - facing * along).length();
        if lateral >= rules.lateral_tolerance {
            continue;
        }
        match best {
            Some((_, closest)) if closest <= distance => {}
            _ => best = Some((index, distance)),
        }
    }

    let (index, _) = best?;
    let actor = &mut actors[index];
    let remaining = actor.take_damage(rules.ranged_damage);
    Some(HitReport {
        actor: actor.id,
        handle: actor.handle,
        position: actor.position,
        damage: rules.ranged_damage,
        remaining_health: remaining,
        direction: facing,
    })
}
