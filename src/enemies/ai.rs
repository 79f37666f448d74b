//! Hostile behavior: straight-line pursuit and cooldown-gated melee strikes.

use bevy::prelude::*;

use super::components::{yaw_towards, ActorId, BehaviorState, Hostile, HostileStats};

/// A strike that landed on the player this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileStrike {
    pub attacker: ActorId,
    pub damage: i32,
    pub position: Vec3,
}

/// Run one behavior pass over every live hostile.
///
/// For each hostile the range test, state switch and strike all happen in the
/// same pass, so a hostile already in range switches to `Attack` and strikes
/// on that tick if its cooldown is ready.
pub fn update_behavior(
    actors: &mut [Hostile],
    player: Vec3,
    delta: f32,
    stats: &HostileStats,
) -> Vec<HostileStrike> {
    let mut strikes = Vec::new();

    for actor in actors.iter_mut() {
        if actor.is_dead() {
            continue;
        }

        let to_player = actor.offset_to(player);
        let distance = to_player.length();

        actor.attack_cooldown.tick(delta);

        if distance < stats.attack_range {
            actor.state = BehaviorState::Attack;
            if distance > f32::EPSILON {
                actor.yaw = yaw_towards(to_player);
            }
            if actor.attack_cooldown.try_trigger(stats.attack_period) {
                strikes.push(HostileStrike {
                    attacker: actor.id,
                    damage: stats.attack_damage,
                    position: actor.position,
                });
            }
        } else {
            actor.state = BehaviorState::Pursue;
            let direction = to_player / distance;
            actor.position += direction * stats.move_speed * delta;
            actor.yaw = yaw_towards(direction);
        }
    }

    strikes
}
