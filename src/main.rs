//! Outpost Stage - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Shift: Sprint
//! - Left click: Fire, Right click / V: Melee
//! - E: Interact, R: Reload, F: Flashlight, Q: Scanner
//! - Escape: Pause/Unpause

use bevy::audio::AudioPlugin as BevyAudioPlugin;
use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins; audio goes through kira instead
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Outpost".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<BevyAudioPlugin>(),
        )

        .add_plugins(AudioPlugin)

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(outpost_stage::OutpostPlugin)

        .run();
}
