//! minimal bootstrap for the cavern demo
//!
//! Generates the terrain once, draws the midground as coloured sprites and
//! lets you pan around and mine single blocks. Works with **Bevy 0.15**.

mod camera;
mod terrain;
mod tunables;

use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use camera::{camera_pan_system, center_camera_system, setup_camera};
use terrain::{
    digging_system, generate_terrain_system, redraw_changed_tiles_system, spawn_initial_tiles,
};

/* ------------------------------------------------------------------------ */
/* F11 borderless‑fullscreen toggle                                         */
/* ------------------------------------------------------------------------ */
fn toggle_fullscreen(
    keys: Res<ButtonInput<KeyCode>>,
    mut window_q: Query<&mut Window, With<PrimaryWindow>>,
) {
    if keys.just_pressed(KeyCode::F11) {
        let Ok(mut window) = window_q.get_single_mut() else { return };
        window.mode = match window.mode {
            WindowMode::Windowed => {
                WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
            }
            _ => WindowMode::Windowed,
        };
    }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() {
    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.18, 0.65, 1.0)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "dwarf cavern".into(),
                resolution: (1280., 720.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))

        /* startup systems ------------------------------------------------- */
        .add_systems(Startup, (setup_camera, generate_terrain_system))
        .add_systems(
            Startup,
            (spawn_initial_tiles, center_camera_system)
                .after(setup_camera)
                .after(generate_terrain_system),
        )

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                camera_pan_system,
                digging_system,                                   // hold LMB
                redraw_changed_tiles_system.after(digging_system),
                toggle_fullscreen,
            ),
        )
        .run();
}
