use bevy::input::ButtonInput;
use bevy::prelude::*;

use dwarf_cavern::constants::GRASS_ROW;

use crate::terrain::{cell_center, Terrain};
use crate::tunables::CAMERA_PAN_SPEED;

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

/// clamp that tolerates a world smaller than the window
#[inline]
fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// start looking at the middle of the grass line
pub fn center_camera_system(
    mut cam_q: Query<&mut Transform, With<Camera>>,
    terrain: Res<Terrain>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let grid = &terrain.grid;
    let row = GRASS_ROW.min(grid.row_count() - 1);
    let pos = cell_center(grid, row, grid.col_count() / 2);
    cam_tf.translation.x = snap(pos.x);
    cam_tf.translation.y = snap(pos.y);
}

/// WASD / arrows pan, clamped to the terrain
pub fn camera_pan_system(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut cam_q: Query<&mut Transform, With<Camera>>,
    window_q: Query<&Window>,
    terrain: Res<Terrain>,
) {
    let Ok(mut cam_tf) = cam_q.get_single_mut() else { return };
    let Ok(window) = window_q.get_single() else { return };

    let mut dir = Vec2::ZERO;
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        dir.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        dir.x += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        dir.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        dir.y -= 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let step = dir.normalize() * CAMERA_PAN_SPEED * time.delta_secs();
    let half_w = window.width() * 0.5;
    let half_h = window.height() * 0.5;
    let world_w = terrain.grid.width_in_pixels() as f32;
    let world_h = terrain.grid.height_in_pixels() as f32;

    // grid spans x ∈ [0, w], y ∈ [-h, 0] in world space
    let x = clamp_axis(cam_tf.translation.x + step.x, half_w, world_w - half_w);
    let y = clamp_axis(cam_tf.translation.y + step.y, -world_h + half_h, -half_h);

    cam_tf.translation.x = snap(x);
    cam_tf.translation.y = snap(y);
}
