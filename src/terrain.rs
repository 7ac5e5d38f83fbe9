//! bevy side of the terrain: resource, tile sprites & mouse mining
//!
//! Grid pixels grow downwards, bevy world y grows upwards, so every
//! conversion here flips y.

use bevy::input::ButtonInput;
use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use std::collections::VecDeque;

use crate::tunables::{COLOR_NOISE_SCALE, COLOR_VARIATION_LEVELS, COLOR_VARIATION_STRENGTH};
use dwarf_cavern::{BlockKind, Layer, TerrainBuilder, TerrainConfig, TerrainGrid};

/* ===========================================================
   components & resource
   =========================================================== */
#[derive(Component)]
pub struct TileSprite {
    pub row: usize,
    pub col: usize,
}

#[derive(Resource)]
pub struct Terrain {
    pub grid: TerrainGrid,
    pub sprite_entities: Vec<Option<Entity>>,
    pub changed_tiles: VecDeque<(usize, usize)>,
    pub color_noise: Perlin,
}

impl Terrain {
    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.grid.col_count() + col
    }
}

/// centre of a cell in bevy world space
pub fn cell_center(grid: &TerrainGrid, row: usize, col: usize) -> Vec2 {
    let (x, y) = grid.cell_to_world(row, col);
    let half = grid.block_size() as f32 * 0.5;
    Vec2::new(x + half, -(y + half))
}

/// bevy world → grid pixel
#[inline]
pub fn world_to_grid_px(world: Vec2) -> (f32, f32) {
    (world.x, -world.y)
}

/* ---------- tile colours ---------- */
fn base_rgb(kind: BlockKind) -> Option<Vec3> {
    let rgb = match kind {
        BlockKind::Air => return None,
        BlockKind::GrassPlain => Vec3::new(0.30, 0.65, 0.20),
        BlockKind::GrassBony => Vec3::new(0.55, 0.70, 0.45),
        BlockKind::GrassBloody => Vec3::new(0.55, 0.30, 0.15),
        BlockKind::GrassRocky => Vec3::new(0.40, 0.55, 0.35),
        BlockKind::DirtPlain
        | BlockKind::DirtWavy
        | BlockKind::DirtBony
        | BlockKind::DirtRocky => Vec3::new(0.55, 0.27, 0.07),
        BlockKind::RoughStone => Vec3::new(0.50, 0.50, 0.50),
        BlockKind::SmoothStone => Vec3::new(0.62, 0.62, 0.65),
        BlockKind::Iron => Vec3::new(0.72, 0.55, 0.45),
        BlockKind::Coal => Vec3::new(0.15, 0.15, 0.15),
        BlockKind::Diamond => Vec3::new(0.55, 0.90, 0.95),
        BlockKind::Gold => Vec3::new(0.95, 0.80, 0.20),
        BlockKind::Emerald => Vec3::new(0.15, 0.80, 0.40),
        BlockKind::Sapphire => Vec3::new(0.15, 0.30, 0.85),
        BlockKind::Copper => Vec3::new(0.80, 0.45, 0.20),
        BlockKind::Ruby => Vec3::new(0.85, 0.10, 0.20),
    };
    Some(rgb)
}

/* ===========================================================
   startup
   =========================================================== */
pub fn generate_terrain_system(mut commands: Commands) {
    let grid = TerrainBuilder::new(TerrainConfig::default()).generate();
    let cells = grid.row_count() * grid.col_count();

    commands.insert_resource(Terrain {
        grid,
        sprite_entities: vec![None; cells],
        changed_tiles: VecDeque::new(),
        color_noise: Perlin::new(rand::thread_rng().gen()),
    });
}

/// one sprite per solid midground cell
pub fn spawn_initial_tiles(mut commands: Commands, mut terrain: ResMut<Terrain>) {
    let solid: Vec<(usize, usize)> = terrain
        .grid
        .cells(Layer::Midground)
        .filter(|(_, _, k)| !k.is_air())
        .map(|(r, c, _)| (r, c))
        .collect();

    for (row, col) in solid {
        let entity = spawn_tile(&mut commands, &terrain, row, col);
        let idx = terrain.idx(row, col);
        terrain.sprite_entities[idx] = entity;
    }
    info!("spawned {} tile sprites", terrain.sprite_entities.iter().flatten().count());
}

/* ---------- helpers ---------- */

/// single tile sprite with quantised colour variation; `None` for air
pub fn spawn_tile(commands: &mut Commands, terrain: &Terrain, row: usize, col: usize) -> Option<Entity> {
    let kind = terrain.grid.kind(Layer::Midground, row, col)?;
    let base = base_rgb(kind)?;

    let raw = terrain
        .color_noise
        .get([col as f64 * COLOR_NOISE_SCALE, row as f64 * COLOR_NOISE_SCALE])
        as f32;

    /* bucket‑based colour banding (for pixel‑arty look) */
    let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
        .floor()
        .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
    let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
    let rgb = base * (1.0 + norm * COLOR_VARIATION_STRENGTH);

    let size = terrain.grid.block_size() as f32;
    let pos = cell_center(&terrain.grid, row, col);

    let entity = commands
        .spawn((
            Sprite {
                color: Color::srgb(rgb.x.clamp(0.0, 1.0), rgb.y.clamp(0.0, 1.0), rgb.z.clamp(0.0, 1.0)),
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            Transform::from_xyz(pos.x, pos.y, 0.0),
            TileSprite { row, col },
        ))
        .id();
    Some(entity)
}

/* ===========================================================
   update
   =========================================================== */
/// tidy‑up & redraw tiles whose kind changed
pub fn redraw_changed_tiles_system(mut commands: Commands, mut terrain: ResMut<Terrain>) {
    while let Some((row, col)) = terrain.changed_tiles.pop_front() {
        let idx = terrain.idx(row, col);
        if let Some(e) = terrain.sprite_entities[idx].take() {
            commands.entity(e).despawn();
        }
        terrain.sprite_entities[idx] = spawn_tile(&mut commands, &terrain, row, col);
    }
}

/// hold LMB to mine the single midground cell under the cursor
pub fn digging_system(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cam_q: Query<(&Camera, &GlobalTransform)>,
    mut terrain: ResMut<Terrain>,
) {
    if !mouse.pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else { return };
    let Some(cursor) = window.cursor_position() else { return };
    let Ok((cam, cam_tf)) = cam_q.get_single() else { return };
    let Ok(world) = cam.viewport_to_world_2d(cam_tf, cursor) else { return };

    let (px, py) = world_to_grid_px(world);
    let Some((row, col)) = terrain.grid.world_to_cell(px, py) else { return };

    if let Some(kind) = terrain.grid.mine(row, col) {
        debug!(?kind, row, col, "mined block");
        terrain.changed_tiles.push_back((row, col));
    }
}
