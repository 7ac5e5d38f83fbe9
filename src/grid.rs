//! three‑layer tile grid & the pixel ↔ cell mapping (row‑0 = top)
//!
//! Cell `(row, col)` covers the pixel square
//! `[col * block_size, row * block_size, block_size, block_size]`, with
//! pixel y growing downwards. Only the midground collides.

use tracing::warn;

use crate::block::BlockKind;
use crate::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_COL_COUNT, DEFAULT_ROW_COUNT};
use crate::error::{TerrainError, TerrainResult};

/* ===========================================================
   layers
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Midground,
    Foreground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Midground, Layer::Foreground];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Layer::Background => 0,
            Layer::Midground => 1,
            Layer::Foreground => 2,
        }
    }
}

/* ===========================================================
   construction input
   =========================================================== */
/// Raw, possibly missing, grid dimensions as handed in by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerrainConfig {
    pub rows: Option<i64>,
    pub cols: Option<i64>,
    pub block_size: Option<i64>,
}

/// Dimensions after defaulting; every field is positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
    pub block_size: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROW_COUNT,
            cols: DEFAULT_COL_COUNT,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl TerrainConfig {
    pub fn new(rows: i64, cols: i64, block_size: i64) -> Self {
        Self {
            rows: Some(rows),
            cols: Some(cols),
            block_size: Some(block_size),
        }
    }

    /// Missing or non‑positive fields fall back to the defaults, one warning
    /// per substituted field.
    pub fn resolve(&self) -> Dimensions {
        let defaults = Dimensions::default();
        Dimensions {
            rows: positive_or(self.rows, "rowCount", defaults.rows),
            cols: positive_or(self.cols, "colCount", defaults.cols),
            block_size: positive_or(self.block_size, "blockSize", defaults.block_size),
        }
    }
}

fn positive_or<T>(value: Option<i64>, name: &str, fallback: T) -> T
where
    T: TryFrom<i64> + std::fmt::Display + Copy,
{
    match value.filter(|v| *v > 0).and_then(|v| T::try_from(v).ok()) {
        Some(v) => v,
        None => {
            warn!(field = name, ?value, %fallback, "terrain dimension defaulted");
            fallback
        }
    }
}

/* ===========================================================
   grid
   =========================================================== */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    rows: usize,
    cols: usize,
    block_size: u32,
    layers: [Vec<BlockKind>; 3],
}

impl TerrainGrid {
    /// All three layers empty. Unusable dimensions in `config` fall back to
    /// the defaults, so every grid has at least one row, column and pixel.
    pub fn new(config: TerrainConfig) -> Self {
        Self::from_dimensions(config.resolve())
    }

    /// `dims` must come out of [`TerrainConfig::resolve`]
    pub(crate) fn from_dimensions(dims: Dimensions) -> Self {
        debug_assert!(dims.rows > 0 && dims.cols > 0 && dims.block_size > 0);
        let cells = dims.rows * dims.cols;
        Self {
            rows: dims.rows,
            cols: dims.cols,
            block_size: dims.block_size,
            layers: [
                vec![BlockKind::Air; cells],
                vec![BlockKind::Air; cells],
                vec![BlockKind::Air; cells],
            ],
        }
    }

    /* ---------- dimensions ---------- */
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn col_count(&self) -> usize {
        self.cols
    }
    #[inline]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }
    pub fn dimensions(&self) -> Dimensions {
        Dimensions { rows: self.rows, cols: self.cols, block_size: self.block_size }
    }
    pub fn width_in_pixels(&self) -> u64 {
        self.cols as u64 * u64::from(self.block_size)
    }
    pub fn height_in_pixels(&self) -> u64 {
        self.rows as u64 * u64::from(self.block_size)
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /* ---------- pixel ↔ cell ---------- */
    /// `(row, col)` under a world pixel, `None` outside the grid
    pub fn world_to_cell(&self, world_x: f32, world_y: f32) -> Option<(usize, usize)> {
        let size = self.block_size as f32;
        let row = (world_y / size).floor();
        let col = (world_x / size).floor();
        if !(row >= 0.0 && col >= 0.0) {
            return None; // negative or NaN
        }
        let (row, col) = (row as usize, col as usize);
        self.in_bounds(row, col).then_some((row, col))
    }

    /// top‑left pixel of a cell
    #[inline]
    pub fn cell_to_world(&self, row: usize, col: usize) -> (f32, f32) {
        let size = self.block_size as f32;
        (col as f32 * size, row as f32 * size)
    }

    /* ---------- queries ---------- */
    /// stored kind, air included; `None` only out of bounds
    pub fn kind(&self, layer: Layer, row: usize, col: usize) -> Option<BlockKind> {
        self.in_bounds(row, col)
            .then(|| self.layers[layer.slot()][self.idx(row, col)])
    }

    /// solid tile under a world pixel; `None` for air or outside the grid
    pub fn tile_at(&self, layer: Layer, world_x: f32, world_y: f32) -> Option<BlockKind> {
        let (row, col) = self.world_to_cell(world_x, world_y)?;
        self.kind(layer, row, col).filter(|k| !k.is_air())
    }

    /// midground solidity; cells past the edge count as solid
    pub fn is_collidable(&self, row: usize, col: usize) -> bool {
        self.kind(Layer::Midground, row, col)
            .map_or(true, |k| !k.is_air())
    }

    /// every cell of a layer as `(row, col, kind)`, row‑major
    pub fn cells(&self, layer: Layer) -> impl Iterator<Item = (usize, usize, BlockKind)> + '_ {
        let cols = self.cols;
        self.layers[layer.slot()]
            .iter()
            .enumerate()
            .map(move |(i, &k)| (i / cols, i % cols, k))
    }

    /* ---------- mutation ---------- */
    /// overwrite one cell, returning what was there
    pub fn set_tile(
        &mut self,
        layer: Layer,
        row: usize,
        col: usize,
        kind: BlockKind,
    ) -> TerrainResult<BlockKind> {
        if !self.in_bounds(row, col) {
            return Err(TerrainError::OutOfBounds { row, col });
        }
        let idx = self.idx(row, col);
        Ok(std::mem::replace(&mut self.layers[layer.slot()][idx], kind))
    }

    /// Clear one midground cell. Returns the removed kind, or `None` when
    /// there was nothing to mine.
    pub fn mine(&mut self, row: usize, col: usize) -> Option<BlockKind> {
        let prev = self.set_tile(Layer::Midground, row, col, BlockKind::Air).ok()?;
        (!prev.is_air()).then_some(prev)
    }

    /// Unchecked midground write for the generators, which clamp first.
    #[inline]
    pub(crate) fn put(&mut self, row: usize, col: usize, kind: BlockKind) {
        debug_assert!(self.in_bounds(row, col));
        let idx = self.idx(row, col);
        self.layers[Layer::Midground.slot()][idx] = kind;
    }
}
