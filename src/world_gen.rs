//! world‑generation: grass surface, ore tiers, carved caves & stalag shapes
//!
//! Everything here writes the midground only. Background and foreground are
//! left empty.

use std::path::Path;

use rand::rngs::ThreadRng;
use tracing::{debug, error, info};

use crate::block::{grass_block, BlockKind};
use crate::constants::*;
use crate::error::{TerrainError, TerrainResult};
use crate::grid::{Dimensions, TerrainConfig, TerrainGrid};
use crate::random::RandomSource;

/* ===========================================================
   tier material mix
   =========================================================== */
/// Per‑mille weights for one tier. Emerald takes whatever the other three
/// leave, so its own weight never moves a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierMix {
    pub dirt: u32,
    pub iron: u32,
    pub gold: u32,
    pub emerald: u32,
}

impl TierMix {
    pub const fn new(dirt: u32, iron: u32, gold: u32, emerald: u32) -> Self {
        Self { dirt, iron, gold, emerald }
    }

    /// Bands for a roll in `0..1000`: stone `[0, dirt]`, iron `(dirt, iron]`,
    /// gold `(iron, gold]`, emerald above. The stone band keeps its upper
    /// threshold.
    pub fn material_for(&self, roll: u32) -> BlockKind {
        let roll = u64::from(roll);
        let dirt = u64::from(self.dirt);
        let iron = dirt + u64::from(self.iron);
        let gold = iron + u64::from(self.gold);

        if roll <= dirt {
            BlockKind::RoughStone
        } else if roll <= iron {
            BlockKind::Iron
        } else if roll <= gold {
            BlockKind::Gold
        } else {
            BlockKind::Emerald
        }
    }
}

/// one tier of a generation pass: rows `[top_row, bottom_row)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tier {
    pub top_row: usize,
    pub bottom_row: usize,
    pub mix: TierMix,
}

/* ===========================================================
   tier generator
   =========================================================== */
/// Fill rows `[top_row, bottom_row)` with the tier's mix, then roll every
/// cell of the same range for a cave seed. Returns how many caves were
/// carved.
pub fn generate_tier(
    grid: &mut TerrainGrid,
    top_row: usize,
    bottom_row: usize,
    mix: TierMix,
    rng: &mut impl RandomSource,
) -> usize {
    let bottom_row = bottom_row.min(grid.row_count());
    let cols = grid.col_count();

    /* material pass */
    for row in top_row..bottom_row {
        for col in 0..cols {
            let roll = rng.roll(MATERIAL_ROLL_RANGE);
            grid.put(row, col, mix.material_for(roll));
        }
    }

    /* cave pass */
    let mut caves = 0;
    for row in top_row..bottom_row {
        for col in 0..cols {
            if rng.roll(CAVE_SEED_RANGE) < CAVE_SEED_HITS {
                carve_cave(grid, row, col, rng);
                caves += 1;
            }
        }
    }
    caves
}

/* ===========================================================
   cave carver
   =========================================================== */
/// half‑open cell rectangle `[top, bottom) × [left, right)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaveBounds {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl CaveBounds {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.top..self.bottom).contains(&row) && (self.left..self.right).contains(&col)
    }
}

/// Clear a `CAVE_HEIGHT × CAVE_WIDTH` box whose top‑left is the seed (clamped
/// to the grid), then line it with stalactites and stalagmites left to right.
pub fn carve_cave(
    grid: &mut TerrainGrid,
    seed_row: usize,
    seed_col: usize,
    rng: &mut impl RandomSource,
) -> CaveBounds {
    let bounds = CaveBounds {
        top: seed_row,
        left: seed_col,
        bottom: (seed_row + CAVE_HEIGHT).min(grid.row_count()),
        right: (seed_col + CAVE_WIDTH).min(grid.col_count()),
    };
    if !grid.in_bounds(seed_row, seed_col) {
        return bounds;
    }

    /* open rectangle */
    for row in bounds.top..bounds.bottom {
        for col in bounds.left..bounds.right {
            grid.put(row, col, BlockKind::Air);
        }
    }

    /* decorations */
    let mut extra_space = rng.coin();
    let mut col = bounds.left;
    while col < bounds.right {
        if extra_space {
            col += 1;
            extra_space = false;
        }
        let anchor = if rng.coin() { Anchor::Ceiling } else { Anchor::Floor };
        let size = if rng.coin() { StalagSize::Big } else { StalagSize::Small };

        col += draw_stalag(grid, seed_row, col, bounds.bottom, bounds.right, size, anchor);
        col += 1;
    }

    debug!(row = seed_row, col = seed_col, ?bounds, "carved cave");
    bounds
}

/* ===========================================================
   stalactite / stalagmite shaper
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StalagSize {
    Big,
    Small,
}

impl StalagSize {
    /// rows drawn in each successive column
    pub fn profile(self) -> &'static [usize] {
        match self {
            StalagSize::Big => &BIG_STALAG_PROFILE,
            StalagSize::Small => &SMALL_STALAG_PROFILE,
        }
    }

    /// columns the caller skips after drawing, truncated or not
    pub fn stride(self) -> usize {
        match self {
            StalagSize::Big => BIG_STALAG_STRIDE,
            StalagSize::Small => SMALL_STALAG_STRIDE,
        }
    }
}

/// ceiling = stalactite hanging from `seed_row`, floor = stalagmite standing
/// on `end_row - 1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Ceiling,
    Floor,
}

/// Draw one tapered column starting at `seed_col` inside
/// `[seed_row, end_row) × [.., end_col)`.
///
/// Stops at the first column that would reach `end_col` or need a row
/// outside the row range; columns already drawn stay. Always returns the
/// nominal stride of the shape, even when cut short.
pub fn draw_stalag(
    grid: &mut TerrainGrid,
    seed_row: usize,
    seed_col: usize,
    end_row: usize,
    end_col: usize,
    size: StalagSize,
    anchor: Anchor,
) -> usize {
    let end_row = end_row.min(grid.row_count());
    let end_col = end_col.min(grid.col_count());

    for (i, &height) in size.profile().iter().enumerate() {
        let col = seed_col + i;
        if col >= end_col {
            break;
        }
        let rows = match anchor {
            Anchor::Ceiling => {
                let last = seed_row + height - 1;
                if last >= end_row {
                    break;
                }
                seed_row..=last
            }
            Anchor::Floor => {
                let Some(top) = end_row.checked_sub(height) else { break };
                if top < seed_row {
                    break;
                }
                top..=end_row - 1
            }
        };
        for row in rows {
            grid.put(row, col, STALAG_BLOCK);
        }
    }
    size.stride()
}

/* ===========================================================
   builder
   =========================================================== */
/// Builds a whole [`TerrainGrid`] from a config and a random source.
pub struct TerrainBuilder<R = ThreadRng> {
    dims: Dimensions,
    rng: R,
}

impl TerrainBuilder<ThreadRng> {
    pub fn new(config: TerrainConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: RandomSource> TerrainBuilder<R> {
    pub fn with_rng(config: TerrainConfig, rng: R) -> Self {
        Self { dims: config.resolve(), rng }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// tiers used by [`generate`](Self::generate)
    pub fn default_tiers(&self) -> Vec<Tier> {
        vec![Tier { top_row: TIER_TOP_ROW, bottom_row: self.dims.rows, mix: DEEP_TIER }]
    }

    /// Loading saved terrain has no format yet.
    pub fn load_terrain(&self, path: impl AsRef<Path>) -> TerrainResult<TerrainGrid> {
        error!(path = %path.as_ref().display(), "load_terrain is not implemented");
        Err(TerrainError::NotImplemented("loading terrain from a file"))
    }

    /// air sky, one grass row, then the default deep tier down to the bottom
    pub fn generate(&mut self) -> TerrainGrid {
        let tiers = self.default_tiers();
        self.generate_with_tiers(&tiers)
    }

    pub fn generate_with_tiers(&mut self, tiers: &[Tier]) -> TerrainGrid {
        let mut grid = TerrainGrid::from_dimensions(self.dims);

        /* grass surface (everything above stays air) */
        if GRASS_ROW < grid.row_count() {
            for col in 0..grid.col_count() {
                grid.put(GRASS_ROW, col, grass_block(&mut self.rng));
            }
        }

        let mut caves = 0;
        for tier in tiers {
            caves += generate_tier(&mut grid, tier.top_row, tier.bottom_row, tier.mix, &mut self.rng);
        }

        info!(
            rows = grid.row_count(),
            cols = grid.col_count(),
            block_size = grid.block_size(),
            tiers = tiers.len(),
            caves,
            "terrain generated"
        );
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Layer;
    use crate::random::ScriptedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(rows: usize, cols: usize) -> TerrainGrid {
        TerrainGrid::new(TerrainConfig::new(rows as i64, cols as i64, 16))
    }

    fn stone_grid(rows: usize, cols: usize) -> TerrainGrid {
        let mut g = grid(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                g.put(row, col, BlockKind::SmoothStone);
            }
        }
        g
    }

    fn mid(g: &TerrainGrid, row: usize, col: usize) -> BlockKind {
        g.kind(Layer::Midground, row, col).unwrap()
    }

    fn column_height_from_top(g: &TerrainGrid, col: usize) -> usize {
        (0..g.row_count()).take_while(|&r| mid(g, r, col) == STALAG_BLOCK).count()
    }

    /* ---------- tier mix ---------- */
    #[test]
    fn stone_band_includes_its_threshold() {
        assert_eq!(DEEP_TIER.material_for(0), BlockKind::RoughStone);
        assert_eq!(DEEP_TIER.material_for(895), BlockKind::RoughStone);
        assert_eq!(DEEP_TIER.material_for(896), BlockKind::Iron);
        assert_eq!(DEEP_TIER.material_for(970), BlockKind::Iron);
        assert_eq!(DEEP_TIER.material_for(971), BlockKind::Gold);
        assert_eq!(DEEP_TIER.material_for(990), BlockKind::Gold);
        assert_eq!(DEEP_TIER.material_for(991), BlockKind::Emerald);
        assert_eq!(DEEP_TIER.material_for(999), BlockKind::Emerald);
    }

    #[test]
    fn shallow_tier_thresholds() {
        assert_eq!(SHALLOW_TIER.material_for(925), BlockKind::RoughStone);
        assert_eq!(SHALLOW_TIER.material_for(980), BlockKind::Iron);
        assert_eq!(SHALLOW_TIER.material_for(995), BlockKind::Gold);
        assert_eq!(SHALLOW_TIER.material_for(996), BlockKind::Emerald);
    }

    #[test]
    fn huge_weights_do_not_overflow_thresholds() {
        let all_stone = TierMix::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(all_stone.material_for(999), BlockKind::RoughStone);

        let iron_heavy = TierMix::new(0, u32::MAX, u32::MAX, 0);
        assert_eq!(iron_heavy.material_for(0), BlockKind::RoughStone);
        assert_eq!(iron_heavy.material_for(999), BlockKind::Iron);

        let gold_heavy = TierMix::new(10, 10, u32::MAX, 0);
        assert_eq!(gold_heavy.material_for(999), BlockKind::Gold);
    }

    /* ---------- tier generator ---------- */
    #[test]
    fn tier_fills_only_its_rows() {
        let mut g = grid(20, 10);
        // 0.5 → material 500 (stone), cave roll 4500 (no cave)
        let mut rng = ScriptedRandom::constant(0.5);
        let caves = generate_tier(&mut g, 5, 12, DEEP_TIER, &mut rng);

        assert_eq!(caves, 0);
        for (row, _, kind) in g.cells(Layer::Midground) {
            if (5..12).contains(&row) {
                assert_eq!(kind, BlockKind::RoughStone);
            } else {
                assert_eq!(kind, BlockKind::Air);
            }
        }
    }

    #[test]
    fn tier_bottom_is_clamped_to_the_grid() {
        let mut g = grid(8, 4);
        let mut rng = ScriptedRandom::constant(0.5);
        generate_tier(&mut g, 6, 100, DEEP_TIER, &mut rng);
        assert!(g.cells(Layer::Midground).all(|(r, _, k)| (r >= 6) == !k.is_air()));
    }

    #[test]
    fn random_tier_holds_only_tier_materials() {
        let mut g = grid(120, 60);
        for col in 0..60 {
            g.put(9, col, BlockKind::Coal);
        }
        let mut rng = StdRng::seed_from_u64(11);
        generate_tier(&mut g, 10, 120, DEEP_TIER, &mut rng);

        for (row, _, kind) in g.cells(Layer::Midground) {
            match row {
                0..=8 => assert_eq!(kind, BlockKind::Air),
                9 => assert_eq!(kind, BlockKind::Coal),
                _ => assert!(matches!(
                    kind,
                    BlockKind::Air
                        | BlockKind::RoughStone
                        | BlockKind::Iron
                        | BlockKind::Gold
                        | BlockKind::Emerald
                )),
            }
        }
    }

    /* ---------- cave carver ---------- */
    #[test]
    fn cave_with_small_stalagmites() {
        let mut g = stone_grid(20, 40);
        // every coin lands 0: no extra space, floor‑standing, small
        let mut rng = ScriptedRandom::constant(0.0);
        let bounds = carve_cave(&mut g, 5, 5, &mut rng);
        assert_eq!(bounds, CaveBounds { top: 5, left: 5, bottom: 11, right: 30 });

        // shapes start at 5, 9, 13, ... (stride 3 plus the loop step)
        for start in [5, 9, 13, 17, 21, 25] {
            assert_eq!(mid(&g, 10, start), STALAG_BLOCK);
            assert_eq!(mid(&g, 9, start), BlockKind::Air);
            assert_eq!(mid(&g, 10, start + 1), STALAG_BLOCK);
            assert_eq!(mid(&g, 9, start + 1), STALAG_BLOCK);
            assert_eq!(mid(&g, 8, start + 1), BlockKind::Air);
            assert_eq!(mid(&g, 10, start + 2), STALAG_BLOCK);
            assert_eq!(mid(&g, 9, start + 2), BlockKind::Air);
            // gap column
            for row in 5..11 {
                assert_eq!(mid(&g, row, start + 3), BlockKind::Air);
            }
        }
        // last shape is cut by the right edge after one column
        assert_eq!(mid(&g, 10, 29), STALAG_BLOCK);

        // upper cave rows never decorated
        for row in 5..9 {
            for col in 5..30 {
                assert_eq!(mid(&g, row, col), BlockKind::Air);
            }
        }
        // outside the box untouched
        for (row, col, kind) in g.cells(Layer::Midground) {
            if !bounds.contains(row, col) {
                assert_eq!(kind, BlockKind::SmoothStone);
            }
        }
    }

    #[test]
    fn cave_with_extra_space_and_big_stalactites() {
        let mut g = stone_grid(10, 40);
        // every coin lands 1: skip first column, ceiling‑hanging, big
        let mut rng = ScriptedRandom::constant(0.75);
        carve_cave(&mut g, 0, 0, &mut rng);

        for row in 0..6 {
            assert_eq!(mid(&g, row, 0), BlockKind::Air);
        }
        // shapes at 1, 8, 15, 22 (stride 6 plus the loop step)
        for start in [1, 8, 15] {
            let heights: Vec<usize> =
                (start..start + 5).map(|c| column_height_from_top(&g, c)).collect();
            assert_eq!(heights, vec![1, 2, 3, 2, 1]);
            assert_eq!(column_height_from_top(&g, start + 5), 0);
            assert_eq!(column_height_from_top(&g, start + 6), 0);
        }
        // the shape at 22 is cut at the right edge (col 25)
        assert_eq!(column_height_from_top(&g, 22), 1);
        assert_eq!(column_height_from_top(&g, 23), 2);
        assert_eq!(column_height_from_top(&g, 24), 3);

        for col in 0..25 {
            assert_eq!(mid(&g, 5, col), BlockKind::Air);
        }
        // below and right of the box untouched
        assert_eq!(mid(&g, 6, 0), BlockKind::SmoothStone);
        assert_eq!(mid(&g, 0, 25), BlockKind::SmoothStone);
    }

    #[test]
    fn cave_near_the_corner_is_clamped() {
        let mut g = stone_grid(8, 10);
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = carve_cave(&mut g, 6, 4, &mut rng);
        assert_eq!(bounds, CaveBounds { top: 6, left: 4, bottom: 8, right: 10 });
        for (row, col, kind) in g.cells(Layer::Midground) {
            if bounds.contains(row, col) {
                assert!(matches!(kind, BlockKind::Air | BlockKind::RoughStone));
            } else {
                assert_eq!(kind, BlockKind::SmoothStone);
            }
        }
    }

    #[test]
    fn cave_seed_outside_the_grid_is_a_no_op() {
        let mut g = stone_grid(4, 4);
        let before = g.clone();
        let mut rng = StdRng::seed_from_u64(1);
        carve_cave(&mut g, 4, 0, &mut rng);
        assert_eq!(g, before);
    }

    /* ---------- stalag shaper ---------- */
    #[test]
    fn big_stalactite_tapers_from_the_ceiling() {
        let mut g = grid(10, 10);
        let used = draw_stalag(&mut g, 0, 0, 10, 10, StalagSize::Big, Anchor::Ceiling);
        assert_eq!(used, 6);

        let heights: Vec<usize> = (0..6).map(|c| column_height_from_top(&g, c)).collect();
        assert_eq!(heights, vec![1, 2, 3, 2, 1, 0]);
        let solid = g.cells(Layer::Midground).filter(|(_, _, k)| !k.is_air()).count();
        assert_eq!(solid, 9);
    }

    #[test]
    fn big_stalagmite_stands_on_the_floor() {
        let mut g = grid(10, 10);
        let used = draw_stalag(&mut g, 2, 3, 10, 10, StalagSize::Big, Anchor::Floor);
        assert_eq!(used, 6);
        for (col, height) in [(3, 1), (4, 2), (5, 3), (6, 2), (7, 1)] {
            for row in 0..10 {
                let expect = if row >= 10 - height { STALAG_BLOCK } else { BlockKind::Air };
                assert_eq!(mid(&g, row, col), expect, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn small_shapes_return_three() {
        let mut g = grid(6, 6);
        assert_eq!(draw_stalag(&mut g, 0, 0, 6, 6, StalagSize::Small, Anchor::Ceiling), 3);
        assert_eq!(draw_stalag(&mut g, 0, 3, 6, 6, StalagSize::Small, Anchor::Floor), 3);
        let heights: Vec<usize> = (0..3).map(|c| column_height_from_top(&g, c)).collect();
        assert_eq!(heights, vec![1, 2, 1]);
        assert_eq!(mid(&g, 5, 3), STALAG_BLOCK);
        assert_eq!(mid(&g, 4, 4), STALAG_BLOCK);
        assert_eq!(mid(&g, 4, 5), BlockKind::Air);
    }

    #[test]
    fn truncated_by_end_col_still_returns_nominal_width() {
        let mut g = grid(10, 10);
        let used = draw_stalag(&mut g, 0, 0, 10, 3, StalagSize::Big, Anchor::Ceiling);
        assert_eq!(used, 6);
        let heights: Vec<usize> = (0..5).map(|c| column_height_from_top(&g, c)).collect();
        assert_eq!(heights, vec![1, 2, 3, 0, 0]);
    }

    #[test]
    fn truncated_by_shallow_rows_keeps_drawn_columns() {
        // two rows: the third column would need a third row
        let mut g = grid(10, 10);
        let used = draw_stalag(&mut g, 0, 0, 2, 10, StalagSize::Big, Anchor::Ceiling);
        assert_eq!(used, 6);
        let heights: Vec<usize> = (0..5).map(|c| column_height_from_top(&g, c)).collect();
        assert_eq!(heights, vec![1, 2, 0, 0, 0]);

        let mut g = grid(10, 10);
        draw_stalag(&mut g, 8, 0, 10, 10, StalagSize::Big, Anchor::Floor);
        assert_eq!(mid(&g, 9, 0), STALAG_BLOCK);
        assert_eq!(mid(&g, 9, 1), STALAG_BLOCK);
        assert_eq!(mid(&g, 8, 1), STALAG_BLOCK);
        assert!((2..5).all(|c| (0..10).all(|r| mid(&g, r, c).is_air())));
        assert!((0..8).all(|r| mid(&g, r, 1).is_air()));
    }

    /* ---------- builder ---------- */
    #[test]
    fn builder_surface_layout() {
        let config = TerrainConfig::new(40, 30, 16);
        let grid = TerrainBuilder::with_rng(config, StdRng::seed_from_u64(9)).generate();

        for (row, _, kind) in grid.cells(Layer::Midground) {
            match row {
                0..=8 => assert!(kind.is_air()),
                9 => assert!(crate::block::is_grass_block(kind)),
                _ => assert!(!crate::block::is_grass_block(kind)),
            }
        }
        for layer in [Layer::Background, Layer::Foreground] {
            assert!(grid.cells(layer).all(|(_, _, k)| k.is_air()));
        }
    }

    #[test]
    fn tiny_grid_skips_missing_rows() {
        let config = TerrainConfig::new(5, 3, 16);
        let grid = TerrainBuilder::with_rng(config, StdRng::seed_from_u64(2)).generate();
        assert!(grid.cells(Layer::Midground).all(|(_, _, k)| k.is_air()));
    }

    #[test]
    fn custom_tier_stack() {
        let config = TerrainConfig::new(30, 8, 16);
        let mut builder = TerrainBuilder::with_rng(config, ScriptedRandom::constant(0.5));
        let tiers = [
            Tier { top_row: 10, bottom_row: 20, mix: SHALLOW_TIER },
            Tier { top_row: 20, bottom_row: 30, mix: TierMix::new(0, 0, 0, 1000) },
        ];
        let grid = builder.generate_with_tiers(&tiers);
        assert_eq!(mid(&grid, 15, 3), BlockKind::RoughStone);
        assert_eq!(mid(&grid, 25, 3), BlockKind::Emerald);
    }

    #[test]
    fn loading_from_file_is_not_implemented() {
        let builder = TerrainBuilder::with_rng(TerrainConfig::default(), StdRng::seed_from_u64(0));
        assert_eq!(
            builder.load_terrain("cavern.map"),
            Err(TerrainError::NotImplemented("loading terrain from a file"))
        );
    }
}
