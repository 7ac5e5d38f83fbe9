//! generation tunables & grid defaults

use crate::block::BlockKind;
use crate::world_gen::TierMix;

/// -------- grid defaults (used when the caller gives nothing usable) --------
pub const DEFAULT_ROW_COUNT: usize = 200;
pub const DEFAULT_COL_COUNT: usize = 100;
pub const DEFAULT_BLOCK_SIZE: u32  = 16;

/// -------- surface layout (row‑0 = top) --------
pub const GRASS_ROW: usize = 9;
pub const TIER_TOP_ROW: usize = GRASS_ROW + 1;

/// -------- tiers --------
pub const MATERIAL_ROLL_RANGE: u32 = 1000;

pub const SHALLOW_TIER: TierMix = TierMix::new(925, 55, 15, 5);
pub const DEEP_TIER: TierMix    = TierMix::new(895, 75, 20, 10);

/// -------- caves --------
pub const CAVE_HEIGHT: usize = 6;
pub const CAVE_WIDTH: usize  = 25;
pub const CAVE_SEED_RANGE: u32 = 9000;
pub const CAVE_SEED_HITS: u32  = 3; // seed when roll < hits → ~0.033 %

/// material of stalactites / stalagmites
pub const STALAG_BLOCK: BlockKind = BlockKind::RoughStone;
pub const BIG_STALAG_PROFILE: [usize; 5]   = [1, 2, 3, 2, 1];
pub const SMALL_STALAG_PROFILE: [usize; 3] = [1, 2, 1];
pub const BIG_STALAG_STRIDE: usize   = 6;
pub const SMALL_STALAG_STRIDE: usize = 3;
