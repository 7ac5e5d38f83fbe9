//! block kinds & weighted picking among the visual variants of a family
//!
//! Every kind except [`BlockKind::Air`] maps onto one tileset index. Air is
//! the empty cell and has no index at all, so it can never be mistaken for
//! index 0 (plain grass).

use std::borrow::Cow;

use crate::error::{TerrainError, TerrainResult};
use crate::random::RandomSource;

/* ===========================================================
   kinds
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Air,
    GrassPlain,
    GrassBony,
    GrassBloody,
    GrassRocky,
    DirtPlain,
    DirtWavy,
    DirtBony,
    DirtRocky,
    RoughStone,
    SmoothStone,
    Iron,
    Coal,
    Diamond,
    Gold,
    Emerald,
    Sapphire,
    Copper,
    Ruby,
}

impl BlockKind {
    /// every solid kind, in tileset order
    pub const SOLID: [BlockKind; 18] = [
        BlockKind::GrassPlain,
        BlockKind::GrassBony,
        BlockKind::GrassBloody,
        BlockKind::GrassRocky,
        BlockKind::DirtPlain,
        BlockKind::DirtWavy,
        BlockKind::DirtBony,
        BlockKind::DirtRocky,
        BlockKind::RoughStone,
        BlockKind::SmoothStone,
        BlockKind::Iron,
        BlockKind::Coal,
        BlockKind::Diamond,
        BlockKind::Gold,
        BlockKind::Emerald,
        BlockKind::Sapphire,
        BlockKind::Copper,
        BlockKind::Ruby,
    ];

    /// tileset index; `None` for air
    pub fn tile_index(self) -> Option<u32> {
        let idx = match self {
            BlockKind::Air => return None,
            BlockKind::GrassPlain => 0,
            BlockKind::GrassBony => 1,
            BlockKind::GrassBloody => 2,
            BlockKind::GrassRocky => 3,
            BlockKind::DirtPlain => 4,
            BlockKind::DirtWavy => 5,
            BlockKind::DirtBony => 6,
            BlockKind::DirtRocky => 7,
            BlockKind::RoughStone => 8,
            BlockKind::SmoothStone => 9,
            BlockKind::Iron => 10,
            BlockKind::Coal => 11,
            BlockKind::Diamond => 12,
            BlockKind::Gold => 13,
            BlockKind::Emerald => 14,
            BlockKind::Sapphire => 15,
            BlockKind::Copper => 16,
            BlockKind::Ruby => 17,
        };
        Some(idx)
    }

    /// inverse of [`tile_index`](Self::tile_index); `-1` is the empty marker
    /// used by tile layers
    pub fn from_tile_index(index: i32) -> Option<BlockKind> {
        if index == -1 {
            return Some(BlockKind::Air);
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::SOLID.get(i).copied())
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockKind::Air
    }

    pub fn is_ore(self) -> bool {
        matches!(
            self,
            BlockKind::Iron
                | BlockKind::Coal
                | BlockKind::Diamond
                | BlockKind::Gold
                | BlockKind::Emerald
                | BlockKind::Sapphire
                | BlockKind::Copper
                | BlockKind::Ruby
        )
    }
}

/* ===========================================================
   weighted variant groups
   =========================================================== */
/// Ordered `(kind, weight)` pairs for one block family. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedVariantGroup {
    entries: Cow<'static, [(BlockKind, u32)]>,
}

impl WeightedVariantGroup {
    pub fn new(entries: Vec<(BlockKind, u32)>) -> TerrainResult<Self> {
        if entries.is_empty() {
            return Err(TerrainError::EmptyVariantGroup);
        }
        let total = entries
            .iter()
            .try_fold(0u32, |acc, &(_, w)| acc.checked_add(w))
            .ok_or(TerrainError::WeightOverflow)?;
        if total == 0 {
            return Err(TerrainError::ZeroTotalWeight);
        }
        Ok(Self { entries: Cow::Owned(entries) })
    }

    /// for compile‑time tables; the caller guarantees a positive weight
    const fn from_static(entries: &'static [(BlockKind, u32)]) -> Self {
        Self { entries: Cow::Borrowed(entries) }
    }

    pub fn entries(&self) -> &[(BlockKind, u32)] {
        &self.entries
    }

    /// never overflows: `new` rejects totals past `u32::MAX`
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Draws `t = floor(u * total)` and returns the first entry whose running
    /// weight is `>= t`.
    ///
    /// The `>=` hands each cumulative boundary to the entry that reaches it,
    /// so the first entry wins one extra unit and the entry after each
    /// boundary loses one. Grass {8,1,2,5} comes out 9:1:2:4 over 16.
    pub fn sample(&self, rng: &mut impl RandomSource) -> BlockKind {
        let threshold = rng.roll(self.total_weight());
        let mut accumulate = 0;
        for &(kind, weight) in self.entries.iter() {
            accumulate += weight;
            if accumulate >= threshold {
                return kind;
            }
        }
        // unreachable while threshold < total
        self.entries[self.entries.len() - 1].0
    }

    /// true iff `kind` is listed in this group
    pub fn contains(&self, kind: BlockKind) -> bool {
        self.entries.iter().any(|&(k, _)| k == kind)
    }
}

pub const GRASS: WeightedVariantGroup = WeightedVariantGroup::from_static(&[
    (BlockKind::GrassPlain, 8),
    (BlockKind::GrassBony, 1),
    (BlockKind::GrassBloody, 2),
    (BlockKind::GrassRocky, 5),
]);

pub const DIRT: WeightedVariantGroup = WeightedVariantGroup::from_static(&[
    (BlockKind::DirtPlain, 8),
    (BlockKind::DirtWavy, 3),
    (BlockKind::DirtBony, 1),
    (BlockKind::DirtRocky, 5),
]);

/* ---------- catalog helpers ---------- */
#[inline]
pub fn sample_variant(group: &WeightedVariantGroup, rng: &mut impl RandomSource) -> BlockKind {
    group.sample(rng)
}

#[inline]
pub fn is_of_family(kind: BlockKind, group: &WeightedVariantGroup) -> bool {
    group.contains(kind)
}

pub fn grass_block(rng: &mut impl RandomSource) -> BlockKind {
    GRASS.sample(rng)
}

pub fn dirt_block(rng: &mut impl RandomSource) -> BlockKind {
    DIRT.sample(rng)
}

pub fn is_grass_block(kind: BlockKind) -> bool {
    GRASS.contains(kind)
}

pub fn is_dirt_block(kind: BlockKind) -> bool {
    DIRT.contains(kind)
}
