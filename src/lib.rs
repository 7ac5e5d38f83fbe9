//! cavern terrain core: block catalog, tiered cave generation & the
//! three‑layer tile grid that rendering / physics / mining read from
//!
//! Nothing in here depends on the engine; the demo binary wraps it.

pub mod block;
pub mod constants;
pub mod error;
pub mod grid;
pub mod random;
pub mod world_gen;

pub use block::{BlockKind, WeightedVariantGroup};
pub use error::{TerrainError, TerrainResult};
pub use grid::{Dimensions, Layer, TerrainConfig, TerrainGrid};
pub use random::RandomSource;
pub use world_gen::{TerrainBuilder, Tier, TierMix};
