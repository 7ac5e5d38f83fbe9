//! error type shared by the terrain core

use thiserror::Error;

pub type TerrainResult<T> = Result<T, TerrainError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },

    #[error("variant group has no entries")]
    EmptyVariantGroup,

    #[error("variant group weights sum to zero")]
    ZeroTotalWeight,

    #[error("variant group weights sum past u32::MAX")]
    WeightOverflow,
}
