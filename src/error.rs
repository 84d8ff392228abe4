//! Error types for plant generation.

use thiserror::Error;

/// Everything that can abort a plant build.
///
/// All variants are structural: a build that fails never hands out a partial mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    /// A `]` popped the root turtle state, or branches were left open at the end of the string.
    ///
    /// `position` is the index of the offending symbol (the string length for open branches),
    /// `unclosed` is the number of `[` still open (0 for an extra `]`).
    #[error("turtle stack underflow at symbol {position} ({unclosed} unclosed branches)")]
    StackUnderflow { position: usize, unclosed: usize },

    /// The flower asset was never delivered by its loader.
    #[error("flower mesh asset is not available")]
    MissingAsset,

    /// The mesh outgrew 32-bit indices.
    #[error("mesh has more than u32::MAX vertices ({vertices})")]
    IndexOverflow { vertices: usize },

    #[error("invalid flower mesh: {0}")]
    InvalidFlowerMesh(String),
}

pub type PlantResult<T> = Result<T, PlantError>;
