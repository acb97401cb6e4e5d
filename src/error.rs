//! # Error Module
//!
//! Errors reported to callers of the world. Out-of-bounds access is not an
//! error anywhere in the crate: reads answer air and edits are no-ops.
//! Running a slot pool past its capacity is a sizing bug and panics.

use std::fmt;

use cgmath::Point3;
use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockType;

/// Result alias used throughout the crate.
pub type WorldResult<T> = Result<T, WorldError>;

#[derive(Debug, Error)]
pub enum WorldError {
    /// The edit was rejected and the world is unchanged.
    #[error("invalid edit at {position:?}: {reason}")]
    InvalidEdit {
        position: Point3<i32>,
        reason: InvalidEditReason,
    },

    #[error("unknown block type '{0}'")]
    UnknownBlockType(String),

    #[error("invalid resource location '{location}': {reason}")]
    InvalidResourceLocation { location: String, reason: String },

    #[error("invalid world config: {0}")]
    InvalidConfig(String),

    #[error("failed to read world config")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse world config")]
    ConfigParse(#[from] serde_json::Error),
}

/// Why an edit was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidEditReason {
    /// Break targeted an air cell.
    BreakAir,
    /// Place targeted a cell that already holds the given block.
    PlaceOccupied(BlockType),
    /// Place was asked to put air.
    PlaceAir,
}

impl fmt::Display for InvalidEditReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidEditReason::BreakAir => write!(f, "nothing to break"),
            InvalidEditReason::PlaceOccupied(block_type) => {
                write!(f, "cell is occupied by {}", block_type)
            }
            InvalidEditReason::PlaceAir => write!(f, "cannot place air"),
        }
    }
}

impl WorldError {
    pub(crate) fn invalid_edit(position: Point3<i32>, reason: InvalidEditReason) -> Self {
        WorldError::InvalidEdit { position, reason }
    }
}
