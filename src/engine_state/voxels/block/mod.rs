//! # Block Module
//!
//! This module provides the block-related definitions for the voxel world:
//! the closed set of block types, their compact storage form, the name table
//! used to resolve the string keys found in configuration and tooling, the
//! namespaced identifiers those keys are written as, and the six block faces.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod resource_location;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data and as the index into
/// per-type tables such as the slot pool registry.
pub type BlockTypeSize = u8;

/// Maps the string key of each block type to its enum variant. Keys are
/// paths in the `mc` namespace.
///
/// The map is generated at compile time, so lookups are a perfect hash
/// with no runtime initialisation.
pub static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "air" => BlockType::AIR,
    "grass" => BlockType::GRASS,
    "dirt" => BlockType::DIRT,
    "glass" => BlockType::GLASS,
    "stone" => BlockType::STONE,
    "log" => BlockType::LOG,
    "plank" => BlockType::PLANK,
    "bedrock" => BlockType::BEDROCK,
};
