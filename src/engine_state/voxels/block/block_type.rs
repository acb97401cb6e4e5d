//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion and
//! name lookup.

use std::fmt;

use num_derive::FromPrimitive;

use super::resource_location::ResourceLocation;
use super::{BlockTypeSize, BLOCK_NAMES};
use crate::error::{WorldError, WorldResult};

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block. Every variant except
/// `AIR` owns a render slot pool. The `FromPrimitive` derive allows
/// conversion from the compact `BlockTypeSize` form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never rendered and never owns a slot.
    AIR,

    /// The surface layer of generated terrain.
    GRASS,

    /// The layer directly below grass.
    DIRT,

    /// A transparent building block. Occludes like any other solid block.
    GLASS,

    /// The bulk of generated terrain below the dirt layer.
    STONE,

    /// A placeable wooden log.
    LOG,

    /// A placeable wooden plank.
    PLANK,

    /// The bottom layer of generated terrain.
    BEDROCK,
}

impl BlockType {
    /// Number of block types, including `AIR`.
    pub const COUNT: usize = 8;

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value doesn't correspond to a variant.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Resolves a block type from its id, either a bare key (`"grass"`) or a
    /// full resource location (`"mc:grass"`).
    ///
    /// # Errors
    /// `InvalidResourceLocation` if `name` is not a well-formed id, and
    /// `UnknownBlockType` if it names no block.
    pub fn from_name(name: &str) -> WorldResult<Self> {
        let location: ResourceLocation = name.parse()?;
        Self::from_location(&location)
    }

    pub fn from_location(location: &ResourceLocation) -> WorldResult<Self> {
        if !location.is_default_namespace() {
            return Err(WorldError::UnknownBlockType(location.to_string()));
        }
        BLOCK_NAMES
            .get(location.path())
            .copied()
            .ok_or_else(|| WorldError::UnknownBlockType(location.to_string()))
    }

    /// The namespaced id of this block type, `mc:<name>`.
    pub fn location(self) -> ResourceLocation {
        ResourceLocation::builtin(self.name())
    }

    /// The string key of this block type.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::AIR => "air",
            BlockType::GRASS => "grass",
            BlockType::DIRT => "dirt",
            BlockType::GLASS => "glass",
            BlockType::STONE => "stone",
            BlockType::LOG => "log",
            BlockType::PLANK => "plank",
            BlockType::BEDROCK => "bedrock",
        }
    }

    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }

    /// Every block type that can be rendered, in storage order.
    pub fn all_solid() -> impl Iterator<Item = BlockType> {
        (1..Self::COUNT as BlockTypeSize).filter_map(Self::from_int)
    }

    /// Picks a random block type (excluding `AIR`).
    ///
    /// Used by tooling and randomised edit sequences; pass a seeded generator
    /// for reproducible output.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        Self::from_int(rng.u8(1..Self::COUNT as BlockTypeSize)).unwrap_or(BlockType::STONE)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_phf_table() {
        for block_type in BlockType::all_solid() {
            assert_eq!(BlockType::from_name(block_type.name()).unwrap(), block_type);
        }
        assert_eq!(BlockType::from_name("air").unwrap(), BlockType::AIR);
    }

    #[test]
    fn bare_and_namespaced_ids_resolve_alike() {
        assert_eq!(BlockType::from_name("grass").unwrap(), BlockType::GRASS);
        assert_eq!(BlockType::from_name("mc:grass").unwrap(), BlockType::GRASS);
        for block_type in BlockType::all_solid() {
            let location = block_type.location();
            assert_eq!(location.to_string(), format!("mc:{}", block_type.name()));
            assert_eq!(BlockType::from_name(&location.to_string()).unwrap(), block_type);
            assert_eq!(BlockType::from_location(&location).unwrap(), block_type);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            BlockType::from_name("obsidian"),
            Err(WorldError::UnknownBlockType(name)) if name == "mc:obsidian"
        ));
        assert!(matches!(
            BlockType::from_name("mods:grass"),
            Err(WorldError::UnknownBlockType(name)) if name == "mods:grass"
        ));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for id in ["Grass", "mc:Grass", "grass!", "mc:", "mc:grass:x"] {
            assert!(
                matches!(
                    BlockType::from_name(id),
                    Err(WorldError::InvalidResourceLocation { .. })
                ),
                "{} should be rejected",
                id
            );
        }
    }

    #[test]
    fn all_solid_skips_air() {
        let solid: Vec<_> = BlockType::all_solid().collect();
        assert_eq!(solid.len(), BlockType::COUNT - 1);
        assert!(!solid.contains(&BlockType::AIR));
        assert_eq!(BlockType::from_int(BlockType::COUNT as BlockTypeSize), None);
    }

    #[test]
    fn random_solid_never_returns_air() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            assert_ne!(BlockType::random_solid(&mut rng), BlockType::AIR);
        }
    }
}
