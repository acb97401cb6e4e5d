//! # Configuration Module
//!
//! World extents and terrain shaping parameters. Configuration is plain data
//! with serde support, so it can be loaded from a JSON file or built in code.
//!
//! ```json
//! {
//!     "size_x": 32,
//!     "size_z": 32,
//!     "surface_height": 16,
//!     "underground_depth": 16,
//!     "seed": 1,
//!     "terrain": { "scale": 30.0, "magnitude": 0.5, "offset": 0.2 },
//!     "max_reach": 8.0
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::rendering::SlotIndex;
use crate::error::{WorldError, WorldResult};

/// Shapes the height function sampled by the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Horizontal stretch of the noise. Larger values give flatter terrain.
    pub scale: f64,
    /// Multiplier applied to the raw noise value.
    pub magnitude: f64,
    /// Added after scaling; shifts the whole surface up or down.
    pub offset: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            scale: 30.0,
            magnitude: 0.5,
            offset: 0.2,
        }
    }
}

/// Extents and generation parameters of a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of cells along X.
    pub size_x: u32,
    /// Number of cells along Z.
    pub size_z: u32,
    /// Height of the band above the underground layers.
    pub surface_height: u32,
    /// Height of the underground band.
    pub underground_depth: u32,
    /// Seed of the height function. Same seed, same terrain.
    pub seed: u32,
    pub terrain: TerrainConfig,
    /// Furthest distance at which the player may break or place blocks.
    pub max_reach: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size_x: 32,
            size_z: 32,
            surface_height: 16,
            underground_depth: 16,
            seed: 1,
            terrain: TerrainConfig::default(),
            max_reach: 8.0,
        }
    }
}

impl WorldConfig {
    /// Total number of cells along Y. Saturates for configs that fail [`WorldConfig::validate`].
    pub fn total_height(&self) -> u32 {
        self.surface_height.saturating_add(self.underground_depth)
    }

    /// Number of cells in the world, which is also the capacity of every slot pool.
    /// Saturates for configs that fail [`WorldConfig::validate`].
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    fn checked_cell_count(&self) -> Option<usize> {
        let height = self.surface_height.checked_add(self.underground_depth)?;
        (self.size_x as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.size_z as usize)
    }

    pub fn from_json_str(json: &str) -> WorldResult<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> WorldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the extents describe a non-empty world and the terrain
    /// parameters can be sampled.
    pub fn validate(&self) -> WorldResult<()> {
        if self.surface_height.checked_add(self.underground_depth).is_none() {
            return Err(WorldError::InvalidConfig(format!(
                "world height overflows: {} + {}",
                self.surface_height, self.underground_depth
            )));
        }
        if self.size_x == 0 || self.size_z == 0 || self.total_height() == 0 {
            return Err(WorldError::InvalidConfig(format!(
                "world extents must be non-zero, got {}x{}x{}",
                self.size_x,
                self.total_height(),
                self.size_z
            )));
        }
        if i32::try_from(self.size_x.max(self.size_z).max(self.total_height())).is_err() {
            return Err(WorldError::InvalidConfig(
                "world extents must fit in i32 coordinates".to_string(),
            ));
        }
        // Slot indices address every cell of the world.
        match self.checked_cell_count() {
            Some(cells) if cells <= SlotIndex::MAX as usize => {}
            _ => {
                return Err(WorldError::InvalidConfig(format!(
                    "world of {}x{}x{} cells exceeds {} slots per block type",
                    self.size_x,
                    self.total_height(),
                    self.size_z,
                    SlotIndex::MAX
                )));
            }
        }
        if !self.terrain.scale.is_finite() || self.terrain.scale <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "terrain scale must be positive, got {}",
                self.terrain.scale
            )));
        }
        if !self.terrain.magnitude.is_finite() || !self.terrain.offset.is_finite() {
            return Err(WorldError::InvalidConfig(
                "terrain magnitude and offset must be finite".to_string(),
            ));
        }
        if !self.max_reach.is_finite() || self.max_reach <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "max reach must be positive, got {}",
                self.max_reach
            )));
        }
        Ok(())
    }
}
