//! # Terrain Module
//!
//! Fills a fresh world from a seeded height function.
//!
//! ## Column Layering
//!
//! For each `(x, z)` column the height source is sampled at
//! `(x / scale, z / scale)`, scaled by `magnitude`, shifted by `offset`,
//! multiplied by the world height and clamped to `[0, total_height]`. The
//! column is then filled bottom-up:
//!
//! | y                  | block   |
//! |--------------------|---------|
//! | `y == height`      | grass   |
//! | `y == height - 1`  | dirt    |
//! | `0 < y < height`   | stone   |
//! | `y == 0`           | bedrock |
//! | otherwise          | air     |
//!
//! The rules are checked in that order, so a height of 1 puts dirt at the
//! bottom instead of bedrock.
//!
//! Slots are allocated in one pass after every column is filled, since
//! exposure depends on the final terrain.

use cgmath::Point3;
use log::info;
use noise::{NoiseFn, Perlin};

use super::block::block_type::BlockType;
use super::grid::VoxelGrid;
use super::world::World;
use crate::config::{TerrainConfig, WorldConfig};
use crate::engine_state::buffer_state::EditReport;
use crate::error::WorldResult;

/// A deterministic 2D height function, sampled before scaling.
///
/// Values are expected to be roughly in `[-1, 1]`, as noise functions produce.
pub trait HeightSource {
    fn height_at(&self, x: f64, z: f64) -> f64;
}

impl<F> HeightSource for F
where
    F: Fn(f64, f64) -> f64,
{
    fn height_at(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

/// Perlin noise height source. Same seed, same terrain.
pub struct PerlinHeight {
    perlin: Perlin,
}

impl PerlinHeight {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl HeightSource for PerlinHeight {
    fn height_at(&self, x: f64, z: f64) -> f64 {
        self.perlin.get([x, z])
    }
}

pub struct TerrainGenerator<H = PerlinHeight> {
    height_source: H,
    terrain: TerrainConfig,
}

impl TerrainGenerator<PerlinHeight> {
    /// A Perlin generator seeded and shaped by `config`.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(PerlinHeight::new(config.seed), config.terrain.clone())
    }
}

impl<H: HeightSource> TerrainGenerator<H> {
    pub fn new(height_source: H, terrain: TerrainConfig) -> Self {
        Self {
            height_source,
            terrain,
        }
    }

    /// Surface height of the column at `(x, z)`, clamped to `[0, total_height]`.
    pub fn column_height(&self, x: i32, z: i32, total_height: i32) -> i32 {
        let sample = self.height_source.height_at(
            x as f64 / self.terrain.scale,
            z as f64 / self.terrain.scale,
        );
        let scaled = sample * self.terrain.magnitude + self.terrain.offset;
        let height = (scaled * total_height as f64).floor();
        if height.is_nan() {
            return 0;
        }
        // The float-to-int cast saturates, so huge samples land on the clamp bounds.
        (height as i32).clamp(0, total_height)
    }

    /// The block at height `y` of a column whose surface is at `height`.
    pub fn layer_at(height: i32, y: i32) -> BlockType {
        if y == height {
            BlockType::GRASS
        } else if y == height - 1 {
            BlockType::DIRT
        } else if 0 < y && y < height {
            BlockType::STONE
        } else if y == 0 {
            BlockType::BEDROCK
        } else {
            BlockType::AIR
        }
    }

    /// Writes block types for every column. Slots are left untouched.
    pub fn fill(&self, grid: &mut VoxelGrid) {
        let (size_x, total_height, size_z) = grid.dimensions();
        for x in 0..size_x {
            for z in 0..size_z {
                let height = self.column_height(x, z, total_height);
                for y in 0..total_height {
                    grid.set_type(Point3::new(x, y, z), Self::layer_at(height, y));
                }
            }
        }
    }

    /// Builds a world from `config`: fills the terrain, then gives every
    /// exposed block a slot.
    ///
    /// # Returns
    ///
    /// The world and the slot writes a renderer needs to draw it.
    pub fn generate(&self, config: WorldConfig) -> WorldResult<(World, EditReport)> {
        let mut world = World::empty(config)?;
        self.fill(world.grid_mut());
        let report = world.show_all_exposed();

        let (size_x, total_height, size_z) = world.grid().dimensions();
        info!(
            "Generated {}x{}x{} terrain with {} visible blocks",
            size_x,
            total_height,
            size_z,
            world.registry().total_count()
        );
        Ok((world, report))
    }
}
