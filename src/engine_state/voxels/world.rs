//! # World Module
//!
//! This module provides the `World` struct, the aggregate that owns all voxel
//! state: the configuration, the dense grid and the registry of render slot
//! pools. Every operation takes the world as its receiver; there is no
//! global state.
//!
//! ## Consistency
//!
//! For every active slot `i` of a pool there is exactly one grid cell of that
//! pool's type whose slot is `Some(i)`, and every non-air, exposed cell owns
//! exactly one slot. Edits keep this true after every single mutation;
//! [`World::check_consistency`] verifies it from scratch.

use cgmath::Point3;
use log::info;

use super::block::block_type::BlockType;
use super::grid::{VoxelGrid, VoxelState};
use super::occlusion;
use super::registry::BlockTypeRegistry;
use super::terrain::{HeightSource, TerrainGenerator};
use crate::config::WorldConfig;
use crate::engine_state::buffer_state::EditReport;
use crate::engine_state::rendering::RenderSlotPool;
use crate::error::WorldResult;

/// Live count and capacity of one pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolStats {
    pub block_type: BlockType,
    pub count: usize,
    pub capacity: usize,
}

pub struct World {
    config: WorldConfig,
    pub(super) grid: VoxelGrid,
    pub(super) registry: BlockTypeRegistry,
}

impl World {
    /// Creates an all-air world with empty pools.
    ///
    /// Every pool is sized to the number of cells in the world, the most
    /// slots a single block type could ever need.
    pub fn empty(config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        let grid = VoxelGrid::new(config.size_x, config.total_height(), config.size_z);
        let registry = BlockTypeRegistry::new(config.cell_count());
        info!(
            "Created {}x{}x{} world, {} slots per block type",
            config.size_x,
            config.total_height(),
            config.size_z,
            config.cell_count()
        );

        Ok(World {
            config,
            grid,
            registry,
        })
    }

    /// Generates Perlin terrain seeded from `config`.
    pub fn generate(config: WorldConfig) -> WorldResult<(Self, EditReport)> {
        TerrainGenerator::from_config(&config).generate(config)
    }

    /// Generates terrain from a custom height source.
    pub fn generate_with<H: HeightSource>(
        config: WorldConfig,
        height_source: H,
    ) -> WorldResult<(Self, EditReport)> {
        let terrain = config.terrain.clone();
        TerrainGenerator::new(height_source, terrain).generate(config)
    }

    /// Builds a world whose block at each position is `block_at(position)`,
    /// then gives every exposed block a slot.
    pub fn from_fn<F>(config: WorldConfig, mut block_at: F) -> WorldResult<(Self, EditReport)>
    where
        F: FnMut(Point3<i32>) -> BlockType,
    {
        let mut world = World::empty(config)?;
        let (size_x, total_height, size_z) = world.grid.dimensions();
        for y in 0..total_height {
            for z in 0..size_z {
                for x in 0..size_x {
                    let position = Point3::new(x, y, z);
                    world.grid.set_type(position, block_at(position));
                }
            }
        }
        let report = world.show_all_exposed();
        Ok((world, report))
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut VoxelGrid {
        &mut self.grid
    }

    pub fn registry(&self) -> &BlockTypeRegistry {
        &self.registry
    }

    /// The state at `position`; air with no slot when out of bounds.
    pub fn get(&self, position: Point3<i32>) -> VoxelState {
        self.grid.get(position)
    }

    /// The pool of `block_type`; `None` for air.
    pub fn pool(&self, block_type: BlockType) -> Option<&RenderSlotPool> {
        self.registry.pool(block_type)
    }

    pub fn stats(&self) -> Vec<PoolStats> {
        self.registry
            .pools()
            .map(|pool| PoolStats {
                block_type: pool.block_type(),
                count: pool.count(),
                capacity: pool.capacity(),
            })
            .collect()
    }

    /// Number of cells of `block_type` that are exposed, computed from the grid alone.
    pub fn exposed_count(&self, block_type: BlockType) -> usize {
        if block_type.is_air() {
            return 0;
        }
        self.grid
            .cells()
            .filter(|(position, state)| {
                state.block_type == block_type && occlusion::is_exposed(&self.grid, *position)
            })
            .count()
    }

    /// Verifies the grid and the pools agree, slot by slot.
    ///
    /// # Returns
    ///
    /// A description of the first disagreement found.
    pub fn check_consistency(&self) -> Result<(), String> {
        for pool in self.registry.pools() {
            let block_type = pool.block_type();
            for (slot, owner) in pool.occupants() {
                let state = self.grid.get(owner);
                if state.block_type != block_type || state.slot != Some(slot) {
                    return Err(format!(
                        "'{}' slot {} claims {:?}, which holds {:?}",
                        block_type, slot, owner, state
                    ));
                }
                if pool.transform(slot).map(|transform| transform.voxel()) != Some(owner) {
                    return Err(format!(
                        "'{}' slot {} does not place a cube at {:?}",
                        block_type, slot, owner
                    ));
                }
            }

            let exposed = self.exposed_count(block_type);
            if pool.count() != exposed {
                return Err(format!(
                    "'{}' pool has {} active slots for {} exposed blocks",
                    block_type,
                    pool.count(),
                    exposed
                ));
            }
        }

        for (position, state) in self.grid.cells() {
            let exposed = occlusion::is_exposed(&self.grid, position);
            match state.slot {
                Some(_) if state.is_air() => {
                    return Err(format!("air at {:?} holds a slot", position));
                }
                Some(slot) => {
                    let owner = self.registry.pool(state.block_type).and_then(|pool| pool.owner_of(slot));
                    if owner != Some(position) {
                        return Err(format!(
                            "{:?} points at '{}' slot {}, owned by {:?}",
                            position, state.block_type, slot, owner
                        ));
                    }
                    if !exposed {
                        return Err(format!("hidden block at {:?} holds slot {}", position, slot));
                    }
                }
                None if !state.is_air() && exposed => {
                    return Err(format!("exposed block at {:?} has no slot", position));
                }
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(size: u32, height: u32) -> WorldConfig {
        WorldConfig {
            size_x: size,
            size_z: size,
            surface_height: height,
            underground_depth: 0,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn empty_world_has_empty_pools() {
        let world = World::empty(small_config(4, 4)).unwrap();
        assert_eq!(world.registry().total_count(), 0);
        for stats in world.stats() {
            assert_eq!(stats.count, 0);
            assert_eq!(stats.capacity, 64);
        }
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(World::empty(small_config(0, 4)).is_err());
    }

    #[test]
    fn solid_cube_only_renders_its_shell() {
        let (world, report) = World::from_fn(small_config(3, 3), |_| BlockType::STONE).unwrap();
        let stone = world.pool(BlockType::STONE).unwrap();
        assert_eq!(stone.count(), 26);
        assert_eq!(world.get(Point3::new(1, 1, 1)).slot, None);
        assert_eq!(report.writes.len(), 26);
        assert_eq!(report.count_for(BlockType::STONE), Some(26));
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn generated_world_is_consistent() {
        let config = WorldConfig {
            size_x: 12,
            size_z: 12,
            surface_height: 6,
            underground_depth: 6,
            ..WorldConfig::default()
        };
        let (world, report) = World::generate(config).unwrap();
        assert!(world.check_consistency().is_ok());
        assert_eq!(report.writes.len(), world.registry().total_count());
        for stats in world.stats() {
            assert_eq!(stats.count, world.exposed_count(stats.block_type));
        }
        // Every floor cell borders the air below the world.
        let floor_slots = (0..12)
            .flat_map(|x| (0..12).map(move |z| Point3::new(x, 0, z)))
            .filter(|position| world.get(*position).slot.is_some())
            .count();
        assert_eq!(floor_slots, 144);
    }

    #[test]
    fn custom_height_source_drives_generation() {
        let (world, _) = World::generate_with(small_config(4, 8), |_: f64, _: f64| 0.0).unwrap();
        // offset 0.2 of 8 floors to 1: dirt floor with a grass layer on top.
        assert_eq!(world.get(Point3::new(0, 0, 0)).block_type, BlockType::DIRT);
        assert_eq!(world.get(Point3::new(0, 1, 0)).block_type, BlockType::GRASS);
        assert_eq!(world.get(Point3::new(0, 2, 0)).block_type, BlockType::AIR);
        assert_eq!(world.pool(BlockType::GRASS).map(RenderSlotPool::count), Some(16));
        assert_eq!(world.pool(BlockType::DIRT).map(RenderSlotPool::count), Some(16));
    }

    #[test]
    fn checker_reports_a_broken_reference() {
        let (mut world, _) = World::from_fn(small_config(2, 2), |_| BlockType::DIRT).unwrap();
        world.grid.set_slot(Point3::new(0, 0, 0), Some(7));
        assert!(world.check_consistency().is_err());
    }
}
