//! # Engine State Module
//!
//! Ties the voxel world to the player and the renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container: world, instance buffers, selected block and reach
//! * `buffer_state` - The render backend boundary and a CPU-side mirror of the instance buffers
//! * `interaction` - Ray casting and the reach limit
//! * `rendering` - Render slot pools and instance transforms
//! * `voxels` - Voxel state, terrain generation and edits
//!
//! ## Architecture
//!
//! The world never talks to the renderer directly. Each edit returns an
//! `EditReport`, and `EngineState` replays it into the buffer state right
//! away, so the buffers always mirror the pools after a call returns.

use cgmath::Point3;
use log::{debug, info};

use buffer_state::{BufferState, EditReport};
use interaction::{Ray, RayHit};
use voxels::block::block_type::BlockType;
use voxels::world::World;

use crate::config::WorldConfig;
use crate::error::WorldResult;

pub mod buffer_state;
pub mod interaction;
pub mod rendering;
pub mod voxels;

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use voxel_frontier::config::WorldConfig;
/// use voxel_frontier::engine_state::EngineState;
///
/// let config = WorldConfig { size_x: 8, size_z: 8, ..WorldConfig::default() };
/// let engine_state = EngineState::new(config).unwrap();
/// assert!(engine_state.world().check_consistency().is_ok());
/// ```
pub struct EngineState {
    world: World,
    /// Mirror of the per-type instance buffers
    pub buffer_state: BufferState,
    selected_block: BlockType,
    max_reach: f32,
}

impl EngineState {
    /// Generates the world described by `config` and uploads its initial instances.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        let max_reach = config.max_reach;
        let (world, report) = World::generate(config)?;
        Ok(Self::from_world(world, report, max_reach))
    }

    /// Wraps an existing world. `report` is whatever produced the world's
    /// current slots and is applied to fresh buffers.
    pub fn from_world(world: World, report: EditReport, max_reach: f32) -> Self {
        let mut buffer_state = BufferState::new(world.config().cell_count());
        report.apply(&mut buffer_state);
        info!(
            "Engine ready: {} instances, {} bytes of instance buffers",
            world.registry().total_count(),
            buffer_state.get_total_allocated_memory()
        );

        Self {
            world,
            buffer_state,
            selected_block: BlockType::GRASS,
            max_reach,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Sets the block type placed by [`EngineState::place_at`].
    pub fn select_block(&mut self, block_type: BlockType) {
        self.selected_block = block_type;
    }

    pub fn selected_block(&self) -> BlockType {
        self.selected_block
    }

    pub fn max_reach(&self) -> f32 {
        self.max_reach
    }

    /// The block the player is looking at, if one is within reach.
    pub fn pick(&self, ray: &Ray) -> Option<RayHit> {
        interaction::cast_ray(self.world.grid(), ray, self.max_reach)
    }

    /// Breaks the block under `hit`.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the hit is out of reach or outside the world and
    /// nothing was done.
    pub fn break_at(&mut self, hit: &RayHit) -> WorldResult<bool> {
        if !self.accepts(hit, hit.voxel) {
            return Ok(false);
        }
        let report = self.world.break_block(hit.voxel)?;
        report.apply(&mut self.buffer_state);
        Ok(true)
    }

    /// Places the selected block against the hit face.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the hit is out of reach or the placement cell is
    /// outside the world and nothing was done.
    pub fn place_at(&mut self, hit: &RayHit) -> WorldResult<bool> {
        let target = hit.placement_target();
        if !self.accepts(hit, target) {
            return Ok(false);
        }
        let report = self.world.place_block(target, self.selected_block)?;
        report.apply(&mut self.buffer_state);
        Ok(true)
    }

    fn accepts(&self, hit: &RayHit, target: Point3<i32>) -> bool {
        if !interaction::within_reach(hit, self.max_reach) {
            debug!(
                "Rejected edit at {:?}: distance {:.2} exceeds reach {:.2}",
                target, hit.distance, self.max_reach
            );
            return false;
        }
        if !self.world.grid().in_bounds(target) {
            debug!("Rejected edit at {:?}: outside the world", target);
            return false;
        }
        true
    }
}
