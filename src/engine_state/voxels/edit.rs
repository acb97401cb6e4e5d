//! # Edit Module
//!
//! Single-voxel edits and the incremental visibility maintenance behind them.
//!
//! ## Break
//!
//! 1. Reject air.
//! 2. Free the block's slot, if any. When compaction moved another occupant
//!    into the freed slot, point that occupant's grid cell at its new slot.
//! 3. Clear the cell to air.
//! 4. Show any face neighbour that became exposed. Removing a block can only
//!    expose its neighbours, never hide them.
//!
//! ## Place
//!
//! 1. Reject air as the new type and non-air targets.
//! 2. Write the new block without a slot.
//! 3. Show the new block.
//! 4. Hide any face neighbour that lost its last air face. Adding a block can
//!    only hide its neighbours, never expose them.
//!
//! Only face neighbours are re-checked: exposure depends on nothing further
//! away. Edits outside the world are no-ops, and every edit either completes
//! or leaves the world untouched.

use cgmath::Point3;
use log::debug;

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::grid::VoxelState;
use super::occlusion;
use super::world::World;
use crate::engine_state::buffer_state::{EditReport, SlotWriteCommand};
use crate::engine_state::rendering::{InstanceTransform, SlotIndex};
use crate::error::{InvalidEditReason, WorldError, WorldResult};

/// Applies edits to a world, collecting the renderer-visible effects.
///
/// Borrows the world exclusively for its lifetime, so no other edit can
/// observe the intermediate states of an edit in progress.
pub struct EditEngine<'w> {
    world: &'w mut World,
    report: EditReport,
}

impl<'w> EditEngine<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self {
            world,
            report: EditReport::default(),
        }
    }

    /// Ends the edit session, returning everything the renderer must apply.
    pub fn finish(self) -> EditReport {
        self.report
    }

    /// Removes the block at `position`.
    pub fn break_block(&mut self, position: Point3<i32>) -> WorldResult<()> {
        if !self.world.grid.in_bounds(position) {
            debug!("Ignoring break outside the world at {:?}", position);
            return Ok(());
        }

        let state = self.world.grid.get(position);
        if state.is_air() {
            return Err(WorldError::invalid_edit(position, InvalidEditReason::BreakAir));
        }

        if let Some(slot) = state.slot {
            self.release_slot(position, state.block_type, slot);
        }
        self.world.grid.set_state(position, VoxelState::AIR);

        for neighbor in BlockSide::neighbors(position) {
            self.try_show(neighbor);
        }

        debug!("Broke '{}' at {:?}", state.block_type, position);
        Ok(())
    }

    /// Puts a block of `block_type` into the air cell at `position`.
    pub fn place_block(&mut self, position: Point3<i32>, block_type: BlockType) -> WorldResult<()> {
        if !self.world.grid.in_bounds(position) {
            debug!("Ignoring place outside the world at {:?}", position);
            return Ok(());
        }
        if block_type.is_air() {
            return Err(WorldError::invalid_edit(position, InvalidEditReason::PlaceAir));
        }

        let state = self.world.grid.get(position);
        if !state.is_air() {
            return Err(WorldError::invalid_edit(
                position,
                InvalidEditReason::PlaceOccupied(state.block_type),
            ));
        }

        self.world.grid.set_state(position, VoxelState::unrendered(block_type));
        self.try_show(position);

        for neighbor in BlockSide::neighbors(position) {
            self.try_hide(neighbor);
        }

        debug!("Placed '{}' at {:?}", block_type, position);
        Ok(())
    }

    /// Gives the block at `position` a slot if it is exposed and has none.
    ///
    /// # Returns
    ///
    /// Whether a slot was allocated. Air, already shown and hidden blocks are no-ops.
    pub fn try_show(&mut self, position: Point3<i32>) -> bool {
        let state = self.world.grid.get(position);
        if state.slot.is_some() || !occlusion::is_render_candidate(&self.world.grid, position) {
            return false;
        }
        let Some(pool) = self.world.registry.pool_mut(state.block_type) else {
            return false;
        };

        let transform = InstanceTransform::at_voxel(position);
        let slot = pool.allocate(position, transform);
        let count = pool.count();
        self.world.grid.set_slot(position, Some(slot));

        self.report.record_write(SlotWriteCommand {
            block_type: state.block_type,
            slot,
            transform,
        });
        self.report.mark_dirty(state.block_type, count);
        true
    }

    /// Takes the slot away from the block at `position` if it is no longer exposed.
    ///
    /// # Returns
    ///
    /// Whether a slot was freed. Air, already hidden and still exposed blocks are no-ops.
    pub fn try_hide(&mut self, position: Point3<i32>) -> bool {
        let state = self.world.grid.get(position);
        let Some(slot) = state.slot else {
            return false;
        };
        if occlusion::is_exposed(&self.world.grid, position) {
            return false;
        }

        self.release_slot(position, state.block_type, slot);
        true
    }

    /// Frees `slot` of the block at `position` and repairs the slot reference
    /// of whichever block compaction moved into it.
    fn release_slot(&mut self, position: Point3<i32>, block_type: BlockType, slot: SlotIndex) {
        let Some(pool) = self.world.registry.pool_mut(block_type) else {
            return;
        };

        if let Some(relocation) = pool.free(slot) {
            self.world.grid.set_slot(relocation.owner, Some(relocation.to));
            self.report.record_write(SlotWriteCommand {
                block_type,
                slot: relocation.to,
                transform: InstanceTransform::at_voxel(relocation.owner),
            });
        }
        let count = pool.count();
        self.world.grid.set_slot(position, None);
        self.report.mark_dirty(block_type, count);
    }
}

impl World {
    /// Removes the block at `position`. See [`EditEngine::break_block`].
    pub fn break_block(&mut self, position: Point3<i32>) -> WorldResult<EditReport> {
        let mut engine = EditEngine::new(self);
        engine.break_block(position)?;
        Ok(engine.finish())
    }

    /// Places a block at `position`. See [`EditEngine::place_block`].
    pub fn place_block(&mut self, position: Point3<i32>, block_type: BlockType) -> WorldResult<EditReport> {
        let mut engine = EditEngine::new(self);
        engine.place_block(position, block_type)?;
        Ok(engine.finish())
    }

    /// Shows the block at `position` if needed. An empty report means nothing changed.
    pub fn try_show(&mut self, position: Point3<i32>) -> EditReport {
        let mut engine = EditEngine::new(self);
        engine.try_show(position);
        engine.finish()
    }

    /// Hides the block at `position` if needed. An empty report means nothing changed.
    pub fn try_hide(&mut self, position: Point3<i32>) -> EditReport {
        let mut engine = EditEngine::new(self);
        engine.try_hide(position);
        engine.finish()
    }

    /// Gives every exposed block without a slot a slot. Used once after bulk
    /// filling the grid.
    pub(crate) fn show_all_exposed(&mut self) -> EditReport {
        let (size_x, total_height, size_z) = self.grid.dimensions();
        let mut engine = EditEngine::new(self);
        for y in 0..total_height {
            for z in 0..size_z {
                for x in 0..size_x {
                    engine.try_show(Point3::new(x, y, z));
                }
            }
        }
        engine.finish()
    }
}
