//! # Voxel Grid Module
//!
//! The dense 3D array of voxel states making up the world.
//!
//! ## Memory Layout
//!
//! The grid stores two parallel arrays:
//! - `states`: one `VoxelState` per cell (block type plus optional slot reference)
//! - `solid_array`: a bit vector with one bit per cell, set for non-air cells
//!
//! The bit vector gives the occlusion test an O(1) solidity lookup that only
//! touches one bit per neighbour. Both arrays are indexed in x, then z, then y order.
//!
//! ## Bounds
//!
//! Out-of-range coordinates are valid queries that answer air with no slot.
//! Writes to out-of-range coordinates are ignored. The world behaves as if
//! surrounded by infinite air.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::block_type::BlockType;
use crate::engine_state::rendering::SlotIndex;

/// The state of a single cell.
///
/// `slot` is `Some` only for a non-air cell that is currently rendered; it
/// indexes the slot pool of `block_type`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelState {
    pub block_type: BlockType,
    pub slot: Option<SlotIndex>,
}

impl VoxelState {
    pub const AIR: VoxelState = VoxelState {
        block_type: BlockType::AIR,
        slot: None,
    };

    /// A non-rendered cell of the given type.
    pub fn unrendered(block_type: BlockType) -> Self {
        VoxelState {
            block_type,
            slot: None,
        }
    }

    pub fn is_air(&self) -> bool {
        self.block_type.is_air()
    }
}

impl Default for VoxelState {
    fn default() -> Self {
        VoxelState::AIR
    }
}

pub struct VoxelGrid {
    size_x: i32,
    height: i32,
    size_z: i32,
    states: Vec<VoxelState>,
    solid_array: BitVec,
}

impl VoxelGrid {
    /// Creates a grid with every cell set to air.
    pub fn new(size_x: u32, height: u32, size_z: u32) -> Self {
        let cells = size_x as usize * height as usize * size_z as usize;
        let mut solid_array = BitVec::with_capacity(cells);
        solid_array.resize(cells, false);

        VoxelGrid {
            size_x: size_x as i32,
            height: height as i32,
            size_z: size_z as i32,
            states: vec![VoxelState::AIR; cells],
            solid_array,
        }
    }

    /// Extents as `(size_x, total_height, size_z)`.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.size_x, self.height, self.size_z)
    }

    pub fn in_bounds(&self, position: Point3<i32>) -> bool {
        (0..self.size_x).contains(&position.x)
            && (0..self.height).contains(&position.y)
            && (0..self.size_z).contains(&position.z)
    }

    fn index(&self, position: Point3<i32>) -> Option<usize> {
        if !self.in_bounds(position) {
            return None;
        }
        let (x, y, z) = (position.x as usize, position.y as usize, position.z as usize);
        Some(x + self.size_x as usize * (z + self.size_z as usize * y))
    }

    /// The state at `position`; air with no slot when out of bounds.
    pub fn get(&self, position: Point3<i32>) -> VoxelState {
        self.index(position)
            .map(|index| self.states[index])
            .unwrap_or(VoxelState::AIR)
    }

    /// Whether the cell at `position` holds a non-air block. False out of bounds.
    pub fn is_solid(&self, position: Point3<i32>) -> bool {
        self.index(position)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Overwrites only the block type, leaving the slot untouched.
    ///
    /// Does not keep slot references consistent; terrain generation uses it
    /// before any slot exists.
    pub fn set_type(&mut self, position: Point3<i32>, block_type: BlockType) {
        if let Some(index) = self.index(position) {
            self.states[index].block_type = block_type;
            self.solid_array.set(index, !block_type.is_air());
        }
    }

    /// Sets the slot reference of a non-air cell. Ignored for air and out of bounds.
    pub fn set_slot(&mut self, position: Point3<i32>, slot: Option<SlotIndex>) {
        if let Some(index) = self.index(position) {
            let state = &mut self.states[index];
            if !state.is_air() {
                state.slot = slot;
            }
        }
    }

    /// Full overwrite of a cell. Air always ends up without a slot.
    pub fn set_state(&mut self, position: Point3<i32>, state: VoxelState) {
        if let Some(index) = self.index(position) {
            let state = if state.is_air() { VoxelState::AIR } else { state };
            self.states[index] = state;
            self.solid_array.set(index, !state.is_air());
        }
    }

    /// Iterates every in-bounds position, x fastest, then z, then y.
    pub fn positions(&self) -> impl Iterator<Item = Point3<i32>> {
        let (size_x, height, size_z) = self.dimensions();
        (0..height).flat_map(move |y| {
            (0..size_z).flat_map(move |z| (0..size_x).map(move |x| Point3::new(x, y, z)))
        })
    }

    /// Iterates every cell with its position, in [`VoxelGrid::positions`] order.
    pub fn cells(&self) -> impl Iterator<Item = (Point3<i32>, VoxelState)> + '_ {
        self.positions().zip(self.states.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_air() {
        let grid = VoxelGrid::new(2, 3, 4);
        assert_eq!(grid.dimensions(), (2, 3, 4));
        assert_eq!(grid.positions().count(), 24);
        assert!(grid.cells().all(|(_, state)| state == VoxelState::AIR));
    }

    #[test]
    fn out_of_bounds_reads_air() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        grid.set_state(Point3::new(0, 0, 0), VoxelState { block_type: BlockType::STONE, slot: Some(3) });
        for position in [Point3::new(-1, 0, 0), Point3::new(0, 2, 0), Point3::new(0, 0, 99)] {
            assert_eq!(grid.get(position), VoxelState::AIR);
            assert!(!grid.is_solid(position));
        }
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        grid.set_type(Point3::new(2, 0, 0), BlockType::DIRT);
        grid.set_state(Point3::new(0, -1, 0), VoxelState::unrendered(BlockType::DIRT));
        grid.set_slot(Point3::new(0, 0, -1), Some(0));
        assert!(grid.cells().all(|(_, state)| state == VoxelState::AIR));
    }

    #[test]
    fn set_type_keeps_slot_and_tracks_solidity() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        let position = Point3::new(1, 1, 1);
        grid.set_state(position, VoxelState { block_type: BlockType::STONE, slot: Some(5) });
        grid.set_type(position, BlockType::DIRT);
        assert_eq!(grid.get(position), VoxelState { block_type: BlockType::DIRT, slot: Some(5) });
        assert!(grid.is_solid(position));

        grid.set_type(position, BlockType::AIR);
        assert!(!grid.is_solid(position));
    }

    #[test]
    fn set_slot_is_ignored_on_air() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        let position = Point3::new(0, 1, 0);
        grid.set_slot(position, Some(1));
        assert_eq!(grid.get(position).slot, None);

        grid.set_type(position, BlockType::GRASS);
        grid.set_slot(position, Some(1));
        assert_eq!(grid.get(position).slot, Some(1));
        grid.set_slot(position, None);
        assert_eq!(grid.get(position).slot, None);
    }

    #[test]
    fn set_state_to_air_clears_slot() {
        let mut grid = VoxelGrid::new(1, 1, 1);
        let origin = Point3::new(0, 0, 0);
        grid.set_state(origin, VoxelState { block_type: BlockType::AIR, slot: Some(2) });
        assert_eq!(grid.get(origin), VoxelState::AIR);
    }

    #[test]
    fn cells_report_matching_positions() {
        let mut grid = VoxelGrid::new(3, 2, 2);
        let target = Point3::new(2, 1, 0);
        grid.set_type(target, BlockType::LOG);
        let found: Vec<_> = grid.cells().filter(|(_, s)| !s.is_air()).map(|(p, _)| p).collect();
        assert_eq!(found, vec![target]);
    }
}
