//! # Occlusion Module
//!
//! Decides which voxels need a render slot. A voxel is a render candidate
//! iff it is non-air and at least one of its six face neighbours is air.
//! Neighbours outside the world count as air.
//!
//! The test is a pure function of the grid and is recomputed whenever a
//! neighbour changes; no visibility flag is cached. Only air-ness of the
//! neighbours matters: glass occludes exactly like stone.

use cgmath::Point3;

use super::block::block_side::BlockSide;
use super::grid::VoxelGrid;

/// Whether any face neighbour of `position` is air.
pub fn is_exposed(grid: &VoxelGrid, position: Point3<i32>) -> bool {
    BlockSide::all()
        .iter()
        .any(|side| !grid.is_solid(side.neighbor_of(position)))
}

/// Whether the voxel at `position` should own a render slot.
pub fn is_render_candidate(grid: &VoxelGrid, position: Point3<i32>) -> bool {
    grid.is_solid(position) && is_exposed(grid, position)
}
