//! Fixed-capacity render slot pools with swap-compaction.
//!
//! Each block type owns one pool. The active slots of a pool are always the
//! contiguous range `0..count`, so a renderer can draw exactly `count`
//! instances without gaps.
//!
//! # Allocation Strategy
//! - `allocate` writes at index `count` and bumps the count. O(1).
//! - `free` moves the last active slot into the freed index and shrinks the
//!   count. O(1). The moved occupant is reported back so the caller can fix
//!   the slot reference stored in the grid.
//! - Capacity is sized for the worst case (every cell of the world is this
//!   type and visible), so the pool never grows.
//!
//! The pool keeps a reverse map from slot index to the voxel that owns it.
//! Relocations are resolved through that map, never by decoding transforms.

use cgmath::Point3;
use log::trace;

use super::instance::InstanceTransform;
use crate::engine_state::voxels::block::block_type::BlockType;

/// Index of a slot within one pool.
pub type SlotIndex = u32;

/// Reported by [`RenderSlotPool::free`] when compaction moved an occupant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotRelocation {
    /// The slot the occupant lived in before the free (the old last slot)
    pub from: SlotIndex,
    /// The slot the occupant lives in now (the freed slot)
    pub to: SlotIndex,
    /// The voxel owning the moved slot
    pub owner: Point3<i32>,
}

/// A per block type pool of render transforms.
pub struct RenderSlotPool {
    block_type: BlockType,
    /// Instance buffer mirror. Always `capacity` long; only `0..count` is live.
    transforms: Vec<InstanceTransform>,
    /// Reverse map: `owners[i]` is the voxel occupying slot `i`. Length is `count`.
    owners: Vec<Point3<i32>>,
}

impl RenderSlotPool {
    pub fn new(block_type: BlockType, capacity: usize) -> Self {
        Self {
            block_type,
            transforms: vec![InstanceTransform::default(); capacity],
            owners: Vec::with_capacity(capacity),
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Number of active slots.
    pub fn count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Claims the next free slot for the voxel at `owner`.
    ///
    /// # Panics
    ///
    /// Panics if the pool is full. Capacity covers every cell of the world,
    /// so this only happens if the pool was sized wrong.
    pub fn allocate(&mut self, owner: Point3<i32>, transform: InstanceTransform) -> SlotIndex {
        let index = self.owners.len();
        if index >= self.transforms.len() {
            panic!(
                "Render slot pool for '{}' exhausted at capacity {}",
                self.block_type,
                self.transforms.len()
            );
        }

        self.transforms[index] = transform;
        self.owners.push(owner);
        index as SlotIndex
    }

    /// Releases `slot`, compacting the active range.
    ///
    /// # Returns
    ///
    /// `Some(relocation)` if the last active slot was moved into `slot`;
    /// the caller must point that occupant's slot reference at `relocation.to`.
    /// `None` if `slot` was the last active slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not active.
    pub fn free(&mut self, slot: SlotIndex) -> Option<SlotRelocation> {
        let index = slot as usize;
        let count = self.owners.len();
        assert!(
            index < count,
            "Freeing inactive slot {} in '{}' pool with {} active slots",
            slot,
            self.block_type,
            count
        );

        let last = count - 1;
        self.owners.swap_remove(index);
        if index == last {
            return None;
        }

        self.transforms[index] = self.transforms[last];
        let relocation = SlotRelocation {
            from: last as SlotIndex,
            to: slot,
            owner: self.owners[index],
        };
        trace!(
            "'{}' slot {} moved to {} (owner {:?})",
            self.block_type,
            relocation.from,
            relocation.to,
            relocation.owner
        );
        Some(relocation)
    }

    /// The voxel occupying `slot`, if the slot is active.
    pub fn owner_of(&self, slot: SlotIndex) -> Option<Point3<i32>> {
        self.owners.get(slot as usize).copied()
    }

    /// The transform stored at `slot`, if the slot is active.
    pub fn transform(&self, slot: SlotIndex) -> Option<InstanceTransform> {
        self.active_transforms().get(slot as usize).copied()
    }

    /// The transforms a renderer should draw, one per active slot.
    pub fn active_transforms(&self) -> &[InstanceTransform] {
        &self.transforms[..self.owners.len()]
    }

    /// The active region as raw bytes, ready for an instance buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.active_transforms())
    }

    /// Iterates `(slot, owner)` over the active slots.
    pub fn occupants(&self) -> impl Iterator<Item = (SlotIndex, Point3<i32>)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(|(index, owner)| (index as SlotIndex, *owner))
    }
}
