//! # Block Type Registry Module
//!
//! Owns one render slot pool per renderable block type. Pools are indexed by
//! the compact `BlockTypeSize` form of the block type, so lookups are an
//! array access. Air has no pool.

use super::block::{block_type::BlockType, BlockTypeSize};
use crate::engine_state::rendering::RenderSlotPool;

pub struct BlockTypeRegistry {
    /// `pools[t - 1]` belongs to the block type with storage value `t`.
    pools: Vec<RenderSlotPool>,
}

impl BlockTypeRegistry {
    /// Registers every non-air block type with a pool of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        BlockTypeRegistry {
            pools: BlockType::all_solid()
                .map(|block_type| RenderSlotPool::new(block_type, capacity))
                .collect(),
        }
    }

    fn pool_index(block_type: BlockType) -> Option<usize> {
        (block_type as BlockTypeSize as usize).checked_sub(1)
    }

    /// The pool of `block_type`; `None` for air.
    pub fn pool(&self, block_type: BlockType) -> Option<&RenderSlotPool> {
        Self::pool_index(block_type).and_then(|index| self.pools.get(index))
    }

    pub(crate) fn pool_mut(&mut self, block_type: BlockType) -> Option<&mut RenderSlotPool> {
        Self::pool_index(block_type).and_then(move |index| self.pools.get_mut(index))
    }

    pub fn pools(&self) -> impl Iterator<Item = &RenderSlotPool> {
        self.pools.iter()
    }

    /// Total number of active slots across all pools.
    pub fn total_count(&self) -> usize {
        self.pools.iter().map(RenderSlotPool::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_solid_type_has_its_own_pool() {
        let registry = BlockTypeRegistry::new(16);
        assert!(registry.pool(BlockType::AIR).is_none());
        for block_type in BlockType::all_solid() {
            let pool = registry.pool(block_type).unwrap();
            assert_eq!(pool.block_type(), block_type);
            assert_eq!(pool.capacity(), 16);
            assert!(pool.is_empty());
        }
        assert_eq!(registry.pools().count(), BlockType::COUNT - 1);
        assert_eq!(registry.total_count(), 0);
    }
}
