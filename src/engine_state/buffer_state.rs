//! # Buffer State Module
//!
//! The boundary between the world and whatever draws it.
//!
//! ## Key Components
//!
//! * `SlotWriteCommand` - one transform written into one slot of one pool
//! * `EditReport` - everything a renderer must apply after an edit: the slot
//!   writes in order, and the new live count of every pool that changed
//! * `RenderBackend` - the capability the world needs from a renderer
//! * `BufferState` - a CPU-side mirror of the per-type instance buffers that
//!   implements `RenderBackend`, with bounds checking and write analytics
//!
//! ## Architecture
//!
//! The world is the sole mutator of slot indices; it never asks the renderer
//! for one. Edits produce an `EditReport`, which is applied to a backend with
//! [`EditReport::apply`]. A shrinking count is how a freed slot reaches the
//! renderer, since compaction keeps `0..count` dense.

use std::collections::HashMap;

use crate::engine_state::rendering::{InstanceTransform, SlotIndex};
use crate::engine_state::voxels::block::block_type::BlockType;

/// Command for writing one instance transform into a pool slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotWriteCommand {
    /// The pool being written
    pub block_type: BlockType,
    /// Slot index within the pool
    pub slot: SlotIndex,
    /// Transform to store at the slot
    pub transform: InstanceTransform,
}

/// The renderer-visible effect of one edit (or of the initial generation).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditReport {
    /// Slot writes, in the order they happened
    pub writes: Vec<SlotWriteCommand>,
    /// `(block_type, live count)` for every pool whose count changed or whose
    /// slots were written; the renderer should redraw these
    pub dirty: Vec<(BlockType, usize)>,
}

impl EditReport {
    pub(crate) fn record_write(&mut self, command: SlotWriteCommand) {
        self.writes.push(command);
    }

    pub(crate) fn mark_dirty(&mut self, block_type: BlockType, count: usize) {
        match self.dirty.iter_mut().find(|(dirty_type, _)| *dirty_type == block_type) {
            Some(entry) => entry.1 = count,
            None => self.dirty.push((block_type, count)),
        }
    }

    /// Whether the edit changed nothing a renderer can see.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.dirty.is_empty()
    }

    /// The live count reported for `block_type`, if its pool changed.
    pub fn count_for(&self, block_type: BlockType) -> Option<usize> {
        self.dirty
            .iter()
            .find(|(dirty_type, _)| *dirty_type == block_type)
            .map(|(_, count)| *count)
    }

    /// Replays the report against a backend: all writes, then the new counts.
    pub fn apply<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        for command in &self.writes {
            backend.write_transform(command.block_type, command.slot, command.transform);
        }
        for (block_type, count) in &self.dirty {
            backend.set_instance_count(*block_type, *count);
        }
    }
}

/// What the world needs from a renderer.
pub trait RenderBackend {
    /// Stores `transform` at `slot` of the instance buffer for `block_type`.
    fn write_transform(&mut self, block_type: BlockType, slot: SlotIndex, transform: InstanceTransform);

    /// Sets how many instances of `block_type` to draw and requests a redraw.
    fn set_instance_count(&mut self, block_type: BlockType, count: usize);
}

/// Analytics data for an instance buffer
///
/// Tracks memory allocation, usage, and write operations for a buffer
/// to help identify optimization opportunities.
#[derive(Debug, Default)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Highest byte offset ever written
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

struct InstanceBuffer {
    instances: Vec<InstanceTransform>,
    count: usize,
    dirty: bool,
    analytics: BufferAnalytics,
}

/// CPU-side mirror of the per-type instance buffers.
///
/// Each block type gets a buffer of `capacity` transforms. Writes are bounds
/// checked like GPU buffer writes, and usage is tracked per buffer.
pub struct BufferState {
    buffers: HashMap<BlockType, InstanceBuffer>,
}

impl BufferState {
    /// Creates a buffer of `capacity` instances for every renderable block type.
    pub fn new(capacity: usize) -> Self {
        let instance_size = std::mem::size_of::<InstanceTransform>() as u64;
        let buffers = BlockType::all_solid()
            .map(|block_type| {
                (
                    block_type,
                    InstanceBuffer {
                        instances: vec![InstanceTransform::default(); capacity],
                        count: 0,
                        dirty: false,
                        analytics: BufferAnalytics {
                            allocated_memory: capacity as u64 * instance_size,
                            ..Default::default()
                        },
                    },
                )
            })
            .collect();

        Self { buffers }
    }

    fn buffer(&self, block_type: BlockType) -> &InstanceBuffer {
        self.buffers
            .get(&block_type)
            .unwrap_or_else(|| panic!("No instance buffer for block type '{}'", block_type))
    }

    fn buffer_mut(&mut self, block_type: BlockType) -> &mut InstanceBuffer {
        self.buffers
            .get_mut(&block_type)
            .unwrap_or_else(|| panic!("No instance buffer for block type '{}'", block_type))
    }

    /// Number of instances to draw for `block_type`.
    pub fn instance_count(&self, block_type: BlockType) -> usize {
        self.buffers.get(&block_type).map_or(0, |buffer| buffer.count)
    }

    /// The instances a draw call for `block_type` would read.
    pub fn active_instances(&self, block_type: BlockType) -> &[InstanceTransform] {
        let buffer = self.buffer(block_type);
        &buffer.instances[..buffer.count]
    }

    /// Block types marked dirty since the last call, in a stable order.
    pub fn take_dirty(&mut self) -> Vec<BlockType> {
        let mut dirty: Vec<BlockType> = self
            .buffers
            .iter_mut()
            .filter(|(_, buffer)| buffer.dirty)
            .map(|(block_type, buffer)| {
                buffer.dirty = false;
                *block_type
            })
            .collect();
        dirty.sort();
        dirty
    }

    /// Number of writes made to the buffer of `block_type`.
    pub fn times_written(&self, block_type: BlockType) -> u64 {
        self.buffers
            .get(&block_type)
            .map_or(0, |buffer| buffer.analytics.times_written)
    }

    /// Gets the total allocated memory across all buffers, in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffers
            .values()
            .fold(0, |acc, buffer| acc + buffer.analytics.allocated_memory)
    }

    /// Gets the total used memory across all buffers, in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffers
            .values()
            .fold(0, |acc, buffer| acc + buffer.analytics.used_memory)
    }
}

impl RenderBackend for BufferState {
    /// # Panics
    ///
    /// Panics if the write would exceed buffer bounds
    fn write_transform(&mut self, block_type: BlockType, slot: SlotIndex, transform: InstanceTransform) {
        let buffer = self.buffer_mut(block_type);
        let index = slot as usize;
        if index >= buffer.instances.len() {
            panic!(
                "Instance buffer write out of bounds for '{}' at slot {}",
                block_type, slot
            );
        }

        buffer.instances[index] = transform;
        let end = (index as u64 + 1) * std::mem::size_of::<InstanceTransform>() as u64;
        buffer.analytics.used_memory = buffer.analytics.used_memory.max(end);
        buffer.analytics.times_written += 1;
        buffer.dirty = true;
    }

    fn set_instance_count(&mut self, block_type: BlockType, count: usize) {
        let buffer = self.buffer_mut(block_type);
        if count > buffer.instances.len() {
            panic!(
                "Instance count {} exceeds buffer capacity for '{}'",
                count, block_type
            );
        }
        buffer.count = count;
        buffer.dirty = true;
    }
}
