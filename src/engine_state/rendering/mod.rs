//! # Rendering Module
//!
//! The renderer-facing half of the world: per-type pools of instance
//! transforms that a renderer can draw as one instanced call each.
//!
//! ## Key Components
//!
//! * `slot_pool` - Fixed-capacity, swap-compacted pool of render slots
//! * `instance` - The per-instance transform layout shared with the GPU

pub mod instance;
pub mod slot_pool;

pub use instance::InstanceTransform;
pub use slot_pool::{RenderSlotPool, SlotIndex, SlotRelocation};
