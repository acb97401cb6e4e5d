//! # Voxel State
//!
//! The authoritative voxel state of the world and the visibility bookkeeping
//! that decides which voxels get drawn.
//!
//! ## Architecture
//!
//! * **Block**: block types, their names and the six face directions
//! * **Grid**: the dense array of voxel states
//! * **Occlusion**: the pure "touches air" test
//! * **Registry**: one render slot pool per block type
//! * **Terrain**: seeded heightmap generation
//! * **World**: the aggregate owning config, grid and registry
//! * **Edit**: break and place, with incremental show/hide of neighbours
//!
//! ## Data Flow
//!
//! 1. The world is generated, every exposed block receiving a slot
//! 2. An edit mutates the grid and re-checks the touched cells
//! 3. Slot writes and count changes come back as an `EditReport`
//! 4. The report is applied to the renderer's instance buffers
//!
//! All mutation goes through `&mut World`, so edits are serialized by the
//! borrow checker.

pub mod block;
pub mod edit;
pub mod grid;
pub mod occlusion;
pub mod registry;
pub mod terrain;
pub mod world;
