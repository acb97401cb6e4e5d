#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Frontier
//!
//! A bounded voxel world that keeps exactly the visible blocks in instanced
//! render pools.
//!
//! The world is a dense grid of block types. A block is drawn iff it touches
//! air on at least one face; every such block owns one slot in the pool of its
//! type, and the active slots of each pool stay contiguous so a renderer can
//! draw `count` instances with no gaps. Breaking and placing blocks update the
//! pools incrementally.
//!
//! ## Key Modules
//!
//! * `config` - World extents and terrain parameters, loadable from JSON
//! * `engine_state` - The world, its render pools, edits and player interaction
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_frontier::config::WorldConfig;
//! use voxel_frontier::engine_state::voxels::block::block_type::BlockType;
//! use voxel_frontier::engine_state::voxels::world::World;
//!
//! let config = WorldConfig { size_x: 8, size_z: 8, ..WorldConfig::default() };
//! let (mut world, _initial) = World::generate(config).unwrap();
//!
//! let report = world.break_block(Point3::new(4, 0, 4)).unwrap();
//! assert!(!report.is_empty());
//! world.place_block(Point3::new(4, 0, 4), BlockType::PLANK).unwrap();
//! assert!(world.check_consistency().is_ok());
//! ```

use log::info;

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::{TerrainConfig, WorldConfig};
pub use engine_state::EngineState;
pub use error::{WorldError, WorldResult};

/// Initializes `env_logger` on stdout, filtered by `RUST_LOG`.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
}
