//! # Voxel Frontier Demo
//!
//! Generates a world, digs out the block under the centre of the map and
//! puts a block in its place (a plank unless another id is given), logging
//! the state of the instance buffers.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- [world.json] [block id, e.g. mc:glass]
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info};

use voxel_frontier::engine_state::interaction::Ray;
use voxel_frontier::engine_state::voxels::block::block_type::BlockType;
use voxel_frontier::{init_logging, EngineState, WorldConfig, WorldResult};

/// Eye height of a player standing on a block.
const EYE_HEIGHT: f32 = 1.6;

fn main() -> WorldResult<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading world config from {}", path);
            WorldConfig::from_file(path)?
        }
        None => WorldConfig::default(),
    };
    let placed = match args.next() {
        Some(id) => BlockType::from_name(&id)?,
        None => BlockType::PLANK,
    };

    let mut engine_state = EngineState::new(config)?;

    let (size_x, total_height, size_z) = engine_state.world().grid().dimensions();
    let (centre_x, centre_z) = (size_x / 2, size_z / 2);
    let surface = (0..total_height)
        .rev()
        .find(|y| !engine_state.world().get(Point3::new(centre_x, *y, centre_z)).is_air())
        .unwrap_or(-1);
    let eye = Point3::new(
        centre_x as f32 + 0.5,
        surface as f32 + 1.0 + EYE_HEIGHT,
        centre_z as f32 + 0.5,
    );
    let look_down = Ray::new(eye, Vector3::new(0.0, -1.0, 0.0));

    match engine_state.pick(&look_down) {
        Some(hit) => {
            info!("Looking at {:?} on its {:?} face", hit.voxel, hit.face);
            engine_state.break_at(&hit)?;

            info!("Placing {}", placed.location());
            engine_state.select_block(placed);
            if let Some(floor) = engine_state.pick(&look_down) {
                engine_state.place_at(&floor)?;
            }
        }
        None => info!("Nothing within reach below {:?}", eye),
    }

    for stats in engine_state.world().stats() {
        info!(
            "{:>8}: {:>6} instances ({} in buffer, capacity {})",
            stats.block_type.name(),
            stats.count,
            engine_state.buffer_state.instance_count(stats.block_type),
            stats.capacity
        );
    }
    info!(
        "Instance buffers: {} bytes used of {} allocated",
        engine_state.buffer_state.get_total_used_memory(),
        engine_state.buffer_state.get_total_allocated_memory()
    );

    if let Err(problem) = engine_state.world().check_consistency() {
        error!("World is inconsistent: {}", problem);
    }

    Ok(())
}
