use std::io::Write;

use cgmath::{Point3, Vector3};

use voxel_frontier::engine_state::interaction::Ray;
use voxel_frontier::engine_state::voxels::block::block_side::BlockSide;
use voxel_frontier::engine_state::voxels::block::block_type::BlockType;
use voxel_frontier::{EngineState, TerrainConfig, WorldConfig};

const CONFIG: &str = r#"{
    "size_x": 12,
    "size_z": 12,
    "surface_height": 8,
    "underground_depth": 8,
    "seed": 9,
    "max_reach": 6.0
}"#;

fn surface_y(engine_state: &EngineState, x: i32, z: i32) -> i32 {
    let (_, total_height, _) = engine_state.world().grid().dimensions();
    (0..total_height)
        .rev()
        .find(|y| !engine_state.world().get(Point3::new(x, *y, z)).is_air())
        .unwrap()
}

#[test]
fn dig_and_build_from_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = WorldConfig::from_file(file.path()).unwrap();
    assert_eq!(config.terrain, TerrainConfig::default());
    let mut engine_state = EngineState::new(config).unwrap();
    assert_eq!(engine_state.max_reach(), 6.0);

    let (x, z, top) = (0..12)
        .flat_map(|x| (0..12).map(move |z| (x, z)))
        .map(|(x, z)| (x, z, surface_y(&engine_state, x, z)))
        .find(|(_, _, top)| *top >= 1)
        .unwrap();
    let eye = Point3::new(x as f32 + 0.5, top as f32 + 2.5, z as f32 + 0.5);
    let look_down = Ray::new(eye, Vector3::new(0.0, -1.0, 0.0));

    let hit = engine_state.pick(&look_down).unwrap();
    assert_eq!(hit.voxel, Point3::new(x, top, z));
    assert_eq!(hit.face, BlockSide::TOP);

    assert!(engine_state.break_at(&hit).unwrap());
    assert!(engine_state.world().get(hit.voxel).is_air());

    engine_state.select_block(BlockType::PLANK);
    let floor = engine_state.pick(&look_down).unwrap();
    assert!(engine_state.place_at(&floor).unwrap());
    assert_eq!(engine_state.world().get(hit.voxel).block_type, BlockType::PLANK);
    assert_eq!(engine_state.buffer_state.instance_count(BlockType::PLANK), 1);
    assert!(engine_state.world().check_consistency().is_ok());
}

#[test]
fn every_column_can_be_dug_to_the_floor() {
    let config = WorldConfig {
        size_x: 6,
        size_z: 6,
        surface_height: 4,
        underground_depth: 4,
        ..WorldConfig::default()
    };
    let mut engine_state = EngineState::new(config).unwrap();
    let look_down = |x: i32, z: i32| {
        Ray::new(
            Point3::new(x as f32 + 0.5, 9.5, z as f32 + 0.5),
            Vector3::new(0.0, -1.0, 0.0),
        )
    };

    for x in 0..6 {
        for z in 0..6 {
            // Reach is 8, so a ray from y = 9.5 reaches every block above the floor.
            while let Some(hit) = engine_state.pick(&look_down(x, z)) {
                assert!(engine_state.break_at(&hit).unwrap());
            }
        }
    }

    let world = engine_state.world();
    assert!(world.check_consistency().is_ok());
    for pool in world.registry().pools() {
        assert_eq!(
            engine_state.buffer_state.instance_count(pool.block_type()),
            pool.count()
        );
    }
    // Only the floor layer, just out of reach, is left.
    assert!(world
        .grid()
        .cells()
        .all(|(position, state)| state.is_air() || position.y == 0));
}
