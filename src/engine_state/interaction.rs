//! # Interaction Module
//!
//! Resolves where the player is aiming. A ray is marched cell by cell
//! through the grid (Amanatides-Woo traversal) until it enters a solid
//! block or runs out of length. The hit records the face the ray came in
//! through, which is also where a placed block goes.
//!
//! Reach is enforced here, on the caller side of the world: the world
//! itself edits any coordinate it is given.

use cgmath::{InnerSpace, Point3, Vector3};

use super::voxels::block::block_side::BlockSide;
use super::voxels::grid::VoxelGrid;

/// A half-line in world space, in voxel units.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Always unit length, or zero for a degenerate ray that hits nothing.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let length = direction.magnitude();
        let direction = if length.is_normal() {
            direction / length
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
        Self { origin, direction }
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

/// The first solid block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub voxel: Point3<i32>,
    /// The face of `voxel` the ray entered through
    pub face: BlockSide,
    /// Distance from the ray origin to the entry point
    pub distance: f32,
}

impl RayHit {
    /// The air cell in front of the hit face, where a new block would go.
    pub fn placement_target(&self) -> Point3<i32> {
        self.face.neighbor_of(self.voxel)
    }
}

/// Whether `hit` is close enough to be edited.
pub fn within_reach(hit: &RayHit, max_reach: f32) -> bool {
    hit.distance <= max_reach
}

/// Marches `ray` through `grid` and returns the first solid block it enters
/// within `max_distance`.
///
/// The cell containing the origin is never reported, so a ray starting
/// inside a block looks past it. Cells outside the grid are air.
pub fn cast_ray(grid: &VoxelGrid, ray: &Ray, max_distance: f32) -> Option<RayHit> {
    if ray.direction.magnitude2() == 0.0 || !max_distance.is_finite() {
        return None;
    }

    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let direction = [ray.direction.x, ray.direction.y, ray.direction.z];
    let mut voxel = origin.map(|coordinate| coordinate.floor() as i32);

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        let d = direction[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_max[axis] = (voxel[axis] as f32 + 1.0 - origin[axis]) / d;
            t_delta[axis] = 1.0 / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_max[axis] = (origin[axis] - voxel[axis] as f32) / -d;
            t_delta[axis] = -1.0 / d;
        }
    }

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        let distance = t_max[axis];
        if distance > max_distance {
            return None;
        }

        voxel[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        let position = Point3::new(voxel[0], voxel[1], voxel[2]);
        if grid.is_solid(position) {
            return Some(RayHit {
                voxel: position,
                face: entry_face(axis, step[axis]),
                distance,
            });
        }
    }
}

/// The face crossed when stepping along `axis` in direction `step`: the
/// side of the new cell facing back towards the ray origin.
fn entry_face(axis: usize, step: i32) -> BlockSide {
    let heading = match (axis, step > 0) {
        (0, true) => BlockSide::RIGHT,
        (0, false) => BlockSide::LEFT,
        (1, true) => BlockSide::TOP,
        (1, false) => BlockSide::BOTTOM,
        (_, true) => BlockSide::FRONT,
        (_, false) => BlockSide::BACK,
    };
    heading.opposite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    /// A 4x4x4 grid with a stone floor at y = 0.
    fn floor_grid() -> VoxelGrid {
        let mut grid = VoxelGrid::new(4, 4, 4);
        for x in 0..4 {
            for z in 0..4 {
                grid.set_type(Point3::new(x, 0, z), BlockType::STONE);
            }
        }
        grid
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, -4.0, 0.0));
        assert_eq!(ray.direction, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(ray.at(2.0), Point3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn downward_ray_hits_top_face() {
        let grid = floor_grid();
        let ray = Ray::new(Point3::new(1.5, 3.5, 2.5), Vector3::new(0.0, -1.0, 0.0));
        let hit = cast_ray(&grid, &ray, 10.0).unwrap();
        assert_eq!(hit.voxel, Point3::new(1, 0, 2));
        assert_eq!(hit.face, BlockSide::TOP);
        assert_eq!(hit.distance, 2.5);
        assert_eq!(hit.placement_target(), Point3::new(1, 1, 2));
    }

    #[test]
    fn sideways_ray_hits_the_facing_side() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.set_type(Point3::new(3, 1, 1), BlockType::LOG);
        let ray = Ray::new(Point3::new(0.5, 1.5, 1.5), Vector3::new(1.0, 0.0, 0.0));
        let hit = cast_ray(&grid, &ray, 10.0).unwrap();
        assert_eq!(hit.voxel, Point3::new(3, 1, 1));
        assert_eq!(hit.face, BlockSide::LEFT);
        assert_eq!(hit.placement_target(), Point3::new(2, 1, 1));
    }

    #[test]
    fn axis_rays_enter_through_the_side_facing_them() {
        let mut grid = VoxelGrid::new(5, 5, 5);
        let center = Point3::new(2, 2, 2);
        grid.set_type(center, BlockType::GLASS);

        for side in BlockSide::all() {
            let offset = side.offset();
            let origin = Point3::new(
                (center.x + 2 * offset.x) as f32 + 0.5,
                (center.y + 2 * offset.y) as f32 + 0.5,
                (center.z + 2 * offset.z) as f32 + 0.5,
            );
            let toward = Vector3::new(-offset.x as f32, -offset.y as f32, -offset.z as f32);
            let hit = cast_ray(&grid, &Ray::new(origin, toward), 10.0).unwrap();

            assert_eq!(hit.voxel, center);
            assert_eq!(hit.face, side);
            assert_eq!(hit.distance, 1.5);
            assert_eq!(hit.placement_target(), center + offset);
        }
    }

    #[test]
    fn ray_entering_from_outside_the_world_hits() {
        let grid = floor_grid();
        let ray = Ray::new(Point3::new(2.5, 9.5, 2.5), Vector3::new(0.0, -1.0, 0.0));
        let hit = cast_ray(&grid, &ray, 20.0).unwrap();
        assert_eq!(hit.voxel, Point3::new(2, 0, 2));
        assert_eq!(hit.distance, 8.5);
    }

    #[test]
    fn short_or_empty_rays_miss() {
        let grid = floor_grid();
        let down = Ray::new(Point3::new(1.5, 3.5, 1.5), Vector3::new(0.0, -1.0, 0.0));
        assert!(cast_ray(&grid, &down, 2.0).is_none());

        let up = Ray::new(Point3::new(1.5, 1.5, 1.5), Vector3::new(0.0, 1.0, 0.0));
        assert!(cast_ray(&grid, &up, 10.0).is_none());

        let degenerate = Ray::new(Point3::new(1.5, 1.5, 1.5), Vector3::new(0.0, 0.0, 0.0));
        assert!(cast_ray(&grid, &degenerate, 10.0).is_none());
    }

    #[test]
    fn reach_is_inclusive() {
        let hit = RayHit {
            voxel: Point3::new(0, 0, 0),
            face: BlockSide::TOP,
            distance: 4.0,
        };
        assert!(within_reach(&hit, 4.0));
        assert!(!within_reach(&hit, 3.9));
    }
}
