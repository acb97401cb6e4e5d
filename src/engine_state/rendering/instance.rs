//! Per-instance data for instanced block rendering.
//!
//! Every visible voxel occupies one slot in the pool of its block type; the
//! slot holds an `InstanceTransform` placing a unit cube at the voxel.

use cgmath::Point3;

/// The transform of one rendered block instance.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
///
/// Total size: 12 bytes. `#[repr(C)]` and `Pod` let a pool's active region be
/// uploaded to an instance buffer as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// World-space translation of the cube
    pub position: [f32; 3],
}

impl InstanceTransform {
    /// The transform of the unit cube occupying the voxel at `position`.
    pub fn at_voxel(position: Point3<i32>) -> Self {
        InstanceTransform {
            position: [position.x as f32, position.y as f32, position.z as f32],
        }
    }

    /// The voxel this transform places a cube at.
    pub fn voxel(&self) -> Point3<i32> {
        Point3::new(
            self.position[0].round() as i32,
            self.position[1].round() as i32,
            self.position[2].round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_back_to_its_voxel() {
        let transform = InstanceTransform::at_voxel(Point3::new(3, -1, 7));
        assert_eq!(transform.position, [3.0, -1.0, 7.0]);
        assert_eq!(transform.voxel(), Point3::new(3, -1, 7));
    }

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 12);
        let transforms = [InstanceTransform::at_voxel(Point3::new(1, 2, 3))];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&transforms).len(), 12);
    }
}
