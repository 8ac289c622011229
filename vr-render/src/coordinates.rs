//! Conversion of runtime-native vectors, quaternions and matrices into the
//! typed engine representation, and composition of tracking poses with the
//! player body into world space.

use euclid::{Angle, Rotation3D, Vector3D};
use vr_render_api::utils;
use vr_render_api::{DeviceSpace, TrackingSpace, VRPose, WorldSpace};

// Components as laid out by the runtimes: x, y, z.
pub type NativeVector3 = [f32; 3];

// Components as laid out by the runtimes: x, y, z, w.
pub type NativeQuaternion = [f32; 4];

pub fn to_engine_vector3(native: NativeVector3) -> Vector3D<f32, TrackingSpace> {
    Vector3D::new(native[0], native[1], native[2])
}

pub fn to_engine_quaternion(native: NativeQuaternion) -> Rotation3D<f32, DeviceSpace, TrackingSpace> {
    let [x, y, z, w] = native;
    let rotation = Rotation3D::quaternion(x, y, z, w);
    // Runtimes report all zeros before the first tracked sample.
    if rotation.norm() > 0.0 {
        rotation.normalize()
    } else {
        Rotation3D::identity()
    }
}

pub fn to_engine_pose(position: NativeVector3, orientation: NativeQuaternion) -> VRPose<TrackingSpace> {
    VRPose::new(to_engine_vector3(position), to_engine_quaternion(orientation))
}

/// Converts a row-major 3x4 device-to-tracking matrix into a pose.
pub fn pose_from_matrix34(matrix: &[[f32; 4]; 3]) -> VRPose<TrackingSpace> {
    let position = [matrix[0][3], matrix[1][3], matrix[2][3]];
    VRPose::from_arrays(position, utils::matrix_to_quat(matrix))
}

/// Feet position and orientation of the player body in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub feet_position: Vector3D<f32, WorldSpace>,
    pub orientation: Rotation3D<f32, TrackingSpace, WorldSpace>,
}

impl Default for BodyTransform {
    fn default() -> BodyTransform {
        BodyTransform {
            feet_position: Vector3D::zero(),
            orientation: Rotation3D::identity(),
        }
    }
}

impl BodyTransform {
    pub fn new(
        feet_position: Vector3D<f32, WorldSpace>,
        orientation: Rotation3D<f32, TrackingSpace, WorldSpace>,
    ) -> BodyTransform {
        BodyTransform {
            feet_position,
            orientation: orientation.normalize(),
        }
    }

    // Body turned around the vertical axis.
    pub fn from_yaw(feet_position: Vector3D<f32, WorldSpace>, yaw: Angle<f32>) -> BodyTransform {
        BodyTransform::new(feet_position, Rotation3D::around_y(yaw))
    }

    /// world_orientation = body_orientation * runtime_orientation,
    /// world_position = feet_position + body_orientation * runtime_position.
    pub fn to_world(&self, pose: &VRPose<TrackingSpace>) -> VRPose<WorldSpace> {
        VRPose {
            position: self.feet_position + self.orientation.transform_vector3d(pose.position),
            orientation: pose.orientation.then(&self.orientation).normalize(),
        }
    }

    // Inverse of to_world.
    pub fn to_tracking(&self, pose: &VRPose<WorldSpace>) -> VRPose<TrackingSpace> {
        let inverse = self.orientation.inverse();
        VRPose {
            position: inverse.transform_vector3d(pose.position - self.feet_position),
            orientation: pose.orientation.then(&inverse).normalize(),
        }
    }

    // Rotates a tracking space direction (velocity, axis) into world space.
    pub fn rotate_to_world(&self, vector: Vector3D<f32, TrackingSpace>) -> Vector3D<f32, WorldSpace> {
        self.orientation.transform_vector3d(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{} != {}", a, b);
    }

    fn assert_same_rotation(a: [f32; 4], b: [f32; 4]) {
        // q and -q are the same rotation
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        assert_close(dot.abs(), 1.0);
    }

    #[test]
    fn native_quaternion_keeps_component_order() {
        let q = to_engine_quaternion([0.0, 0.0, 1.0, 0.0]);
        assert_eq!((q.i, q.j, q.k, q.r), (0.0, 0.0, 1.0, 0.0));
        let v = to_engine_vector3([1.0, 2.0, 3.0]);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_quaternion_becomes_identity() {
        let q = to_engine_quaternion([0.0, 0.0, 0.0, 0.0]);
        assert_eq!((q.i, q.j, q.k, q.r), (0.0, 0.0, 0.0, 1.0));
        let pose = to_engine_pose([0.0, 1.0, 0.0], [0.0; 4]);
        assert!(pose.orientation_array().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn identity_body_is_passthrough() {
        let pose = to_engine_pose([0.1, 1.6, -0.2], [0.0, 0.0, 0.0, 1.0]);
        let world = BodyTransform::default().to_world(&pose);
        assert_eq!(world.position.to_array(), [0.1, 1.6, -0.2]);
    }

    #[test]
    fn body_yaw_rotates_and_offsets() {
        let body = BodyTransform::from_yaw(Vector3D::new(10.0, 0.0, 5.0), Angle::radians(FRAC_PI_2));
        let pose = to_engine_pose([1.0, 1.7, 0.0], [0.0, 0.0, 0.0, 1.0]);
        let world = body.to_world(&pose);
        assert_close(world.position.x, 10.0);
        assert_close(world.position.y, 1.7);
        assert_close(world.position.z, 4.0);
        let half = FRAC_PI_2 * 0.5;
        assert_same_rotation(world.orientation_array(), [0.0, half.sin(), 0.0, half.cos()]);
    }

    #[test]
    fn world_round_trip_recovers_tracking_pose() {
        let body = BodyTransform::from_yaw(Vector3D::new(-3.0, 0.5, 12.0), Angle::radians(2.3));
        let poses = [
            to_engine_pose([0.0, 1.6, 0.0], [0.0, 0.0, 0.0, 1.0]),
            to_engine_pose([0.3, 1.2, -0.4], [0.2, 0.4, -0.1, 0.9]),
            to_engine_pose([-1.5, 0.9, 2.0], [-0.5, 0.5, 0.5, 0.5]),
        ];
        for pose in poses.iter() {
            let back = body.to_tracking(&body.to_world(pose));
            for (a, b) in back.position_array().iter().zip(pose.position_array().iter()) {
                assert_close(*a, *b);
            }
            assert_same_rotation(back.orientation_array(), pose.orientation_array());
        }
    }

    #[test]
    fn matrix_translation_becomes_position() {
        let m = [[1.0, 0.0, 0.0, 0.5], [0.0, 1.0, 0.0, 1.8], [0.0, 0.0, 1.0, -0.25]];
        let pose = pose_from_matrix34(&m);
        assert_eq!(pose.position_array(), [0.5, 1.8, -0.25]);
        assert_same_rotation(pose.orientation_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
