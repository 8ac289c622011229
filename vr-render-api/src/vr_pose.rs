use euclid::{Rotation3D, Vector3D};

// Space reported by the VR runtime, origin at the tracking origin (floor or seated zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingSpace {}

// Application world space, reached by composing a tracking pose with a BodyTransform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSpace {}

// Space centered between the user's eyes. Eye offsets are expressed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadSpace {}

// Local frame of a tracked object (headset, eye, controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSpace {}

/// Position and orientation of a tracked object, expressed in `Space`.
///
/// The orientation maps the device local frame into `Space` and is always normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde-serialization", serde(bound = ""))]
pub struct VRPose<Space> {
    // Position in meters.
    pub position: Vector3D<f32, Space>,

    // Unit quaternion.
    pub orientation: Rotation3D<f32, DeviceSpace, Space>,
}

impl<Space> Default for VRPose<Space> {
    fn default() -> VRPose<Space> {
        VRPose {
            position: Vector3D::zero(),
            orientation: Rotation3D::identity(),
        }
    }
}

impl<Space> VRPose<Space> {
    pub fn new(position: Vector3D<f32, Space>, orientation: Rotation3D<f32, DeviceSpace, Space>) -> VRPose<Space> {
        VRPose {
            position,
            orientation: orientation.normalize(),
        }
    }

    // Builds a pose from raw runtime arrays: position [x, y, z] and quaternion [x, y, z, w].
    pub fn from_arrays(position: [f32; 3], orientation: [f32; 4]) -> VRPose<Space> {
        let [x, y, z, w] = orientation;
        let rotation = Rotation3D::quaternion(x, y, z, w);
        let rotation = if rotation.norm() > 0.0 {
            rotation.normalize()
        } else {
            Rotation3D::identity()
        };
        VRPose {
            position: Vector3D::new(position[0], position[1], position[2]),
            orientation: rotation,
        }
    }

    pub fn position_array(&self) -> [f32; 3] {
        self.position.to_array()
    }

    // Quaternion as [x, y, z, w].
    pub fn orientation_array(&self) -> [f32; 4] {
        [self.orientation.i, self.orientation.j, self.orientation.k, self.orientation.r]
    }

    // Direction the device points at. Devices look down their local -Z axis.
    pub fn forward(&self) -> Vector3D<f32, Space> {
        self.orientation.transform_vector3d(Vector3D::new(0.0, 0.0, -1.0))
    }
}

/// Places an eye offset (expressed in head space) on a head pose.
pub fn eye_pose<Space>(head: &VRPose<Space>, offset: &VRPose<HeadSpace>) -> VRPose<Space> {
    let head_rotation: Rotation3D<f32, HeadSpace, Space> = Rotation3D::quaternion(
        head.orientation.i,
        head.orientation.j,
        head.orientation.k,
        head.orientation.r,
    );
    VRPose {
        position: head.position + head_rotation.transform_vector3d(offset.position),
        orientation: offset.orientation.then(&head_rotation).normalize(),
    }
}

// Tracked state of a single device for the predicted display time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRPoseState {
    pub pose: VRPose<TrackingSpace>,

    // Meters per second, tracking space.
    pub linear_velocity: Vector3D<f32, TrackingSpace>,

    // Radians per second, tracking space.
    pub angular_velocity: Vector3D<f32, TrackingSpace>,

    // false when the runtime has no valid pose for the device this frame.
    pub tracked: bool,
}

impl Default for VRPoseState {
    fn default() -> VRPoseState {
        VRPoseState {
            pose: VRPose::default(),
            linear_velocity: Vector3D::zero(),
            angular_velocity: Vector3D::zero(),
            tracked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arrays_normalizes_orientation() {
        let pose: VRPose<TrackingSpace> = VRPose::from_arrays([1.0, 2.0, 3.0], [0.0, 2.0, 0.0, 2.0]);
        let q = pose.orientation_array();
        let norm = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert_eq!(pose.position_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_quaternion_falls_back_to_identity() {
        let pose: VRPose<TrackingSpace> = VRPose::from_arrays([0.0; 3], [0.0; 4]);
        assert_eq!(pose.orientation_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn forward_follows_yaw() {
        let half = std::f32::consts::FRAC_PI_4;
        // 90 degrees around +Y turns -Z into -X.
        let pose: VRPose<WorldSpace> = VRPose::from_arrays([0.0; 3], [0.0, half.sin(), 0.0, half.cos()]);
        let forward = pose.forward();
        assert!((forward.x + 1.0).abs() < 1e-5);
        assert!(forward.z.abs() < 1e-5);
    }

    #[test]
    fn eye_pose_rotates_offset_with_head() {
        let half = std::f32::consts::FRAC_PI_4;
        let head: VRPose<TrackingSpace> = VRPose::from_arrays([0.0, 1.7, 0.0], [0.0, half.sin(), 0.0, half.cos()]);
        let offset: VRPose<HeadSpace> = VRPose::from_arrays([0.032, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        let eye = eye_pose(&head, &offset);
        // +X offset rotated 90 degrees around +Y ends up on -Z.
        assert!(eye.position.x.abs() < 1e-5);
        assert!((eye.position.y - 1.7).abs() < 1e-5);
        assert!((eye.position.z + 0.032).abs() < 1e-5);
    }
}
