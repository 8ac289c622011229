use euclid::{Angle, Rotation3D, Vector3D};
use vr_render_api::{DeviceSpace, HeadSpace, VREye, VRFieldOfView, VRPose, WorldSpace};

pub const DEFAULT_NEAR_CLIP: f32 = 0.01;
pub const DEFAULT_FAR_CLIP: f32 = 500.0;
pub const MONO_FOV_DEGREES: f32 = 90.0;

// Asymmetric view frustum given by tangents at unit distance plus clip planes.
// left and bottom are negative for a frustum containing the view axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    pub fn from_fov(fov: &VRFieldOfView, near: f32, far: f32) -> Frustum {
        Frustum {
            left: -fov.left_tan,
            right: fov.right_tan,
            top: fov.up_tan,
            bottom: -fov.down_tan,
            near,
            far,
        }
    }

    // Column major OpenGL style projection matrix.
    pub fn projection_matrix(&self) -> [f32; 16] {
        let (l, r, t, b, n, f) = (self.left, self.right, self.top, self.bottom, self.near, self.far);
        let x_scale = 2.0 / (r - l);
        let y_scale = 2.0 / (t - b);
        let x_offset = (r + l) / (r - l);
        let y_offset = (t + b) / (t - b);
        let depth = -(f + n) / (f - n);
        let depth_offset = -2.0 * f * n / (f - n);

        [
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            x_offset, y_offset, depth, -1.0,
            0.0, 0.0, depth_offset, 0.0,
        ]
    }
}

// Camera attached to the rig. Its local pose is relative to the head center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeCamera {
    pub eye: VREye,
    pub local_position: Vector3D<f32, HeadSpace>,
    pub local_orientation: Rotation3D<f32, DeviceSpace, HeadSpace>,
    pub fov: VRFieldOfView,
    pub frustum: Frustum,
}

impl EyeCamera {
    fn new(eye: VREye, fov: VRFieldOfView, near: f32, far: f32) -> EyeCamera {
        EyeCamera {
            eye,
            local_position: Vector3D::zero(),
            local_orientation: Rotation3D::identity(),
            fov,
            frustum: Frustum::from_fov(&fov, near, far),
        }
    }

    pub fn local_pose(&self) -> VRPose<HeadSpace> {
        VRPose {
            position: self.local_position,
            orientation: self.local_orientation,
        }
    }
}

// Symmetric camera used by the monoscopic debug view and when no headset presents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoCamera {
    pub fov_y: Angle<f32>,
    pub aspect: f32,
    pub frustum: Frustum,
}

impl MonoCamera {
    fn new(aspect: f32, near: f32, far: f32) -> MonoCamera {
        let fov = VRFieldOfView::symmetric(MONO_FOV_DEGREES, aspect);
        MonoCamera {
            fov_y: Angle::degrees(MONO_FOV_DEGREES),
            aspect,
            frustum: Frustum::from_fov(&fov, near, far),
        }
    }
}

/// Two eye cameras and a monoscopic camera hanging off a node that follows the head.
#[derive(Debug, Clone)]
pub struct StereoCameraRig {
    eyes: [EyeCamera; 2],
    mono: MonoCamera,
    offsets: [Option<VRPose<HeadSpace>>; 2],
    rig_pose: VRPose<WorldSpace>,
    near: f32,
    far: f32,
}

impl StereoCameraRig {
    pub fn new(fovs: [VRFieldOfView; 2], mono_aspect: f32, near: f32, far: f32) -> StereoCameraRig {
        StereoCameraRig {
            eyes: [
                EyeCamera::new(VREye::Left, fovs[0], near, far),
                EyeCamera::new(VREye::Right, fovs[1], near, far),
            ],
            mono: MonoCamera::new(mono_aspect, near, far),
            offsets: [None, None],
            rig_pose: VRPose::default(),
            near,
            far,
        }
    }

    pub fn eye(&self, eye: VREye) -> &EyeCamera {
        &self.eyes[eye.index()]
    }

    pub fn mono(&self) -> &MonoCamera {
        &self.mono
    }

    pub fn near_clipping_distance(&self) -> f32 {
        self.near
    }

    pub fn far_clipping_distance(&self) -> f32 {
        self.far
    }

    pub fn set_near_clipping_distance(&mut self, distance: f32) {
        self.near = distance;
        self.update_projections();
    }

    pub fn set_far_clipping_distance(&mut self, distance: f32) {
        self.far = distance;
        self.update_projections();
    }

    /// Applies per-eye offsets. Returns true when they differ from the previous ones,
    /// in which case both cameras were moved.
    pub fn update_eye_offsets(&mut self, offsets: [VRPose<HeadSpace>; 2]) -> bool {
        if self.offsets[0] == Some(offsets[0]) && self.offsets[1] == Some(offsets[1]) {
            return false;
        }
        for eye in VREye::BOTH.iter() {
            let offset = offsets[eye.index()];
            let camera = &mut self.eyes[eye.index()];
            camera.local_position = offset.position;
            camera.local_orientation = offset.orientation;
            self.offsets[eye.index()] = Some(offset);
        }
        true
    }

    pub fn apply_rig_pose(&mut self, pose: VRPose<WorldSpace>) {
        self.rig_pose = pose;
    }

    pub fn rig_pose(&self) -> &VRPose<WorldSpace> {
        &self.rig_pose
    }

    // World pose of an eye camera.
    pub fn eye_world_pose(&self, eye: VREye) -> VRPose<WorldSpace> {
        vr_render_api::eye_pose(&self.rig_pose, &self.eyes[eye.index()].local_pose())
    }

    fn update_projections(&mut self) {
        let (near, far) = (self.near, self.far);
        for camera in self.eyes.iter_mut() {
            camera.frustum = Frustum::from_fov(&camera.fov, near, far);
        }
        self.mono = MonoCamera::new(self.mono.aspect, near, far);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rift_fovs() -> [VRFieldOfView; 2] {
        [
            VRFieldOfView { up_tan: 1.33, down_tan: 1.33, left_tan: 1.06, right_tan: 1.09 },
            VRFieldOfView { up_tan: 1.33, down_tan: 1.33, left_tan: 1.09, right_tan: 1.06 },
        ]
    }

    #[test]
    fn frustum_negates_left_and_down() {
        let fov = VRFieldOfView { up_tan: 1.2, down_tan: 1.4, left_tan: 1.1, right_tan: 0.9 };
        let frustum = Frustum::from_fov(&fov, 0.01, 500.0);
        assert_eq!((frustum.left, frustum.right, frustum.top, frustum.bottom), (-1.1, 0.9, 1.2, -1.4));
    }

    #[test]
    fn symmetric_projection_has_no_offset() {
        let fov = VRFieldOfView::default();
        let m = Frustum::from_fov(&fov, 1.0, 3.0).projection_matrix();
        assert_eq!(m[0], 1.0);
        assert_eq!(m[5], 1.0);
        assert_eq!(m[8], 0.0);
        assert_eq!(m[9], 0.0);
        assert_eq!(m[10], -2.0);
        assert_eq!(m[11], -1.0);
        assert_eq!(m[14], -3.0);
    }

    #[test]
    fn clip_change_updates_both_eyes_and_mono() {
        let mut rig = StereoCameraRig::new(rift_fovs(), 16.0 / 9.0, DEFAULT_NEAR_CLIP, DEFAULT_FAR_CLIP);
        rig.set_near_clipping_distance(0.1);
        rig.set_far_clipping_distance(100.0);
        for eye in VREye::BOTH.iter() {
            let frustum = rig.eye(*eye).frustum;
            assert_eq!((frustum.near, frustum.far), (0.1, 100.0));
        }
        assert_eq!((rig.mono().frustum.near, rig.mono().frustum.far), (0.1, 100.0));
        // asymmetry is kept
        assert_eq!(rig.eye(VREye::Left).frustum.left, -1.06);
        assert_eq!(rig.eye(VREye::Right).frustum.left, -1.09);
    }

    #[test]
    fn offsets_only_reported_when_changed() {
        let mut rig = StereoCameraRig::new(rift_fovs(), 1.0, 0.01, 500.0);
        let left = VRPose::from_arrays([-0.032, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        let right = VRPose::from_arrays([0.032, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        assert!(rig.update_eye_offsets([left, right]));
        assert!(!rig.update_eye_offsets([left, right]));

        let wider = VRPose::from_arrays([0.035, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        assert!(rig.update_eye_offsets([left, wider]));
        assert_eq!(rig.eye(VREye::Right).local_position.x, 0.035);
        assert_eq!(rig.eye(VREye::Left).local_position.x, -0.032);
    }

    #[test]
    fn eye_world_pose_follows_the_rig() {
        let mut rig = StereoCameraRig::new(rift_fovs(), 1.0, 0.01, 500.0);
        let left = VRPose::from_arrays([-0.032, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        let right = VRPose::from_arrays([0.032, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);
        rig.update_eye_offsets([left, right]);
        rig.apply_rig_pose(VRPose::from_arrays([1.0, 1.6, -2.0], [0.0, 0.0, 0.0, 1.0]));

        let world = rig.eye_world_pose(VREye::Left);
        assert!((world.position.x - 0.968).abs() < 1e-5);
        assert!((world.position.y - 1.6).abs() < 1e-5);
        assert!((world.position.z + 2.0).abs() < 1e-5);
    }

    #[test]
    fn mono_camera_has_ninety_degree_vertical_fov() {
        let rig = StereoCameraRig::new(rift_fovs(), 2.0, 0.01, 500.0);
        assert!((rig.mono().frustum.top - 1.0).abs() < 1e-5);
        assert!((rig.mono().frustum.right - 2.0).abs() < 1e-5);
        assert!((rig.mono().fov_y.to_degrees() - 90.0).abs() < 1e-3);
    }
}
