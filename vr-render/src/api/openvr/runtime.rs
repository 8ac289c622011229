use crate::api::layouts;
use crate::coordinates::pose_from_matrix34;
use openvr_rs as vr;
use openvr_rs::system::event::Event;
use std::collections::HashMap;
use vr_render_api::utils;
use vr_render_api::{
    HeadSpace, TextureHandle, VRControllerLayout, VRControllerType, VRError, VREvent, VREye, VRFieldOfView,
    VRHand, VRInitError, VRInitResult, VRInputState, VRLayer, VRMirrorTextureId, VRPose, VRPoseState, VRResult,
    VRRuntime, VRRuntimeCapabilities, VRRuntimeKind, VRSessionStatus, VRSwapChainDesc, VRSwapChainId,
    VRTextureSize, VRTrackingState,
};

const TRACKING_ORIGIN: vr::TrackingUniverseOrigin = vr::TrackingUniverseOrigin::Standing;
const DEFAULT_SECONDS_TO_PHOTONS: f32 = 0.04;
const DEFAULT_REFRESH_RATE: f32 = 90.0;

// The compositor reads straight from the engine texture, so a swap chain is
// a single buffer aliasing it.
struct OpenVRSwapChain {
    desc: VRSwapChainDesc,
}

pub struct OpenVRRuntime {
    system: vr::System,
    compositor: vr::Compositor,
    swap_chains: HashMap<VRSwapChainId, OpenVRSwapChain>,
    // Render poses of the frame being built, from the last compositor wait.
    frame_poses: Option<[VRPoseState; 3]>,
    hmd_matrix: [[f32; 4]; 3],
    recommended_size: VRTextureSize,
    default_fovs: [VRFieldOfView; 2],
    haptic_pulse_us: u16,
    quit_requested: bool,
    context: vr::Context,
}

impl OpenVRRuntime {
    pub fn new(haptic_pulse_us: u16) -> VRInitResult<OpenVRRuntime> {
        let context = unsafe { vr::init(vr::ApplicationType::Scene) }
            .map_err(|e| VRInitError::no_hmd(format!("OpenVR init failed: {}", e)))?;
        let system = context
            .system()
            .map_err(|e| VRInitError::critical(format!("OpenVR system interface: {}", e)))?;
        let compositor = context
            .compositor()
            .map_err(|e| VRInitError::critical(format!("OpenVR compositor interface: {}", e)))?;

        let (width, height) = system.recommended_render_target_size();
        let default_fovs = [
            OpenVRRuntime::projection_fov(&system, VREye::Left),
            OpenVRRuntime::projection_fov(&system, VREye::Right),
        ];
        info!("OpenVR initialized, recommended eye size {}x{}", width, height);

        Ok(OpenVRRuntime {
            system,
            compositor,
            swap_chains: HashMap::new(),
            frame_poses: None,
            hmd_matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
            recommended_size: VRTextureSize::new(width, height),
            default_fovs,
            haptic_pulse_us,
            quit_requested: false,
            context,
        })
    }

    fn to_openvr_eye(eye: VREye) -> vr::Eye {
        match eye {
            VREye::Left => vr::Eye::Left,
            VREye::Right => vr::Eye::Right,
        }
    }

    fn to_openvr_role(hand: VRHand) -> vr::TrackedControllerRole {
        match hand {
            VRHand::Left => vr::TrackedControllerRole::LeftHand,
            VRHand::Right => vr::TrackedControllerRole::RightHand,
        }
    }

    // OpenVR reports raw tangents with up and left negative.
    fn projection_fov(system: &vr::System, eye: VREye) -> VRFieldOfView {
        let raw = system.projection_raw(OpenVRRuntime::to_openvr_eye(eye));
        VRFieldOfView {
            up_tan: -raw.top,
            down_tan: raw.bottom,
            left_tan: -raw.left,
            right_tan: raw.right,
        }
    }

    fn hmd_float_property(&self, property: vr::TrackedDeviceProperty) -> Option<f32> {
        self.system
            .float_tracked_device_property(vr::tracked_device_index::HMD, property)
            .ok()
    }

    fn hmd_string_property(&self, property: vr::TrackedDeviceProperty) -> String {
        self.system
            .string_tracked_device_property(vr::tracked_device_index::HMD, property)
            .ok()
            .and_then(|value| value.into_string().ok())
            .unwrap_or_default()
    }

    // https://github.com/ValveSoftware/openvr/wiki/IVRSystem::GetDeviceToAbsoluteTrackingPose
    fn seconds_to_photons(&self) -> f32 {
        let since_vsync = match self.system.time_since_last_vsync() {
            Some((seconds, _frame_counter)) => seconds,
            None => return DEFAULT_SECONDS_TO_PHOTONS,
        };
        let frame_duration = 1.0 / self.refresh_rate();
        match self.hmd_float_property(vr::property::SecondsFromVsyncToPhotons_Float) {
            Some(vsync_to_photons) => frame_duration - since_vsync + vsync_to_photons,
            None => DEFAULT_SECONDS_TO_PHOTONS,
        }
    }

    fn pose_state(pose: &vr::TrackedDevicePose) -> VRPoseState {
        if !pose.pose_is_valid() {
            return VRPoseState::default();
        }
        let velocity = pose.velocity();
        let angular_velocity = pose.angular_velocity();
        VRPoseState {
            pose: pose_from_matrix34(pose.device_to_absolute_tracking()),
            linear_velocity: euclid::Vector3D::new(velocity[0], velocity[1], velocity[2]),
            angular_velocity: euclid::Vector3D::new(angular_velocity[0], angular_velocity[1], angular_velocity[2]),
            tracked: pose.device_is_connected(),
        }
    }

    // Head, left hand and right hand out of a full device pose array.
    fn device_states(&self, poses: &vr::TrackedDevicePoses) -> [VRPoseState; 3] {
        let hand = |hand: VRHand| {
            self.system
                .tracked_device_index_for_controller_role(OpenVRRuntime::to_openvr_role(hand))
                .and_then(|index| poses.get(index as usize))
                .map(OpenVRRuntime::pose_state)
                .unwrap_or_default()
        };
        [
            OpenVRRuntime::pose_state(&poses[vr::tracked_device_index::HMD as usize]),
            hand(VRHand::Left),
            hand(VRHand::Right),
        ]
    }

    fn swap_chain(&self, chain: VRSwapChainId) -> VRResult<&OpenVRSwapChain> {
        self.swap_chains.get(&chain).ok_or(VRError::UnknownSwapChain(chain.0))
    }

    fn interpupillary_distance(&mut self) -> f32 {
        let left = self.system.eye_to_head_transform(vr::Eye::Left);
        let right = self.system.eye_to_head_transform(vr::Eye::Right);
        (right[0][3] - left[0][3]).abs()
    }
}

impl VRRuntime for OpenVRRuntime {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::OpenVR
    }

    fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.hmd_string_property(vr::property::ManufacturerName_String),
            self.hmd_string_property(vr::property::ModelNumber_String)
        )
    }

    fn capabilities(&self) -> VRRuntimeCapabilities {
        VRRuntimeCapabilities {
            has_position: true,
            has_orientation: true,
            has_external_display: true,
            can_present: true,
            owns_swap_chains: false,
            has_mirror: false,
            perf_hud_modes: 1,
        }
    }

    fn hmd_resolution(&self) -> VRTextureSize {
        VRTextureSize::new(self.recommended_size.width * 2, self.recommended_size.height)
    }

    fn refresh_rate(&self) -> f32 {
        self.hmd_float_property(vr::property::DisplayFrequency_Float)
            .unwrap_or(DEFAULT_REFRESH_RATE)
    }

    fn default_eye_fov(&self, eye: VREye) -> VRFieldOfView {
        self.default_fovs[eye.index()]
    }

    // The recommended size matches the default FOV; other FOVs scale it.
    fn fov_texture_size(&self, eye: VREye, fov: &VRFieldOfView) -> VRTextureSize {
        let default = &self.default_fovs[eye.index()];
        let scale_x = fov.horizontal_tan() / default.horizontal_tan();
        let scale_y = fov.vertical_tan() / default.vertical_tan();
        VRTextureSize::new(
            (self.recommended_size.width as f32 * scale_x).ceil() as u32,
            (self.recommended_size.height as f32 * scale_y).ceil() as u32,
        )
    }

    fn eye_offset(&mut self, eye: VREye, _fov: &VRFieldOfView) -> VRPose<HeadSpace> {
        let matrix = self.system.eye_to_head_transform(OpenVRRuntime::to_openvr_eye(eye));
        VRPose::from_arrays([matrix[0][3], matrix[1][3], matrix[2][3]], utils::matrix_to_quat(&matrix))
    }

    fn session_status(&mut self) -> VRResult<VRSessionStatus> {
        let hmd_present = self.system.is_tracked_device_connected(vr::tracked_device_index::HMD);
        Ok(VRSessionStatus {
            is_visible: !self.quit_requested,
            has_input_focus: !self.quit_requested,
            should_quit: self.quit_requested,
            should_recenter: false,
            hmd_present,
            hmd_mounted: hmd_present,
        })
    }

    // Blocks on the compositor, which hands out the poses predicted for the next frame.
    fn predicted_display_time(&mut self, frame_index: u64) -> f64 {
        match self.compositor.wait_get_poses() {
            Ok(poses) => {
                self.hmd_matrix = *poses.render[vr::tracked_device_index::HMD as usize].device_to_absolute_tracking();
                self.frame_poses = Some(self.device_states(&poses.render));
            }
            Err(e) => {
                warn!("OpenVR WaitGetPoses failed for frame {}: {}", frame_index, e);
                self.frame_poses = None;
            }
        }
        utils::timestamp() / 1000.0 + self.seconds_to_photons() as f64
    }

    fn tracking_state(&mut self, display_time: f64, predict: bool) -> VRTrackingState {
        let states = match self.frame_poses {
            Some(states) if predict => states,
            _ => {
                let poses = self.system.device_to_absolute_tracking_pose(TRACKING_ORIGIN, 0.0);
                self.device_states(&poses)
            }
        };
        VRTrackingState {
            display_time,
            head: states[0],
            hands: [states[1], states[2]],
        }
    }

    fn recenter_tracking_origin(&mut self) {
        self.system.reset_seated_zero_pose();
    }

    fn poll_events(&mut self) -> Vec<VREvent> {
        let mut events = Vec::new();
        while let Some((info, _pose)) = self.system.poll_next_event_with_pose(TRACKING_ORIGIN) {
            match info.event {
                Event::Quit(_) => {
                    self.quit_requested = true;
                    events.push(VREvent::Quit);
                }
                Event::IpdChanged(_) => {
                    let ipd = self.interpupillary_distance();
                    events.push(VREvent::IpdChanged(ipd));
                }
                _ => {}
            }
        }
        events
    }

    fn controller_layout(&self) -> VRControllerLayout {
        layouts::openvr_layout()
    }

    fn input_state(&mut self, hand: VRHand) -> VRResult<VRInputState> {
        let index = self
            .system
            .tracked_device_index_for_controller_role(OpenVRRuntime::to_openvr_role(hand))
            .ok_or(VRError::InputUnavailable(hand.name()))?;
        let state = self
            .system
            .controller_state(index)
            .ok_or(VRError::InputUnavailable(hand.name()))?;

        // Touchpad on axis 0, analog trigger in the x of axis 1, grip in the x of axis 2.
        Ok(VRInputState {
            controller_type: VRControllerType::for_hand(hand),
            buttons: state.button_pressed,
            thumbstick: [state.axis[0].x, state.axis[0].y],
            trigger: state.axis[1].x,
            grip: state.axis[2].x,
        })
    }

    fn trigger_haptic_pulse(&mut self, hand: VRHand, strength: f32) -> VRResult<()> {
        let index = self
            .system
            .tracked_device_index_for_controller_role(OpenVRRuntime::to_openvr_role(hand))
            .ok_or(VRError::InputUnavailable(hand.name()))?;
        let duration = (strength.max(0.0).min(1.0) * self.haptic_pulse_us as f32) as u16;
        if duration > 0 {
            self.system.trigger_haptic_pulse(index, 0, duration);
        }
        Ok(())
    }

    fn create_swap_chain(&mut self, desc: &VRSwapChainDesc) -> VRInitResult<VRSwapChainId> {
        let id = VRSwapChainId(utils::new_id());
        self.swap_chains.insert(id, OpenVRSwapChain { desc: *desc });
        Ok(id)
    }

    fn swap_chain_length(&self, chain: VRSwapChainId) -> VRResult<usize> {
        self.swap_chain(chain).map(|_| 1)
    }

    fn swap_chain_current_index(&mut self, chain: VRSwapChainId) -> VRResult<usize> {
        self.swap_chain(chain).map(|_| 0)
    }

    fn swap_chain_buffer(&mut self, chain: VRSwapChainId, index: usize) -> VRResult<TextureHandle> {
        let swap_chain = self.swap_chain(chain)?;
        if index != 0 {
            return Err(VRError::runtime_call("swap_chain_buffer", format!("index {} out of range", index)));
        }
        Ok(swap_chain.desc.engine_texture)
    }

    fn commit_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        self.swap_chain(chain).map(|_| ())
    }

    fn destroy_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        self.swap_chains
            .remove(&chain)
            .map(|_| ())
            .ok_or(VRError::UnknownSwapChain(chain.0))
    }

    fn create_mirror_texture(&mut self, _size: VRTextureSize) -> VRInitResult<VRMirrorTextureId> {
        Err(VRInitError::render("OpenVR has no mirror texture"))
    }

    fn mirror_texture_buffer(&mut self, mirror: VRMirrorTextureId) -> VRResult<TextureHandle> {
        Err(VRError::UnknownMirrorTexture(mirror.0))
    }

    fn destroy_mirror_texture(&mut self, mirror: VRMirrorTextureId) -> VRResult<()> {
        Err(VRError::UnknownMirrorTexture(mirror.0))
    }

    // WaitGetPoses already blocked in predicted_display_time.
    fn wait_to_begin_frame(&mut self, _frame_index: u64) -> VRResult<()> {
        Ok(())
    }

    fn begin_frame(&mut self, _frame_index: u64) -> VRResult<()> {
        Ok(())
    }

    fn end_frame(&mut self, frame_index: u64, layer: &VRLayer) -> VRResult<()> {
        for eye in VREye::BOTH.iter() {
            let layer_eye = &layer.eyes[eye.index()];
            let handle = self.swap_chain(layer_eye.swap_chain)?.desc.engine_texture;
            let texture = vr::compositor::Texture {
                handle: vr::compositor::texture::Handle::OpenGLTexture(handle.0 as usize),
                color_space: vr::compositor::texture::ColorSpace::Auto,
            };
            let [u_min, v_min, u_max, v_max] = layer_eye.viewport.uv_bounds(layer_eye.texture_size);
            let bounds = vr::compositor::texture::Bounds {
                min: (u_min, v_min),
                max: (u_max, v_max),
            };
            unsafe {
                self.compositor
                    .submit(OpenVRRuntime::to_openvr_eye(*eye), &texture, Some(&bounds), Some(self.hmd_matrix))
                    .map_err(|e| VRError::runtime_call("Submit", format!("frame {}: {}", frame_index, e)))?;
            }
        }
        self.compositor.post_present_handoff();
        Ok(())
    }
}

impl Drop for OpenVRRuntime {
    fn drop(&mut self) {
        info!("OpenVR shutdown");
        unsafe {
            self.context.shutdown();
        }
    }
}
