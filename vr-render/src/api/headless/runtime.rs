use crate::camera_rig::MONO_FOV_DEGREES;
use crate::engine::DEFAULT_EYE_HEIGHT;
use vr_render_api::{
    HeadSpace, TextureHandle, VRControllerLayout, VRControllerType, VRError, VREye, VRFieldOfView, VRHand,
    VRInitError, VRInitResult, VRInputState, VRLayer, VRMirrorTextureId, VRPose, VRPoseState, VRResult,
    VRRuntime, VRRuntimeCapabilities, VRRuntimeKind, VRSessionStatus, VRSwapChainDesc, VRSwapChainId,
    VRTextureSize, VRTrackingState,
};

const HEADLESS_RESOLUTION: (u32, u32) = (1280, 720);
const HEADLESS_REFRESH_RATE: f32 = 60.0;

/// Runtime used when no headset is available. The head rests at eye height
/// above the feet, nothing can be presented and there are no controllers.
pub struct HeadlessVRRuntime {
    eye_height: f32,
    frame_index: u64,
}

impl HeadlessVRRuntime {
    pub fn new() -> HeadlessVRRuntime {
        HeadlessVRRuntime::with_eye_height(DEFAULT_EYE_HEIGHT)
    }

    pub fn with_eye_height(eye_height: f32) -> HeadlessVRRuntime {
        HeadlessVRRuntime {
            eye_height,
            frame_index: 0,
        }
    }

    fn unsupported(&self) -> VRError {
        VRError::Unsupported(VRRuntimeKind::Headless.name())
    }

    fn no_presentation(&self, what: &str) -> VRInitError {
        VRInitError::not_initialized(format!("headless runtime cannot create {}", what))
    }
}

impl Default for HeadlessVRRuntime {
    fn default() -> HeadlessVRRuntime {
        HeadlessVRRuntime::new()
    }
}

impl VRRuntime for HeadlessVRRuntime {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Headless
    }

    fn display_name(&self) -> String {
        "No headset".into()
    }

    fn capabilities(&self) -> VRRuntimeCapabilities {
        VRRuntimeCapabilities {
            has_orientation: true,
            ..VRRuntimeCapabilities::default()
        }
    }

    fn hmd_resolution(&self) -> VRTextureSize {
        VRTextureSize::new(HEADLESS_RESOLUTION.0, HEADLESS_RESOLUTION.1)
    }

    fn refresh_rate(&self) -> f32 {
        HEADLESS_REFRESH_RATE
    }

    fn default_eye_fov(&self, _eye: VREye) -> VRFieldOfView {
        let aspect = HEADLESS_RESOLUTION.0 as f32 / HEADLESS_RESOLUTION.1 as f32;
        VRFieldOfView::symmetric(MONO_FOV_DEGREES, aspect)
    }

    fn fov_texture_size(&self, _eye: VREye, _fov: &VRFieldOfView) -> VRTextureSize {
        self.hmd_resolution()
    }

    fn eye_offset(&mut self, _eye: VREye, _fov: &VRFieldOfView) -> VRPose<HeadSpace> {
        VRPose::default()
    }

    fn user_eye_height(&self) -> Option<f32> {
        Some(self.eye_height)
    }

    fn session_status(&mut self) -> VRResult<VRSessionStatus> {
        Ok(VRSessionStatus {
            hmd_present: false,
            hmd_mounted: false,
            ..VRSessionStatus::default()
        })
    }

    fn predicted_display_time(&mut self, frame_index: u64) -> f64 {
        self.frame_index = frame_index;
        frame_index as f64 / HEADLESS_REFRESH_RATE as f64
    }

    fn tracking_state(&mut self, display_time: f64, _predict: bool) -> VRTrackingState {
        VRTrackingState {
            display_time,
            head: VRPoseState {
                pose: VRPose::from_arrays([0.0, self.eye_height, 0.0], [0.0, 0.0, 0.0, 1.0]),
                tracked: true,
                ..VRPoseState::default()
            },
            hands: [VRPoseState::default(); 2],
        }
    }

    fn recenter_tracking_origin(&mut self) {}

    fn controller_layout(&self) -> VRControllerLayout {
        VRControllerLayout {
            type_name: "None".into(),
            axis_names: ["", "", "", ""],
            buttons: [Vec::new(), Vec::new()],
        }
    }

    // No controller type bits set, so the poller skips both sides.
    fn input_state(&mut self, _hand: VRHand) -> VRResult<VRInputState> {
        Ok(VRInputState {
            controller_type: VRControllerType::empty(),
            ..VRInputState::default()
        })
    }

    fn trigger_haptic_pulse(&mut self, _hand: VRHand, _strength: f32) -> VRResult<()> {
        Err(self.unsupported())
    }

    fn create_swap_chain(&mut self, _desc: &VRSwapChainDesc) -> VRInitResult<VRSwapChainId> {
        Err(self.no_presentation("swap chains"))
    }

    fn swap_chain_length(&self, chain: VRSwapChainId) -> VRResult<usize> {
        Err(VRError::UnknownSwapChain(chain.0))
    }

    fn swap_chain_current_index(&mut self, chain: VRSwapChainId) -> VRResult<usize> {
        Err(VRError::UnknownSwapChain(chain.0))
    }

    fn swap_chain_buffer(&mut self, chain: VRSwapChainId, _index: usize) -> VRResult<TextureHandle> {
        Err(VRError::UnknownSwapChain(chain.0))
    }

    fn commit_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        Err(VRError::UnknownSwapChain(chain.0))
    }

    fn destroy_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        Err(VRError::UnknownSwapChain(chain.0))
    }

    fn create_mirror_texture(&mut self, _size: VRTextureSize) -> VRInitResult<VRMirrorTextureId> {
        Err(self.no_presentation("a mirror texture"))
    }

    fn mirror_texture_buffer(&mut self, mirror: VRMirrorTextureId) -> VRResult<TextureHandle> {
        Err(VRError::UnknownMirrorTexture(mirror.0))
    }

    fn destroy_mirror_texture(&mut self, mirror: VRMirrorTextureId) -> VRResult<()> {
        Err(VRError::UnknownMirrorTexture(mirror.0))
    }

    fn wait_to_begin_frame(&mut self, _frame_index: u64) -> VRResult<()> {
        Ok(())
    }

    fn begin_frame(&mut self, _frame_index: u64) -> VRResult<()> {
        Ok(())
    }

    fn end_frame(&mut self, _frame_index: u64, _layer: &VRLayer) -> VRResult<()> {
        Err(self.unsupported())
    }
}
