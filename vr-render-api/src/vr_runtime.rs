use crate::{
    HeadSpace, TextureHandle, VRControllerLayout, VREvent, VREye, VRFieldOfView, VRHand, VRInitResult,
    VRInputState, VRLayer, VRMirrorTextureId, VRPose, VRResult, VRRuntimeCapabilities, VRSessionStatus,
    VRSwapChainDesc, VRSwapChainId, VRTextureSize, VRTrackingState,
};

/// Runtimes a renderer can be started on, in the order they are usually preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum VRRuntimeKind {
    Oculus,
    OpenVR,
    Headless,
    Mock,
}

impl VRRuntimeKind {
    pub fn name(self) -> &'static str {
        match self {
            VRRuntimeKind::Oculus => "Oculus",
            VRRuntimeKind::OpenVR => "OpenVR",
            VRRuntimeKind::Headless => "Headless",
            VRRuntimeKind::Mock => "Mock",
        }
    }
}

/// The VRRuntime trait is the capability interface every vendor backend implements.
///
/// A VRRuntime only exists once its session has been created successfully,
/// so every method may assume a live session. All calls happen on the render thread.
pub trait VRRuntime {
    fn kind(&self) -> VRRuntimeKind;

    /// Human readable headset name.
    fn display_name(&self) -> String;

    fn capabilities(&self) -> VRRuntimeCapabilities;

    /// Native resolution of the headset panel (both eyes).
    fn hmd_resolution(&self) -> VRTextureSize;

    fn refresh_rate(&self) -> f32;

    /// Default field of view of an eye, as recommended by the runtime.
    fn default_eye_fov(&self, eye: VREye) -> VRFieldOfView;

    /// Render target size that covers `fov` at full pixel density.
    fn fov_texture_size(&self, eye: VREye, fov: &VRFieldOfView) -> VRTextureSize;

    /// Offset pose of an eye from the head center. Changes with the IPD.
    fn eye_offset(&mut self, eye: VREye, fov: &VRFieldOfView) -> VRPose<HeadSpace>;

    /// Height of the user's eyes above the floor, when the runtime knows it.
    fn user_eye_height(&self) -> Option<f32> {
        None
    }

    /// Queries the session flags. Callers cache the result per frame.
    fn session_status(&mut self) -> VRResult<VRSessionStatus>;

    /// Display time, in seconds, at which the frame with `frame_index` is expected to be shown.
    fn predicted_display_time(&mut self, frame_index: u64) -> f64;

    /// Head and hand poses predicted for `display_time`.
    fn tracking_state(&mut self, display_time: f64, predict: bool) -> VRTrackingState;

    /// Makes the current head pose the new tracking origin (yaw and position).
    fn recenter_tracking_origin(&mut self);

    /// Drains pending runtime events.
    fn poll_events(&mut self) -> Vec<VREvent> {
        Vec::new()
    }

    /// How raw input of this runtime maps onto named buttons and axes.
    fn controller_layout(&self) -> VRControllerLayout;

    fn input_state(&mut self, hand: VRHand) -> VRResult<VRInputState>;

    /// Starts a vibration of `strength` in [0, 1] on the controller of `hand`.
    fn trigger_haptic_pulse(&mut self, hand: VRHand, strength: f32) -> VRResult<()>;

    fn stop_haptics(&mut self, _hand: VRHand) -> VRResult<()> {
        Ok(())
    }

    fn create_swap_chain(&mut self, desc: &VRSwapChainDesc) -> VRInitResult<VRSwapChainId>;

    /// Number of textures behind a swap chain.
    fn swap_chain_length(&self, chain: VRSwapChainId) -> VRResult<usize>;

    /// Index of the texture to write this frame. Rotates after every commit.
    fn swap_chain_current_index(&mut self, chain: VRSwapChainId) -> VRResult<usize>;

    fn swap_chain_buffer(&mut self, chain: VRSwapChainId, index: usize) -> VRResult<TextureHandle>;

    fn commit_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()>;

    fn destroy_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()>;

    fn create_mirror_texture(&mut self, size: VRTextureSize) -> VRInitResult<VRMirrorTextureId>;

    fn mirror_texture_buffer(&mut self, mirror: VRMirrorTextureId) -> VRResult<TextureHandle>;

    fn destroy_mirror_texture(&mut self, mirror: VRMirrorTextureId) -> VRResult<()>;

    /// Blocks until the compositor lets the application start `frame_index`.
    fn wait_to_begin_frame(&mut self, frame_index: u64) -> VRResult<()>;

    fn begin_frame(&mut self, frame_index: u64) -> VRResult<()>;

    /// Submits the stereo layer of `frame_index`.
    fn end_frame(&mut self, frame_index: u64, layer: &VRLayer) -> VRResult<()>;

    fn set_perf_hud_mode(&mut self, _mode: u32) {}

    /// Audio output device the runtime wants the application to use.
    fn audio_device_hint(&self) -> Option<String> {
        None
    }
}

/// Creates runtime sessions. Registered in a VRRuntimeManager.
pub trait VRRuntimeCreator {
    fn kind(&self) -> VRRuntimeKind;

    fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>>;
}
