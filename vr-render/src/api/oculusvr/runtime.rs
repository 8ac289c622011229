use super::binding::*;
use super::library::OVRLibrary;
use crate::api::layouts;
use crate::coordinates::to_engine_pose;
use std::collections::HashMap;
use std::ffi::CStr;
use std::mem;
use std::os::raw::c_int;
use std::ptr;
use vr_render_api::utils;
use vr_render_api::{
    HeadSpace, TextureHandle, TrackingSpace, VRControllerLayout, VRControllerType, VRError, VREye,
    VRFieldOfView, VRHand, VRInitError, VRInitResult, VRInputState, VRLayer, VRMirrorTextureId, VRPose,
    VRPoseState, VRResult, VRRuntime, VRRuntimeCapabilities, VRRuntimeKind, VRSessionStatus, VRSwapChainDesc,
    VRSwapChainId, VRTextureSize, VRTrackingState,
};

const DEFAULT_EYE_HEIGHT: f32 = 1.675;

// Oculus PC runtime session, LibOVR loaded at run time.
pub struct OculusRuntime {
    lib: OVRLibrary,
    session: ovrSession,
    hmd: ovrHmdDesc,
    swap_chains: HashMap<VRSwapChainId, ovrTextureSwapChain>,
    mirrors: HashMap<VRMirrorTextureId, ovrMirrorTexture>,
}

impl OculusRuntime {
    pub fn new() -> VRInitResult<OculusRuntime> {
        let lib = unsafe { OVRLibrary::new() }
            .map_err(|e| VRInitError::not_initialized(format!("Error loading LibOVR: {}", e)))?;

        let params = ovrInitParams {
            Flags: ovrInit_RequestVersion | ovrInit_FocusAware,
            RequestedMinorVersion: OVR_MINOR_VERSION,
            LogCallback: None,
            UserData: 0,
            ConnectionTimeoutMS: 0,
        };
        let result = unsafe { (*lib.initialize)(&params) };
        if !OVR_SUCCESS(result) {
            let message = OculusRuntime::last_error(&lib);
            return Err(VRInitError::critical(format!("ovr_Initialize failed ({}): {}", result, message)));
        }

        let mut session: ovrSession = ptr::null_mut();
        let mut luid = ovrGraphicsLuid::default();
        let result = unsafe { (*lib.create)(&mut session, &mut luid) };
        if !OVR_SUCCESS(result) || session.is_null() {
            let message = OculusRuntime::last_error(&lib);
            unsafe { (*lib.shutdown)() };
            return Err(VRInitError::no_hmd(format!("ovr_Create failed ({}): {}", result, message)));
        }

        let hmd = unsafe { (*lib.get_hmd_desc)(session) };
        let result = unsafe { (*lib.set_tracking_origin_type)(session, ovrTrackingOrigin_FloorLevel) };
        if !OVR_SUCCESS(result) {
            warn!("Cannot set floor level tracking origin: {}", OculusRuntime::last_error(&lib));
        }
        unsafe { (*lib.set_int)(session, b"PerfHudMode\0".as_ptr() as *const _, 0) };

        info!(
            "Oculus session created: {} {}x{} @ {}Hz",
            OculusRuntime::c_string(&hmd.ProductName),
            hmd.Resolution.w,
            hmd.Resolution.h,
            hmd.DisplayRefreshRate
        );

        Ok(OculusRuntime {
            lib,
            session,
            hmd,
            swap_chains: HashMap::new(),
            mirrors: HashMap::new(),
        })
    }

    fn last_error(lib: &OVRLibrary) -> String {
        let mut info: ovrErrorInfo = unsafe { mem::zeroed() };
        unsafe {
            (*lib.get_last_error_info)(&mut info);
            CStr::from_ptr(info.ErrorString.as_ptr()).to_string_lossy().into_owned()
        }
    }

    fn c_string(chars: &[std::os::raw::c_char]) -> String {
        let bytes: Vec<u8> = chars.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn check(&self, call: &'static str, result: ovrResult) -> VRResult<()> {
        if OVR_SUCCESS(result) {
            Ok(())
        } else {
            Err(VRError::runtime_call(call, format!("{}: {}", result, OculusRuntime::last_error(&self.lib))))
        }
    }

    fn check_init(&self, call: &str, result: ovrResult) -> VRInitResult<()> {
        if OVR_SUCCESS(result) {
            Ok(())
        } else {
            Err(VRInitError::render(format!(
                "{} failed ({}): {}",
                call,
                result,
                OculusRuntime::last_error(&self.lib)
            )))
        }
    }

    fn ovr_eye(eye: VREye) -> c_int {
        match eye {
            VREye::Left => ovrEye_Left,
            VREye::Right => ovrEye_Right,
        }
    }

    fn ovr_controller(hand: VRHand) -> u32 {
        match hand {
            VRHand::Left => ovrControllerType_LTouch,
            VRHand::Right => ovrControllerType_RTouch,
        }
    }

    fn to_fov_port(fov: &VRFieldOfView) -> ovrFovPort {
        ovrFovPort {
            UpTan: fov.up_tan,
            DownTan: fov.down_tan,
            LeftTan: fov.left_tan,
            RightTan: fov.right_tan,
        }
    }

    fn from_fov_port(fov: &ovrFovPort) -> VRFieldOfView {
        VRFieldOfView {
            up_tan: fov.UpTan,
            down_tan: fov.DownTan,
            left_tan: fov.LeftTan,
            right_tan: fov.RightTan,
        }
    }

    fn to_posef(pose: &VRPose<TrackingSpace>) -> ovrPosef {
        let [qx, qy, qz, qw] = pose.orientation_array();
        let [x, y, z] = pose.position_array();
        ovrPosef {
            Orientation: ovrQuatf { x: qx, y: qy, z: qz, w: qw },
            Position: ovrVector3f { x, y, z },
        }
    }

    fn pose_state(state: &ovrPoseStatef, status_flags: u32) -> VRPoseState {
        let pose = &state.ThePose;
        VRPoseState {
            pose: to_engine_pose(
                [pose.Position.x, pose.Position.y, pose.Position.z],
                [pose.Orientation.x, pose.Orientation.y, pose.Orientation.z, pose.Orientation.w],
            ),
            linear_velocity: euclid::Vector3D::new(
                state.LinearVelocity.x,
                state.LinearVelocity.y,
                state.LinearVelocity.z,
            ),
            angular_velocity: euclid::Vector3D::new(
                state.AngularVelocity.x,
                state.AngularVelocity.y,
                state.AngularVelocity.z,
            ),
            tracked: status_flags & (ovrStatus_OrientationTracked | ovrStatus_PositionTracked) != 0,
        }
    }

    fn swap_chain(&self, chain: VRSwapChainId) -> VRResult<ovrTextureSwapChain> {
        self.swap_chains.get(&chain).cloned().ok_or(VRError::UnknownSwapChain(chain.0))
    }

    fn to_recti(viewport: &vr_render_api::VRViewport) -> ovrRecti {
        ovrRecti {
            Pos: ovrVector2i {
                x: viewport.x,
                y: viewport.y,
            },
            Size: ovrSizei {
                w: viewport.width,
                h: viewport.height,
            },
        }
    }
}

impl VRRuntime for OculusRuntime {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Oculus
    }

    fn display_name(&self) -> String {
        format!(
            "{} {}",
            OculusRuntime::c_string(&self.hmd.Manufacturer),
            OculusRuntime::c_string(&self.hmd.ProductName)
        )
    }

    fn capabilities(&self) -> VRRuntimeCapabilities {
        VRRuntimeCapabilities {
            has_position: true,
            has_orientation: true,
            has_external_display: true,
            can_present: true,
            owns_swap_chains: true,
            has_mirror: true,
            perf_hud_modes: ovrPerfHud_Count,
        }
    }

    fn hmd_resolution(&self) -> VRTextureSize {
        VRTextureSize::new(self.hmd.Resolution.w.max(0) as u32, self.hmd.Resolution.h.max(0) as u32)
    }

    fn refresh_rate(&self) -> f32 {
        self.hmd.DisplayRefreshRate
    }

    fn default_eye_fov(&self, eye: VREye) -> VRFieldOfView {
        OculusRuntime::from_fov_port(&self.hmd.DefaultEyeFov[eye.index()])
    }

    fn fov_texture_size(&self, eye: VREye, fov: &VRFieldOfView) -> VRTextureSize {
        let size = unsafe {
            (*self.lib.get_fov_texture_size)(
                self.session,
                OculusRuntime::ovr_eye(eye),
                OculusRuntime::to_fov_port(fov),
                1.0,
            )
        };
        VRTextureSize::new(size.w.max(0) as u32, size.h.max(0) as u32)
    }

    fn eye_offset(&mut self, eye: VREye, fov: &VRFieldOfView) -> VRPose<HeadSpace> {
        let desc = unsafe {
            (*self.lib.get_render_desc)(self.session, OculusRuntime::ovr_eye(eye), OculusRuntime::to_fov_port(fov))
        };
        let pose = &desc.HmdToEyePose;
        VRPose::from_arrays(
            [pose.Position.x, pose.Position.y, pose.Position.z],
            [pose.Orientation.x, pose.Orientation.y, pose.Orientation.z, pose.Orientation.w],
        )
    }

    fn user_eye_height(&self) -> Option<f32> {
        let height =
            unsafe { (*self.lib.get_float)(self.session, b"EyeHeight\0".as_ptr() as *const _, DEFAULT_EYE_HEIGHT) };
        if height > 0.0 {
            Some(height)
        } else {
            None
        }
    }

    fn session_status(&mut self) -> VRResult<VRSessionStatus> {
        let mut status = ovrSessionStatus::default();
        let result = unsafe { (*self.lib.get_session_status)(self.session, &mut status) };
        self.check("ovr_GetSessionStatus", result)?;
        Ok(VRSessionStatus {
            is_visible: status.IsVisible != ovrFalse,
            has_input_focus: status.HasInputFocus != ovrFalse,
            should_quit: status.ShouldQuit != ovrFalse || status.DisplayLost != ovrFalse,
            should_recenter: status.ShouldRecenter != ovrFalse,
            hmd_present: status.HmdPresent != ovrFalse,
            hmd_mounted: status.HmdMounted != ovrFalse,
        })
    }

    fn predicted_display_time(&mut self, frame_index: u64) -> f64 {
        unsafe { (*self.lib.get_predicted_display_time)(self.session, frame_index as i64) }
    }

    fn tracking_state(&mut self, display_time: f64, predict: bool) -> VRTrackingState {
        let latency_marker = if predict { ovrTrue } else { ovrFalse };
        let state = unsafe { (*self.lib.get_tracking_state)(self.session, display_time, latency_marker) };
        VRTrackingState {
            display_time,
            head: OculusRuntime::pose_state(&state.HeadPose, state.StatusFlags),
            hands: [
                OculusRuntime::pose_state(&state.HandPoses[0], state.HandStatusFlags[0]),
                OculusRuntime::pose_state(&state.HandPoses[1], state.HandStatusFlags[1]),
            ],
        }
    }

    fn recenter_tracking_origin(&mut self) {
        let result = unsafe { (*self.lib.recenter_tracking_origin)(self.session) };
        if let Err(e) = self.check("ovr_RecenterTrackingOrigin", result) {
            warn!("{}", e);
        }
    }

    fn controller_layout(&self) -> VRControllerLayout {
        layouts::oculus_touch_layout()
    }

    fn input_state(&mut self, hand: VRHand) -> VRResult<VRInputState> {
        let mut state = ovrInputState::default();
        let result = unsafe { (*self.lib.get_input_state)(self.session, ovrControllerType_Active, &mut state) };
        if !OVR_SUCCESS(result) {
            return Err(VRError::InputUnavailable(hand.name()));
        }
        let side = hand.index();
        Ok(VRInputState {
            controller_type: VRControllerType::from_bits_truncate(state.ControllerType & ovrControllerType_Touch),
            buttons: state.Buttons as u64,
            thumbstick: [state.Thumbstick[side].x, state.Thumbstick[side].y],
            trigger: state.IndexTrigger[side],
            grip: state.HandTrigger[side],
        })
    }

    fn trigger_haptic_pulse(&mut self, hand: VRHand, strength: f32) -> VRResult<()> {
        let amplitude = strength.max(0.0).min(1.0);
        let result = unsafe {
            (*self.lib.set_controller_vibration)(self.session, OculusRuntime::ovr_controller(hand), 0.0, amplitude)
        };
        self.check("ovr_SetControllerVibration", result)
    }

    fn stop_haptics(&mut self, hand: VRHand) -> VRResult<()> {
        let result = unsafe {
            (*self.lib.set_controller_vibration)(self.session, OculusRuntime::ovr_controller(hand), 0.0, 0.0)
        };
        self.check("ovr_SetControllerVibration", result)
    }

    fn create_swap_chain(&mut self, desc: &VRSwapChainDesc) -> VRInitResult<VRSwapChainId> {
        let ovr_desc = ovrTextureSwapChainDesc {
            Type: ovrTexture_2D,
            Format: if desc.srgb {
                OVR_FORMAT_R8G8B8A8_UNORM_SRGB
            } else {
                OVR_FORMAT_R8G8B8A8_UNORM
            },
            ArraySize: 1,
            Width: desc.size.width as c_int,
            Height: desc.size.height as c_int,
            MipLevels: 1,
            SampleCount: 1,
            StaticImage: ovrFalse,
            MiscFlags: 0,
            BindFlags: 0,
        };
        let mut chain: ovrTextureSwapChain = ptr::null_mut();
        let result = unsafe { (*self.lib.create_texture_swap_chain_gl)(self.session, &ovr_desc, &mut chain) };
        self.check_init("ovr_CreateTextureSwapChainGL", result)?;

        let id = VRSwapChainId(utils::new_id());
        self.swap_chains.insert(id, chain);
        Ok(id)
    }

    fn swap_chain_length(&self, chain: VRSwapChainId) -> VRResult<usize> {
        let native = self.swap_chain(chain)?;
        let mut length: c_int = 0;
        let result = unsafe { (*self.lib.get_texture_swap_chain_length)(self.session, native, &mut length) };
        self.check("ovr_GetTextureSwapChainLength", result)?;
        Ok(length.max(0) as usize)
    }

    fn swap_chain_current_index(&mut self, chain: VRSwapChainId) -> VRResult<usize> {
        let native = self.swap_chain(chain)?;
        let mut index: c_int = 0;
        let result = unsafe { (*self.lib.get_texture_swap_chain_current_index)(self.session, native, &mut index) };
        self.check("ovr_GetTextureSwapChainCurrentIndex", result)?;
        Ok(index.max(0) as usize)
    }

    fn swap_chain_buffer(&mut self, chain: VRSwapChainId, index: usize) -> VRResult<TextureHandle> {
        let native = self.swap_chain(chain)?;
        let mut texture: u32 = 0;
        let result = unsafe {
            (*self.lib.get_texture_swap_chain_buffer_gl)(self.session, native, index as c_int, &mut texture)
        };
        self.check("ovr_GetTextureSwapChainBufferGL", result)?;
        Ok(TextureHandle(texture))
    }

    fn commit_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        let native = self.swap_chain(chain)?;
        let result = unsafe { (*self.lib.commit_texture_swap_chain)(self.session, native) };
        self.check("ovr_CommitTextureSwapChain", result)
    }

    fn destroy_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        let native = self.swap_chains.remove(&chain).ok_or(VRError::UnknownSwapChain(chain.0))?;
        unsafe { (*self.lib.destroy_texture_swap_chain)(self.session, native) };
        Ok(())
    }

    fn create_mirror_texture(&mut self, size: VRTextureSize) -> VRInitResult<VRMirrorTextureId> {
        let desc = ovrMirrorTextureDesc {
            Format: OVR_FORMAT_R8G8B8A8_UNORM_SRGB,
            Width: size.width as c_int,
            Height: size.height as c_int,
            MiscFlags: 0,
            MirrorOptions: 0,
        };
        let mut mirror: ovrMirrorTexture = ptr::null_mut();
        let result = unsafe { (*self.lib.create_mirror_texture_gl)(self.session, &desc, &mut mirror) };
        self.check_init("ovr_CreateMirrorTextureGL", result)?;

        let id = VRMirrorTextureId(utils::new_id());
        self.mirrors.insert(id, mirror);
        Ok(id)
    }

    fn mirror_texture_buffer(&mut self, mirror: VRMirrorTextureId) -> VRResult<TextureHandle> {
        let native = self.mirrors.get(&mirror).cloned().ok_or(VRError::UnknownMirrorTexture(mirror.0))?;
        let mut texture: u32 = 0;
        let result = unsafe { (*self.lib.get_mirror_texture_buffer_gl)(self.session, native, &mut texture) };
        self.check("ovr_GetMirrorTextureBufferGL", result)?;
        Ok(TextureHandle(texture))
    }

    fn destroy_mirror_texture(&mut self, mirror: VRMirrorTextureId) -> VRResult<()> {
        let native = self.mirrors.remove(&mirror).ok_or(VRError::UnknownMirrorTexture(mirror.0))?;
        unsafe { (*self.lib.destroy_mirror_texture)(self.session, native) };
        Ok(())
    }

    fn wait_to_begin_frame(&mut self, frame_index: u64) -> VRResult<()> {
        let result = unsafe { (*self.lib.wait_to_begin_frame)(self.session, frame_index as i64) };
        self.check("ovr_WaitToBeginFrame", result)
    }

    fn begin_frame(&mut self, frame_index: u64) -> VRResult<()> {
        let result = unsafe { (*self.lib.begin_frame)(self.session, frame_index as i64) };
        self.check("ovr_BeginFrame", result)
    }

    fn end_frame(&mut self, frame_index: u64, layer: &VRLayer) -> VRResult<()> {
        let [left, right] = &layer.eyes;
        let ovr_layer = ovrLayerEyeFov {
            Header: ovrLayerHeader {
                Type: ovrLayerType_EyeFov,
                Flags: 0,
                Reserved: [0; 128],
            },
            ColorTexture: [self.swap_chain(left.swap_chain)?, self.swap_chain(right.swap_chain)?],
            Viewport: [OculusRuntime::to_recti(&left.viewport), OculusRuntime::to_recti(&right.viewport)],
            Fov: [
                OculusRuntime::to_fov_port(&left.field_of_view),
                OculusRuntime::to_fov_port(&right.field_of_view),
            ],
            RenderPose: [OculusRuntime::to_posef(&left.render_pose), OculusRuntime::to_posef(&right.render_pose)],
            SensorSampleTime: layer.sensor_sample_time,
        };
        let layers = [&ovr_layer.Header as *const ovrLayerHeader];
        let result =
            unsafe { (*self.lib.end_frame)(self.session, frame_index as i64, ptr::null(), layers.as_ptr(), 1) };
        self.check("ovr_EndFrame", result)
    }

    fn set_perf_hud_mode(&mut self, mode: u32) {
        unsafe { (*self.lib.set_int)(self.session, b"PerfHudMode\0".as_ptr() as *const _, mode as c_int) };
    }

    fn audio_device_hint(&self) -> Option<String> {
        let mut guid = [0u16; 128];
        let result = unsafe { (*self.lib.get_audio_device_out_guid_str)(guid.as_mut_ptr()) };
        if !OVR_SUCCESS(result) {
            return None;
        }
        let len = guid.iter().position(|&c| c == 0).unwrap_or(guid.len());
        Some(String::from_utf16_lossy(&guid[..len]))
    }
}

impl Drop for OculusRuntime {
    fn drop(&mut self) {
        unsafe {
            for (_, chain) in self.swap_chains.drain() {
                (*self.lib.destroy_texture_swap_chain)(self.session, chain);
            }
            for (_, mirror) in self.mirrors.drain() {
                (*self.lib.destroy_mirror_texture)(self.session, mirror);
            }
            (*self.lib.set_int)(self.session, b"PerfHudMode\0".as_ptr() as *const _, 0);
            (*self.lib.destroy)(self.session);
            (*self.lib.shutdown)();
        }
        info!("Oculus session destroyed");
    }
}
