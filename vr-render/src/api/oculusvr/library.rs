use libloading as lib;
use libloading::os::windows::Symbol;
use std::os::raw::{c_char, c_int};

use super::binding::*;

// LibOVRRT entry points
type OvrInitialize = unsafe extern "C" fn(*const ovrInitParams) -> ovrResult;
type OvrShutdown = unsafe extern "C" fn();
type OvrGetLastErrorInfo = unsafe extern "C" fn(*mut ovrErrorInfo);
type OvrCreate = unsafe extern "C" fn(*mut ovrSession, *mut ovrGraphicsLuid) -> ovrResult;
type OvrDestroy = unsafe extern "C" fn(ovrSession);
type OvrGetHmdDesc = unsafe extern "C" fn(ovrSession) -> ovrHmdDesc;
type OvrGetSessionStatus = unsafe extern "C" fn(ovrSession, *mut ovrSessionStatus) -> ovrResult;
type OvrSetTrackingOriginType = unsafe extern "C" fn(ovrSession, c_int) -> ovrResult;
type OvrRecenterTrackingOrigin = unsafe extern "C" fn(ovrSession) -> ovrResult;
type OvrGetPredictedDisplayTime = unsafe extern "C" fn(ovrSession, i64) -> f64;
type OvrGetTrackingState = unsafe extern "C" fn(ovrSession, f64, ovrBool) -> ovrTrackingState;
type OvrGetInputState = unsafe extern "C" fn(ovrSession, u32, *mut ovrInputState) -> ovrResult;
type OvrSetControllerVibration = unsafe extern "C" fn(ovrSession, u32, f32, f32) -> ovrResult;
type OvrGetFovTextureSize = unsafe extern "C" fn(ovrSession, c_int, ovrFovPort, f32) -> ovrSizei;
type OvrGetRenderDesc2 = unsafe extern "C" fn(ovrSession, c_int, ovrFovPort) -> ovrEyeRenderDesc;
type OvrCreateTextureSwapChainGL =
    unsafe extern "C" fn(ovrSession, *const ovrTextureSwapChainDesc, *mut ovrTextureSwapChain) -> ovrResult;
type OvrGetTextureSwapChainLength = unsafe extern "C" fn(ovrSession, ovrTextureSwapChain, *mut c_int) -> ovrResult;
type OvrGetTextureSwapChainCurrentIndex =
    unsafe extern "C" fn(ovrSession, ovrTextureSwapChain, *mut c_int) -> ovrResult;
type OvrGetTextureSwapChainBufferGL =
    unsafe extern "C" fn(ovrSession, ovrTextureSwapChain, c_int, *mut u32) -> ovrResult;
type OvrCommitTextureSwapChain = unsafe extern "C" fn(ovrSession, ovrTextureSwapChain) -> ovrResult;
type OvrDestroyTextureSwapChain = unsafe extern "C" fn(ovrSession, ovrTextureSwapChain);
type OvrCreateMirrorTextureGL =
    unsafe extern "C" fn(ovrSession, *const ovrMirrorTextureDesc, *mut ovrMirrorTexture) -> ovrResult;
type OvrGetMirrorTextureBufferGL = unsafe extern "C" fn(ovrSession, ovrMirrorTexture, *mut u32) -> ovrResult;
type OvrDestroyMirrorTexture = unsafe extern "C" fn(ovrSession, ovrMirrorTexture);
type OvrWaitToBeginFrame = unsafe extern "C" fn(ovrSession, i64) -> ovrResult;
type OvrBeginFrame = unsafe extern "C" fn(ovrSession, i64) -> ovrResult;
type OvrEndFrame =
    unsafe extern "C" fn(ovrSession, i64, *const ovrViewScaleDesc, *const *const ovrLayerHeader, u32) -> ovrResult;
type OvrGetFloat = unsafe extern "C" fn(ovrSession, *const c_char, f32) -> f32;
type OvrSetInt = unsafe extern "C" fn(ovrSession, *const c_char, c_int) -> ovrBool;
type OvrGetAudioDeviceOutGuidStr = unsafe extern "C" fn(*mut u16) -> ovrResult;

#[cfg(target_pointer_width = "64")]
const LIBOVR_NAME: &str = "LibOVRRT64_1.dll";
#[cfg(not(target_pointer_width = "64"))]
const LIBOVR_NAME: &str = "LibOVRRT32_1.dll";

pub struct OVRLibrary {
    _lib: lib::Library,
    pub initialize: Symbol<OvrInitialize>,
    pub shutdown: Symbol<OvrShutdown>,
    pub get_last_error_info: Symbol<OvrGetLastErrorInfo>,
    pub create: Symbol<OvrCreate>,
    pub destroy: Symbol<OvrDestroy>,
    pub get_hmd_desc: Symbol<OvrGetHmdDesc>,
    pub get_session_status: Symbol<OvrGetSessionStatus>,
    pub set_tracking_origin_type: Symbol<OvrSetTrackingOriginType>,
    pub recenter_tracking_origin: Symbol<OvrRecenterTrackingOrigin>,
    pub get_predicted_display_time: Symbol<OvrGetPredictedDisplayTime>,
    pub get_tracking_state: Symbol<OvrGetTrackingState>,
    pub get_input_state: Symbol<OvrGetInputState>,
    pub set_controller_vibration: Symbol<OvrSetControllerVibration>,
    pub get_fov_texture_size: Symbol<OvrGetFovTextureSize>,
    pub get_render_desc: Symbol<OvrGetRenderDesc2>,
    pub create_texture_swap_chain_gl: Symbol<OvrCreateTextureSwapChainGL>,
    pub get_texture_swap_chain_length: Symbol<OvrGetTextureSwapChainLength>,
    pub get_texture_swap_chain_current_index: Symbol<OvrGetTextureSwapChainCurrentIndex>,
    pub get_texture_swap_chain_buffer_gl: Symbol<OvrGetTextureSwapChainBufferGL>,
    pub commit_texture_swap_chain: Symbol<OvrCommitTextureSwapChain>,
    pub destroy_texture_swap_chain: Symbol<OvrDestroyTextureSwapChain>,
    pub create_mirror_texture_gl: Symbol<OvrCreateMirrorTextureGL>,
    pub get_mirror_texture_buffer_gl: Symbol<OvrGetMirrorTextureBufferGL>,
    pub destroy_mirror_texture: Symbol<OvrDestroyMirrorTexture>,
    pub wait_to_begin_frame: Symbol<OvrWaitToBeginFrame>,
    pub begin_frame: Symbol<OvrBeginFrame>,
    pub end_frame: Symbol<OvrEndFrame>,
    pub get_float: Symbol<OvrGetFloat>,
    pub set_int: Symbol<OvrSetInt>,
    pub get_audio_device_out_guid_str: Symbol<OvrGetAudioDeviceOutGuidStr>,
}

impl OVRLibrary {
    pub unsafe fn new() -> Result<OVRLibrary, lib::Error> {
        let lib = lib::Library::new(LIBOVR_NAME)?;
        Ok(OVRLibrary {
            initialize: lib.get::<OvrInitialize>(b"ovr_Initialize\0")?.into_raw(),
            shutdown: lib.get::<OvrShutdown>(b"ovr_Shutdown\0")?.into_raw(),
            get_last_error_info: lib.get::<OvrGetLastErrorInfo>(b"ovr_GetLastErrorInfo\0")?.into_raw(),
            create: lib.get::<OvrCreate>(b"ovr_Create\0")?.into_raw(),
            destroy: lib.get::<OvrDestroy>(b"ovr_Destroy\0")?.into_raw(),
            get_hmd_desc: lib.get::<OvrGetHmdDesc>(b"ovr_GetHmdDesc\0")?.into_raw(),
            get_session_status: lib.get::<OvrGetSessionStatus>(b"ovr_GetSessionStatus\0")?.into_raw(),
            set_tracking_origin_type: lib
                .get::<OvrSetTrackingOriginType>(b"ovr_SetTrackingOriginType\0")?
                .into_raw(),
            recenter_tracking_origin: lib
                .get::<OvrRecenterTrackingOrigin>(b"ovr_RecenterTrackingOrigin\0")?
                .into_raw(),
            get_predicted_display_time: lib
                .get::<OvrGetPredictedDisplayTime>(b"ovr_GetPredictedDisplayTime\0")?
                .into_raw(),
            get_tracking_state: lib.get::<OvrGetTrackingState>(b"ovr_GetTrackingState\0")?.into_raw(),
            get_input_state: lib.get::<OvrGetInputState>(b"ovr_GetInputState\0")?.into_raw(),
            set_controller_vibration: lib
                .get::<OvrSetControllerVibration>(b"ovr_SetControllerVibration\0")?
                .into_raw(),
            get_fov_texture_size: lib.get::<OvrGetFovTextureSize>(b"ovr_GetFovTextureSize\0")?.into_raw(),
            get_render_desc: lib.get::<OvrGetRenderDesc2>(b"ovr_GetRenderDesc2\0")?.into_raw(),
            create_texture_swap_chain_gl: lib
                .get::<OvrCreateTextureSwapChainGL>(b"ovr_CreateTextureSwapChainGL\0")?
                .into_raw(),
            get_texture_swap_chain_length: lib
                .get::<OvrGetTextureSwapChainLength>(b"ovr_GetTextureSwapChainLength\0")?
                .into_raw(),
            get_texture_swap_chain_current_index: lib
                .get::<OvrGetTextureSwapChainCurrentIndex>(b"ovr_GetTextureSwapChainCurrentIndex\0")?
                .into_raw(),
            get_texture_swap_chain_buffer_gl: lib
                .get::<OvrGetTextureSwapChainBufferGL>(b"ovr_GetTextureSwapChainBufferGL\0")?
                .into_raw(),
            commit_texture_swap_chain: lib
                .get::<OvrCommitTextureSwapChain>(b"ovr_CommitTextureSwapChain\0")?
                .into_raw(),
            destroy_texture_swap_chain: lib
                .get::<OvrDestroyTextureSwapChain>(b"ovr_DestroyTextureSwapChain\0")?
                .into_raw(),
            create_mirror_texture_gl: lib
                .get::<OvrCreateMirrorTextureGL>(b"ovr_CreateMirrorTextureGL\0")?
                .into_raw(),
            get_mirror_texture_buffer_gl: lib
                .get::<OvrGetMirrorTextureBufferGL>(b"ovr_GetMirrorTextureBufferGL\0")?
                .into_raw(),
            destroy_mirror_texture: lib
                .get::<OvrDestroyMirrorTexture>(b"ovr_DestroyMirrorTexture\0")?
                .into_raw(),
            wait_to_begin_frame: lib.get::<OvrWaitToBeginFrame>(b"ovr_WaitToBeginFrame\0")?.into_raw(),
            begin_frame: lib.get::<OvrBeginFrame>(b"ovr_BeginFrame\0")?.into_raw(),
            end_frame: lib.get::<OvrEndFrame>(b"ovr_EndFrame\0")?.into_raw(),
            get_float: lib.get::<OvrGetFloat>(b"ovr_GetFloat\0")?.into_raw(),
            set_int: lib.get::<OvrSetInt>(b"ovr_SetInt\0")?.into_raw(),
            get_audio_device_out_guid_str: lib
                .get::<OvrGetAudioDeviceOutGuidStr>(b"ovr_GetAudioDeviceOutGuidStr\0")?
                .into_raw(),
            _lib: lib,
        })
    }
}
