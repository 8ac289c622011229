#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals, dead_code)]

// Subset of the LibOVR 1.x C API used by the Oculus runtime.

use std::os::raw::{c_char, c_int, c_void};

pub type ovrResult = i32;
pub type ovrBool = c_char;
pub type ovrSession = *mut c_void;
pub type ovrTextureSwapChain = *mut c_void;
pub type ovrMirrorTexture = *mut c_void;

pub const ovrTrue: ovrBool = 1;
pub const ovrFalse: ovrBool = 0;
pub const ovrSuccess: ovrResult = 0;

pub const OVR_MINOR_VERSION: u32 = 43;
pub const ovrInit_RequestVersion: u32 = 0x0000_0004;
pub const ovrInit_FocusAware: u32 = 0x0000_0020;

pub const ovrEye_Left: c_int = 0;
pub const ovrEye_Right: c_int = 1;

pub const ovrTrackingOrigin_FloorLevel: c_int = 1;

pub const ovrStatus_OrientationTracked: u32 = 0x0001;
pub const ovrStatus_PositionTracked: u32 = 0x0002;

pub const ovrControllerType_LTouch: u32 = 0x0001;
pub const ovrControllerType_RTouch: u32 = 0x0002;
pub const ovrControllerType_Touch: u32 = ovrControllerType_LTouch | ovrControllerType_RTouch;
pub const ovrControllerType_Active: u32 = 0xffff_ffff;

pub const ovrTexture_2D: c_int = 0;
pub const OVR_FORMAT_R8G8B8A8_UNORM: c_int = 4;
pub const OVR_FORMAT_R8G8B8A8_UNORM_SRGB: c_int = 5;

pub const ovrLayerType_EyeFov: c_int = 1;

// Off, PerfSummary, LatencyTiming, AppRenderTiming, CompRenderTiming, AswStats, VersionInfo.
pub const ovrPerfHud_Count: u32 = 7;

#[inline]
pub fn OVR_SUCCESS(result: ovrResult) -> bool {
    result >= 0
}

#[repr(C)]
pub struct ovrErrorInfo {
    pub Result: ovrResult,
    pub ErrorString: [c_char; 512],
}

#[repr(C)]
pub struct ovrInitParams {
    pub Flags: u32,
    pub RequestedMinorVersion: u32,
    pub LogCallback: Option<unsafe extern "C" fn(usize, c_int, *const c_char)>,
    pub UserData: usize,
    pub ConnectionTimeoutMS: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct ovrGraphicsLuid {
    pub Reserved: [c_char; 8],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrVector2i {
    pub x: c_int,
    pub y: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrSizei {
    pub w: c_int,
    pub h: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrRecti {
    pub Pos: ovrVector2i,
    pub Size: ovrSizei,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrVector2f {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrVector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrQuatf {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrPosef {
    pub Orientation: ovrQuatf,
    pub Position: ovrVector3f,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrPoseStatef {
    pub ThePose: ovrPosef,
    pub AngularVelocity: ovrVector3f,
    pub LinearVelocity: ovrVector3f,
    pub AngularAcceleration: ovrVector3f,
    pub LinearAcceleration: ovrVector3f,
    pub TimeInSeconds: f64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ovrFovPort {
    pub UpTan: f32,
    pub DownTan: f32,
    pub LeftTan: f32,
    pub RightTan: f32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ovrHmdDesc {
    pub Type: c_int,
    pub ProductName: [c_char; 64],
    pub Manufacturer: [c_char; 64],
    pub VendorId: i16,
    pub ProductId: i16,
    pub SerialNumber: [c_char; 24],
    pub FirmwareMajor: i16,
    pub FirmwareMinor: i16,
    pub AvailableHmdCaps: u32,
    pub DefaultHmdCaps: u32,
    pub AvailableTrackingCaps: u32,
    pub DefaultTrackingCaps: u32,
    pub DefaultEyeFov: [ovrFovPort; 2],
    pub MaxEyeFov: [ovrFovPort; 2],
    pub Resolution: ovrSizei,
    pub DisplayRefreshRate: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrTrackingState {
    pub HeadPose: ovrPoseStatef,
    pub StatusFlags: u32,
    pub HandPoses: [ovrPoseStatef; 2],
    pub HandStatusFlags: [u32; 2],
    pub CalibratedOrigin: ovrPosef,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrInputState {
    pub TimeInSeconds: f64,
    pub Buttons: u32,
    pub Touches: u32,
    pub IndexTrigger: [f32; 2],
    pub HandTrigger: [f32; 2],
    pub Thumbstick: [ovrVector2f; 2],
    pub ControllerType: u32,
    pub IndexTriggerNoDeadzone: [f32; 2],
    pub HandTriggerNoDeadzone: [f32; 2],
    pub ThumbstickNoDeadzone: [ovrVector2f; 2],
    pub IndexTriggerRaw: [f32; 2],
    pub HandTriggerRaw: [f32; 2],
    pub ThumbstickRaw: [ovrVector2f; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrSessionStatus {
    pub IsVisible: ovrBool,
    pub HmdPresent: ovrBool,
    pub HmdMounted: ovrBool,
    pub DisplayLost: ovrBool,
    pub ShouldQuit: ovrBool,
    pub ShouldRecenter: ovrBool,
    pub HasInputFocus: ovrBool,
    pub OverlayPresent: ovrBool,
    pub DepthRequested: ovrBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrEyeRenderDesc {
    pub Eye: c_int,
    pub Fov: ovrFovPort,
    pub DistortedViewport: ovrRecti,
    pub PixelsPerTanAngleAtCenter: ovrVector2f,
    pub HmdToEyePose: ovrPosef,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrTextureSwapChainDesc {
    pub Type: c_int,
    pub Format: c_int,
    pub ArraySize: c_int,
    pub Width: c_int,
    pub Height: c_int,
    pub MipLevels: c_int,
    pub SampleCount: c_int,
    pub StaticImage: ovrBool,
    pub MiscFlags: u32,
    pub BindFlags: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ovrMirrorTextureDesc {
    pub Format: c_int,
    pub Width: c_int,
    pub Height: c_int,
    pub MiscFlags: u32,
    pub MirrorOptions: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ovrLayerHeader {
    pub Type: c_int,
    pub Flags: u32,
    pub Reserved: [c_char; 128],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct ovrLayerEyeFov {
    pub Header: ovrLayerHeader,
    pub ColorTexture: [ovrTextureSwapChain; 2],
    pub Viewport: [ovrRecti; 2],
    pub Fov: [ovrFovPort; 2],
    pub RenderPose: [ovrPosef; 2],
    pub SensorSampleTime: f64,
}

#[repr(C)]
pub struct ovrViewScaleDesc {
    pub HmdToEyePose: [ovrPosef; 2],
    pub HmdSpaceToWorldScaleInMeters: f32,
}
