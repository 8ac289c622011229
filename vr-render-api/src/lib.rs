#[macro_use]
extern crate bitflags;

#[cfg(feature = "serde-serialization")]
#[macro_use]
extern crate serde_derive;

#[cfg(feature = "utils")]
pub mod utils;

pub mod mock;
pub mod vr_error;
pub mod vr_event;
pub mod vr_eye;
pub mod vr_field_view;
pub mod vr_framebuffer;
pub mod vr_hand;
pub mod vr_input_state;
pub mod vr_layer;
pub mod vr_pose;
pub mod vr_runtime;
pub mod vr_runtime_capabilities;
pub mod vr_session_status;
pub mod vr_tracking_state;

pub use mock::MockVRControlMsg;
pub use vr_error::{VRError, VRErrorCode, VRInitError, VRInitResult, VRResult};
pub use vr_event::VREvent;
pub use vr_eye::VREye;
pub use vr_field_view::VRFieldOfView;
pub use vr_framebuffer::{TextureHandle, VRMirrorTextureId, VRSwapChainDesc, VRSwapChainId, VRTextureSize, VRViewport};
pub use vr_hand::VRHand;
pub use vr_input_state::{VRControllerLayout, VRControllerType, VRInputState};
pub use vr_layer::{VRLayer, VRLayerEye};
pub use vr_pose::{eye_pose, DeviceSpace, HeadSpace, TrackingSpace, VRPose, VRPoseState, WorldSpace};
pub use vr_runtime::{VRRuntime, VRRuntimeCreator, VRRuntimeKind};
pub use vr_runtime_capabilities::VRRuntimeCapabilities;
pub use vr_session_status::VRSessionStatus;
pub use vr_tracking_state::VRTrackingState;
