use crate::{VRControllerType, VREvent, VREye, VRFieldOfView, VRHand, VRSessionStatus};

// Messages scripting the mock runtime. Either sent through the remote
// channel or applied directly with MockVRState::handle_msg.
#[derive(Debug, Clone, PartialEq)]
pub enum MockVRControlMsg {
    // Head pose in tracking space: position [x, y, z], orientation [x, y, z, w].
    SetHeadPose([f32; 3], [f32; 4]),
    SetHandPose(VRHand, [f32; 3], [f32; 4]),
    SetHandVelocity(VRHand, [f32; 3], [f32; 3]),
    SetHandTracked(VRHand, bool),
    // Moves both eyes symmetrically around the head center.
    SetIpd(f32),
    SetEyeOffset(VREye, [f32; 3], [f32; 4]),
    SetEyeFov(VREye, VRFieldOfView),
    SetSessionStatus(VRSessionStatus),
    SetVisible(bool),
    SetEyeHeight(f32),
    SetControllerType(VRControllerType),
    SetButtons(VRHand, u64),
    // thumbstick x, thumbstick y, trigger, grip
    SetAxes(VRHand, [f32; 4]),
    FailInputPoll(VRHand, bool),
    PushEvent(VREvent),
    Focus,
    Blur,
}
