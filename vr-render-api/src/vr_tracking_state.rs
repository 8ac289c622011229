use crate::{VRHand, VRPoseState};

// Tracking snapshot of the headset and both hands, predicted for one display time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRTrackingState {
    // Display time the poses were predicted for, in seconds.
    pub display_time: f64,

    pub head: VRPoseState,

    // Indexed by VRHand::index().
    pub hands: [VRPoseState; 2],
}

impl VRTrackingState {
    pub fn hand(&self, hand: VRHand) -> &VRPoseState {
        &self.hands[hand.index()]
    }
}
