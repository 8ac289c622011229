// Session flags reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRSessionStatus {
    // The application is visible in the headset and should render.
    pub is_visible: bool,

    // The application owns input; hand models may be shown.
    pub has_input_focus: bool,

    // The runtime asks the application to exit.
    pub should_quit: bool,

    // The user asked to recenter the tracking origin from the runtime UI.
    pub should_recenter: bool,

    pub hmd_present: bool,

    // The headset is on the user's head.
    pub hmd_mounted: bool,
}

impl Default for VRSessionStatus {
    fn default() -> VRSessionStatus {
        VRSessionStatus {
            is_visible: true,
            has_input_focus: true,
            should_quit: false,
            should_recenter: false,
            hmd_present: true,
            hmd_mounted: true,
        }
    }
}
