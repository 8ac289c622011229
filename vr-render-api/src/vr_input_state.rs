use crate::VRHand;

bitflags! {
    /// Kind of controller reporting an input state.
    /// Bit values match the Oculus `ovrControllerType` mask.
    #[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
    pub struct VRControllerType: u32 {
        const LEFT_HAND = 0x0001;
        const RIGHT_HAND = 0x0002;
        const HANDS = Self::LEFT_HAND.bits | Self::RIGHT_HAND.bits;
        const REMOTE = 0x0004;
        const GAMEPAD = 0x0010;
    }
}

impl VRControllerType {
    // Capability class a controller must have to drive the given side.
    pub fn for_hand(hand: VRHand) -> VRControllerType {
        match hand {
            VRHand::Left => VRControllerType::LEFT_HAND,
            VRHand::Right => VRControllerType::RIGHT_HAND,
        }
    }
}

// Raw input of one hand controller for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRInputState {
    // Controllers the runtime currently sees.
    pub controller_type: VRControllerType,

    // Runtime-specific button bit mask.
    pub buttons: u64,

    // Thumbstick (or touchpad) position, each component in [-1, 1].
    pub thumbstick: [f32; 2],

    // Index trigger in [0, 1].
    pub trigger: f32,

    // Hand (grip) trigger in [0, 1].
    pub grip: f32,
}

impl Default for VRInputState {
    fn default() -> VRInputState {
        VRInputState {
            controller_type: VRControllerType::empty(),
            buttons: 0,
            thumbstick: [0.0, 0.0],
            trigger: 0.0,
            grip: 0.0,
        }
    }
}

impl VRInputState {
    // Axes in their fixed order: thumbstick x, thumbstick y, trigger, grip.
    pub fn axes(&self) -> [f32; 4] {
        [self.thumbstick[0], self.thumbstick[1], self.trigger, self.grip]
    }
}

// Maps a runtime's raw input onto the controller objects.
#[derive(Debug, Clone, PartialEq)]
pub struct VRControllerLayout {
    // Type string shown to the application, e.g. "Oculus Touch".
    pub type_name: String,

    // Axis names in VRInputState::axes() order.
    pub axis_names: [&'static str; 4],

    // Button masks per side, in button order. A zero mask is a reserved slot that never reads as pressed.
    pub buttons: [Vec<u64>; 2],
}

impl VRControllerLayout {
    pub fn button_count(&self, hand: VRHand) -> usize {
        self.buttons[hand.index()].len()
    }

    pub fn button_states(&self, hand: VRHand, raw: u64) -> Vec<bool> {
        self.buttons[hand.index()]
            .iter()
            .map(|&mask| mask != 0 && raw & mask != 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_button_never_pressed() {
        let layout = VRControllerLayout {
            type_name: "test".into(),
            axis_names: ["a", "b", "c", "d"],
            buttons: [vec![0x1, 0x2], vec![0x4, 0, 0x8]],
        };
        assert_eq!(layout.button_states(VRHand::Right, u64::max_value()), vec![true, false, true]);
        assert_eq!(layout.button_states(VRHand::Left, 0x2), vec![false, true]);
        assert_eq!(layout.button_count(VRHand::Right), 3);
    }

    #[test]
    fn controller_type_per_side() {
        let both = VRControllerType::HANDS;
        assert!(both.contains(VRControllerType::for_hand(VRHand::Left)));
        assert!(!VRControllerType::LEFT_HAND.contains(VRControllerType::for_hand(VRHand::Right)));
    }
}
