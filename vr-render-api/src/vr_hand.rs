// Side of a hand controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum VRHand {
    Left,
    Right,
}

impl VRHand {
    pub const BOTH: [VRHand; 2] = [VRHand::Left, VRHand::Right];

    pub fn index(self) -> usize {
        match self {
            VRHand::Left => 0,
            VRHand::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VRHand::Left => "left",
            VRHand::Right => "right",
        }
    }
}
