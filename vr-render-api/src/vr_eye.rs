// Eye of a stereo pair. Used as an index into per-eye arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum VREye {
    Left,
    Right,
}

impl VREye {
    pub const BOTH: [VREye; 2] = [VREye::Left, VREye::Right];

    pub fn index(self) -> usize {
        match self {
            VREye::Left => 0,
            VREye::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VREye::Left => "left",
            VREye::Right => "right",
        }
    }
}
