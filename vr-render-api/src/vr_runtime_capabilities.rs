/// describes the capabilities of a VR runtime. These are expected to be static per-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRRuntimeCapabilities {
    /// true if the runtime is capable of tracking the headset position.
    pub has_position: bool,

    /// true if the runtime is capable of tracking the headset orientation.
    pub has_orientation: bool,

    /// true if the headset is separate from the primary display
    pub has_external_display: bool,

    /// true if the runtime can present frames to a headset.
    pub can_present: bool,

    /// true if the runtime owns its swap chains. Otherwise the engine texture is presented directly.
    pub owns_swap_chains: bool,

    /// true if the runtime can hand back a mirror of what the headset shows.
    pub has_mirror: bool,

    /// Number of performance HUD modes, including "off".
    pub perf_hud_modes: u32,
}

impl Default for VRRuntimeCapabilities {
    fn default() -> VRRuntimeCapabilities {
        VRRuntimeCapabilities {
            has_position: false,
            has_orientation: false,
            has_external_display: false,
            can_present: false,
            owns_swap_chains: false,
            has_mirror: false,
            perf_hud_modes: 1,
        }
    }
}
