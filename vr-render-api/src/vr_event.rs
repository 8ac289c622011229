// Events pumped from the runtime once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum VREvent {
    // The runtime (or its driver) asks the application to exit.
    Quit,

    // The interpupillary distance changed; eye offsets must be refreshed.
    // param: new IPD in meters
    IpdChanged(f32),

    // The user asked to recenter from the runtime UI.
    RecenterRequested,

    // The headset has been put on.
    Mounted,

    // The headset has been taken off.
    Unmounted,

    // A system overlay took input focus.
    Blur,

    // Input focus is back.
    Focus,
}
