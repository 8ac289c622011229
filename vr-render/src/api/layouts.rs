use vr_render_api::VRControllerLayout;

// ovrButton masks
pub const OVR_BUTTON_A: u64 = 0x0000_0001;
pub const OVR_BUTTON_B: u64 = 0x0000_0002;
pub const OVR_BUTTON_RTHUMB: u64 = 0x0000_0004;
pub const OVR_BUTTON_X: u64 = 0x0000_0100;
pub const OVR_BUTTON_Y: u64 = 0x0000_0200;
pub const OVR_BUTTON_LTHUMB: u64 = 0x0000_0400;
pub const OVR_BUTTON_ENTER: u64 = 0x0010_0000;

// EVRButtonId values
pub const OPENVR_BUTTON_APPLICATION_MENU: u32 = 1;
pub const OPENVR_BUTTON_GRIP: u32 = 2;
pub const OPENVR_BUTTON_A: u32 = 7;
pub const OPENVR_BUTTON_AXIS0: u32 = 32;
pub const OPENVR_BUTTON_TOUCHPAD: u32 = OPENVR_BUTTON_AXIS0;
pub const OPENVR_BUTTON_TRIGGER: u32 = OPENVR_BUTTON_AXIS0 + 1;

#[inline]
pub fn openvr_button_mask(id: u32) -> u64 {
    1u64 << id
}

// Left: X, Y, Enter, LThumb. Right: A, B, a reserved slot, RThumb.
pub fn oculus_touch_layout() -> VRControllerLayout {
    VRControllerLayout {
        type_name: "Oculus Touch".into(),
        axis_names: ["Thumbstick X", "Thumbstick Y", "Trigger X", "GripTrigger X"],
        buttons: [
            vec![OVR_BUTTON_X, OVR_BUTTON_Y, OVR_BUTTON_ENTER, OVR_BUTTON_LTHUMB],
            vec![OVR_BUTTON_A, OVR_BUTTON_B, 0, OVR_BUTTON_RTHUMB],
        ],
    }
}

// Application menu, grip, A, touchpad, trigger on both sides.
pub fn openvr_layout() -> VRControllerLayout {
    let buttons: Vec<u64> = [
        OPENVR_BUTTON_APPLICATION_MENU,
        OPENVR_BUTTON_GRIP,
        OPENVR_BUTTON_A,
        OPENVR_BUTTON_TOUCHPAD,
        OPENVR_BUTTON_TRIGGER,
    ]
    .iter()
    .map(|&id| openvr_button_mask(id))
    .collect();

    VRControllerLayout {
        type_name: "OpenVR Motion Controller".into(),
        axis_names: ["Touchpad X", "Touchpad Y", "Trigger X", "Grip X"],
        buttons: [buttons.clone(), buttons],
    }
}
