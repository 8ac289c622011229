use crate::coordinates::BodyTransform;
use crate::haptics::HapticLimiter;
use euclid::Vector3D;
use std::time::Duration;
use vr_render_api::utils;
use vr_render_api::{
    VRControllerLayout, VRControllerType, VRHand, VRInputState, VRPose, VRPoseState, VRResult,
    VRRuntime, WorldSpace,
};

bitflags! {
    /// What a hand controller is able to report or do.
    pub struct VRHandControllerCapabilities: u16 {
        const ROTATIONAL_TRACKING = 0x0001;
        const POSITIONAL_TRACKING = 0x0002;
        const ANGULAR_ACCELERATION = 0x0004;
        const LINEAR_ACCELERATION = 0x0008;
        const BUTTON_INPUTS = 0x0010;
        const ANALOG_INPUTS = 0x0020;
        const HAPTIC_FEEDBACK = 0x0040;
        const DISCRETE_HAND_GESTURES = 0x0080;
    }
}

impl VRHandControllerCapabilities {
    // Tracked hand controller with buttons, sticks and vibration (Touch, Vive wands).
    pub fn tracked_hand() -> VRHandControllerCapabilities {
        VRHandControllerCapabilities::ROTATIONAL_TRACKING
            | VRHandControllerCapabilities::POSITIONAL_TRACKING
            | VRHandControllerCapabilities::BUTTON_INPUTS
            | VRHandControllerCapabilities::ANALOG_INPUTS
            | VRHandControllerCapabilities::HAPTIC_FEEDBACK
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VRHandControllerAxis {
    pub name: &'static str,
    pub value: f32,
}

impl VRHandControllerAxis {
    fn new(name: &'static str) -> VRHandControllerAxis {
        VRHandControllerAxis { name, value: 0.0 }
    }

    fn update(&mut self, value: f32) {
        if !(-1.0..=1.0).contains(&value) {
            debug!("Axis {} out of range: {}", self.name, value);
        }
        self.value = if value.is_nan() { 0.0 } else { value.max(-1.0).min(1.0) };
    }
}

/// Button states with a previous-frame shadow copy and the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonStates {
    current: Vec<bool>,
    previous: Vec<bool>,
    pressed: Vec<u8>,
    released: Vec<u8>,
}

impl ButtonStates {
    pub fn new(count: usize) -> ButtonStates {
        ButtonStates {
            current: vec![false; count],
            previous: vec![false; count],
            pressed: Vec::new(),
            released: Vec::new(),
        }
    }

    /// Stores new states and rebuilds the pressed/released lists.
    pub fn update(&mut self, states: &[bool]) {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
        self.current.extend((0..self.previous.len()).map(|i| states.get(i).cloned().unwrap_or(false)));

        self.pressed.clear();
        self.released.clear();
        for (i, (&now, &before)) in self.current.iter().zip(self.previous.iter()).enumerate() {
            if now && !before {
                self.pressed.push(i as u8);
            } else if !now && before {
                self.released.push(i as u8);
            }
        }
    }

    // Edges only last for the frame they were polled in.
    pub fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    pub fn states(&self) -> &[bool] {
        &self.current
    }

    pub fn is_down(&self, index: usize) -> bool {
        self.current.get(index).cloned().unwrap_or(false)
    }

    pub fn pressed(&self) -> &[u8] {
        &self.pressed
    }

    pub fn released(&self) -> &[u8] {
        &self.released
    }
}

/// Persistent object for one hand controller. Created on the first frame the
/// runtime reports real data for its side and kept until the renderer goes away.
#[derive(Debug, Clone)]
pub struct VRHandController {
    id: u32,
    type_name: String,
    side: VRHand,
    capabilities: VRHandControllerCapabilities,
    tracked: bool,
    pose: VRPose<WorldSpace>,
    linear_velocity: Vector3D<f32, WorldSpace>,
    angular_velocity: Vector3D<f32, WorldSpace>,
    axes: Vec<VRHandControllerAxis>,
    buttons: ButtonStates,
    visible: bool,
    haptics: HapticLimiter,
}

impl VRHandController {
    pub fn new(
        side: VRHand,
        layout: &VRControllerLayout,
        capabilities: VRHandControllerCapabilities,
        haptic_interval: Duration,
    ) -> VRHandController {
        VRHandController {
            id: utils::new_id(),
            type_name: layout.type_name.clone(),
            side,
            capabilities,
            tracked: false,
            pose: VRPose::default(),
            linear_velocity: Vector3D::zero(),
            angular_velocity: Vector3D::zero(),
            axes: layout.axis_names.iter().map(|&name| VRHandControllerAxis::new(name)).collect(),
            buttons: ButtonStates::new(layout.button_count(side)),
            visible: false,
            haptics: HapticLimiter::new(haptic_interval),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn side(&self) -> VRHand {
        self.side
    }

    pub fn capabilities(&self) -> VRHandControllerCapabilities {
        self.capabilities
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn pose(&self) -> &VRPose<WorldSpace> {
        &self.pose
    }

    pub fn linear_velocity(&self) -> Vector3D<f32, WorldSpace> {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vector3D<f32, WorldSpace> {
        self.angular_velocity
    }

    // Direction the controller points at in world space.
    pub fn pointing_direction(&self) -> Vector3D<f32, WorldSpace> {
        self.pose.forward()
    }

    pub fn axes(&self) -> &[VRHandControllerAxis] {
        &self.axes
    }

    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).map(|axis| axis.value).unwrap_or(0.0)
    }

    pub fn buttons(&self) -> &ButtonStates {
        &self.buttons
    }

    pub fn pressed(&self) -> &[u8] {
        self.buttons.pressed()
    }

    pub fn released(&self) -> &[u8] {
        self.buttons.released()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update_axes(&mut self, input: &VRInputState) {
        for (axis, value) in self.axes.iter_mut().zip(input.axes().iter()) {
            axis.update(*value);
        }
    }

    pub fn update_buttons(&mut self, layout: &VRControllerLayout, input: &VRInputState) {
        let states = layout.button_states(self.side, input.buttons);
        self.buttons.update(&states);
    }

    pub fn clear_button_edges(&mut self) {
        self.buttons.clear_edges();
    }

    pub fn update_tracking(&mut self, body: &BodyTransform, state: &VRPoseState) {
        self.tracked = state.tracked;
        self.pose = body.to_world(&state.pose);
        self.linear_velocity = body.rotate_to_world(state.linear_velocity);
        self.angular_velocity = body.rotate_to_world(state.angular_velocity);
    }

    // Visibility hook, run last each frame. Returns true when visibility changed.
    pub fn update_visibility(&mut self, hide_hands: bool) -> bool {
        let visible = self.tracked && !hide_hands;
        let changed = visible != self.visible;
        self.visible = visible;
        changed
    }

    /// Starts a vibration unless a pulse went out less than the haptic interval ago.
    /// Returns whether the pulse was sent.
    pub fn rumble_start(&mut self, runtime: &mut dyn VRRuntime, strength: f32, now: Duration) -> VRResult<bool> {
        if !self.capabilities.contains(VRHandControllerCapabilities::HAPTIC_FEEDBACK) {
            return Ok(false);
        }
        if !self.haptics.try_acquire(now) {
            trace!("Dropping haptic pulse on the {} hand", self.side.name());
            return Ok(false);
        }
        runtime.trigger_haptic_pulse(self.side, strength.max(0.0).min(1.0))?;
        Ok(true)
    }

    pub fn rumble_stop(&mut self, runtime: &mut dyn VRRuntime) -> VRResult<()> {
        self.haptics.reset();
        runtime.stop_haptics(self.side)
    }
}

/// Controllers indexed by side, created lazily.
#[derive(Debug, Clone, Default)]
pub struct HandControllerRegistry {
    hands: [Option<VRHandController>; 2],
}

impl HandControllerRegistry {
    pub fn new() -> HandControllerRegistry {
        HandControllerRegistry::default()
    }

    pub fn get(&self, hand: VRHand) -> Option<&VRHandController> {
        self.hands[hand.index()].as_ref()
    }

    pub fn get_mut(&mut self, hand: VRHand) -> Option<&mut VRHandController> {
        self.hands[hand.index()].as_mut()
    }

    pub fn get_or_insert_with<F>(&mut self, hand: VRHand, create: F) -> &mut VRHandController
    where
        F: FnOnce() -> VRHandController,
    {
        let slot = &mut self.hands[hand.index()];
        if slot.is_none() {
            info!("Hand controller connected on the {} side", hand.name());
        }
        slot.get_or_insert_with(create)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VRHandController> {
        self.hands.iter().filter_map(|hand| hand.as_ref())
    }
}

/// Per-frame controller polling: input state, axes, button edges, pose, visibility.
pub struct ControllerInputPoller {
    layout: VRControllerLayout,
    haptic_interval: Duration,
}

impl ControllerInputPoller {
    pub fn new(layout: VRControllerLayout, haptic_interval: Duration) -> ControllerInputPoller {
        ControllerInputPoller {
            layout,
            haptic_interval,
        }
    }

    pub fn layout(&self) -> &VRControllerLayout {
        &self.layout
    }

    /// Polls both sides. Returns the sides whose visibility changed.
    pub fn poll(
        &self,
        runtime: &mut dyn VRRuntime,
        registry: &mut HandControllerRegistry,
        tracking: &[VRPoseState; 2],
        body: &BodyTransform,
        hide_hands: bool,
    ) -> Vec<(VRHand, bool)> {
        let mut visibility_changes = Vec::new();
        for hand in VRHand::BOTH.iter().cloned() {
            let input = match runtime.input_state(hand) {
                Ok(input) => input,
                Err(e) => {
                    trace!("Skipping {} hand this frame: {}", hand.name(), e);
                    if let Some(controller) = registry.get_mut(hand) {
                        controller.clear_button_edges();
                    }
                    continue;
                }
            };
            if !input.controller_type.contains(VRControllerType::for_hand(hand)) {
                if let Some(controller) = registry.get_mut(hand) {
                    controller.clear_button_edges();
                }
                continue;
            }

            let layout = &self.layout;
            let interval = self.haptic_interval;
            let controller = registry.get_or_insert_with(hand, || {
                VRHandController::new(hand, layout, VRHandControllerCapabilities::tracked_hand(), interval)
            });
            controller.update_axes(&input);
            controller.update_buttons(layout, &input);
            controller.update_tracking(body, &tracking[hand.index()]);
            if controller.update_visibility(hide_hands) {
                visibility_changes.push((hand, controller.is_visible()));
            }
        }
        visibility_changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_layout() -> VRControllerLayout {
        VRControllerLayout {
            type_name: "Test Touch".into(),
            axis_names: ["Thumbstick X", "Thumbstick Y", "Trigger X", "GripTrigger X"],
            buttons: [vec![0x1, 0x2, 0x4, 0x8], vec![0x10, 0x20, 0, 0x40]],
        }
    }

    #[test]
    fn edges_are_disjoint_and_only_changes() {
        let mut buttons = ButtonStates::new(4);
        let frames: [[bool; 4]; 5] = [
            [true, false, false, false],
            [true, true, false, false],
            [false, true, true, false],
            [false, false, false, false],
            [false, false, false, false],
        ];
        let mut previous = [false; 4];
        for frame in frames.iter() {
            buttons.update(frame);
            for p in buttons.pressed() {
                assert!(!buttons.released().contains(p));
                assert!(frame[*p as usize] && !previous[*p as usize]);
            }
            for r in buttons.released() {
                assert!(!frame[*r as usize] && previous[*r as usize]);
            }
            let changed = (0..4).filter(|&i| frame[i] != previous[i]).count();
            assert_eq!(buttons.pressed().len() + buttons.released().len(), changed);
            previous = *frame;
        }
    }

    #[test]
    fn held_button_is_pressed_once() {
        let mut buttons = ButtonStates::new(2);
        buttons.update(&[true, false]);
        assert_eq!(buttons.pressed(), &[0]);
        buttons.update(&[true, false]);
        assert!(buttons.pressed().is_empty());
        assert!(buttons.released().is_empty());
        buttons.update(&[false, false]);
        assert_eq!(buttons.released(), &[0]);
    }

    #[test]
    fn cleared_edges_keep_the_held_state() {
        let mut buttons = ButtonStates::new(2);
        buttons.update(&[true, false]);
        buttons.clear_edges();
        assert!(buttons.pressed().is_empty());
        assert!(buttons.is_down(0));
        // still held on the next poll, so no new press
        buttons.update(&[true, false]);
        assert!(buttons.pressed().is_empty());
        assert!(buttons.released().is_empty());
    }

    #[test]
    fn axes_are_clamped_in_order() {
        let layout = touch_layout();
        let mut controller = VRHandController::new(
            VRHand::Left,
            &layout,
            VRHandControllerCapabilities::tracked_hand(),
            Duration::from_millis(50),
        );
        let input = VRInputState {
            controller_type: VRControllerType::LEFT_HAND,
            buttons: 0,
            thumbstick: [0.5, -1.5],
            trigger: 2.0,
            grip: 0.25,
        };
        controller.update_axes(&input);
        let values: Vec<f32> = controller.axes().iter().map(|a| a.value).collect();
        assert_eq!(values, vec![0.5, -1.0, 1.0, 0.25]);
        assert_eq!(controller.axes()[2].name, "Trigger X");
    }

    #[test]
    fn reserved_right_button_stays_released() {
        let layout = touch_layout();
        let mut controller = VRHandController::new(
            VRHand::Right,
            &layout,
            VRHandControllerCapabilities::tracked_hand(),
            Duration::from_millis(50),
        );
        let input = VRInputState {
            buttons: u64::max_value(),
            ..VRInputState::default()
        };
        controller.update_buttons(&layout, &input);
        assert_eq!(controller.buttons().states(), &[true, true, false, true]);
    }

    #[test]
    fn hidden_or_untracked_controllers_are_invisible() {
        let layout = touch_layout();
        let mut controller = VRHandController::new(
            VRHand::Left,
            &layout,
            VRHandControllerCapabilities::tracked_hand(),
            Duration::from_millis(50),
        );
        let mut state = VRPoseState::default();
        state.tracked = true;
        controller.update_tracking(&BodyTransform::default(), &state);
        assert!(controller.update_visibility(false));
        assert!(controller.is_visible());
        assert!(controller.update_visibility(true));
        assert!(!controller.is_visible());
        assert!(!controller.update_visibility(true));
    }
}
