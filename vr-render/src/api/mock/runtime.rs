use crate::api::layouts;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use vr_render_api::utils;
use vr_render_api::{
    HeadSpace, MockVRControlMsg, TextureHandle, VRControllerLayout, VRControllerType, VRError, VREvent, VREye,
    VRFieldOfView, VRHand, VRInitError, VRInitResult, VRInputState, VRLayer, VRMirrorTextureId, VRPose,
    VRPoseState, VRResult, VRRuntime, VRRuntimeCapabilities, VRRuntimeKind, VRSessionStatus, VRSwapChainDesc,
    VRSwapChainId, VRTextureSize, VRTrackingState,
};

pub type MockVRStateHandle = Arc<Mutex<MockVRState>>;

pub const MOCK_SWAP_CHAIN_LENGTH: usize = 3;

// Number of calls the runtime received, per entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockCallCounters {
    pub session_status: u64,
    pub predicted_display_time: u64,
    pub tracking_state: u64,
    pub recenter: u64,
    pub input_state: u64,
    pub wait_to_begin_frame: u64,
    pub begin_frame: u64,
    pub end_frame: u64,
    pub commits: u64,
    pub swap_chains_created: u64,
    pub swap_chains_destroyed: u64,
    pub mirrors_created: u64,
    pub mirrors_destroyed: u64,
}

#[derive(Debug, Clone)]
pub struct MockSwapChain {
    pub desc: VRSwapChainDesc,
    pub buffers: Vec<TextureHandle>,
    pub current: usize,
    pub commits: u64,
}

/// Simulated headset, scripted by tests. Shaped after an Oculus Rift CV1
/// with Touch controllers.
#[derive(Debug, Clone)]
pub struct MockVRState {
    pub display_name: String,
    pub hmd_resolution: VRTextureSize,
    pub refresh_rate: f32,
    pub fovs: [VRFieldOfView; 2],
    // Render target pixels per unit of FOV tangent.
    pub pixels_per_tan: f32,
    pub eye_offsets: [VRPose<HeadSpace>; 2],
    pub eye_height: f32,
    pub session_status: VRSessionStatus,
    pub head: VRPoseState,
    pub hands: [VRPoseState; 2],
    pub controller_type: VRControllerType,
    pub inputs: [VRInputState; 2],
    pub failing_inputs: [bool; 2],
    pub events: Vec<VREvent>,
    pub fail_swap_chain_creation: bool,
    pub fail_mirror_creation: bool,
    pub fail_swap_chain_release: bool,
    pub swap_chains: HashMap<VRSwapChainId, MockSwapChain>,
    pub mirrors: HashMap<VRMirrorTextureId, TextureHandle>,
    pub calls: MockCallCounters,
    // Ordered trace of the frame level calls, e.g. "wait_to_begin_frame:3" or "commit:left".
    pub call_log: Vec<String>,
    pub last_layer: Option<VRLayer>,
    pub haptic_pulses: Vec<(VRHand, f32)>,
    pub perf_hud_mode: u32,
}

impl Default for MockVRState {
    fn default() -> MockVRState {
        let ipd = 0.064;
        let mut state = MockVRState {
            display_name: "Mock VR Headset".into(),
            hmd_resolution: VRTextureSize::new(2160, 1200),
            refresh_rate: 90.0,
            fovs: [
                VRFieldOfView {
                    up_tan: 1.3292,
                    down_tan: 1.3292,
                    left_tan: 1.0586,
                    right_tan: 1.0924,
                },
                VRFieldOfView {
                    up_tan: 1.3292,
                    down_tan: 1.3292,
                    left_tan: 1.0924,
                    right_tan: 1.0586,
                },
            ],
            pixels_per_tan: 600.0,
            eye_offsets: [VRPose::default(); 2],
            eye_height: 1.675,
            session_status: VRSessionStatus::default(),
            head: VRPoseState {
                pose: VRPose::from_arrays([0.0, 1.6, 0.0], [0.0, 0.0, 0.0, 1.0]),
                tracked: true,
                ..VRPoseState::default()
            },
            hands: [
                VRPoseState {
                    pose: VRPose::from_arrays([-0.2, 1.0, -0.3], [0.0, 0.0, 0.0, 1.0]),
                    tracked: true,
                    ..VRPoseState::default()
                },
                VRPoseState {
                    pose: VRPose::from_arrays([0.2, 1.0, -0.3], [0.0, 0.0, 0.0, 1.0]),
                    tracked: true,
                    ..VRPoseState::default()
                },
            ],
            controller_type: VRControllerType::HANDS,
            inputs: [VRInputState::default(); 2],
            failing_inputs: [false; 2],
            events: Vec::new(),
            fail_swap_chain_creation: false,
            fail_mirror_creation: false,
            fail_swap_chain_release: false,
            swap_chains: HashMap::new(),
            mirrors: HashMap::new(),
            calls: MockCallCounters::default(),
            call_log: Vec::new(),
            last_layer: None,
            haptic_pulses: Vec::new(),
            perf_hud_mode: 0,
        };
        state.set_ipd(ipd);
        state
    }
}

impl MockVRState {
    pub fn handle_msg(&mut self, msg: MockVRControlMsg) {
        match msg {
            MockVRControlMsg::SetHeadPose(position, orientation) => {
                self.head.pose = VRPose::from_arrays(position, orientation);
            }
            MockVRControlMsg::SetHandPose(hand, position, orientation) => {
                self.hands[hand.index()].pose = VRPose::from_arrays(position, orientation);
            }
            MockVRControlMsg::SetHandVelocity(hand, linear, angular) => {
                let state = &mut self.hands[hand.index()];
                state.linear_velocity = euclid::Vector3D::new(linear[0], linear[1], linear[2]);
                state.angular_velocity = euclid::Vector3D::new(angular[0], angular[1], angular[2]);
            }
            MockVRControlMsg::SetHandTracked(hand, tracked) => {
                self.hands[hand.index()].tracked = tracked;
            }
            MockVRControlMsg::SetIpd(ipd) => self.set_ipd(ipd),
            MockVRControlMsg::SetEyeOffset(eye, position, orientation) => {
                self.eye_offsets[eye.index()] = VRPose::from_arrays(position, orientation);
            }
            MockVRControlMsg::SetEyeFov(eye, fov) => {
                self.fovs[eye.index()] = fov;
            }
            MockVRControlMsg::SetSessionStatus(status) => self.session_status = status,
            MockVRControlMsg::SetVisible(visible) => self.session_status.is_visible = visible,
            MockVRControlMsg::SetEyeHeight(height) => self.eye_height = height,
            MockVRControlMsg::SetControllerType(controller_type) => self.controller_type = controller_type,
            MockVRControlMsg::SetButtons(hand, buttons) => self.inputs[hand.index()].buttons = buttons,
            MockVRControlMsg::SetAxes(hand, axes) => {
                let input = &mut self.inputs[hand.index()];
                input.thumbstick = [axes[0], axes[1]];
                input.trigger = axes[2];
                input.grip = axes[3];
            }
            MockVRControlMsg::FailInputPoll(hand, fail) => self.failing_inputs[hand.index()] = fail,
            MockVRControlMsg::PushEvent(event) => self.events.push(event),
            MockVRControlMsg::Focus => self.session_status.has_input_focus = true,
            MockVRControlMsg::Blur => self.session_status.has_input_focus = false,
        }
    }

    pub fn set_ipd(&mut self, ipd: f32) {
        let half = ipd * 0.5;
        self.eye_offsets = [
            VRPose::from_arrays([-half, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]),
            VRPose::from_arrays([half, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]),
        ];
    }

    pub fn texture_size_for(&self, fov: &VRFieldOfView) -> VRTextureSize {
        VRTextureSize::new(
            (fov.horizontal_tan() * self.pixels_per_tan).ceil() as u32,
            (fov.vertical_tan() * self.pixels_per_tan).ceil() as u32,
        )
    }

    // Swap chain created for an eye, if any.
    pub fn swap_chain_for(&self, eye: VREye) -> Option<&MockSwapChain> {
        self.swap_chains.values().find(|chain| chain.desc.eye == eye)
    }

    fn log(&mut self, entry: String) {
        self.call_log.push(entry);
    }
}

pub struct MockVRRuntime {
    state: MockVRStateHandle,
    receiver: Option<Receiver<MockVRControlMsg>>,
}

impl MockVRRuntime {
    pub fn new() -> MockVRRuntime {
        MockVRRuntime {
            state: Arc::new(Mutex::new(MockVRState::default())),
            receiver: None,
        }
    }

    pub fn new_with_receiver(receiver: Receiver<MockVRControlMsg>) -> MockVRRuntime {
        MockVRRuntime {
            state: Arc::new(Mutex::new(MockVRState::default())),
            receiver: Some(receiver),
        }
    }

    pub fn state_handle(&self) -> MockVRStateHandle {
        self.state.clone()
    }

    // Applies pending remote messages, then locks the state.
    fn state(&self) -> MutexGuard<MockVRState> {
        let mut state = self.state.lock();
        if let Some(ref receiver) = self.receiver {
            for msg in receiver.try_iter() {
                state.handle_msg(msg);
            }
        }
        state
    }
}

impl Default for MockVRRuntime {
    fn default() -> MockVRRuntime {
        MockVRRuntime::new()
    }
}

impl VRRuntime for MockVRRuntime {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Mock
    }

    fn display_name(&self) -> String {
        self.state().display_name.clone()
    }

    fn capabilities(&self) -> VRRuntimeCapabilities {
        VRRuntimeCapabilities {
            has_position: true,
            has_orientation: true,
            has_external_display: true,
            can_present: true,
            owns_swap_chains: true,
            has_mirror: true,
            perf_hud_modes: 3,
        }
    }

    fn hmd_resolution(&self) -> VRTextureSize {
        self.state().hmd_resolution
    }

    fn refresh_rate(&self) -> f32 {
        self.state().refresh_rate
    }

    fn default_eye_fov(&self, eye: VREye) -> VRFieldOfView {
        self.state().fovs[eye.index()]
    }

    fn fov_texture_size(&self, _eye: VREye, fov: &VRFieldOfView) -> VRTextureSize {
        self.state().texture_size_for(fov)
    }

    fn eye_offset(&mut self, eye: VREye, _fov: &VRFieldOfView) -> VRPose<HeadSpace> {
        self.state().eye_offsets[eye.index()]
    }

    fn user_eye_height(&self) -> Option<f32> {
        Some(self.state().eye_height)
    }

    fn session_status(&mut self) -> VRResult<VRSessionStatus> {
        let mut state = self.state();
        state.calls.session_status += 1;
        Ok(state.session_status)
    }

    fn predicted_display_time(&mut self, frame_index: u64) -> f64 {
        let mut state = self.state();
        state.calls.predicted_display_time += 1;
        state.log(format!("predicted_display_time:{}", frame_index));
        frame_index as f64 / state.refresh_rate as f64
    }

    fn tracking_state(&mut self, display_time: f64, _predict: bool) -> VRTrackingState {
        let mut state = self.state();
        state.calls.tracking_state += 1;
        state.log("tracking_state".into());
        VRTrackingState {
            display_time,
            head: state.head,
            hands: state.hands,
        }
    }

    fn recenter_tracking_origin(&mut self) {
        let mut state = self.state();
        state.calls.recenter += 1;
        state.session_status.should_recenter = false;
    }

    fn poll_events(&mut self) -> Vec<VREvent> {
        let mut state = self.state();
        state.events.drain(..).collect()
    }

    fn controller_layout(&self) -> VRControllerLayout {
        layouts::oculus_touch_layout()
    }

    fn input_state(&mut self, hand: VRHand) -> VRResult<VRInputState> {
        let mut state = self.state();
        state.calls.input_state += 1;
        if state.failing_inputs[hand.index()] {
            return Err(VRError::InputUnavailable(hand.name()));
        }
        let mut input = state.inputs[hand.index()];
        input.controller_type = state.controller_type;
        Ok(input)
    }

    fn trigger_haptic_pulse(&mut self, hand: VRHand, strength: f32) -> VRResult<()> {
        self.state().haptic_pulses.push((hand, strength));
        Ok(())
    }

    fn create_swap_chain(&mut self, desc: &VRSwapChainDesc) -> VRInitResult<VRSwapChainId> {
        let mut state = self.state();
        if state.fail_swap_chain_creation {
            return Err(VRInitError::render(format!("cannot create {} eye swap chain", desc.eye.name())));
        }
        let id = VRSwapChainId(utils::new_id());
        let buffers = (0..MOCK_SWAP_CHAIN_LENGTH).map(|_| TextureHandle(utils::new_id())).collect();
        state.calls.swap_chains_created += 1;
        state.swap_chains.insert(
            id,
            MockSwapChain {
                desc: *desc,
                buffers,
                current: 0,
                commits: 0,
            },
        );
        Ok(id)
    }

    fn swap_chain_length(&self, chain: VRSwapChainId) -> VRResult<usize> {
        self.state()
            .swap_chains
            .get(&chain)
            .map(|chain| chain.buffers.len())
            .ok_or(VRError::UnknownSwapChain(chain.0))
    }

    fn swap_chain_current_index(&mut self, chain: VRSwapChainId) -> VRResult<usize> {
        self.state()
            .swap_chains
            .get(&chain)
            .map(|chain| chain.current)
            .ok_or(VRError::UnknownSwapChain(chain.0))
    }

    fn swap_chain_buffer(&mut self, chain: VRSwapChainId, index: usize) -> VRResult<TextureHandle> {
        let state = self.state();
        let swap_chain = state.swap_chains.get(&chain).ok_or(VRError::UnknownSwapChain(chain.0))?;
        swap_chain
            .buffers
            .get(index)
            .cloned()
            .ok_or_else(|| VRError::runtime_call("swap_chain_buffer", format!("index {} out of range", index)))
    }

    fn commit_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        let mut state = self.state();
        let eye = {
            let swap_chain = state.swap_chains.get_mut(&chain).ok_or(VRError::UnknownSwapChain(chain.0))?;
            swap_chain.commits += 1;
            swap_chain.current = (swap_chain.current + 1) % swap_chain.buffers.len();
            swap_chain.desc.eye
        };
        state.calls.commits += 1;
        state.log(format!("commit:{}", eye.name()));
        Ok(())
    }

    fn destroy_swap_chain(&mut self, chain: VRSwapChainId) -> VRResult<()> {
        let mut state = self.state();
        if state.fail_swap_chain_release {
            return Err(VRError::ReleaseFailed {
                resource: format!("swap chain {}", chain.0),
                message: "scripted failure".into(),
            });
        }
        state.swap_chains.remove(&chain).ok_or(VRError::UnknownSwapChain(chain.0))?;
        state.calls.swap_chains_destroyed += 1;
        Ok(())
    }

    fn create_mirror_texture(&mut self, _size: VRTextureSize) -> VRInitResult<VRMirrorTextureId> {
        let mut state = self.state();
        if state.fail_mirror_creation {
            return Err(VRInitError::render("cannot create mirror texture"));
        }
        let id = VRMirrorTextureId(utils::new_id());
        state.mirrors.insert(id, TextureHandle(utils::new_id()));
        state.calls.mirrors_created += 1;
        Ok(id)
    }

    fn mirror_texture_buffer(&mut self, mirror: VRMirrorTextureId) -> VRResult<TextureHandle> {
        self.state()
            .mirrors
            .get(&mirror)
            .cloned()
            .ok_or(VRError::UnknownMirrorTexture(mirror.0))
    }

    fn destroy_mirror_texture(&mut self, mirror: VRMirrorTextureId) -> VRResult<()> {
        let mut state = self.state();
        state.mirrors.remove(&mirror).ok_or(VRError::UnknownMirrorTexture(mirror.0))?;
        state.calls.mirrors_destroyed += 1;
        Ok(())
    }

    fn wait_to_begin_frame(&mut self, frame_index: u64) -> VRResult<()> {
        let mut state = self.state();
        state.calls.wait_to_begin_frame += 1;
        state.log(format!("wait_to_begin_frame:{}", frame_index));
        Ok(())
    }

    fn begin_frame(&mut self, frame_index: u64) -> VRResult<()> {
        let mut state = self.state();
        state.calls.begin_frame += 1;
        state.log(format!("begin_frame:{}", frame_index));
        Ok(())
    }

    fn end_frame(&mut self, frame_index: u64, layer: &VRLayer) -> VRResult<()> {
        let mut state = self.state();
        state.calls.end_frame += 1;
        state.log(format!("end_frame:{}", frame_index));
        state.last_layer = Some(*layer);
        Ok(())
    }

    fn set_perf_hud_mode(&mut self, mode: u32) {
        self.state().perf_hud_mode = mode;
    }

    fn audio_device_hint(&self) -> Option<String> {
        Some("Mock Headset Audio".into())
    }
}
