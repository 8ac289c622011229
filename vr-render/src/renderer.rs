use crate::camera_rig::StereoCameraRig;
use crate::controller::{ControllerInputPoller, HandControllerRegistry, VRHandController};
use crate::coordinates::BodyTransform;
use crate::engine::{DebugMode, PlayerBody, RenderEngine, RenderView};
use crate::haptics::{Clock, MonotonicClock};
use crate::session::SessionStatusCache;
use crate::settings::RendererSettings;
use crate::swap_chain::SwapChainManager;
use std::time::Duration;
use vr_render_api::{
    eye_pose, HeadSpace, TrackingSpace, VRError, VREvent, VREye, VRFieldOfView, VRHand, VRInitError, VRInitResult,
    VRPose, VRResult, VRRuntime, VRRuntimeCapabilities, VRSessionStatus, VRTrackingState, WorldSpace,
};

/// Where the renderer is inside the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    // Tracking updated, waiting for begin-frame permission.
    WaitToBegin,
    Rendering,
    // Copying eye renders into the runtime swap chains.
    Committing,
    Submitted,
    // Session not visible; nothing was begun this frame.
    Paused,
}

/// Drives one VR runtime session: tracking, stereo cameras, per-eye swap
/// chains, frame submission and hand controllers.
///
/// Per frame the game loop calls `update_tracking` then `render_and_submit_frame`,
/// and stops once `should_quit` returns true.
pub struct VRRenderer<E: RenderEngine> {
    runtime: Box<dyn VRRuntime>,
    engine: E,
    settings: RendererSettings,
    capabilities: VRRuntimeCapabilities,
    cameras: StereoCameraRig,
    buffers: SwapChainManager,
    session: SessionStatusCache,
    controllers: HandControllerRegistry,
    poller: ControllerInputPoller,
    eye_fovs: [VRFieldOfView; 2],
    frame_index: u64,
    phase: FramePhase,
    display_time: f64,
    tracking: VRTrackingState,
    body: BodyTransform,
    head_pose: VRPose<WorldSpace>,
    render_poses: [VRPose<TrackingSpace>; 2],
    paused: bool,
    hide_hands: bool,
    quit_requested: bool,
    debug_mode: DebugMode,
    perf_hud_mode: u32,
    clock: Box<dyn Clock>,
    last_update: Option<Duration>,
    update_time: Duration,
}

impl<E: RenderEngine> VRRenderer<E> {
    /// Sets up cameras and render buffers for an initialized runtime.
    /// Any allocation failure is fatal; buffers created so far are released.
    pub fn new(
        runtime: Box<dyn VRRuntime>,
        engine: E,
        settings: RendererSettings,
        body: &mut dyn PlayerBody,
    ) -> VRInitResult<VRRenderer<E>> {
        settings
            .validate()
            .map_err(|e| VRInitError::critical(e.to_string()))?;

        if let Some(height) = runtime.user_eye_height() {
            debug!("User eye height: {}", height);
            body.set_eye_height(height);
        }

        let eye_fovs = [runtime.default_eye_fov(VREye::Left), runtime.default_eye_fov(VREye::Right)];
        let cameras = StereoCameraRig::new(
            eye_fovs,
            engine.window_aspect(),
            settings.near_clipping_distance,
            settings.far_clipping_distance,
        );
        let capabilities = runtime.capabilities();
        let poller = ControllerInputPoller::new(runtime.controller_layout(), settings.haptic_interval());
        let debug_mode = settings.debug_mode;

        let mut renderer = VRRenderer {
            runtime,
            engine,
            settings,
            capabilities,
            cameras,
            buffers: SwapChainManager::new(),
            session: SessionStatusCache::new(),
            controllers: HandControllerRegistry::new(),
            poller,
            eye_fovs,
            frame_index: 0,
            phase: FramePhase::Submitted,
            display_time: 0.0,
            tracking: VRTrackingState::default(),
            body: body.body_transform(),
            head_pose: VRPose::default(),
            render_poses: [VRPose::default(); 2],
            paused: false,
            hide_hands: false,
            quit_requested: false,
            debug_mode,
            perf_hud_mode: 0,
            clock: Box::new(MonotonicClock::new()),
            last_update: None,
            update_time: Duration::from_secs(0),
        };
        // On error the renderer is dropped here, which releases what was allocated.
        renderer.init_buffers()?;
        renderer.update_eye_offsets();
        renderer.engine.show_debug_view(debug_mode);
        info!(
            "VR renderer ready on {} ({:?})",
            renderer.runtime.display_name(),
            renderer.runtime.kind()
        );
        Ok(renderer)
    }

    /// Replaces the timer used for haptic rate limiting and update time.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> VRRenderer<E> {
        self.clock = clock;
        self.last_update = None;
        self
    }

    fn init_buffers(&mut self) -> VRInitResult<()> {
        if !self.capabilities.can_present {
            info!("{} cannot present, rendering monoscopic only", self.runtime.display_name());
            return Ok(());
        }
        self.buffers
            .allocate(&mut *self.runtime, &mut self.engine, &self.eye_fovs)?;
        self.buffers.make_ready(&mut *self.runtime)?;
        if self.settings.mirror_hmd_view && self.capabilities.has_mirror {
            let size = self.runtime.hmd_resolution();
            self.buffers
                .allocate_mirror(&mut *self.runtime, &mut self.engine, size)?;
        }
        Ok(())
    }

    fn session_status(&mut self) -> VRSessionStatus {
        self.session.get(self.frame_index, &mut *self.runtime)
    }

    pub fn should_quit(&mut self) -> bool {
        self.quit_requested || self.engine.is_window_closed() || self.session_status().should_quit
    }

    pub fn should_recenter(&mut self) -> bool {
        self.session_status().should_recenter
    }

    pub fn is_visible_in_hmd(&mut self) -> bool {
        self.session_status().is_visible
    }

    /// Reads the player body and runs the tracking step for the next frame.
    pub fn update_tracking(&mut self, body: &dyn PlayerBody) {
        self.body = body.body_transform();
        self.tracking_pose_and_timing();
    }

    /// Starts a new frame: display time, runtime events, tracking, controllers
    /// and camera poses, using the last body transform.
    pub fn tracking_pose_and_timing(&mut self) {
        self.frame_index += 1;
        self.phase = FramePhase::WaitToBegin;
        self.display_time = self.runtime.predicted_display_time(self.frame_index);

        let now = self.clock.elapsed();
        self.update_time = match self.last_update {
            Some(last) if now > last => now - last,
            _ => Duration::from_secs(0),
        };
        self.last_update = Some(now);

        for event in self.runtime.poll_events() {
            self.handle_event(event);
        }

        let status = self.session_status();
        if status.should_recenter {
            info!("Runtime requested recenter");
            self.runtime.recenter_tracking_origin();
        }
        self.hide_hands = !status.has_input_focus;

        self.tracking = self
            .runtime
            .tracking_state(self.display_time, self.settings.predict_tracking);
        self.update_eye_offsets();
        let head = self.tracking.head.pose;
        self.render_poses = [
            eye_pose(&head, &self.cameras.eye(VREye::Left).local_pose()),
            eye_pose(&head, &self.cameras.eye(VREye::Right).local_pose()),
        ];

        let changes = self.poller.poll(
            &mut *self.runtime,
            &mut self.controllers,
            &self.tracking.hands,
            &self.body,
            self.hide_hands,
        );
        for (hand, visible) in changes {
            self.engine.set_hand_visible(hand, visible);
        }

        self.head_pose = self.body.to_world(&head);
        self.cameras.apply_rig_pose(self.head_pose);
    }

    fn handle_event(&mut self, event: VREvent) {
        match event {
            VREvent::Quit => {
                info!("Runtime requested quit");
                self.quit_requested = true;
            }
            VREvent::IpdChanged(ipd) => debug!("IPD changed to {}", ipd),
            VREvent::RecenterRequested => self.runtime.recenter_tracking_origin(),
            VREvent::Mounted => debug!("Headset mounted"),
            VREvent::Unmounted => debug!("Headset unmounted"),
            VREvent::Blur => debug!("Input focus lost"),
            VREvent::Focus => debug!("Input focus regained"),
        }
    }

    fn update_eye_offsets(&mut self) {
        let offsets: [VRPose<HeadSpace>; 2] = [
            self.runtime.eye_offset(VREye::Left, &self.eye_fovs[0]),
            self.runtime.eye_offset(VREye::Right, &self.eye_fovs[1]),
        ];
        if self.cameras.update_eye_offsets(offsets) {
            debug!("Eye offsets updated for frame {}", self.frame_index);
        }
    }

    /// Renders the current frame and hands it to the runtime.
    pub fn render_and_submit_frame(&mut self) -> VRResult<()> {
        self.engine.handle_window_messages();

        if !self.capabilities.can_present {
            if self.engine.is_window_closed() {
                self.quit_requested = true;
                return Ok(());
            }
            self.engine.render_one_frame(&self.cameras, RenderView::Monoscopic);
            self.phase = FramePhase::Submitted;
            return Ok(());
        }

        let status = self.session_status();
        self.set_hide_hands(!status.has_input_focus);
        if !status.is_visible {
            if !self.paused {
                info!("Session not visible, pausing");
            }
            self.paused = true;
            self.phase = FramePhase::Paused;
            return Ok(());
        }
        if self.paused {
            info!("Session visible again, resuming");
        }
        self.paused = false;

        let frame_index = self.frame_index;
        if let Some(eye) = self.buffers.committed_for(frame_index) {
            let e = VRError::DoubleCommit {
                eye: eye.name(),
                frame_index,
            };
            error!("{}", e);
            return Err(e);
        }

        self.runtime.wait_to_begin_frame(frame_index)?;
        self.runtime.begin_frame(frame_index)?;
        if let Err(e) = self.render_and_end_frame(frame_index) {
            error!("Frame {} begun but not ended: {}", frame_index, e);
            return Err(e);
        }

        if self.settings.mirror_hmd_view && self.engine.is_window_visible() {
            self.buffers.copy_mirror(&mut *self.runtime, &mut self.engine)?;
        }
        Ok(())
    }

    // Everything between begin_frame and end_frame.
    fn render_and_end_frame(&mut self, frame_index: u64) -> VRResult<()> {
        self.phase = FramePhase::Rendering;
        self.engine.render_one_frame(&self.cameras, RenderView::Stereo);

        self.phase = FramePhase::Committing;
        for eye in VREye::BOTH.iter().cloned() {
            self.buffers
                .copy_and_commit(eye, frame_index, &mut *self.runtime, &mut self.engine)?;
        }

        let layer = self
            .buffers
            .layer(&self.eye_fovs, &self.render_poses, self.display_time, frame_index)?;
        self.runtime.end_frame(frame_index, &layer)?;
        self.phase = FramePhase::Submitted;
        Ok(())
    }

    fn set_hide_hands(&mut self, hide: bool) {
        if hide == self.hide_hands {
            return;
        }
        self.hide_hands = hide;
        for hand in VRHand::BOTH.iter().cloned() {
            if let Some(controller) = self.controllers.get_mut(hand) {
                if controller.update_visibility(hide) {
                    self.engine.set_hand_visible(hand, controller.is_visible());
                }
            }
        }
    }

    pub fn recenter(&mut self) {
        self.runtime.recenter_tracking_origin();
    }

    pub fn controller(&self, hand: VRHand) -> Option<&VRHandController> {
        self.controllers.get(hand)
    }

    pub fn controllers(&self) -> &HandControllerRegistry {
        &self.controllers
    }

    /// Vibrates a controller. Returns false when there is no controller on
    /// that side or the pulse fell inside the haptic interval.
    pub fn rumble_start(&mut self, hand: VRHand, strength: f32) -> VRResult<bool> {
        let now = self.clock.elapsed();
        match self.controllers.get_mut(hand) {
            Some(controller) => controller.rumble_start(&mut *self.runtime, strength, now),
            None => Ok(false),
        }
    }

    pub fn rumble_stop(&mut self, hand: VRHand) -> VRResult<()> {
        match self.controllers.get_mut(hand) {
            Some(controller) => controller.rumble_stop(&mut *self.runtime),
            None => Ok(()),
        }
    }

    pub fn show_debug(&mut self, mode: DebugMode) {
        self.debug_mode = mode;
        self.engine.show_debug_view(mode);
    }

    pub fn debug_mode(&self) -> DebugMode {
        self.debug_mode
    }

    pub fn set_near_clipping_distance(&mut self, distance: f32) {
        self.cameras.set_near_clipping_distance(distance);
    }

    pub fn set_far_clipping_distance(&mut self, distance: f32) {
        self.cameras.set_far_clipping_distance(distance);
    }

    /// Switches the runtime performance HUD to its next mode, wrapping to off.
    pub fn cycle_debug_hud(&mut self) -> u32 {
        let modes = self.capabilities.perf_hud_modes.max(1);
        self.perf_hud_mode = (self.perf_hud_mode + 1) % modes;
        self.runtime.set_perf_hud_mode(self.perf_hud_mode);
        self.perf_hud_mode
    }

    // Seconds between the last two tracking updates.
    pub fn update_time(&self) -> f64 {
        self.update_time.as_secs_f64()
    }

    pub fn debug_print(&self) {
        for eye in VREye::BOTH.iter().cloned() {
            let pose = self.cameras.eye(eye).local_pose();
            let world = self.cameras.eye_world_pose(eye);
            info!(
                "{} eye camera: position {:?} orientation {:?}, world position {:?}",
                eye.name(),
                pose.position_array(),
                pose.orientation_array(),
                world.position_array()
            );
        }
        info!(
            "Head: position {:?} orientation {:?}",
            self.head_pose.position_array(),
            self.head_pose.orientation_array()
        );
    }

    pub fn audio_device_hint(&self) -> Option<String> {
        self.runtime.audio_device_hint()
    }

    pub fn runtime(&self) -> &dyn VRRuntime {
        &*self.runtime
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn cameras(&self) -> &StereoCameraRig {
        &self.cameras
    }

    pub fn buffers(&self) -> &SwapChainManager {
        &self.buffers
    }

    pub fn head_pose(&self) -> &VRPose<WorldSpace> {
        &self.head_pose
    }

    pub fn tracking(&self) -> &VRTrackingState {
        &self.tracking
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn hands_hidden(&self) -> bool {
        self.hide_hands
    }

    pub fn session_query_count(&self) -> u64 {
        self.session.query_count()
    }

    /// Releases runtime swap chains and the mirror texture. Also done on drop.
    pub fn shutdown(&mut self) {
        self.buffers.release(&mut *self.runtime);
    }
}

impl<E: RenderEngine> Drop for VRRenderer<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
