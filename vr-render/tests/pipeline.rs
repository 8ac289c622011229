#![cfg(feature = "mock")]

mod common;

use common::RecordingEngine;
use std::time::Duration;
use vr_render::api::{MockVRRuntime, MockVRStateHandle};
use vr_render::coordinates::BodyTransform;
use vr_render::engine::{DebugMode, RenderView, StaticBody};
use vr_render::haptics::ManualClock;
use vr_render::settings::RendererSettings;
use vr_render::{
    FramePhase, MockVRControlMsg, VRError, VRErrorCode, VREvent, VREye, VRFieldOfView, VRInitError, VRRenderer,
    VRRuntimeKind, VRRuntimeManager,
};

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
}

fn start(
    settings: RendererSettings,
    script: impl FnOnce(&MockVRStateHandle),
) -> Result<(VRRenderer<RecordingEngine>, MockVRStateHandle, StaticBody), VRInitError> {
    let runtime = MockVRRuntime::new();
    let state = runtime.state_handle();
    script(&state);
    let mut body = StaticBody::default();
    let renderer = VRRenderer::new(Box::new(runtime), RecordingEngine::new(), settings, &mut body)?;
    Ok((renderer, state, body))
}

fn mock_renderer() -> (VRRenderer<RecordingEngine>, MockVRStateHandle, StaticBody) {
    start(RendererSettings::default(), |_| {}).unwrap()
}

fn run_frame(renderer: &mut VRRenderer<RecordingEngine>, body: &StaticBody) {
    renderer.update_tracking(body);
    renderer.render_and_submit_frame().unwrap();
}

#[test]
fn init_pushes_eye_height_and_debug_view() {
    let (renderer, _state, body) = mock_renderer();
    assert_close(body.eye_height, 1.675);
    assert_eq!(renderer.engine().debug_views, vec![DebugMode::HmdMirror]);
    assert_eq!(renderer.frame_index(), 0);
}

#[test]
fn eye_swap_chains_are_sized_independently() {
    let wide = VRFieldOfView {
        up_tan: 1.5,
        down_tan: 1.2,
        left_tan: 1.4,
        right_tan: 1.1,
    };
    let (renderer, state, _body) = start(RendererSettings::default(), |state| {
        state.lock().fovs[1] = wide;
    })
    .unwrap();

    let state = state.lock();
    let left = state.texture_size_for(&state.fovs[0]);
    let right = state.texture_size_for(&wide);
    assert_ne!(left, right);
    assert_eq!(renderer.buffers().texture_size(VREye::Left), left);
    assert_eq!(renderer.buffers().texture_size(VREye::Right), right);
    assert_eq!(state.swap_chain_for(VREye::Left).unwrap().desc.size, left);
    assert_eq!(state.swap_chain_for(VREye::Right).unwrap().desc.size, right);

    let engine = renderer.engine();
    assert_eq!(engine.render_textures.len(), 2);
    assert_eq!(engine.display_textures, vec![("MirrorTex".to_owned(), state.hmd_resolution)]);
}

#[test]
fn frame_calls_reach_the_runtime_in_order() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);

    let expected = vec![
        "predicted_display_time:1",
        "tracking_state",
        "wait_to_begin_frame:1",
        "begin_frame:1",
        "commit:left",
        "commit:right",
        "end_frame:1",
    ];
    assert_eq!(state.lock().call_log, expected);
    assert_eq!(renderer.phase(), FramePhase::Submitted);
    assert_eq!(renderer.engine().renders, vec![RenderView::Stereo]);
}

#[test]
fn submitted_layer_matches_buffers() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);

    let state = state.lock();
    let layer = state.last_layer.unwrap();
    assert_eq!(layer.frame_index, 1);
    assert!((layer.sensor_sample_time - 1.0 / 90.0).abs() < 1e-9);
    for eye in VREye::BOTH.iter().cloned() {
        let layer_eye = &layer.eyes[eye.index()];
        assert_eq!(Some(layer_eye.swap_chain), renderer.buffers().swap_chain(eye));
        assert_eq!(layer_eye.field_of_view, state.fovs[eye.index()]);
        assert_eq!(layer_eye.viewport.width as u32, layer_eye.texture_size.width);
    }
    assert_close(layer.eyes[0].render_pose.position.x, -0.032);
    assert_close(layer.eyes[1].render_pose.position.y, 1.6);
}

#[test]
fn one_status_query_per_frame() {
    let (mut renderer, state, body) = mock_renderer();
    for _ in 0..3 {
        run_frame(&mut renderer, &body);
        assert!(!renderer.should_quit());
        assert!(renderer.is_visible_in_hmd());
        assert!(!renderer.should_recenter());
        assert!(!renderer.should_quit());
    }
    assert_eq!(state.lock().calls.session_status, 3);
    assert_eq!(renderer.session_query_count(), 3);
}

#[test]
fn ipd_change_reaches_cameras_on_the_next_frame() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);
    state.lock().handle_msg(MockVRControlMsg::SetIpd(0.07));
    run_frame(&mut renderer, &body);

    let poses = &renderer.engine().eye_poses;
    assert_eq!(poses.len(), 2);
    assert_close(poses[0][0].position.x, -0.032);
    assert_close(poses[0][1].position.x, 0.032);
    assert_close(poses[1][0].position.x, -0.035);
    assert_close(poses[1][1].position.x, 0.035);
    assert_close(renderer.cameras().eye(VREye::Left).local_position.x, -0.035);
}

#[test]
fn invisible_session_pauses_but_pumps_messages() {
    let (mut renderer, state, body) = mock_renderer();
    state.lock().handle_msg(MockVRControlMsg::SetVisible(false));
    run_frame(&mut renderer, &body);

    assert!(renderer.paused());
    assert_eq!(renderer.phase(), FramePhase::Paused);
    assert_eq!(renderer.engine().messages_handled, 1);
    assert!(renderer.engine().renders.is_empty());
    {
        let state = state.lock();
        assert_eq!(state.calls.wait_to_begin_frame, 0);
        assert_eq!(state.calls.end_frame, 0);
        assert_eq!(state.calls.commits, 0);
    }

    state.lock().handle_msg(MockVRControlMsg::SetVisible(true));
    run_frame(&mut renderer, &body);
    assert!(!renderer.paused());
    assert_eq!(renderer.engine().messages_handled, 2);
    assert_eq!(state.lock().calls.end_frame, 1);
}

#[test]
fn second_submission_of_a_frame_is_rejected() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);

    let err = renderer.render_and_submit_frame().unwrap_err();
    assert_eq!(
        err,
        VRError::DoubleCommit {
            eye: "left",
            frame_index: 1
        }
    );
    {
        let state = state.lock();
        assert_eq!(state.calls.wait_to_begin_frame, 1);
        assert_eq!(state.calls.begin_frame, 1);
        assert_eq!(state.calls.commits, 2);
        assert_eq!(state.calls.end_frame, 1);
    }
    assert_eq!(renderer.engine().renders.len(), 1);

    run_frame(&mut renderer, &body);
    assert_eq!(state.lock().calls.commits, 4);
    assert_eq!(state.lock().calls.begin_frame, 2);
}

#[test]
fn commit_failure_after_begin_is_reported() {
    let (mut renderer, state, body) = mock_renderer();
    state.lock().swap_chains.clear();

    renderer.update_tracking(&body);
    match renderer.render_and_submit_frame() {
        Err(VRError::UnknownSwapChain(_)) => {}
        other => panic!("unexpected frame result: {:?}", other),
    }
    let state = state.lock();
    assert_eq!(state.calls.begin_frame, 1);
    assert_eq!(state.calls.commits, 0);
    assert_eq!(state.calls.end_frame, 0);
    assert_eq!(renderer.phase(), FramePhase::Committing);
}

#[test]
fn each_copy_targets_the_buffer_the_runtime_names() {
    let settings = RendererSettings {
        mirror_hmd_view: false,
        ..RendererSettings::default()
    };
    let (mut renderer, state, body) = start(settings, |_| {}).unwrap();
    let chain = renderer.buffers().swap_chain(VREye::Left).unwrap();
    let source = renderer.buffers().engine_texture(VREye::Left).unwrap();
    let chain_buffers = state.lock().swap_chains[&chain].buffers.clone();

    run_frame(&mut renderer, &body);
    assert_eq!(renderer.engine().copies[0], (source, chain_buffers[0]));

    // commit moved the chain on
    run_frame(&mut renderer, &body);
    assert_eq!(renderer.engine().copies[2], (source, chain_buffers[1]));

    // the index is asked for again every frame, not tracked locally
    state.lock().swap_chains.get_mut(&chain).unwrap().current = 0;
    run_frame(&mut renderer, &body);
    assert_eq!(renderer.engine().copies.len(), 6);
    assert_eq!(renderer.engine().copies[4], (source, chain_buffers[0]));
    assert_eq!(state.lock().swap_chains[&chain].commits, 3);
}

#[test]
fn mirror_is_copied_only_into_a_visible_window() {
    let (mut renderer, _state, body) = mock_renderer();
    run_frame(&mut renderer, &body);
    // two eyes plus the mirror
    assert_eq!(renderer.engine().copies.len(), 3);

    renderer.engine_mut().window_visible = false;
    run_frame(&mut renderer, &body);
    assert_eq!(renderer.engine().copies.len(), 5);
}

#[test]
fn mirror_can_be_disabled() {
    let settings = RendererSettings {
        mirror_hmd_view: false,
        ..RendererSettings::default()
    };
    let (mut renderer, state, body) = start(settings, |_| {}).unwrap();
    run_frame(&mut renderer, &body);

    assert_eq!(state.lock().calls.mirrors_created, 0);
    assert!(renderer.engine().display_textures.is_empty());
    assert_eq!(renderer.engine().copies.len(), 2);
    assert_eq!(state.lock().calls.end_frame, 1);
}

#[test]
fn swap_chain_failure_is_fatal() {
    let err = match start(RendererSettings::default(), |state| {
        state.lock().fail_swap_chain_creation = true;
    }) {
        Ok(_) => panic!("renderer created without swap chains"),
        Err(e) => e,
    };
    assert_eq!(err.code, VRErrorCode::Render);
}

#[test]
fn mirror_failure_releases_eye_buffers() {
    let runtime = MockVRRuntime::new();
    let state = runtime.state_handle();
    state.lock().fail_mirror_creation = true;
    let mut body = StaticBody::default();
    let result = VRRenderer::new(
        Box::new(runtime),
        RecordingEngine::new(),
        RendererSettings::default(),
        &mut body,
    );
    match result {
        Ok(_) => panic!("mirror failure should be fatal"),
        Err(e) => assert_eq!(e.code, VRErrorCode::Render),
    }
    let state = state.lock();
    assert_eq!(state.calls.swap_chains_created, 2);
    assert_eq!(state.calls.swap_chains_destroyed, 2);
    assert!(state.swap_chains.is_empty());
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = RendererSettings {
        near_clipping_distance: 10.0,
        far_clipping_distance: 1.0,
        ..RendererSettings::default()
    };
    match start(settings, |_| {}) {
        Ok(_) => panic!("inverted clip planes accepted"),
        Err(e) => assert_eq!(e.code, VRErrorCode::Critical),
    }
}

#[test]
fn drop_releases_runtime_resources() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);
    drop(renderer);

    let state = state.lock();
    assert_eq!(state.calls.swap_chains_destroyed, 2);
    assert_eq!(state.calls.mirrors_destroyed, 1);
    assert!(state.swap_chains.is_empty());
    assert!(state.mirrors.is_empty());
}

#[test]
fn failed_release_does_not_stop_teardown() {
    let (mut renderer, state, _body) = mock_renderer();
    state.lock().fail_swap_chain_release = true;
    renderer.shutdown();

    let state = state.lock();
    assert_eq!(state.swap_chains.len(), 2);
    assert_eq!(state.calls.mirrors_destroyed, 1);
    assert_eq!(renderer.buffers().swap_chain(VREye::Left), None);
}

#[test]
fn runtime_quit_event_requests_quit() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);
    assert!(!renderer.should_quit());

    state.lock().handle_msg(MockVRControlMsg::PushEvent(VREvent::Quit));
    run_frame(&mut renderer, &body);
    assert!(renderer.should_quit());
}

#[test]
fn session_quit_flag_requests_quit() {
    let (mut renderer, state, body) = mock_renderer();
    state.lock().session_status.should_quit = true;
    renderer.update_tracking(&body);
    assert!(renderer.should_quit());
}

#[test]
fn runtime_recenter_request_is_honored() {
    let (mut renderer, state, body) = mock_renderer();
    state.lock().session_status.should_recenter = true;
    run_frame(&mut renderer, &body);
    assert_eq!(state.lock().calls.recenter, 1);

    run_frame(&mut renderer, &body);
    assert_eq!(state.lock().calls.recenter, 1);

    renderer.recenter();
    assert_eq!(state.lock().calls.recenter, 2);
}

#[test]
fn hands_hide_without_input_focus() {
    let (mut renderer, state, body) = mock_renderer();
    run_frame(&mut renderer, &body);
    assert!(!renderer.hands_hidden());
    assert_eq!(
        renderer.engine().hand_visibility,
        vec![(vr_render::VRHand::Left, true), (vr_render::VRHand::Right, true)]
    );

    state.lock().handle_msg(MockVRControlMsg::Blur);
    run_frame(&mut renderer, &body);
    assert!(renderer.hands_hidden());
    assert_eq!(&renderer.engine().hand_visibility[2..], &[
        (vr_render::VRHand::Left, false),
        (vr_render::VRHand::Right, false)
    ]);

    state.lock().handle_msg(MockVRControlMsg::Focus);
    run_frame(&mut renderer, &body);
    assert!(!renderer.hands_hidden());
    assert_eq!(renderer.engine().hand_visibility.len(), 6);
}

#[test]
fn head_pose_is_placed_on_the_body() {
    let (mut renderer, _state, mut body) = mock_renderer();
    body.transform = BodyTransform::from_yaw(euclid::Vector3D::new(1.0, 0.0, 2.0), euclid::Angle::radians(0.0));
    run_frame(&mut renderer, &body);

    let head = renderer.head_pose();
    assert_close(head.position.x, 1.0);
    assert_close(head.position.y, 1.6);
    assert_close(head.position.z, 2.0);
    assert_eq!(renderer.cameras().rig_pose(), head);
}

#[test]
fn update_time_follows_the_clock() {
    let clock = ManualClock::new();
    let (renderer, _state, body) = mock_renderer();
    let mut renderer = renderer.with_clock(Box::new(clock.clone()));

    run_frame(&mut renderer, &body);
    assert_eq!(renderer.update_time(), 0.0);
    clock.advance(Duration::from_millis(11));
    run_frame(&mut renderer, &body);
    assert!((renderer.update_time() - 0.011).abs() < 1e-9);
}

#[test]
fn debug_hud_cycles_through_runtime_modes() {
    let (mut renderer, state, _body) = mock_renderer();
    assert_eq!(renderer.cycle_debug_hud(), 1);
    assert_eq!(renderer.cycle_debug_hud(), 2);
    assert_eq!(renderer.cycle_debug_hud(), 0);
    assert_eq!(state.lock().perf_hud_mode, 0);
}

#[test]
fn clip_planes_and_debug_view_are_adjustable() {
    let (mut renderer, _state, body) = mock_renderer();
    renderer.set_near_clipping_distance(0.1);
    renderer.set_far_clipping_distance(100.0);
    assert_close(renderer.cameras().near_clipping_distance(), 0.1);
    assert_close(renderer.cameras().far_clipping_distance(), 100.0);

    run_frame(&mut renderer, &body);
    for projection in renderer.engine().projections[0].iter() {
        assert_close(projection[10], -100.1 / 99.9);
        assert_close(projection[14], -20.0 / 99.9);
    }

    renderer.show_debug(DebugMode::RawBuffer);
    assert_eq!(renderer.debug_mode(), DebugMode::RawBuffer);
    assert_eq!(renderer.engine().debug_views.last(), Some(&DebugMode::RawBuffer));
    renderer.debug_print();
}

#[test]
fn audio_hint_comes_from_the_runtime() {
    let (renderer, _state, _body) = mock_renderer();
    assert_eq!(renderer.audio_device_hint(), Some("Mock Headset Audio".to_owned()));
}

#[test]
fn manager_hands_out_the_mock_runtime() {
    let mut manager = VRRuntimeManager::new();
    manager.register_defaults(&RendererSettings::default());
    manager.register_mock();

    let runtime = manager.create_runtime(&[VRRuntimeKind::Mock, VRRuntimeKind::Headless]).unwrap();
    assert_eq!(runtime.kind(), VRRuntimeKind::Mock);
}
