mod common;

use common::RecordingEngine;
use vr_render::api::HeadlessVRRuntime;
use vr_render::coordinates::BodyTransform;
use vr_render::engine::{RenderView, StaticBody, DEFAULT_EYE_HEIGHT};
use vr_render::settings::RendererSettings;
use vr_render::{VRHand, VRRenderer, VRRuntimeKind, VRRuntimeManager};

fn headless_renderer(eye_height: f32) -> (VRRenderer<RecordingEngine>, StaticBody) {
    let mut body = StaticBody::default();
    let renderer = VRRenderer::new(
        Box::new(HeadlessVRRuntime::with_eye_height(eye_height)),
        RecordingEngine::new(),
        RendererSettings::default(),
        &mut body,
    )
    .unwrap();
    (renderer, body)
}

#[test]
fn renders_monoscopic_without_buffers() {
    let (mut renderer, body) = headless_renderer(DEFAULT_EYE_HEIGHT);
    assert!(renderer.engine().render_textures.is_empty());
    assert!(renderer.engine().display_textures.is_empty());

    for _ in 0..2 {
        renderer.update_tracking(&body);
        renderer.render_and_submit_frame().unwrap();
    }
    assert_eq!(renderer.engine().renders, vec![RenderView::Monoscopic, RenderView::Monoscopic]);
    assert!(renderer.engine().copies.is_empty());
    assert!(renderer.controller(VRHand::Left).is_none());
    assert!(!renderer.should_quit());
}

#[test]
fn head_rests_at_eye_height_above_the_feet() {
    let (mut renderer, mut body) = headless_renderer(1.8);
    assert!((body.eye_height - 1.8).abs() < 1e-6);

    body.transform = BodyTransform::from_yaw(euclid::Vector3D::new(2.0, 0.5, -1.0), euclid::Angle::radians(0.0));
    renderer.update_tracking(&body);

    let head = renderer.head_pose();
    assert!((head.position.x - 2.0).abs() < 1e-5);
    assert!((head.position.y - 2.3).abs() < 1e-5);
    assert!((head.position.z + 1.0).abs() < 1e-5);
}

#[test]
fn closed_window_requests_quit() {
    let (mut renderer, body) = headless_renderer(DEFAULT_EYE_HEIGHT);
    renderer.engine_mut().window_closed = true;
    renderer.update_tracking(&body);
    renderer.render_and_submit_frame().unwrap();

    assert!(renderer.engine().renders.is_empty());
    assert!(renderer.should_quit());
}

#[test]
fn default_runtimes_fall_back_to_headless() {
    let mut manager = VRRuntimeManager::new();
    manager.register_defaults(&RendererSettings::default());

    // Only the headless runtime can start on a machine without a headset.
    let runtime = manager.create_runtime(&[VRRuntimeKind::Headless]).unwrap();
    assert_eq!(runtime.kind(), VRRuntimeKind::Headless);
    assert!(!runtime.capabilities().can_present);
}
