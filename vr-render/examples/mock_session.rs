// Runs a short session against the scripted mock headset and logs what the
// renderer does each frame.
//
// cargo run -p vr-render --example mock_session [settings.json]

#[macro_use]
extern crate log;

use std::env;
use vr_render::api::layouts::OVR_BUTTON_A;
use vr_render::api::MockRuntimeCreator;
use vr_render::camera_rig::StereoCameraRig;
use vr_render::engine::{RenderEngine, RenderView, StaticBody};
use vr_render::logging::init_logging;
use vr_render::settings::load_settings_or_default;
use vr_render::utils;
use vr_render::{MockVRControlMsg, TextureHandle, VREvent, VREye, VRHand, VRRenderer, VRResult, VRTextureSize};

struct LoggingEngine {
    frames: u32,
}

impl RenderEngine for LoggingEngine {
    fn handle_window_messages(&mut self) {}

    fn is_window_visible(&self) -> bool {
        true
    }

    fn create_render_texture(&mut self, eye: VREye, size: VRTextureSize) -> VRResult<TextureHandle> {
        info!("Render texture for the {} eye: {}x{}", eye.name(), size.width, size.height);
        Ok(TextureHandle(utils::new_id()))
    }

    fn create_display_texture(&mut self, name: &str, size: VRTextureSize) -> VRResult<TextureHandle> {
        info!("Display texture {}: {}x{}", name, size.width, size.height);
        Ok(TextureHandle(utils::new_id()))
    }

    fn copy_texture(&mut self, _source: TextureHandle, _destination: TextureHandle, _size: VRTextureSize) {}

    fn render_one_frame(&mut self, cameras: &StereoCameraRig, view: RenderView) {
        self.frames += 1;
        debug!("{:?} frame {} at {:?}", view, self.frames, cameras.rig_pose().position_array());
        if view == RenderView::Stereo {
            trace!("Left projection: {:?}", cameras.eye(VREye::Left).frustum.projection_matrix());
        }
    }

    fn set_hand_visible(&mut self, hand: VRHand, visible: bool) {
        info!("{} hand visible: {}", hand.name(), visible);
    }
}

fn main() {
    init_logging();

    let settings = match env::args().nth(1) {
        Some(path) => load_settings_or_default(path),
        None => Default::default(),
    };

    let (runtime, remote) = MockRuntimeCreator::new_runtime_with_remote();
    let mut body = StaticBody::default();
    let mut renderer = match VRRenderer::new(runtime, LoggingEngine { frames: 0 }, settings, &mut body) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    for frame in 0..10 {
        match frame {
            3 => {
                let _ = remote.send(MockVRControlMsg::SetButtons(VRHand::Right, OVR_BUTTON_A));
            }
            5 => {
                let _ = remote.send(MockVRControlMsg::SetIpd(0.07));
            }
            7 => {
                let _ = remote.send(MockVRControlMsg::PushEvent(VREvent::Quit));
            }
            _ => {}
        }

        renderer.update_tracking(&body);
        if let Err(e) = renderer.render_and_submit_frame() {
            error!("Frame {} failed: {}", frame, e);
        }
        if let Some(controller) = renderer.controller(VRHand::Right) {
            if !controller.pressed().is_empty() {
                info!("Right buttons pressed: {:?}", controller.pressed());
            }
        }
        if renderer.should_quit() {
            info!("Quit requested after frame {}", renderer.frame_index());
            break;
        }
    }

    renderer.debug_print();
    info!("Audio device: {:?}", renderer.audio_device_hint());
}
