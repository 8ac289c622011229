#![allow(dead_code)]

use vr_render::camera_rig::StereoCameraRig;
use vr_render::engine::{DebugMode, RenderEngine, RenderView};
use vr_render::utils;
use vr_render::{HeadSpace, TextureHandle, VREye, VRHand, VRPose, VRResult, VRTextureSize};

/// Engine stand-in that records every call the renderer makes.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub window_visible: bool,
    pub window_closed: bool,
    pub messages_handled: u32,
    pub renders: Vec<RenderView>,
    // Local eye camera poses seen by each stereo render.
    pub eye_poses: Vec<[VRPose<HeadSpace>; 2]>,
    pub projections: Vec<[[f32; 16]; 2]>,
    pub render_textures: Vec<(VREye, VRTextureSize, TextureHandle)>,
    pub display_textures: Vec<(String, VRTextureSize)>,
    pub copies: Vec<(TextureHandle, TextureHandle)>,
    pub debug_views: Vec<DebugMode>,
    pub hand_visibility: Vec<(VRHand, bool)>,
}

impl RecordingEngine {
    pub fn new() -> RecordingEngine {
        RecordingEngine {
            window_visible: true,
            ..RecordingEngine::default()
        }
    }
}

impl RenderEngine for RecordingEngine {
    fn handle_window_messages(&mut self) {
        self.messages_handled += 1;
    }

    fn is_window_visible(&self) -> bool {
        self.window_visible
    }

    fn is_window_closed(&self) -> bool {
        self.window_closed
    }

    fn create_render_texture(&mut self, eye: VREye, size: VRTextureSize) -> VRResult<TextureHandle> {
        let texture = TextureHandle(utils::new_id());
        self.render_textures.push((eye, size, texture));
        Ok(texture)
    }

    fn create_display_texture(&mut self, name: &str, size: VRTextureSize) -> VRResult<TextureHandle> {
        self.display_textures.push((name.to_owned(), size));
        Ok(TextureHandle(utils::new_id()))
    }

    fn copy_texture(&mut self, source: TextureHandle, destination: TextureHandle, _size: VRTextureSize) {
        self.copies.push((source, destination));
    }

    fn render_one_frame(&mut self, cameras: &StereoCameraRig, view: RenderView) {
        self.renders.push(view);
        if view == RenderView::Stereo {
            self.eye_poses
                .push([cameras.eye(VREye::Left).local_pose(), cameras.eye(VREye::Right).local_pose()]);
            self.projections.push([
                cameras.eye(VREye::Left).frustum.projection_matrix(),
                cameras.eye(VREye::Right).frustum.projection_matrix(),
            ]);
        }
    }

    fn show_debug_view(&mut self, mode: DebugMode) {
        self.debug_views.push(mode);
    }

    fn set_hand_visible(&mut self, hand: VRHand, visible: bool) {
        self.hand_visibility.push((hand, visible));
    }
}
