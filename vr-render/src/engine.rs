use crate::camera_rig::StereoCameraRig;
use crate::coordinates::BodyTransform;
use vr_render_api::{TextureHandle, VREye, VRHand, VRResult, VRTextureSize};

pub const DEFAULT_EYE_HEIGHT: f32 = 1.65;

/// What the desktop window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugMode {
    // Both eye render textures side by side.
    RawBuffer,
    // The runtime's mirror texture.
    HmdMirror,
    // The monoscopic camera.
    Monoscopic,
}

impl Default for DebugMode {
    fn default() -> DebugMode {
        DebugMode::HmdMirror
    }
}

/// Which cameras a frame is rendered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderView {
    // Both eye cameras into their render textures.
    Stereo,
    // The monoscopic camera into the window.
    Monoscopic,
}

/// The 3D engine the renderer drives. The engine owns the scene, the window
/// and every engine-side texture.
pub trait RenderEngine {
    /// Pumps the window's message queue.
    fn handle_window_messages(&mut self);

    fn is_window_visible(&self) -> bool;

    fn is_window_closed(&self) -> bool {
        false
    }

    // Width / height of the window.
    fn window_aspect(&self) -> f32 {
        16.0 / 9.0
    }

    /// Creates the render target an eye camera renders into.
    fn create_render_texture(&mut self, eye: VREye, size: VRTextureSize) -> VRResult<TextureHandle>;

    /// Creates a texture that can be shown in the window.
    fn create_display_texture(&mut self, name: &str, size: VRTextureSize) -> VRResult<TextureHandle>;

    fn copy_texture(&mut self, source: TextureHandle, destination: TextureHandle, size: VRTextureSize);

    /// Renders the scene once through the cameras of `view`.
    fn render_one_frame(&mut self, cameras: &StereoCameraRig, view: RenderView);

    fn show_debug_view(&mut self, _mode: DebugMode) {}

    fn set_hand_visible(&mut self, _hand: VRHand, _visible: bool) {}
}

/// The player's body in the world. Tracking poses are placed relative to it.
pub trait PlayerBody {
    fn body_transform(&self) -> BodyTransform;

    fn eye_height(&self) -> f32 {
        DEFAULT_EYE_HEIGHT
    }

    fn set_eye_height(&mut self, _height: f32) {}
}

/// Body standing still at a fixed place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    pub transform: BodyTransform,
    pub eye_height: f32,
}

impl Default for StaticBody {
    fn default() -> StaticBody {
        StaticBody {
            transform: BodyTransform::default(),
            eye_height: DEFAULT_EYE_HEIGHT,
        }
    }
}

impl PlayerBody for StaticBody {
    fn body_transform(&self) -> BodyTransform {
        self.transform
    }

    fn eye_height(&self) -> f32 {
        self.eye_height
    }

    fn set_eye_height(&mut self, height: f32) {
        self.eye_height = height;
    }
}
