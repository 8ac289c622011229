use crate::VREye;
use euclid::default::Size2D;

/// Size of a texture in pixels.
pub type VRTextureSize = Size2D<u32>;

/// Opaque handle to a GPU texture (an OpenGL texture name for the GL backends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct TextureHandle(pub u32);

/// Identifies a runtime-owned swap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRSwapChainId(pub u32);

/// Identifies a runtime-owned mirror texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRMirrorTextureId(pub u32);

/// Describes the swap chain requested for one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRSwapChainDesc {
    pub eye: VREye,

    pub size: VRTextureSize,

    // sRGB color buffers.
    pub srgb: bool,

    /// Engine texture the eye is rendered into. Runtimes without their own
    /// swap chains (OpenVR) present this texture directly.
    pub engine_texture: TextureHandle,
}

/// The 2D rectangle that should be used to project the 3D scene
/// to the position of the eye camera. Measured in texture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRViewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl VRViewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    // Viewport covering a whole texture.
    pub fn covering(size: VRTextureSize) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    // Normalized bounds [u_min, v_min, u_max, v_max] inside a texture of the given size.
    pub fn uv_bounds(&self, size: VRTextureSize) -> [f32; 4] {
        if size.width == 0 || size.height == 0 {
            return [0.0, 0.0, 1.0, 1.0];
        }
        let w = size.width as f32;
        let h = size.height as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x + self.width) as f32 / w,
            (self.y + self.height) as f32 / h,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_maps_to_unit_bounds() {
        let size = VRTextureSize::new(1344, 1600);
        let viewport = VRViewport::covering(size);
        assert_eq!(viewport.uv_bounds(size), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn half_viewport_bounds() {
        let size = VRTextureSize::new(200, 100);
        let viewport = VRViewport::new(100, 0, 100, 100);
        assert_eq!(viewport.uv_bounds(size), [0.5, 0.0, 1.0, 1.0]);
    }
}
