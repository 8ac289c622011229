use crate::{TrackingSpace, VRFieldOfView, VRPose, VRSwapChainId, VRTextureSize, VRViewport};

// Per-eye part of a stereo layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRLayerEye {
    pub swap_chain: VRSwapChainId,

    // Size of the texture behind the swap chain.
    pub texture_size: VRTextureSize,

    // Region of the swap chain texture holding the eye image.
    pub viewport: VRViewport,

    pub field_of_view: VRFieldOfView,

    // Eye pose the image was rendered with.
    pub render_pose: VRPose<TrackingSpace>,
}

// Stereo eye-FOV layer handed to the compositor at the end of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct VRLayer {
    // Indexed by VREye::index().
    pub eyes: [VRLayerEye; 2],

    // Display time the render poses were predicted for.
    pub sensor_sample_time: f64,

    // Frame index the layer belongs to.
    pub frame_index: u64,
}
