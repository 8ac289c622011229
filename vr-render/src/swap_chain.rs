use crate::engine::RenderEngine;
use vr_render_api::{
    TextureHandle, TrackingSpace, VRError, VREye, VRFieldOfView, VRInitError, VRInitResult, VRLayer, VRLayerEye,
    VRMirrorTextureId, VRPose, VRResult, VRRuntime, VRSwapChainDesc, VRSwapChainId, VRTextureSize, VRViewport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeBufferState {
    Uninitialized,
    // Runtime swap chain and engine render texture exist.
    Allocated,
    // The swap chain answered its first buffer query; frames may be committed.
    Ready,
}

#[derive(Debug, Clone)]
struct EyeBuffer {
    eye: VREye,
    state: EyeBufferState,
    size: VRTextureSize,
    swap_chain: Option<VRSwapChainId>,
    engine_texture: Option<TextureHandle>,
    committed_frame: Option<u64>,
}

impl EyeBuffer {
    fn new(eye: VREye) -> EyeBuffer {
        EyeBuffer {
            eye,
            state: EyeBufferState::Uninitialized,
            size: VRTextureSize::new(0, 0),
            swap_chain: None,
            engine_texture: None,
            committed_frame: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MirrorBuffer {
    id: VRMirrorTextureId,
    size: VRTextureSize,
    display_texture: TextureHandle,
}

/// Owns the per-eye (swap chain, engine texture) pairs and the mirror texture.
#[derive(Debug, Clone)]
pub struct SwapChainManager {
    eyes: [EyeBuffer; 2],
    mirror: Option<MirrorBuffer>,
}

impl Default for SwapChainManager {
    fn default() -> SwapChainManager {
        SwapChainManager::new()
    }
}

impl SwapChainManager {
    pub fn new() -> SwapChainManager {
        SwapChainManager {
            eyes: [EyeBuffer::new(VREye::Left), EyeBuffer::new(VREye::Right)],
            mirror: None,
        }
    }

    pub fn state(&self, eye: VREye) -> EyeBufferState {
        self.eyes[eye.index()].state
    }

    pub fn texture_size(&self, eye: VREye) -> VRTextureSize {
        self.eyes[eye.index()].size
    }

    pub fn swap_chain(&self, eye: VREye) -> Option<VRSwapChainId> {
        self.eyes[eye.index()].swap_chain
    }

    pub fn engine_texture(&self, eye: VREye) -> Option<TextureHandle> {
        self.eyes[eye.index()].engine_texture
    }

    /// First eye that already committed the given frame.
    pub fn committed_for(&self, frame_index: u64) -> Option<VREye> {
        self.eyes
            .iter()
            .find(|buffer| buffer.committed_frame == Some(frame_index))
            .map(|buffer| buffer.eye)
    }

    pub fn has_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn mirror_display_texture(&self) -> Option<TextureHandle> {
        self.mirror.map(|mirror| mirror.display_texture)
    }

    /// Allocates the render texture and the runtime swap chain of each eye.
    /// Sizes come from the runtime for each eye's own field of view.
    pub fn allocate(
        &mut self,
        runtime: &mut dyn VRRuntime,
        engine: &mut dyn RenderEngine,
        fovs: &[VRFieldOfView; 2],
    ) -> VRInitResult<()> {
        for buffer in self.eyes.iter_mut() {
            if buffer.state != EyeBufferState::Uninitialized {
                continue;
            }
            let eye = buffer.eye;
            let size = runtime.fov_texture_size(eye, &fovs[eye.index()]);
            if size.width == 0 || size.height == 0 {
                return Err(VRInitError::render(format!("runtime reported an empty {} eye texture", eye.name())));
            }

            let engine_texture = engine
                .create_render_texture(eye, size)
                .map_err(|e| VRInitError::render(format!("cannot create {} eye render texture: {}", eye.name(), e)))?;
            let desc = VRSwapChainDesc {
                eye,
                size,
                srgb: true,
                engine_texture,
            };
            let swap_chain = runtime.create_swap_chain(&desc)?;
            info!("{} eye swap chain {:?}: {}x{}", eye.name(), swap_chain, size.width, size.height);

            buffer.size = size;
            buffer.engine_texture = Some(engine_texture);
            buffer.swap_chain = Some(swap_chain);
            buffer.state = EyeBufferState::Allocated;
        }
        Ok(())
    }

    /// Checks every allocated swap chain can hand out its buffers, then marks it ready.
    pub fn make_ready(&mut self, runtime: &mut dyn VRRuntime) -> VRInitResult<()> {
        for buffer in self.eyes.iter_mut() {
            if buffer.state != EyeBufferState::Allocated {
                continue;
            }
            let chain = match buffer.swap_chain {
                Some(chain) => chain,
                None => continue,
            };
            let length = runtime
                .swap_chain_length(chain)
                .map_err(|e| VRInitError::render(format!("{} eye swap chain: {}", buffer.eye.name(), e)))?;
            for index in 0..length {
                runtime
                    .swap_chain_buffer(chain, index)
                    .map_err(|e| VRInitError::render(format!("{} eye swap chain buffer {}: {}", buffer.eye.name(), index, e)))?;
            }
            buffer.state = EyeBufferState::Ready;
        }
        Ok(())
    }

    /// Allocates the mirror texture at the headset's native resolution, and the
    /// engine texture it gets copied into.
    pub fn allocate_mirror(
        &mut self,
        runtime: &mut dyn VRRuntime,
        engine: &mut dyn RenderEngine,
        size: VRTextureSize,
    ) -> VRInitResult<()> {
        if self.mirror.is_some() {
            return Ok(());
        }
        let display_texture = engine
            .create_display_texture("MirrorTex", size)
            .map_err(|e| VRInitError::render(format!("cannot create mirror display texture: {}", e)))?;
        let id = runtime.create_mirror_texture(size)?;
        info!("Mirror texture {:?}: {}x{}", id, size.width, size.height);
        self.mirror = Some(MirrorBuffer {
            id,
            size,
            display_texture,
        });
        Ok(())
    }

    /// Copies the eye's engine render into the swap chain buffer the runtime
    /// wants this frame, then commits. Exactly once per eye per frame.
    pub fn copy_and_commit(
        &mut self,
        eye: VREye,
        frame_index: u64,
        runtime: &mut dyn VRRuntime,
        engine: &mut dyn RenderEngine,
    ) -> VRResult<()> {
        let buffer = &mut self.eyes[eye.index()];
        if buffer.state != EyeBufferState::Ready {
            return Err(VRError::BufferNotReady(eye.name()));
        }
        if buffer.committed_frame == Some(frame_index) {
            return Err(VRError::DoubleCommit {
                eye: eye.name(),
                frame_index,
            });
        }
        let (chain, source) = match (buffer.swap_chain, buffer.engine_texture) {
            (Some(chain), Some(source)) => (chain, source),
            _ => return Err(VRError::BufferNotReady(eye.name())),
        };

        let index = runtime.swap_chain_current_index(chain)?;
        let destination = runtime.swap_chain_buffer(chain, index)?;
        if destination != source {
            engine.copy_texture(source, destination, buffer.size);
        }
        runtime.commit_swap_chain(chain)?;
        buffer.committed_frame = Some(frame_index);
        Ok(())
    }

    pub fn copy_mirror(&mut self, runtime: &mut dyn VRRuntime, engine: &mut dyn RenderEngine) -> VRResult<()> {
        if let Some(mirror) = self.mirror {
            let source = runtime.mirror_texture_buffer(mirror.id)?;
            engine.copy_texture(source, mirror.display_texture, mirror.size);
        }
        Ok(())
    }

    /// Stereo layer for the frame: both swap chains, their viewports, FOVs and render poses.
    pub fn layer(
        &self,
        fovs: &[VRFieldOfView; 2],
        render_poses: &[VRPose<TrackingSpace>; 2],
        display_time: f64,
        frame_index: u64,
    ) -> VRResult<VRLayer> {
        let eye_layer = |eye: VREye| -> VRResult<VRLayerEye> {
            let buffer = &self.eyes[eye.index()];
            let swap_chain = buffer.swap_chain.ok_or(VRError::BufferNotReady(eye.name()))?;
            Ok(VRLayerEye {
                swap_chain,
                texture_size: buffer.size,
                viewport: VRViewport::covering(buffer.size),
                field_of_view: fovs[eye.index()],
                render_pose: render_poses[eye.index()],
            })
        };
        Ok(VRLayer {
            eyes: [eye_layer(VREye::Left)?, eye_layer(VREye::Right)?],
            sensor_sample_time: display_time,
            frame_index,
        })
    }

    /// Releases every runtime-owned resource. Failures are logged, release goes on.
    pub fn release(&mut self, runtime: &mut dyn VRRuntime) {
        for buffer in self.eyes.iter_mut() {
            if let Some(chain) = buffer.swap_chain.take() {
                match runtime.destroy_swap_chain(chain) {
                    Ok(()) => debug!("Released {} eye swap chain", buffer.eye.name()),
                    Err(e) => error!("Failed to release {} eye swap chain: {}", buffer.eye.name(), e),
                }
            }
            buffer.engine_texture = None;
            buffer.committed_frame = None;
            buffer.state = EyeBufferState::Uninitialized;
        }
        if let Some(mirror) = self.mirror.take() {
            match runtime.destroy_mirror_texture(mirror.id) {
                Ok(()) => debug!("Released mirror texture"),
                Err(e) => error!("Failed to release mirror texture: {}", e),
            }
        }
    }
}
