use vr_render_api::{VRRuntime, VRSessionStatus};

/// Session status cache keyed by frame index.
///
/// The runtime is queried at most once per frame index; later lookups for the
/// same frame return the cached flags. A failed query keeps the previous flags.
#[derive(Debug, Clone, Default)]
pub struct SessionStatusCache {
    status: VRSessionStatus,
    frame_index: Option<u64>,
    queries: u64,
}

impl SessionStatusCache {
    pub fn new() -> SessionStatusCache {
        SessionStatusCache::default()
    }

    pub fn get(&mut self, frame_index: u64, runtime: &mut dyn VRRuntime) -> VRSessionStatus {
        if self.frame_index != Some(frame_index) {
            self.queries += 1;
            match runtime.session_status() {
                Ok(status) => self.status = status,
                Err(e) => warn!("Session status query failed for frame {}: {}", frame_index, e),
            }
            self.frame_index = Some(frame_index);
        }
        self.status
    }

    // Number of underlying runtime queries so far.
    pub fn query_count(&self) -> u64 {
        self.queries
    }
}
