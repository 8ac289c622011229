mod runtime;

pub use self::runtime::HeadlessVRRuntime;
use vr_render_api::{VRInitResult, VRRuntime, VRRuntimeCreator, VRRuntimeKind};

pub struct HeadlessRuntimeCreator;

impl HeadlessRuntimeCreator {
    pub fn new() -> Box<dyn VRRuntimeCreator> {
        Box::new(HeadlessRuntimeCreator)
    }
}

impl VRRuntimeCreator for HeadlessRuntimeCreator {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Headless
    }

    // Always succeeds: the fallback when no headset is plugged in.
    fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>> {
        Ok(Box::new(HeadlessVRRuntime::new()))
    }
}
