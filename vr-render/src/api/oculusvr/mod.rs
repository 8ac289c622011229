mod binding;
mod library;
mod runtime;

pub use self::runtime::OculusRuntime;
use vr_render_api::{VRInitResult, VRRuntime, VRRuntimeCreator, VRRuntimeKind};

pub struct OculusRuntimeCreator;

impl OculusRuntimeCreator {
    pub fn new() -> Box<dyn VRRuntimeCreator> {
        Box::new(OculusRuntimeCreator)
    }
}

impl VRRuntimeCreator for OculusRuntimeCreator {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Oculus
    }

    fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>> {
        let runtime = OculusRuntime::new()?;
        Ok(Box::new(runtime))
    }
}
