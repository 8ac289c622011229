mod runtime;

pub use self::runtime::OpenVRRuntime;
use vr_render_api::{VRInitResult, VRRuntime, VRRuntimeCreator, VRRuntimeKind};

pub struct OpenVRRuntimeCreator {
    haptic_pulse_us: u16,
}

impl OpenVRRuntimeCreator {
    pub fn new(haptic_pulse_us: u16) -> Box<dyn VRRuntimeCreator> {
        Box::new(OpenVRRuntimeCreator { haptic_pulse_us })
    }
}

impl VRRuntimeCreator for OpenVRRuntimeCreator {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::OpenVR
    }

    fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>> {
        let runtime = OpenVRRuntime::new(self.haptic_pulse_us)?;
        Ok(Box::new(runtime))
    }
}
