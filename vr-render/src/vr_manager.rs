use crate::settings::RendererSettings;
use vr_render_api::{VRInitError, VRInitResult, VRRuntime, VRRuntimeCreator, VRRuntimeKind};

use crate::api::HeadlessRuntimeCreator;

#[cfg(feature = "openvr")]
use crate::api::OpenVRRuntimeCreator;

#[cfg(all(windows, feature = "oculusvr"))]
use crate::api::OculusRuntimeCreator;

#[cfg(feature = "mock")]
use crate::api::MockRuntimeCreator;

// Single entry point to every VR runtime backend
pub struct VRRuntimeManager {
    creators: Vec<Box<dyn VRRuntimeCreator>>,
}

impl Default for VRRuntimeManager {
    fn default() -> VRRuntimeManager {
        VRRuntimeManager::new()
    }
}

impl VRRuntimeManager {
    pub fn new() -> VRRuntimeManager {
        VRRuntimeManager { creators: Vec::new() }
    }

    // Register default VR runtimes specified in crate's features
    #[cfg_attr(not(feature = "openvr"), allow(unused_variables))]
    pub fn register_defaults(&mut self, settings: &RendererSettings) {
        let creators: Vec<Box<dyn VRRuntimeCreator>> = vec![
            #[cfg(all(windows, feature = "oculusvr"))]
            OculusRuntimeCreator::new(),
            #[cfg(feature = "openvr")]
            OpenVRRuntimeCreator::new(settings.openvr_haptic_pulse_us),
            HeadlessRuntimeCreator::new(),
        ];

        for creator in creators {
            self.register(creator);
        }
    }

    // Register mock VR runtime
    // Useful for testing
    #[cfg(feature = "mock")]
    pub fn register_mock(&mut self) {
        self.register(MockRuntimeCreator::new());
    }

    // Register a new VR runtime. A later registration of the same kind replaces the earlier one.
    pub fn register(&mut self, creator: Box<dyn VRRuntimeCreator>) {
        let kind = creator.kind();
        self.creators.retain(|c| c.kind() != kind);
        self.creators.push(creator);
    }

    pub fn is_registered(&self, kind: VRRuntimeKind) -> bool {
        self.creators.iter().any(|c| c.kind() == kind)
    }

    // Creates the first runtime of `preference` that initializes.
    // Failures of the runtimes tried before are logged.
    pub fn create_runtime(&self, preference: &[VRRuntimeKind]) -> VRInitResult<Box<dyn VRRuntime>> {
        let mut last_error = None;
        for kind in preference {
            let creator = match self.creators.iter().find(|c| c.kind() == *kind) {
                Some(creator) => creator,
                None => {
                    debug!("{} runtime not available in this build", kind.name());
                    continue;
                }
            };
            match creator.create_runtime() {
                Ok(runtime) => {
                    info!("Using {} runtime: {}", kind.name(), runtime.display_name());
                    return Ok(runtime);
                }
                Err(e) => {
                    error!("Error initializing {} runtime: {}", kind.name(), e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| VRInitError::no_hmd("no VR runtime available")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_render_api::VRErrorCode;

    struct FailingCreator(VRRuntimeKind);

    impl VRRuntimeCreator for FailingCreator {
        fn kind(&self) -> VRRuntimeKind {
            self.0
        }

        fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>> {
            Err(VRInitError::no_hmd("headset unplugged"))
        }
    }

    #[test]
    fn falls_back_to_next_runtime() {
        let mut manager = VRRuntimeManager::new();
        manager.register(Box::new(FailingCreator(VRRuntimeKind::Oculus)));
        manager.register(HeadlessRuntimeCreator::new());

        let runtime = manager
            .create_runtime(&[VRRuntimeKind::Oculus, VRRuntimeKind::OpenVR, VRRuntimeKind::Headless])
            .unwrap();
        assert_eq!(runtime.kind(), VRRuntimeKind::Headless);
    }

    #[test]
    fn reports_last_failure() {
        let mut manager = VRRuntimeManager::new();
        manager.register(Box::new(FailingCreator(VRRuntimeKind::Oculus)));

        let err = manager.create_runtime(&[VRRuntimeKind::Oculus]).err().unwrap();
        assert_eq!(err.code, VRErrorCode::NoHmd);
        assert_eq!(err.message, "headset unplugged");
    }

    #[test]
    fn empty_preference_has_no_runtime() {
        let mut manager = VRRuntimeManager::new();
        manager.register_defaults(&RendererSettings::default());
        let err = manager.create_runtime(&[]).err().unwrap();
        assert_eq!(err.code, VRErrorCode::NoHmd);
    }

    #[cfg(feature = "mock")]
    #[test]
    fn register_replaces_same_kind() {
        let mut manager = VRRuntimeManager::new();
        manager.register(Box::new(FailingCreator(VRRuntimeKind::Mock)));
        manager.register_mock();
        assert!(manager.is_registered(VRRuntimeKind::Mock));
        assert!(manager.create_runtime(&[VRRuntimeKind::Mock]).is_ok());
    }
}
