mod runtime;

pub use self::runtime::{MockCallCounters, MockSwapChain, MockVRRuntime, MockVRState, MockVRStateHandle};
use std::sync::mpsc::{channel, Sender};
use vr_render_api::{MockVRControlMsg, VRInitResult, VRRuntime, VRRuntimeCreator, VRRuntimeKind};

pub struct MockRuntimeCreator;

impl MockRuntimeCreator {
    pub fn new() -> Box<dyn VRRuntimeCreator> {
        Box::new(MockRuntimeCreator)
    }

    // Runtime scripted through a channel. Messages are applied on the runtime's next call.
    pub fn new_runtime_with_remote() -> (Box<dyn VRRuntime>, Sender<MockVRControlMsg>) {
        let (send, rcv) = channel();
        let runtime = MockVRRuntime::new_with_receiver(rcv);
        (Box::new(runtime), send)
    }
}

impl VRRuntimeCreator for MockRuntimeCreator {
    fn kind(&self) -> VRRuntimeKind {
        VRRuntimeKind::Mock
    }

    fn create_runtime(&self) -> VRInitResult<Box<dyn VRRuntime>> {
        Ok(Box::new(MockVRRuntime::new()))
    }
}
