pub mod layouts;

mod headless;
pub use self::headless::{HeadlessRuntimeCreator, HeadlessVRRuntime};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use self::mock::{MockCallCounters, MockRuntimeCreator, MockSwapChain, MockVRRuntime, MockVRState, MockVRStateHandle};

#[cfg(feature = "openvr")]
mod openvr;
#[cfg(feature = "openvr")]
pub use self::openvr::{OpenVRRuntime, OpenVRRuntimeCreator};

#[cfg(all(windows, feature = "oculusvr"))]
mod oculusvr;
#[cfg(all(windows, feature = "oculusvr"))]
pub use self::oculusvr::{OculusRuntime, OculusRuntimeCreator};
