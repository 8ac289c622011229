#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod api;
pub mod camera_rig;
pub mod controller;
pub mod coordinates;
pub mod engine;
pub mod haptics;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod swap_chain;
mod vr_manager;

pub use vr_render_api::*;
pub use renderer::{FramePhase, VRRenderer};
pub use vr_manager::VRRuntimeManager;
