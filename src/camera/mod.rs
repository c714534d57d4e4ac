pub mod interface;
pub mod upload;
pub mod file;
pub mod factory;

pub use interface::{CameraInterface, CaptureError, CaptureOptions, CapturedImage};
pub use factory::CameraFactory;
