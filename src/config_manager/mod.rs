pub mod main;
pub mod system;
pub mod capture;
pub mod services;
pub mod utils;

pub use main::Config;
pub use capture::CaptureConfig;
pub use services::{TranslateConfig, VisionConfig};
