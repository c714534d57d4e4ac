pub mod languages;
pub mod session;
pub mod errors;
pub mod capture_translate;

pub use languages::LanguageSelection;
pub use session::SessionSnapshot;
pub use errors::WorkflowError;
pub use capture_translate::CaptureTranslateWorkflow;
