use thiserror::Error;

use super::session::SessionState;

/// Misuse of the workflow; endpoint and camera failures are recorded in the
/// session instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("A request is already outstanding (state: {0:?})")]
    Busy(SessionState),

    #[error("No detected text to translate")]
    NoDetectedText,

    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),
}
