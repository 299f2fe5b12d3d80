use crate::policy::SelectionPolicy;

/// Errors returned by target selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("unknown selection policy {0:?}")]
    UnknownPolicy(String),
    #[error("armor candidate {index} has no finite distance estimate")]
    MissingDistance { index: usize },
    #[error("fixed-digit policy needs a target digit")]
    MissingTargetDigit,
    #[error("{policy} needs digit recognition, which did not run on this frame")]
    DigitRecognitionUnavailable { policy: SelectionPolicy },
}
