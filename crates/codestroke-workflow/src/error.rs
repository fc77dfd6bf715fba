use thiserror::Error;

use codestroke_core::models::encounter::Stage;

use crate::transition::StageGateError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Gate(#[from] StageGateError),

    #[error("onset data is locked outside the onset stage")]
    OnsetLocked,

    #[error("imaging data is locked outside the imaging stage")]
    ImagingLocked,

    #[error("expected stage {expected:?}, currently {actual:?}")]
    WrongStage { expected: Stage, actual: Stage },

    #[error("stage {0:?} has not been reached yet")]
    StageNotReached(Stage),

    #[error("no eligibility review is open")]
    NoEligibilityDraft,

    #[error("no arrival time is set")]
    NoAnchor,

    #[error("order index {0} out of range")]
    NoSuchOrder(usize),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] codestroke_core::error::CoreError),

    #[error(transparent)]
    Eligibility(#[from] codestroke_eligibility::error::EligibilityError),

    #[error(transparent)]
    Storage(#[from] codestroke_storage::error::StorageError),

    #[error(transparent)]
    Export(#[from] codestroke_export::error::ExportError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
