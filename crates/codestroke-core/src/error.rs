use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("time arithmetic error: {0}")]
    Time(#[from] jiff::Error),

    #[error("unknown milestone: {0}")]
    UnknownMilestone(String),
}
