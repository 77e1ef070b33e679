use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("access denied")]
    AccessDenied,
    #[error("new folder requires a benefit type")]
    ManglerYtelse,
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("illegal state: {0}")]
    IllegalState(String),
}
