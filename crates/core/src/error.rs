#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed catalog snapshot: {0}")]
    Catalog(String),

    #[error("Job already submitted with id {0}")]
    JobAlreadySubmitted(String),
}
