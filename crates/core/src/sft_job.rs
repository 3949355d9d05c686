//! The validated fine-tuning job configuration and its submission lifecycle.

use serde::{Deserialize, Serialize};

use crate::catalog::ModelOption;
use crate::error::CoreError;

/// A validated supervised fine-tuning job configuration.
///
/// Instances only exist after a full validation pass: every field except
/// `job_id` is known to satisfy its constraints. Serialized field names
/// match the form keys (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SftJobConfig {
    /// Deployed function the fine-tune targets.
    pub function: String,

    /// Metric used to curate training data; belongs to `function`.
    pub metric: String,

    /// Base model to fine-tune.
    pub model: ModelOption,

    /// Prompt/variant template to fine-tune from.
    pub variant: String,

    /// Fraction of data reserved for validation, in `[0, 100]`.
    pub validation_split_percent: f64,

    /// Upper bound on training examples drawn from the dataset, `>= 1`.
    pub max_samples: u64,

    /// Metric acceptance threshold for curating examples. Always finite;
    /// sign and range are owned by the metric's semantics.
    pub threshold: f64,

    /// Empty until the job-creation call assigns one.
    #[serde(default)]
    pub job_id: String,
}

impl SftJobConfig {
    /// Whether a job has been created from this configuration.
    pub fn is_submitted(&self) -> bool {
        !self.job_id.is_empty()
    }

    /// Record the server-assigned job id.
    ///
    /// The id transitions exactly once, empty -> assigned. A second
    /// assignment or an empty id is a caller bug, not form input.
    pub fn assign_job_id(&mut self, job_id: &str) -> Result<(), CoreError> {
        if self.is_submitted() {
            return Err(CoreError::JobAlreadySubmitted(self.job_id.clone()));
        }
        if job_id.is_empty() {
            return Err(CoreError::Validation(
                "Job id must not be empty".to_string(),
            ));
        }
        self.job_id = job_id.to_string();
        Ok(())
    }
}
