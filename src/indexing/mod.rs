//! Search-engine indexing notifications (IndexNow protocol)

mod submitter;

pub use submitter::{FailedSubmission, IndexNowSubmitter, SubmissionReport, SubmissionStatus};

use thiserror::Error;

/// Request-level indexing faults; nothing is sent when one occurs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexingError {
    #[error("IndexNow API key is missing")]
    MissingApiKey,

    #[error("No URLs to submit")]
    EmptyBatch,

    #[error("URLs span multiple hosts: {}", .hosts.join(", "))]
    MixedHosts { hosts: Vec<String> },

    #[error("Invalid indexing endpoint: {0}")]
    InvalidEndpoint(String),
}
