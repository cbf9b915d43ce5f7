use thiserror::Error;

use tailorshop_core::DomainError;

pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that abort a whole report.
///
/// Everything at record level is absorbed into diagnostics instead.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A supplied collection (or the snapshot document) has the wrong shape.
    #[error("invalid input: `{collection}` must be {expected}, found {found}")]
    InvalidInput {
        collection: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to read snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ReportError {
    pub fn invalid_input(
        collection: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::InvalidInput {
            collection,
            expected,
            found,
        }
    }
}
