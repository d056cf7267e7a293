//! Error types for schedule computation and financing submission.

use thiserror::Error;

/// Input-validation failures raised before any schedule is computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmortizationError {
    /// A request field is out of its accepted range.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Name of the offending request field.
        field: &'static str,
        /// Human readable explanation, suitable for a form-field error.
        reason: String,
    },

    /// The amortization system selector is not PRICE or SAC.
    #[error("unsupported amortization system: {0:?}")]
    UnsupportedAmortizationSystem(String),
}

impl AmortizationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures of the financing submission flow.
#[derive(Debug, Error)]
pub enum FinancingError {
    #[error(transparent)]
    Validation(#[from] AmortizationError),

    /// The external financing API rejected or failed the request.
    #[error(transparent)]
    Gateway(#[from] anyhow::Error),
}
