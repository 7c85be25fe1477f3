//! Error types for action execution.

use thiserror::Error;
use vantage_api_models::ValidationErrors;

/// Primary error type for action invocation.
///
/// Unlike the behaviour this component was modelled on, nothing here is
/// swallowed: server errors and transport failures are surfaced to the caller
/// alongside the user-facing notification.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The endpoint rejected the request with field validation errors.
    #[error("action request failed validation")]
    Validation {
        /// Field-keyed messages decoded from the 4xx body.
        errors: ValidationErrors,
    },
    /// The endpoint answered with a non-validation error status.
    #[error("action endpoint returned status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, text-decoded for diagnostics.
        body: String,
    },
    /// The request never produced a response.
    #[error("transport failure while executing action")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: anyhow::Error,
    },
    /// An invocation is already pending on this view.
    #[error("an action invocation is already in flight")]
    InFlight,
    /// No action key has been selected.
    #[error("no action is selected")]
    NoActionSelected,
    /// A response body could not be decoded into a known shape.
    #[error("action response could not be decoded")]
    MalformedResponse {
        /// Decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A terminal UI effect (download, navigation) failed.
    #[error("action side effect `{operation}` failed")]
    Effect {
        /// Name of the failed effect.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience alias for action operation results.
pub type ActionResult<T> = Result<T, ActionError>;
