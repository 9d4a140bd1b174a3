use aws_sdk_ssoadmin::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Classified failure from a remote API call.
///
/// The SDK retries throttling and server faults internally (adaptive mode,
/// see [`crate::config`]); a `Transient` error here means that budget was
/// exhausted.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transient API failure (retries exhausted): {0}")]
    Transient(String),

    #[error("permanent API failure: {0}")]
    Permanent(String),
}

/// Outcome of an idempotent remote write.
///
/// "Already attached" on attach and "not found" on delete are not failures;
/// call sites get a variant to log instead of matching on error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The call changed remote state.
    Applied,
    /// Remote state already matched the desired state.
    NoChange,
}

const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "SlowDown",
];

const SERVER_FAULT_CODES: &[&str] = &[
    "InternalServerException",
    "InternalServiceError",
    "InternalFailure",
    "ServiceUnavailable",
    "ServiceUnavailableException",
];

/// Whether a service error code is a throttle or server fault, the class
/// the SDK retries and we classify as transient if it still escapes.
pub fn is_transient_code(code: &str) -> bool {
    THROTTLING_CODES.contains(&code) || SERVER_FAULT_CODES.contains(&code)
}

impl ApiError {
    /// Classify an SDK error from `operation` into the pipeline taxonomy.
    ///
    /// Dispatch, timeout, and response-level failures never carried a
    /// service verdict, so they count as transient; service errors split on
    /// their code.
    pub fn from_sdk<E, R>(operation: &str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
                ApiError::Transient(format!("{operation}: {err}"))
            }
            SdkError::ServiceError(context) => {
                let code = context.err().code().unwrap_or("Unknown");
                let message = context.err().message().unwrap_or("no message");
                if is_transient_code(code) {
                    ApiError::Transient(format!("{operation}: {code}: {message}"))
                } else {
                    ApiError::Permanent(format!("{operation}: {code}: {message}"))
                }
            }
            _ => ApiError::Permanent(format!("{operation}: {err}")),
        }
    }
}
