//! Error types.
//!
//! - [`AppError`] is the process-level error: it carries the exit code `main` returns.
//! - [`FetchError`] is the typed failure of a single provider fetch. The render
//!   pass collapses it into an empty series plus a diagnostic, but tests and
//!   callers can still match on the cause.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors that can occur while fetching or normalizing a provider series.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// No FRED API key was configured.
    #[error("missing FRED API key (set FRED_API_KEY or pass --fred-api-key)")]
    MissingApiKey,
    /// Building the client, connecting, or reading the body failed.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),
    /// The payload was not the JSON shape we expect.
    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
    /// An observation date could not be parsed.
    #[error("invalid observation date '{0}'")]
    InvalidDate(String),
    /// A record's month field could not be parsed.
    #[error("record {index}: invalid month '{value}'")]
    InvalidMonth { index: usize, value: String },
    /// A tonnage field was present but not numeric.
    #[error("record {index}: invalid {field} '{value}'")]
    InvalidTonnage {
        index: usize,
        field: &'static str,
        value: String,
    },
    /// A required tonnage field was absent or null.
    #[error("record {index}: missing {field}")]
    MissingField { index: usize, field: &'static str },
}
