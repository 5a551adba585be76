// ── Core error types ──
//
// User-facing errors from showcase-core. Consumers never see HTTP
// status codes from the mail transport directly; the
// `From<showcase_mail::Error>` impl folds them into `Delivery`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Carousel errors ──────────────────────────────────────────────
    /// Index outside `0..len`. The carousel state is left unchanged.
    #[error("Index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },

    #[error("Autoplay interval must be greater than zero")]
    InvalidInterval,

    // ── Contact errors ───────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("A message is already being sent")]
    SubmissionInProgress,

    #[error("Message could not be delivered: {message}")]
    Delivery {
        message: String,
        /// HTTP status code (if the service answered).
        status: Option<u16>,
    },

    // ── Content errors ───────────────────────────────────────────────
    #[error("Course catalog error: {message}")]
    Content { message: String },
}

impl CoreError {
    /// Returns `true` for errors caused by a bad index or interval.
    pub fn is_carousel_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::InvalidInterval)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<showcase_mail::Error> for CoreError {
    fn from(err: showcase_mail::Error) -> Self {
        let status = err.status();
        match err {
            showcase_mail::Error::Transport(ref e) if e.is_timeout() => CoreError::Delivery {
                message: "the mail service did not answer in time".into(),
                status,
            },
            showcase_mail::Error::Transport(ref e) if e.is_connect() => CoreError::Delivery {
                message: "cannot reach the mail service".into(),
                status,
            },
            showcase_mail::Error::Rejected { message, .. } => CoreError::Delivery { message, status },
            other => CoreError::Delivery {
                message: other.to_string(),
                status,
            },
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Content {
            message: err.to_string(),
        }
    }
}
