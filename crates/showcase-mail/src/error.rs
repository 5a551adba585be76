use thiserror::Error;

/// Top-level error type for the `showcase-mail` crate.
///
/// `showcase-core` maps these into user-facing delivery failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Service ─────────────────────────────────────────────────────
    /// The EmailJS service answered with a non-2xx status.
    #[error("EmailJS rejected the message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Setup ───────────────────────────────────────────────────────
    /// Client could not be built from the supplied settings.
    #[error("Mail client misconfigured: {0}")]
    Configuration(String),
}

impl Error {
    /// Returns `true` if resubmitting the same message might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the failure came from the service.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
