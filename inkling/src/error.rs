//! Error types for the inkling library.
//!
//! [`GenAiError`] covers failure modes when communicating with the generative
//! service (authentication, rate limiting, network issues, etc.), and
//! [`AudioError`] covers audio decoding failures. Both integrate into the
//! crate-level [`Error`] hierarchy.

/// Result type alias for inkling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the inkling library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Generative service error.
    #[error("generative service error: {0}")]
    GenAi(#[from] GenAiError),

    /// Audio decoding error.
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    /// Invalid image input.
    #[error("invalid image input: {0}")]
    Image(String),

    /// Audio playback error.
    #[error("playback error: {0}")]
    Playback(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an image input error with a message.
    #[must_use]
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Create a playback error with a message.
    #[must_use]
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }
}

/// Error type for generative service operations.
///
/// Each variant represents a distinct failure mode, enabling callers to
/// pattern-match on specific cases (e.g., retrying transient errors).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum GenAiError {
    /// Authentication or authorization failure.
    #[error("[{provider}] {message}")]
    Auth {
        /// Provider name (e.g., "gemini").
        provider: String,
        /// Error description.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("[{provider}] Rate limit exceeded. Please retry after some time.")]
    RateLimited {
        /// Provider name.
        provider: String,
    },

    /// Response format error.
    #[error("Expected {expected}, got {got}")]
    ResponseFormat {
        /// Expected format description.
        expected: String,
        /// Actual format received.
        got: String,
    },

    /// Network or connection error.
    #[error("{0}")]
    Network(String),

    /// HTTP status error.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider-specific error.
    #[error("[{provider}] {message}")]
    Provider {
        /// Provider name.
        provider: String,
        /// Error description.
        message: String,
        /// Optional error code from the provider.
        code: Option<String>,
    },

    /// Internal error.
    #[error("{0}")]
    Internal(String),
}

impl GenAiError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResponseFormat {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider-specific error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Create a provider error with an error code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a retryable error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }
}

impl From<reqwest::Error> for GenAiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error type for audio decoding operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum AudioError {
    /// Malformed base64 input.
    #[error("invalid base64 audio payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A channel count of zero has no meaningful interpretation.
    #[error("channel count must be positive")]
    ZeroChannels,

    /// A sample rate of zero has no meaningful interpretation.
    #[error("sample rate must be positive")]
    ZeroSampleRate,

    /// WAV encoding failure.
    #[error("WAV encoding failed: {0}")]
    Wav(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(GenAiError::rate_limited("gemini").is_retryable());
        assert!(GenAiError::network("connection reset").is_retryable());
        assert!(!GenAiError::auth("gemini", "bad key").is_retryable());
        assert!(!GenAiError::http_status(500, "boom").is_retryable());
    }

    #[test]
    fn error_display() {
        let err = GenAiError::auth("gemini", "API key is required");
        assert_eq!(err.to_string(), "[gemini] API key is required");

        let err = GenAiError::http_status(503, "unavailable");
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn wraps_into_crate_error() {
        let err: Error = GenAiError::internal("oops").into();
        assert!(matches!(err, Error::GenAi(_)));

        let err: Error = AudioError::ZeroChannels.into();
        assert!(matches!(err, Error::Audio(_)));
    }
}
