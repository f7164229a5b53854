//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK.  Its variants line up with the popup's error
//! taxonomy: bad configuration, non-2xx status, transport failure and
//! malformed response body.

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-2xx status.  4xx and 5xx are not
    /// distinguished.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request never produced an HTTP answer (connection refused,
    /// DNS failure, timeout) or the body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// The HTTP status code, for [`SdkError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_contains_code() {
        let err = SdkError::Status(503);
        assert_eq!(err.to_string(), "HTTP error! status: 503");
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn config_has_no_status() {
        let err = SdkError::Config("bad".into());
        assert_eq!(err.to_string(), "configuration error: bad");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn serialization_from_serde() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SdkError = inner.into();
        assert!(err.to_string().starts_with("unexpected response body:"));
    }
}
