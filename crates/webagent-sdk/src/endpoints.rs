//! Canonical backend endpoint definitions.
//!
//! Every URL the popup calls **must** be built through [`Endpoints`], and
//! every route the mock backend serves uses the same path constants.  This
//! keeps clients and servers agreeing on a single table.
//!
//! # Route layout
//!
//! ```text
//! GET  {base}/health         ← liveness probe
//! POST {base}/ask            ← chat / agent query
//! POST {base}/send-email     ← send one email
//! POST {base}/fetch-emails   ← summarise unread emails
//! ```

use reqwest::Url;

use crate::error::SdkError;

/// Liveness probe.
pub const HEALTH_PATH: &str = "/health";
/// Chat / agent query.
pub const ASK_PATH: &str = "/ask";
/// Send one email.
pub const SEND_EMAIL_PATH: &str = "/send-email";
/// Summarise unread emails.
pub const FETCH_EMAILS_PATH: &str = "/fetch-emails";

/// Absolute URLs of every backend endpoint, derived from one base address.
///
/// # Examples
///
/// ```
/// use webagent_sdk::Endpoints;
///
/// let endpoints = Endpoints::new("http://localhost:8000/").unwrap();
/// assert_eq!(endpoints.base(), "http://localhost:8000");
/// assert_eq!(endpoints.ask(), "http://localhost:8000/ask");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Validate `base_url` and strip any trailing `/`.
    ///
    /// # Errors
    ///
    /// [`SdkError::Config`] if the URL is empty, unparsable, or not
    /// `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(SdkError::Config("backend URL must not be empty".into()));
        }

        let parsed = Url::parse(base)
            .map_err(|e| SdkError::Config(format!("invalid backend URL \"{base}\": {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdkError::Config(format!(
                "backend URL \"{base}\" must use http or https"
            )));
        }

        Ok(Self {
            base: base.to_string(),
        })
    }

    /// Base address without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET /health`.
    pub fn health(&self) -> String {
        self.join(HEALTH_PATH)
    }

    /// `POST /ask`.
    pub fn ask(&self) -> String {
        self.join(ASK_PATH)
    }

    /// `POST /send-email`.
    pub fn send_email(&self) -> String {
        self.join(SEND_EMAIL_PATH)
    }

    /// `POST /fetch-emails`.
    pub fn fetch_emails(&self) -> String {
        self.join(FETCH_EMAILS_PATH)
    }

    fn join(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}
