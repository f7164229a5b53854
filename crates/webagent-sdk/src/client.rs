//! HTTP client for the WebAgent backend.
//!
//! [`BackendClient`] wraps a `reqwest` client and exposes one typed method
//! per backend endpoint.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use webagent_models::AskRequest;
//! use webagent_sdk::{BackendClient, BackendConfig};
//!
//! # async fn run() -> Result<(), webagent_sdk::SdkError> {
//! let client = BackendClient::new(&BackendConfig::default())?;
//!
//! println!("{}", client.check_connection().await.label());
//! let reply = client.ask(&AskRequest { query: "capital of France?".into() }).await?;
//! println!("{}", reply.answer);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use webagent_models::{AskRequest, AskResponse, ConnectionStatus, MessageResponse, SendEmailRequest};

use crate::config::BackendConfig;
use crate::endpoints::{Endpoints, ASK_PATH, FETCH_EMAILS_PATH, HEALTH_PATH, SEND_EMAIL_PATH};
use crate::error::SdkError;

/// Upper bound for a single health probe, independent of the request
/// timeout, so a stuck backend is reported well before the next probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// A handle on the backend.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl BackendClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// [`SdkError::Config`] for an invalid base URL, [`SdkError::Http`] if
    /// the HTTP client cannot be initialised.
    pub fn new(config: &BackendConfig) -> Result<Self, SdkError> {
        let endpoints = Endpoints::new(&config.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoints,
        })
    }

    /// Endpoint table this client targets.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    /// `GET /health`.  Succeeds on any 2xx; the body is ignored.
    ///
    /// # Errors
    ///
    /// [`SdkError::Status`] for a non-2xx answer, [`SdkError::Http`] when
    /// the backend cannot be reached.
    pub async fn health(&self) -> Result<(), SdkError> {
        let res = self
            .http
            .get(self.endpoints.health())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SdkError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Probe `/health` and fold the outcome into a [`ConnectionStatus`].
    ///
    /// Never fails: every error becomes [`ConnectionStatus::Error`] or
    /// [`ConnectionStatus::Unreachable`].
    pub async fn check_connection(&self) -> ConnectionStatus {
        match self.health().await {
            Ok(()) => ConnectionStatus::Connected,
            Err(SdkError::Status(status)) => {
                warn!(endpoint = HEALTH_PATH, status, "backend unhealthy");
                ConnectionStatus::Error
            }
            Err(e) => {
                debug!(endpoint = HEALTH_PATH, error = %e, "backend unreachable");
                ConnectionStatus::Unreachable
            }
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// `POST /ask` with `{query}`.
    ///
    /// # Errors
    ///
    /// See [`SdkError`].
    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse, SdkError> {
        let builder = self.http.post(self.endpoints.ask()).json(request);
        self.send(ASK_PATH, builder).await
    }

    /// `POST /send-email` with `{recipient, subject, body}`.
    ///
    /// # Errors
    ///
    /// See [`SdkError`].
    pub async fn send_email(&self, request: &SendEmailRequest) -> Result<MessageResponse, SdkError> {
        let builder = self.http.post(self.endpoints.send_email()).json(request);
        self.send(SEND_EMAIL_PATH, builder).await
    }

    /// `POST /fetch-emails` with an empty body.
    ///
    /// # Errors
    ///
    /// See [`SdkError`].
    pub async fn fetch_emails(&self) -> Result<MessageResponse, SdkError> {
        let builder = self
            .http
            .post(self.endpoints.fetch_emails())
            .header(CONTENT_TYPE, "application/json");
        self.send(FETCH_EMAILS_PATH, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, SdkError> {
        debug!(endpoint, "sending request");
        let res = builder.send().await?;

        let status = res.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "backend returned error status");
            return Err(SdkError::Status(status.as_u16()));
        }

        let bytes = res.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        debug!(endpoint, status = status.as_u16(), "request complete");
        Ok(body)
    }
}
