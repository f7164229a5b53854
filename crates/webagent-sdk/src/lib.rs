//! # WebAgent SDK
//!
//! Client library for the **WebAgent** backend, the service that answers
//! agent queries and sends / fetches email on the user's behalf.
//!
//! The SDK provides:
//!
//! * [`BackendClient`] — typed `reqwest` wrapper, one method per endpoint.
//! * [`Endpoints`] — canonical route table shared by clients and the mock
//!   backend alike.
//! * [`BackendConfig`] — base URL, health interval and request timeout,
//!   loaded from the environment.
//! * [`SdkError`] — unified error type for all SDK operations.
//!
//! Wire types from [`webagent_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use webagent_sdk::{BackendClient, BackendConfig};
//!
//! # async fn run() -> Result<(), webagent_sdk::SdkError> {
//! let client = BackendClient::new(&BackendConfig::from_env())?;
//! let inbox = client.fetch_emails().await?;
//! println!("{}", inbox.message);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::BackendClient;
pub use config::BackendConfig;
pub use endpoints::Endpoints;
pub use error::SdkError;

// Re-export wire types from webagent-models for ergonomic usage.
pub use webagent_models::{
    AskRequest, AskResponse, ConnectionStatus, MessageResponse, SendEmailRequest,
};
