#![deny(missing_docs)]

//! # WebAgent Models
//!
//! Core data types shared by the WebAgent popup and its backend client.
//!
//! ## Request flow
//!
//! ```text
//! ActionType::Chat       ──► AskRequest        ──► POST /ask          ──► AskResponse
//! ActionType::SendEmail  ──► SendEmailRequest  ──► POST /send-email   ──► MessageResponse
//! ActionType::FetchEmail ──► (empty)           ──► POST /fetch-emails ──► MessageResponse
//!                                                  GET  /health       ──► ConnectionStatus
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`action`] | `ActionType` selector and the `ProgressMessage` heuristic |
//! | [`api`] | JSON request / response bodies exchanged with the backend |
//! | [`form`] | Form validation (`validate_query`, `EmailDraft`) |
//! | [`render`] | Plain-text rendering of backend replies |
//! | [`status`] | Backend `ConnectionStatus` |
//! | [`error`] | `ValidationError` |

pub mod action;
pub mod api;
pub mod error;
pub mod form;
pub mod render;
pub mod status;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `webagent_models::AskResponse` directly.
pub use action::*;
pub use api::*;
pub use error::*;
pub use form::*;
pub use render::*;
pub use status::*;
