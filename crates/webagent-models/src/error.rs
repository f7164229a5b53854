//! Error types for the `webagent-models` crate.
//!
//! Local form validation is the only fallible operation in this crate;
//! every failure is a variant of [`ValidationError`].

/// A required form field was left empty.
///
/// The display strings are shown to the user as-is in the result area.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The chat query was empty or whitespace.
    #[error("Please enter a query")]
    EmptyQuery,

    /// At least one of recipient, subject or body was empty.
    #[error("Please fill in all email fields")]
    IncompleteEmail,
}
