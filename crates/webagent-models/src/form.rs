//! Local form validation.
//!
//! Validation runs before any network call.  A failure is reported inline
//! and no request is issued.

use crate::api::{AskRequest, SendEmailRequest};
use crate::error::ValidationError;

/// Trim `query` and turn it into an [`AskRequest`].
///
/// # Errors
///
/// [`ValidationError::EmptyQuery`] if nothing remains after trimming.
pub fn validate_query(query: &str) -> Result<AskRequest, ValidationError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(AskRequest {
        query: query.to_string(),
    })
}

/// The three send-email inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Body text; may span several lines.
    pub body: String,
}

impl EmailDraft {
    /// Trim every field and build the request body.
    ///
    /// # Errors
    ///
    /// [`ValidationError::IncompleteEmail`] if any field is empty after trimming.
    pub fn validate(&self) -> Result<SendEmailRequest, ValidationError> {
        let recipient = self.recipient.trim();
        let subject = self.subject.trim();
        let body = self.body.trim();

        if recipient.is_empty() || subject.is_empty() || body.is_empty() {
            return Err(ValidationError::IncompleteEmail);
        }

        Ok(SendEmailRequest {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    /// Empty all three fields.
    pub fn clear(&mut self) {
        self.recipient.clear();
        self.subject.clear();
        self.body.clear();
    }
}
