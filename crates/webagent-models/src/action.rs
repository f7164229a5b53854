//! Action selection and progress copy.
//!
//! [`ActionType`] is the popup's top-level mode selector.  It decides which
//! form section is visible and which backend endpoint an execute action
//! targets.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// The user-selected mode of the popup.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use webagent_models::ActionType;
///
/// assert_eq!(ActionType::SendEmail.to_string(), "send-email");
/// assert_eq!(ActionType::from_str("fetch-email").unwrap(), ActionType::FetchEmail);
/// ```
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActionType {
    /// Free-form query answered by the agent (`POST /ask`).
    #[default]
    Chat,
    /// Send an email through the backend (`POST /send-email`).
    SendEmail,
    /// Fetch unread emails from the backend (`POST /fetch-emails`).
    FetchEmail,
}

impl ActionType {
    /// Every action type, in selector order.
    pub const ALL: [ActionType; 3] = [Self::Chat, Self::SendEmail, Self::FetchEmail];

    /// Human-readable tab title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat / Query",
            Self::SendEmail => "Send Email",
            Self::FetchEmail => "Fetch Emails",
        }
    }

    /// Position of this action in [`ActionType::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::SendEmail => 1,
            Self::FetchEmail => 2,
        }
    }

    /// The next action in selector order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous action in selector order, wrapping around.
    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// ProgressMessage
// ---------------------------------------------------------------------------

/// Provisional copy shown while a chat query is in flight.
///
/// Purely cosmetic: the backend's own routing is not affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMessage {
    /// Shopping / comparison queries, which run the slow multi-platform flow.
    Shopping,
    /// Queries asking the agent to scrape a page.
    Scraping,
    /// Anything else.
    General,
}

const SHOPPING_KEYWORDS: [&str; 3] = ["buy", "compare", "shop"];
const SCRAPING_KEYWORDS: [&str; 2] = ["scrape", "extract"];

impl ProgressMessage {
    /// Pick a variant by case-insensitive substring match on `query`.
    ///
    /// Shopping keywords win over scraping keywords.
    ///
    /// ```
    /// use webagent_models::ProgressMessage;
    ///
    /// assert_eq!(ProgressMessage::from_query("Compare iPhone prices"), ProgressMessage::Shopping);
    /// assert_eq!(ProgressMessage::from_query("scrape https://x.io"), ProgressMessage::Scraping);
    /// assert_eq!(ProgressMessage::from_query("capital of France?"), ProgressMessage::General);
    /// ```
    pub fn from_query(query: &str) -> Self {
        let lower = query.to_lowercase();
        if SHOPPING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Self::Shopping
        } else if SCRAPING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Self::Scraping
        } else {
            Self::General
        }
    }

    /// The text to display in the result area.
    pub fn text(self) -> &'static str {
        match self {
            Self::Shopping => {
                "🔄 Running Enhanced MCTS Planning (8 simulations)...\n\
                 ⏳ Real-time price scraping from 4 platforms...\n\
                 This may take 25-35 seconds for accurate results."
            }
            Self::Scraping => "🔄 Scraping website content...\nThis may take 5-10 seconds.",
            Self::General => "🔄 Processing your query...",
        }
    }
}
