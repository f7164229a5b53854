//! Backend connection status.

use serde::{Deserialize, Serialize};

/// Result of the most recent `GET /health` probe.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    /// The backend answered with a 2xx status.
    Connected,
    /// The backend answered with a non-2xx status.
    Error,
    /// The request never got an HTTP answer (refused, DNS, timeout).
    Unreachable,
}

impl ConnectionStatus {
    /// Text for the status area.
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected to Backend",
            Self::Error => "Backend Error",
            Self::Unreachable => "Backend Not Running",
        }
    }

    /// Whether the backend is usable.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}
