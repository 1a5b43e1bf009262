//! # Session Events
//!
//! Outbound notifications for the presentation layer.

use serde::Serialize;

use super::errors::TransportError;

/// How a fetched page is merged into the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// The visible list becomes the page
    Replace,
    /// The page is added to the end of the visible list
    Append,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Replace => "replace",
            FetchMode::Append => "append",
        }
    }
}

/// Notification raised by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The visible list was replaced or grew
    VisibleListChanged {
        mode: FetchMode,
        /// Rows merged by this change
        added: usize,
        /// Rows now visible
        total: usize,
        /// No more pages remain
        completed: bool,
    },

    /// A fetch failed; the query state was left as before the trigger
    FetchFailed { mode: FetchMode, error: TransportError },
}

/// Sender half used by a session to publish events
pub type EventSender = tokio::sync::mpsc::UnboundedSender<SessionEvent>;

/// Receiver half handed to the presentation layer
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<SessionEvent>;
