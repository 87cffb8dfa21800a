//! Append-only chat transcript types.
//!
//! Entries are created once and never mutated; the session pushes them in
//! conversation order and renderers display them as they arrive.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Short prefix used by the human renderer.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "rag",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub role: Role,
    pub text: String,
    /// Retrieved passage text the answer was grounded on, when the service
    /// reports it. Only ever set on assistant entries.
    pub context: Option<String>,
    /// Service-reported answer confidence, when available.
    pub confidence: Option<f64>,
    pub at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            context: None,
            confidence: None,
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            context: None,
            confidence: None,
            at: Utc::now(),
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }
}
