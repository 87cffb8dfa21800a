//! Session rendering boundary.
//!
//! The session core never prints. After every state mutation it hands the
//! renderer a fresh [`SessionView`]; transcript appends and transient
//! notices arrive through their own calls. Renderers decide presentation:
//! human output (chat on stdout, status/notices on stderr so stdout stays
//! parseable), machine-readable JSON lines, or nothing at all.

use std::io::Write;

use serde::Serialize;

use crate::api::ServiceStats;
use crate::transcript::ChatEntry;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    fn label(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        }
    }
}

/// Which user actions are currently available. Pure function of session
/// state, recomputed for every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionGates {
    pub ingest: bool,
    pub ask: bool,
}

impl ActionGates {
    pub fn new(connected: bool, local_documents: usize) -> Self {
        Self {
            ingest: connected,
            ask: connected && local_documents > 0,
        }
    }
}

/// Snapshot of session state handed to the renderer after each mutation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    pub connected: bool,
    pub stats: &'a ServiceStats,
    pub documents: &'a [String],
    pub gates: ActionGates,
}

/// Consumes re-render signals, transcript appends, and notices.
pub trait Renderer: Send + Sync {
    fn state(&self, view: &SessionView);
    fn chat(&self, entry: &ChatEntry);
    fn notice(&self, level: NoticeLevel, message: &str);
}

/// Human-friendly renderer: chat bubbles on stdout, a one-line status
/// ticker and notices on stderr.
pub struct HumanRenderer {
    /// Status ticker lines are suppressed when stderr is not a TTY, so
    /// piped runs only see chat output and notices.
    ticker: bool,
}

impl HumanRenderer {
    pub fn new() -> Self {
        Self {
            ticker: atty::is(atty::Stream::Stderr),
        }
    }
}

impl Default for HumanRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HumanRenderer {
    fn state(&self, view: &SessionView) {
        if !self.ticker {
            return;
        }
        let line = if view.connected {
            format!(
                "status  connected  {} local / {} indexed{}\n",
                view.documents.len(),
                view.stats.indexed_documents,
                if view.gates.ask { "" } else { "  (add a document to ask)" }
            )
        } else {
            format!(
                "status  disconnected  {} local  (stats stale)\n",
                view.documents.len()
            )
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn chat(&self, entry: &ChatEntry) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{} > {}", entry.role.label(), entry.text);
        if let Some(context) = &entry.context {
            for line in context.lines() {
                let _ = writeln!(out, "      | {}", line);
            }
        }
        if let Some(confidence) = entry.confidence {
            let _ = writeln!(out, "      confidence: {:.2}", confidence);
        }
        let _ = out.flush();
    }

    fn notice(&self, level: NoticeLevel, message: &str) {
        let _ = writeln!(std::io::stderr().lock(), "[{}] {}", level.label(), message);
    }
}

/// Machine-readable renderer: one JSON object per line on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn emit(value: serde_json::Value) {
        if let Ok(line) = serde_json::to_string(&value) {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
    }
}

impl Renderer for JsonRenderer {
    fn state(&self, view: &SessionView) {
        Self::emit(serde_json::json!({ "event": "state", "view": view }));
    }

    fn chat(&self, entry: &ChatEntry) {
        Self::emit(serde_json::json!({ "event": "chat", "entry": entry }));
    }

    fn notice(&self, level: NoticeLevel, message: &str) {
        Self::emit(serde_json::json!({
            "event": "notice",
            "level": level,
            "message": message
        }));
    }
}

/// No-op renderer for flows whose caller does its own reporting.
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn state(&self, _view: &SessionView) {}
    fn chat(&self, _entry: &ChatEntry) {}
    fn notice(&self, _level: NoticeLevel, _message: &str) {}
}

/// Output mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Human,
    Json,
    Silent,
}

impl RenderMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            RenderMode::Json
        } else {
            RenderMode::Human
        }
    }

    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            RenderMode::Human => Box::new(HumanRenderer::new()),
            RenderMode::Json => Box::new(JsonRenderer),
            RenderMode::Silent => Box::new(SilentRenderer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_disconnected_disables_everything() {
        let gates = ActionGates::new(false, 3);
        assert!(!gates.ingest);
        assert!(!gates.ask);
    }

    #[test]
    fn gates_connected_without_documents_allows_ingest_only() {
        let gates = ActionGates::new(true, 0);
        assert!(gates.ingest);
        assert!(!gates.ask);
    }

    #[test]
    fn gates_connected_with_documents_allows_both() {
        let gates = ActionGates::new(true, 1);
        assert!(gates.ingest);
        assert!(gates.ask);
    }
}
