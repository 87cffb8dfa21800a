//! Client session state and API synchronization flows.
//!
//! [`ClientSession`] owns everything the client knows: connectivity, the
//! locally mirrored document list, the last reported service statistics,
//! and the chat transcript. User flows (`ingest`, `ask`, `load_examples`,
//! `clear_local`) mutate that state and signal the renderer after every
//! mutation; the status probe (`refresh_status`) keeps connectivity and
//! stats current.
//!
//! The document list is a cache, not the truth — the remote index is
//! authoritative and the mirror can diverge from it (for instance after a
//! service restart). It exists to gate user actions and to give the chat
//! surface something to list. See [`ActionGates`] for the gating rules.
//!
//! All flows are single-attempt: a failed request is reported and the flow
//! ends. Callers retry by invoking the flow again.

use std::time::Duration;

use thiserror::Error;

use crate::api::{ApiClient, ApiError, Answer, IngestReceipt, ServiceStats};
use crate::config::Config;
use crate::render::{ActionGates, NoticeLevel, Renderer, SessionView};
use crate::transcript::ChatEntry;

/// A user flow that stopped before producing its result.
///
/// `Validation` and `Disconnected` are caught locally and never touch the
/// network; `Api` wraps a request that was actually sent and failed.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),
    #[error("the service is not reachable")]
    Disconnected,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct ClientSession {
    api: ApiClient,
    renderer: Box<dyn Renderer>,
    documents: Vec<String>,
    connected: bool,
    stats: ServiceStats,
    transcript: Vec<ChatEntry>,
    example_texts: Vec<String>,
    example_pause: Duration,
}

impl ClientSession {
    pub fn new(api: ApiClient, renderer: Box<dyn Renderer>, config: &Config) -> Self {
        Self {
            api,
            renderer,
            documents: Vec::new(),
            connected: false,
            stats: ServiceStats::default(),
            transcript: Vec::new(),
            example_texts: config.examples.texts.clone(),
            example_pause: Duration::from_millis(config.examples.pause_ms),
        }
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn api_base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    pub fn example_count(&self) -> usize {
        self.example_texts.len()
    }

    pub fn gates(&self) -> ActionGates {
        ActionGates::new(self.connected, self.documents.len())
    }

    fn render(&self) {
        self.renderer.state(&SessionView {
            connected: self.connected,
            stats: &self.stats,
            documents: &self.documents,
            gates: self.gates(),
        });
    }

    fn notice(&self, level: NoticeLevel, message: &str) {
        self.renderer.notice(level, message);
    }

    fn push_entry(&mut self, entry: ChatEntry) {
        self.renderer.chat(&entry);
        self.transcript.push(entry);
    }

    /// Probe the service once and fold the result into session state.
    ///
    /// Success overwrites `stats` and marks the session connected; any
    /// failure marks it disconnected and leaves the last known stats in
    /// place (stale but displayed). Each call is an independent attempt —
    /// this never returns an error.
    pub async fn refresh_status(&mut self) {
        match self.api.status().await {
            Ok(stats) => {
                self.connected = true;
                self.stats = stats;
            }
            Err(_) => {
                self.connected = false;
            }
        }
        self.render();
    }

    /// Submit one document for indexing and mirror it locally on success.
    pub async fn ingest(&mut self, text: &str) -> Result<IngestReceipt, FlowError> {
        let text = text.trim();

        if text.is_empty() {
            self.notice(NoticeLevel::Error, "nothing to ingest: the document text is empty");
            return Err(FlowError::Validation("document text is empty".into()));
        }
        if !self.connected {
            self.notice(
                NoticeLevel::Error,
                "cannot ingest: the service is not reachable",
            );
            return Err(FlowError::Disconnected);
        }

        match self.api.ingest(text).await {
            Ok(receipt) => {
                self.documents.push(text.to_string());
                match receipt.total_documents {
                    Some(total) => self.notice(
                        NoticeLevel::Success,
                        &format!("document indexed ({total} total on the service)"),
                    ),
                    None => self.notice(NoticeLevel::Success, "document submitted for indexing"),
                }
                self.render();
                // Pick up the authoritative count.
                self.refresh_status().await;
                Ok(receipt)
            }
            Err(err) => {
                self.notice(NoticeLevel::Error, &format!("ingestion failed: {err}"));
                Err(err.into())
            }
        }
    }

    /// Ask one question against the indexed documents.
    ///
    /// The user's entry lands in the transcript before the request goes
    /// out, and a failed request still produces an assistant entry — the
    /// conversational record never silently drops a turn.
    pub async fn ask(&mut self, question: &str, top_k: u32) -> Result<Answer, FlowError> {
        let question = question.trim();

        if question.is_empty() {
            self.notice(NoticeLevel::Error, "type a question first");
            return Err(FlowError::Validation("question is empty".into()));
        }
        if !self.connected {
            self.notice(NoticeLevel::Error, "cannot ask: the service is not reachable");
            return Err(FlowError::Disconnected);
        }
        if self.documents.is_empty() {
            self.notice(
                NoticeLevel::Error,
                "add some documents before asking questions",
            );
            return Err(FlowError::Validation("no documents ingested yet".into()));
        }

        self.push_entry(ChatEntry::user(question));

        match self.api.ask(question, top_k).await {
            Ok(answer) => {
                self.push_entry(
                    ChatEntry::assistant(&answer.answer)
                        .with_context(answer.context.clone())
                        .with_confidence(answer.confidence),
                );
                Ok(answer)
            }
            Err(err) => {
                self.push_entry(ChatEntry::assistant(format!(
                    "sorry, something went wrong: {err}"
                )));
                self.notice(NoticeLevel::Error, &format!("question failed: {err}"));
                Err(err.into())
            }
        }
    }

    /// Ingest the configured example set, one document at a time.
    ///
    /// Strictly sequential: each write completes before the next starts,
    /// with a pause after every success so the service is not hammered and
    /// the status line visibly advances. The first failure stops the run;
    /// documents ingested before it stay in the mirror. There is no way to
    /// cancel a run short of killing the process.
    pub async fn load_examples(&mut self) -> Result<usize, FlowError> {
        if !self.connected {
            self.notice(
                NoticeLevel::Error,
                "cannot load examples: the service is not reachable",
            );
            return Err(FlowError::Disconnected);
        }

        let texts = self.example_texts.clone();
        for (index, text) in texts.iter().enumerate() {
            if let Err(err) = self.api.ingest(text).await {
                self.notice(
                    NoticeLevel::Error,
                    &format!("example {} of {} failed: {err}", index + 1, texts.len()),
                );
                return Err(err.into());
            }
            self.documents.push(text.clone());
            self.render();
            self.refresh_status().await;
            tokio::time::sleep(self.example_pause).await;
        }

        self.notice(
            NoticeLevel::Success,
            &format!("loaded {} example documents", texts.len()),
        );
        Ok(texts.len())
    }

    /// Empty the local document mirror. Never touches the network: the
    /// remote index keeps its data until the service itself is restarted,
    /// and the notice says so. Returns `false` when there was nothing to
    /// clear. Callers own any confirmation step.
    pub fn clear_local(&mut self) -> bool {
        if self.documents.is_empty() {
            self.notice(NoticeLevel::Info, "no local documents to clear");
            return false;
        }

        self.documents.clear();
        self.render();
        self.notice(
            NoticeLevel::Info,
            "local document list cleared; restart the service to clear the remote index",
        );
        true
    }
}
