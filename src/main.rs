//! # rag-console CLI (`rag`)
//!
//! The `rag` binary is a terminal client for a retrieval-augmented
//! question-answering service: submit text documents for indexing, then
//! ask natural-language questions against them.
//!
//! ## Usage
//!
//! ```bash
//! rag --config ./config/rag.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rag status` | Probe the service and print indexing stats |
//! | `rag ingest "<text>"` | Submit one document for indexing |
//! | `rag ask "<question>"` | Ask one question and print the answer |
//! | `rag seed` | Sequentially ingest the example document set |
//! | `rag chat` | Interactive chat session with periodic status polling |
//!
//! ## Examples
//!
//! ```bash
//! # Is the service up, and what does it have indexed?
//! rag status
//!
//! # Index a document
//! rag ingest "The capital of France is Paris."
//!
//! # Index a whole file
//! rag ingest --file ./notes.txt
//!
//! # Ask with a wider retrieval window
//! rag ask "Which city is the capital of France?" --top-k 10
//!
//! # Load the built-in example documents, one at a time
//! rag seed
//!
//! # Talk to a service that is not on the default port
//! rag --api-url http://10.0.0.5:8000 chat
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rag_console::render::RenderMode;
use rag_console::{ask_cmd, chat, config, ingest_cmd, seed_cmd, status_cmd};

/// rag-console — a terminal client for a retrieval-augmented
/// question-answering service.
///
/// All commands read an optional TOML configuration file; missing files
/// fall back to built-in defaults (service at `http://127.0.0.1:8000`).
#[derive(Parser)]
#[command(
    name = "rag",
    about = "A terminal client for a retrieval-augmented question-answering service",
    version,
    long_about = "rag-console talks to a question-answering service over HTTP: it submits text \
    documents for indexing, asks natural-language questions against them, and renders answers in \
    a chat-style transcript. Retrieval and generation happen on the service; this client owns \
    connectivity polling, the session-local document list, and the conversation record."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/rag.toml`. Built-in defaults apply when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./config/rag.toml")]
    config: PathBuf,

    /// Override the service base URL from the config file.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Probe the service and print indexing statistics.
    ///
    /// A single read-only request against the service root. Exits non-zero
    /// when the service is unreachable, so it doubles as a health check.
    Status,

    /// Submit one document for indexing.
    ///
    /// The document text comes from the command line or from a file.
    /// Whitespace-only text is rejected before any request is made.
    Ingest {
        /// The document text.
        text: Option<String>,

        /// Read the document text from this file instead.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Ask one question and print the answer.
    ///
    /// Prints the retrieved context and the service's confidence estimate
    /// when the service reports them.
    Ask {
        /// The question to ask.
        question: String,

        /// How many retrieved passages the service should consider.
        /// Defaults to `chat.top_k` from the config file.
        #[arg(long)]
        top_k: Option<u32>,
    },

    /// Sequentially ingest the example document set.
    ///
    /// Documents are submitted one at a time with a short pause after each
    /// success; the run stops at the first failure.
    Seed {
        /// Read example documents from this file (one per non-empty line)
        /// instead of the configured set.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Interactive chat session.
    ///
    /// Polls the service on a fixed interval, keeps a session-local list of
    /// ingested documents, and records the conversation as a transcript.
    /// Type `:help` inside the session for the command list.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_or_default(&cli.config)?;
    if let Some(url) = cli.api_url {
        cfg.api.base_url = url;
    }
    let mode = RenderMode::from_json_flag(cli.json);

    match cli.command {
        Commands::Status => {
            status_cmd::run_status(&cfg, cli.json).await?;
        }
        Commands::Ingest { text, file } => {
            ingest_cmd::run_ingest(&cfg, text, file.as_deref(), mode).await?;
        }
        Commands::Ask { question, top_k } => {
            ask_cmd::run_ask(&cfg, &question, top_k, cli.json).await?;
        }
        Commands::Seed { file } => {
            seed_cmd::run_seed(&cfg, file.as_deref(), mode).await?;
        }
        Commands::Chat => {
            chat::run_chat(&cfg, mode).await?;
        }
    }

    Ok(())
}
