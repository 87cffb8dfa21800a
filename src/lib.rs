//! # rag-console
//!
//! A terminal client for a retrieval-augmented question-answering service.
//! The service owns indexing, retrieval, and answer generation; this crate
//! owns the client session — connectivity polling, a local mirror of the
//! documents ingested this session, the chat transcript, and the flows
//! that keep them in sync over HTTP.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration (service endpoint, polling, chat, examples) |
//! | [`api`] | HTTP client for the status / ingest / ask endpoints |
//! | [`session`] | Session state and synchronization flows |
//! | [`transcript`] | Append-only chat transcript types |
//! | [`render`] | Rendering boundary: human, JSON, and silent renderers |
//! | [`chat`] | Interactive chat loop with the periodic status probe |

pub mod api;
pub mod ask_cmd;
pub mod chat;
pub mod config;
pub mod ingest_cmd;
pub mod render;
pub mod seed_cmd;
pub mod session;
pub mod status_cmd;
pub mod transcript;
