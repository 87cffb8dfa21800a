//! One-shot document ingestion.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::api::ApiClient;
use crate::config::Config;
use crate::render::RenderMode;
use crate::session::ClientSession;

pub async fn run_ingest(
    config: &Config,
    text: Option<String>,
    file: Option<&Path>,
    mode: RenderMode,
) -> Result<()> {
    let text = match (text, file) {
        (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document file: {}", path.display()))?,
        (None, None) => bail!("nothing to ingest: pass TEXT or --file"),
    };

    let api = ApiClient::new(&config.api)?;
    let mut session = ClientSession::new(api, mode.renderer(), config);

    session.refresh_status().await;
    let receipt = session.ingest(&text).await?;

    println!("ingest");
    match receipt.total_documents {
        Some(total) => println!("  indexed on service: {}", total),
        None => println!("  indexed on service: {}", session.stats().indexed_documents),
    }
    println!("ok");

    Ok(())
}
