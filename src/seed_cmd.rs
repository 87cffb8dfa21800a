//! One-shot bulk load of example documents.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::api::ApiClient;
use crate::config::Config;
use crate::render::RenderMode;
use crate::session::ClientSession;

pub async fn run_seed(config: &Config, file: Option<&Path>, mode: RenderMode) -> Result<()> {
    let mut config = config.clone();

    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read examples file: {}", path.display()))?;
        let texts: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if texts.is_empty() {
            bail!(
                "{} contains no documents (expected one per non-empty line)",
                path.display()
            );
        }
        config.examples.texts = texts;
    }

    let api = ApiClient::new(&config.api)?;
    let mut session = ClientSession::new(api, mode.renderer(), &config);

    session.refresh_status().await;
    let loaded = session.load_examples().await?;

    println!("seed");
    println!("  ingested: {} documents", loaded);
    println!("  indexed on service: {}", session.stats().indexed_documents);
    println!("ok");

    Ok(())
}
