//! Service status overview.
//!
//! Probes the service once and prints what it reports: indexed document
//! count and the models behind retrieval and generation. Used by
//! `rag status` to give confidence that the service is up before a chat
//! session or a bulk load.

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::config::Config;

pub async fn run_status(config: &Config, json: bool) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let stats = api.status().await.with_context(|| {
        format!(
            "the service at {} did not answer the status probe",
            api.base_url()
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("rag-console — Service Status");
    println!("============================");
    println!();
    println!("  Service:     {}", api.base_url());
    println!("  Indexed:     {} documents", stats.indexed_documents);
    println!("  Embedding:   {}", stats.embedding_model);
    println!("  LLM:         {}", stats.llm_model);
    println!();

    Ok(())
}
