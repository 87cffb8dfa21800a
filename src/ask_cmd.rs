//! One-shot question answering.
//!
//! Stateless by design: it probes once and forwards the question directly
//! to the service. The session-local document gate belongs to the chat
//! surface — a fresh process has no mirror to gate on, and the service
//! answers sensibly even for an empty index.

use anyhow::{bail, Context, Result};

use crate::api::ApiClient;
use crate::config::Config;

pub async fn run_ask(
    config: &Config,
    question: &str,
    top_k: Option<u32>,
    json: bool,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("the question is empty");
    }

    let api = ApiClient::new(&config.api)?;
    api.status()
        .await
        .with_context(|| format!("the service at {} is not reachable", api.base_url()))?;

    let top_k = top_k.unwrap_or(config.chat.top_k);
    let answer = api
        .ask(question, top_k)
        .await
        .context("the service could not answer the question")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!("{}", answer.answer);
    if let Some(context) = &answer.context {
        println!();
        println!("context:");
        for line in context.lines() {
            println!("  | {}", line);
        }
    }
    if let Some(confidence) = answer.confidence {
        println!();
        println!("confidence: {:.2}", confidence);
    }

    Ok(())
}
