//! HTTP client for the question-answering service.
//!
//! Three endpoints, JSON bodies throughout:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | Status probe | GET | `/` |
//! | Ingest | POST | `/ingest` |
//! | Ask | POST | `/ask` |
//!
//! Every call is a single attempt — the client never retries. Remote
//! failures carry the `detail` message from the response body when the
//! service provides one.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;

/// Placeholder shown for model names before the first successful probe
/// (and when the service omits a field).
pub const MODEL_PLACEHOLDER: &str = "not loaded";

fn model_placeholder() -> String {
    MODEL_PLACEHOLDER.to_string()
}

/// An API call that did not produce a usable response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("service error {status}: {detail}")]
    Remote { status: StatusCode, detail: String },
    /// The request never completed (connection refused, timeout, bad body).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Statistics reported by the status probe. Fields the service omits fall
/// back to the placeholders, so a sparse payload still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    #[serde(default)]
    pub indexed_documents: u64,
    #[serde(default = "model_placeholder")]
    pub embedding_model: String,
    #[serde(default = "model_placeholder")]
    pub llm_model: String,
}

impl Default for ServiceStats {
    fn default() -> Self {
        Self {
            indexed_documents: 0,
            embedding_model: model_placeholder(),
            llm_model: model_placeholder(),
        }
    }
}

/// Successful answer from `POST /ask`.
///
/// `context` is the retrieved passage text the service grounded the answer
/// on; `confidence` is its own estimate in `[0, 1]`. Both are optional —
/// older service builds send neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Whatever a 2xx ingest response carries. The service reports the new
/// authoritative total when it has one; an empty or non-JSON body is fine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    pub total_documents: Option<u64>,
}

/// Thin reqwest wrapper around the service endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read-only status probe against the service root.
    pub async fn status(&self) -> Result<ServiceStats, ApiError> {
        let resp = self
            .http
            .get(format!("{}/", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(remote_error(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// Submit one document for indexing.
    pub async fn ingest(&self, text: &str) -> Result<IngestReceipt, ApiError> {
        let resp = self
            .http
            .post(format!("{}/ingest", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(remote_error(resp).await);
        }

        // Any 2xx counts as success regardless of body shape.
        Ok(resp.json().await.unwrap_or_default())
    }

    /// Ask one question. `top_k` is forwarded untouched — range checks are
    /// the service's job.
    pub async fn ask(&self, question: &str, top_k: u32) -> Result<Answer, ApiError> {
        let resp = self
            .http
            .post(format!("{}/ask", self.base_url))
            .json(&serde_json::json!({ "question": question, "top_k": top_k }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(remote_error(resp).await);
        }

        Ok(resp.json().await?)
    }
}

/// Build a [`ApiError::Remote`] from a non-2xx response, pulling the
/// message out of the body's `detail` field when present.
async fn remote_error(resp: reqwest::Response) -> ApiError {
    let status = resp.status();

    let detail = match resp.text().await {
        Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
            .unwrap_or_else(|| "no detail provided".to_string()),
        Err(_) => "no detail provided".to_string(),
    };

    ApiError::Remote { status, detail }
}
