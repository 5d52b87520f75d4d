//! Summarization gateway — a single call to a hosted inference model with a
//! local truncation fallback, so note writes never fail on the model being
//! down or slow.

use serde_json::Value;
use std::time::Duration;

const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Inputs shorter than this many words skip the external call entirely.
const MIN_SUMMARY_WORDS: usize = 10;

/// Length of the truncation-based degraded summary.
const FALLBACK_CHARS: usize = 180;

/// Outcome of a summarization attempt. Callers never see an error: a failed
/// or skipped call produces local text instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Produced by the inference model
    Model(String),
    /// Short input passed through unchanged, or the truncation fallback
    Local(String),
}

impl Summary {
    pub fn into_text(self) -> String {
        match self {
            Summary::Model(text) | Summary::Local(text) => text,
        }
    }
}

pub struct Summarizer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl Summarizer {
    pub fn new(model: String, api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_INFERENCE_BASE_URL.to_string(), model, api_key)
    }

    /// Point the gateway at a non-default inference host
    pub fn with_base_url(base_url: String, model: String, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url,
            model,
            api_key,
        }
    }

    /// Summarize `text`. Inputs under [`MIN_SUMMARY_WORDS`] words come back
    /// unchanged; any failure of the external call degrades to the first
    /// [`FALLBACK_CHARS`] characters of the input.
    pub async fn summarize(&self, text: &str) -> Summary {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Summary::Local(String::new());
        }

        if trimmed.split_whitespace().count() < MIN_SUMMARY_WORDS {
            return Summary::Local(trimmed.to_string());
        }

        match self.call_model(trimmed).await {
            Ok(Some(summary)) => Summary::Model(summary),
            Ok(None) => {
                log::warn!("Summarization response carried no summary_text, truncating instead");
                Summary::Local(truncate(trimmed))
            }
            Err(e) => {
                log::warn!("Summarization call failed ({}), truncating instead", e);
                Summary::Local(truncate(trimmed))
            }
        }
    }

    async fn call_model(&self, text: &str) -> Result<Option<String>, String> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.model);

        let mut request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {}", e))?;

        // The endpoint answers either [{"summary_text": ...}] or {"summary_text": ...}
        let summary = data
            .get(0)
            .and_then(|item| item.get("summary_text"))
            .or_else(|| data.get("summary_text"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(summary)
    }
}

/// First [`FALLBACK_CHARS`] characters of the input, as the degraded summary
fn truncate(text: &str) -> String {
    text.chars().take(FALLBACK_CHARS).collect()
}
