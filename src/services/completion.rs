//! Upstream gateway to the chat completion API.
//!
//! One round trip per call with no retries and no streaming. The client
//! keeps no idle connections between requests.

use crate::api::models::ChatCompletionResponse;
use crate::core::config::{AppConfig, OpenAiConfig};
use crate::core::metrics::get_metrics;
use crate::services::prompt::Prompt;
use anyhow::Context;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure of a single completion call.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// No API key configured; no request was sent
    #[error("OpenAI API key not configured")]
    NotConfigured,

    /// The API answered with a non-2xx status
    #[error("completion API returned status {status}")]
    Upstream { status: u16, details: Value },

    /// Network failure or undecodable success body
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Success status but no usable first choice
    #[error("completion response contained no message content")]
    EmptyCompletion,
}

/// Client for the chat completion endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl CompletionClient {
    /// Build the client from application config.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(secs) = config.upstream_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config: config.openai.clone(),
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Send the prompt and return the first choice's text.
    ///
    /// `task` only labels logs and metrics.
    #[tracing::instrument(skip(self, prompt), fields(task = %task, model = %model))]
    pub async fn complete(
        &self,
        task: &str,
        model: &str,
        prompt: &Prompt,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CompletionError::NotConfigured)?;

        let url = self.endpoint();
        let metrics = get_metrics();
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&prompt.to_request(model))
            .send()
            .await
            .map_err(|e| {
                metrics
                    .upstream_requests
                    .with_label_values(&[task, model, "error"])
                    .inc();
                tracing::error!(
                    url = %url,
                    error = %e,
                    is_timeout = e.is_timeout(),
                    is_connect = e.is_connect(),
                    "HTTP request to completion API failed"
                );
                CompletionError::Request(e)
            })?;

        let status = response.status();
        metrics
            .upstream_latency
            .with_label_values(&[task, model])
            .observe(start.elapsed().as_secs_f64());
        metrics
            .upstream_requests
            .with_label_values(&[task, model, status.as_str()])
            .inc();

        tracing::debug!(url = %url, status = %status, "Completion API responded");

        if !status.is_success() {
            let raw = response.text().await?;
            let details = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyCompletion)
    }
}
