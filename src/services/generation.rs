//! The shared request pipeline behind every generation endpoint.
//!
//! Parse the body into the endpoint's request type, validate the mandatory
//! field, build the prompt, make one completion call, and wrap the generated
//! text in the endpoint's envelope. Endpoints differ only in their
//! [`GenerationTask`] implementation.

use crate::api::handlers::AppState;
use crate::core::config::OpenAiConfig;
use crate::core::logging::get_request_id;
use crate::core::{AppError, Result};
use crate::services::completion::CompletionError;
use crate::services::prompt::Prompt;
use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// One endpoint's configuration of the pipeline.
pub trait GenerationTask: Sized {
    /// Raw body as posted by the client
    type Request: DeserializeOwned;
    /// Success envelope
    type Envelope: Serialize;

    /// Short label for logs and metrics
    const NAME: &'static str;
    /// What is being generated, used in error messages
    const ARTIFACT: &'static str;
    /// System message
    const PERSONA: &'static str;
    const TEMPERATURE: f32;
    const MAX_TOKENS: u32;

    /// Check the mandatory field and convert into the validated task.
    fn validate(request: Self::Request) -> Result<Self>;

    /// The interpolated user instruction.
    fn user_message(&self) -> String;

    fn prompt(&self) -> Prompt {
        Prompt::new(
            Self::PERSONA,
            self.user_message(),
            Self::TEMPERATURE,
            Self::MAX_TOKENS,
        )
    }

    fn model<'a>(&self, config: &'a OpenAiConfig) -> &'a str {
        &config.model
    }

    /// Wrap the generated text. May fail when the text must be structured.
    fn into_envelope(self, generated: String, timestamp: String) -> Result<Self::Envelope>;
}

/// Parse a JSON body, treating an empty body as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| AppError::InvalidBody(e.to_string()))
}

/// Current UTC time as ISO-8601 with milliseconds, e.g. `2025-01-01T12:00:00.000Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn completion_error<T: GenerationTask>(err: CompletionError) -> AppError {
    match err {
        CompletionError::NotConfigured => AppError::NotConfigured,
        CompletionError::Upstream { status, details } => AppError::Upstream { status, details },
        other => AppError::Generation {
            artifact: T::ARTIFACT,
            message: other.to_string(),
        },
    }
}

/// Run the pipeline for task `T`.
pub async fn generate<T: GenerationTask>(state: &AppState, body: &[u8]) -> Result<T::Envelope> {
    let request_id = get_request_id();

    let task = parse_body::<T::Request>(body)
        .and_then(T::validate)
        .map_err(|e| {
            tracing::warn!(request_id = %request_id, task = T::NAME, error = %e, "Rejected request");
            e
        })?;

    let prompt = task.prompt();
    let model = task.model(state.completion.config()).to_string();

    tracing::debug!(
        request_id = %request_id,
        task = T::NAME,
        model = %model,
        "Requesting completion"
    );

    let generated = state
        .completion
        .complete(T::NAME, &model, &prompt)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                task = T::NAME,
                error = %e,
                "{} generation failed",
                T::ARTIFACT
            );
            completion_error::<T>(e)
        })?;

    task.into_envelope(generated, iso_timestamp()).map_err(|e| {
        tracing::error!(request_id = %request_id, task = T::NAME, error = %e, "Envelope mapping failed");
        e
    })
}
