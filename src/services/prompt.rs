//! Prompt construction.
//!
//! A [`Prompt`] is the persona (system message), the interpolated user
//! instruction and the sampling parameters for one completion call. Building
//! one is pure string work, so identical inputs always give identical bodies.

use crate::api::models::{ChatCompletionRequest, Message, ResponseFormat};

/// System/user message pair plus generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the model for a JSON object instead of free text
    pub json_output: bool,
}

impl Prompt {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            max_tokens,
            json_output: false,
        }
    }

    /// Request `response_format: {"type": "json_object"}`.
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Ordered `system`, `user` messages.
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message {
                role: "system".to_string(),
                content: self.system.clone(),
            },
            Message {
                role: "user".to_string(),
                content: self.user.clone(),
            },
        ]
    }

    /// Wire request for the given model.
    pub fn to_request(&self, model: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: self.messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: self.json_output.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }
}

/// ` Label: value.` when the value is present, otherwise nothing.
pub fn optional_clause(label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!(" {}: {}.", label, v),
        None => String::new(),
    }
}

/// Treat empty strings as absent; form clients post blank fields as "".
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
