//! Planted API - AI generation endpoints for a plant-based lifestyle app
//!
//! This library hosts stateless HTTP endpoints that turn a small JSON request
//! into a prompt, make one call to an OpenAI-compatible chat completion API,
//! and return the generated text in a uniform JSON envelope:
//!
//! - **Nutrition plans**: `POST /api/nutrition`
//! - **Plant care plans**: `POST /api/plant-plan`
//! - **Recipes from ingredients**: `POST /api/recipes`
//! - **Structured recipe search**: `POST /api/recipe-search`
//!
//! # Architecture
//!
//! - [`core`]: config, errors, logging context, metrics, middleware
//! - [`api`]: HTTP handlers, models and the router
//! - [`services`]: prompt building, the upstream gateway and the shared
//!   generation pipeline
//!
//! # Configuration
//!
//! Optional environment variables:
//! - `OPENAI_API_KEY`: completion API key; AI endpoints answer 503 without it
//! - `OPENAI_API_BASE`: API base URL (default: https://api.openai.com/v1)
//! - `OPENAI_MODEL` / `OPENAI_SEARCH_MODEL`: model overrides
//! - `HOST`: Server bind address (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `UPSTREAM_TIMEOUT_SECS`: upstream timeout (default: none)
//! - `APP_ENVIRONMENT`: environment name reported by `/api/health`

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use api::{build_router, ApiDoc, AppState};
pub use core::{AppConfig, AppError, Result};
pub use services::{CompletionClient, GenerationTask};
