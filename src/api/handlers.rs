//! HTTP request handlers for the Planted API.
//!
//! Generation handlers are one-liners over the shared pipeline; the per
//! endpoint behavior lives in [`crate::services::tasks`].

use crate::api::models::*;
use crate::core::config::AppConfig;
use crate::core::{AppError, Result};
use crate::services::completion::CompletionClient;
use crate::services::generation::{generate, iso_timestamp};
use crate::services::tasks::{NutritionTask, PlantCareTask, RecipeSearchTask, RecipesTask};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub completion: CompletionClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let completion = CompletionClient::new(&config)?;
        Ok(Self { config, completion })
    }
}

/// Generate a plant-based nutrition plan.
#[utoipa::path(
    post,
    path = "/api/nutrition",
    tag = "generation",
    request_body = NutritionRequest,
    responses(
        (status = 200, description = "Nutrition plan generated", body = NutritionResponse),
        (status = 400, description = "goal is missing or the body is malformed", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 503, description = "Completion API key not configured", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    )
)]
pub async fn nutrition(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<NutritionResponse>> {
    generate::<NutritionTask>(&state, &body).await.map(Json)
}

/// Generate a care plan for a plant.
#[utoipa::path(
    post,
    path = "/api/plant-plan",
    tag = "generation",
    request_body = PlantPlanRequest,
    responses(
        (status = 200, description = "Care plan generated", body = PlantPlanResponse),
        (status = 400, description = "plantName is missing or the body is malformed", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 503, description = "Completion API key not configured", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    )
)]
pub async fn plant_plan(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<PlantPlanResponse>> {
    generate::<PlantCareTask>(&state, &body).await.map(Json)
}

/// Generate three recipes from a list of ingredients.
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "generation",
    request_body = RecipesRequest,
    responses(
        (status = 200, description = "Recipes generated", body = RecipesResponse),
        (status = 400, description = "ingredients is not a non-empty array", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 503, description = "Completion API key not configured", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    )
)]
pub async fn recipes(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<RecipesResponse>> {
    generate::<RecipesTask>(&state, &body).await.map(Json)
}

/// Search for recipes and return them as structured data.
#[utoipa::path(
    post,
    path = "/api/recipe-search",
    tag = "generation",
    request_body = RecipeSearchRequest,
    responses(
        (status = 200, description = "Recipes found", body = RecipeSearchResponse),
        (status = 400, description = "searchQuery is missing or the body is malformed", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 502, description = "Completion was not valid recipe JSON", body = ErrorResponse),
        (status = 503, description = "Completion API key not configured", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    )
)]
pub async fn recipe_search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RecipeSearchResponse>> {
    generate::<RecipeSearchTask>(&state, &body).await.map(Json)
}

/// Fallback for non-POST methods on generation routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        timestamp: iso_timestamp(),
        message: "Planted API is healthy 🌱".to_string(),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response())
}
