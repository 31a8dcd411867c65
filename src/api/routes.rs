//! Router assembly and OpenAPI document.

use crate::api::handlers::{
    self, health, method_not_allowed, metrics_handler, nutrition, plant_plan, recipe_search,
    recipes, AppState,
};
use crate::api::models::{
    ErrorResponse, HealthResponse, NutritionRequest, NutritionResponse, PlantPlanRequest,
    PlantPlanResponse, Recipe, RecipeSearchRequest, RecipeSearchResponse, RecipesRequest,
    RecipesResponse,
};
use crate::core::{cors_middleware, init_metrics, request_id_middleware, MetricsMiddleware};
use axum::{
    handler::Handler,
    middleware,
    routing::{any, get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Planted API", description = "AI-generated nutrition plans, plant care plans and recipes"),
    paths(
        handlers::nutrition,
        handlers::plant_plan,
        handlers::recipes,
        handlers::recipe_search,
        handlers::health,
    ),
    components(schemas(
        NutritionRequest,
        NutritionResponse,
        PlantPlanRequest,
        PlantPlanResponse,
        RecipesRequest,
        RecipesResponse,
        RecipeSearchRequest,
        RecipeSearchResponse,
        Recipe,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "generation", description = "Completion-backed generation endpoints"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// POST-only route answering every other method with a JSON 405.
fn generation_route<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    post(handler).fallback(method_not_allowed)
}

/// Build the application router.
///
/// Recipe search is also served as `/api/ai/recipe-search`, its path in the
/// older deployment layout. The other `/api/ai/*` paths had different request
/// contracts there and are not mounted.
pub fn build_router(state: Arc<AppState>) -> Router {
    init_metrics();

    let api_routes = Router::new()
        .route("/api/nutrition", generation_route(nutrition))
        .route("/api/plant-plan", generation_route(plant_plan))
        .route("/api/recipes", generation_route(recipes))
        .route("/api/recipe-search", generation_route(recipe_search))
        .route("/api/ai/recipe-search", generation_route(recipe_search))
        .route("/api/health", any(health))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(MetricsMiddleware::track_metrics))
        .with_state(state);

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_ui)
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors_middleware))
}
