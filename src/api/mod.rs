//! API layer for the Planted server.
//!
//! HTTP handlers, request/response models and router assembly.

pub mod handlers;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use handlers::{
    health, method_not_allowed, metrics_handler, nutrition, plant_plan, recipe_search, recipes,
    AppState,
};
pub use models::{
    ErrorResponse, HealthResponse, NutritionRequest, NutritionResponse, PlantPlanRequest,
    PlantPlanResponse, Recipe, RecipeSearchRequest, RecipeSearchResponse, RecipesRequest,
    RecipesResponse,
};
pub use routes::{build_router, ApiDoc};
