//! API request and response models.
//!
//! Inbound request bodies, the success envelopes returned to clients, and the
//! subset of the OpenAI chat completion wire format the gateway speaks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Inbound requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/nutrition`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "goal": "build muscle",
    "currentDiet": "vegetarian",
    "restrictions": "nut allergy",
    "activityLevel": "high"
}))]
pub struct NutritionRequest {
    /// Health or fitness goal (required)
    pub goal: Option<String>,
    pub current_diet: Option<String>,
    pub restrictions: Option<String>,
    pub activity_level: Option<String>,
}

/// Body of `POST /api/plant-plan`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "plantName": "Basil",
    "location": "balcony",
    "sunlight": "full sun",
    "wateringFrequency": "every other day"
}))]
pub struct PlantPlanRequest {
    /// Plant to plan for (required)
    pub plant_name: Option<String>,
    /// Defaults to `indoor`
    pub location: Option<String>,
    /// Defaults to `medium`
    pub sunlight: Option<String>,
    /// Defaults to `weekly`
    pub watering_frequency: Option<String>,
}

/// Body of `POST /api/recipes`.
///
/// `ingredients` is kept as raw JSON so a wrong shape can be reported with the
/// endpoint's own message instead of a generic parse error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "ingredients": ["chickpeas", "spinach", "tomato"],
    "dietaryRestrictions": "gluten-free",
    "mealType": "dinner"
}))]
pub struct RecipesRequest {
    /// Non-empty array of ingredient names (required)
    #[schema(value_type = Option<Vec<String>>)]
    pub ingredients: Option<Value>,
    pub dietary_restrictions: Option<String>,
    pub meal_type: Option<String>,
}

/// Body of `POST /api/recipe-search`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "searchQuery": "thai green curry", "maxResults": 4 }))]
pub struct RecipeSearchRequest {
    /// Free-text recipe query (required)
    pub search_query: Option<String>,
    /// Number of recipes to generate, clamped to 1..=12 (default 6)
    pub max_results: Option<i64>,
}

// ---------------------------------------------------------------------------
// Success envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResponse {
    pub success: bool,
    pub goal: String,
    pub nutrition_plan: String,
    /// ISO-8601 UTC time the plan was generated
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantPlanResponse {
    pub success: bool,
    pub plant_name: String,
    pub care_plan: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipesResponse {
    pub success: bool,
    /// Generated recipes as free text
    pub recipes: String,
    /// The posted ingredients, unchanged
    #[schema(value_type = Vec<String>)]
    pub ingredients: Vec<Value>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchResponse {
    pub success: bool,
    pub search_query: String,
    pub recipes: Vec<Recipe>,
    pub timestamp: String,
}

/// A structured recipe produced by recipe search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub category: String,
    pub image_url: String,
    pub source: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "ok": true,
    "version": "1.0.0",
    "environment": "production",
    "timestamp": "2025-01-01T00:00:00.000Z",
    "message": "Planted API is healthy 🌱"
}))]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub message: String,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error category
    pub error: String,
    /// Human-readable specifics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Upstream error body, relayed verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

// ---------------------------------------------------------------------------
// Completion API wire format
// ---------------------------------------------------------------------------

/// Chat completion request following the OpenAI API format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

/// Output format hint, e.g. `{"type": "json_object"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Chat completion response. Only the fields the gateway reads are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
