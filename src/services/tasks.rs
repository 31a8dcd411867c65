//! The four generation endpoints as pipeline configurations.

use crate::api::models::{
    NutritionRequest, NutritionResponse, PlantPlanRequest, PlantPlanResponse, RecipeSearchRequest,
    RecipeSearchResponse, RecipesRequest, RecipesResponse,
};
use crate::core::config::OpenAiConfig;
use crate::core::{AppError, Result};
use crate::services::generation::GenerationTask;
use crate::services::prompt::{non_empty, optional_clause, Prompt};
use crate::services::recipe_search::parse_recipes;
use serde_json::Value;

/// Personalized plant-based nutrition plan.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionTask {
    pub goal: String,
    pub current_diet: Option<String>,
    pub restrictions: Option<String>,
    pub activity_level: Option<String>,
}

impl GenerationTask for NutritionTask {
    type Request = NutritionRequest;
    type Envelope = NutritionResponse;

    const NAME: &'static str = "nutrition";
    const ARTIFACT: &'static str = "nutrition plan";
    const PERSONA: &'static str = "You are a professional nutritionist and health coach \
        specializing in plant-based nutrition. Provide evidence-based, personalized nutrition advice.";
    const TEMPERATURE: f32 = 0.7;
    const MAX_TOKENS: u32 = 1500;

    fn validate(request: NutritionRequest) -> Result<Self> {
        let goal = non_empty(request.goal)
            .ok_or_else(|| AppError::MissingField("goal is required".to_string()))?;

        Ok(Self {
            goal,
            current_diet: non_empty(request.current_diet),
            restrictions: non_empty(request.restrictions),
            activity_level: non_empty(request.activity_level),
        })
    }

    fn user_message(&self) -> String {
        format!(
            "Create a personalized plant-based nutrition plan for this goal: {}.{}{}{} \
             Include: daily calorie target, macronutrient breakdown, meal timing recommendations, \
             key nutrients to focus on, supplement suggestions if needed, and practical tips for success.",
            self.goal,
            optional_clause("Current diet", self.current_diet.as_deref()),
            optional_clause("Dietary restrictions", self.restrictions.as_deref()),
            optional_clause("Activity level", self.activity_level.as_deref()),
        )
    }

    fn into_envelope(self, generated: String, timestamp: String) -> Result<NutritionResponse> {
        Ok(NutritionResponse {
            success: true,
            goal: self.goal,
            nutrition_plan: generated,
            timestamp,
        })
    }
}

/// Care plan for a single plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantCareTask {
    pub plant_name: String,
    pub location: String,
    pub sunlight: String,
    pub watering_frequency: String,
}

impl GenerationTask for PlantCareTask {
    type Request = PlantPlanRequest;
    type Envelope = PlantPlanResponse;

    const NAME: &'static str = "plant-plan";
    const ARTIFACT: &'static str = "plant care plan";
    const PERSONA: &'static str = "You are an expert gardener and plant care specialist. \
        Provide detailed, practical advice for growing and caring for plants.";
    const TEMPERATURE: f32 = 0.7;
    const MAX_TOKENS: u32 = 1000;

    fn validate(request: PlantPlanRequest) -> Result<Self> {
        let plant_name = non_empty(request.plant_name)
            .ok_or_else(|| AppError::MissingField("plantName is required".to_string()))?;

        Ok(Self {
            plant_name,
            location: non_empty(request.location).unwrap_or_else(|| "indoor".to_string()),
            sunlight: non_empty(request.sunlight).unwrap_or_else(|| "medium".to_string()),
            watering_frequency: non_empty(request.watering_frequency)
                .unwrap_or_else(|| "weekly".to_string()),
        })
    }

    fn user_message(&self) -> String {
        format!(
            "Create a comprehensive care plan for {}. Location: {}. Sunlight: {}. \
             Watering frequency: {}. Include watering schedule, sunlight needs, soil requirements, \
             fertilizing tips, and common issues.",
            self.plant_name, self.location, self.sunlight, self.watering_frequency
        )
    }

    fn into_envelope(self, generated: String, timestamp: String) -> Result<PlantPlanResponse> {
        Ok(PlantPlanResponse {
            success: true,
            plant_name: self.plant_name,
            care_plan: generated,
            timestamp,
        })
    }
}

/// Three recipes built around the given ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipesTask {
    /// Ingredient names as they appear in the prompt
    pub ingredients: Vec<String>,
    /// The array exactly as posted, echoed back in the envelope
    pub raw_ingredients: Vec<Value>,
    pub dietary_restrictions: Option<String>,
    pub meal_type: Option<String>,
}

/// Accept a non-empty array of strings or numbers.
///
/// Returns the original items alongside their prompt text.
fn ingredient_list(value: Option<Value>) -> Option<(Vec<Value>, Vec<String>)> {
    let items = match value? {
        Value::Array(items) if !items.is_empty() => items,
        _ => return None,
    };

    let names = items
        .iter()
        .map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;

    Some((items, names))
}

impl GenerationTask for RecipesTask {
    type Request = RecipesRequest;
    type Envelope = RecipesResponse;

    const NAME: &'static str = "recipes";
    const ARTIFACT: &'static str = "recipes";
    const PERSONA: &'static str = "You are a creative chef and nutritionist. \
        Generate delicious, healthy recipes using plant-based ingredients.";
    const TEMPERATURE: f32 = 0.8;
    const MAX_TOKENS: u32 = 2000;

    fn validate(request: RecipesRequest) -> Result<Self> {
        let (raw_ingredients, ingredients) =
            ingredient_list(request.ingredients).ok_or_else(|| {
                AppError::MissingField("ingredients array is required".to_string())
            })?;

        Ok(Self {
            ingredients,
            raw_ingredients,
            dietary_restrictions: non_empty(request.dietary_restrictions),
            meal_type: non_empty(request.meal_type),
        })
    }

    fn user_message(&self) -> String {
        format!(
            "Create 3 unique plant-based recipes using these ingredients: {}.{}{} \
             For each recipe, provide: name, description, ingredients with quantities, \
             step-by-step instructions, prep time, cook time, servings, and nutritional highlights.",
            self.ingredients.join(", "),
            optional_clause("Dietary restrictions", self.dietary_restrictions.as_deref()),
            optional_clause("Meal type", self.meal_type.as_deref()),
        )
    }

    fn into_envelope(self, generated: String, timestamp: String) -> Result<RecipesResponse> {
        Ok(RecipesResponse {
            success: true,
            recipes: generated,
            ingredients: self.raw_ingredients,
            timestamp,
        })
    }
}

/// Default number of recipes returned by search.
pub const DEFAULT_SEARCH_RESULTS: u32 = 6;

/// Upper bound on recipes per search.
pub const MAX_SEARCH_RESULTS: u32 = 12;

/// Structured recipe search answered from the model's knowledge.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSearchTask {
    pub search_query: String,
    pub max_results: u32,
}

impl RecipeSearchTask {
    /// Persona followed by the requirement list, which carries the count.
    pub fn system_message(&self) -> String {
        format!(
            "{}\n\nRequirements:\n\
             - Create {} diverse, high-quality recipes\n\
             - Base recipes on real, traditional cooking techniques\n\
             - Ensure all fields are filled with realistic values\n\
             - Make descriptions appetizing and engaging\n\
             - List ingredients with clear measurements\n\
             - Provide detailed step-by-step instructions\n\
             - Use authentic recipe techniques and flavors",
            Self::PERSONA,
            self.max_results
        )
    }
}

impl GenerationTask for RecipeSearchTask {
    type Request = RecipeSearchRequest;
    type Envelope = RecipeSearchResponse;

    const NAME: &'static str = "recipe-search";
    const ARTIFACT: &'static str = "recipe results";
    const PERSONA: &'static str = r#"You are an expert food recipe researcher with deep knowledge of global cuisines, cooking techniques, and recipe databases.

Your task is to generate high-quality recipes based on user queries and return them as valid JSON.

Return a JSON object with this exact structure:
{
  "recipes": [
    {
      "title": "Recipe Name",
      "description": "Brief appetizing description (1-2 sentences)",
      "ingredients": ["ingredient 1 with measurement", "ingredient 2 with measurement"],
      "instructions": ["detailed step 1", "detailed step 2"],
      "prepTime": "X mins",
      "cookTime": "X mins",
      "servings": "X servings",
      "category": "Main Course/Appetizer/Dessert/etc",
      "source": "Traditional/Modern/Fusion/etc"
    }
  ]
}"#;
    const TEMPERATURE: f32 = 0.8;
    const MAX_TOKENS: u32 = 4000;

    fn validate(request: RecipeSearchRequest) -> Result<Self> {
        let search_query = request
            .search_query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::MissingField("searchQuery is required".to_string()))?;

        let max_results = request
            .max_results
            .map(|n| n.clamp(1, MAX_SEARCH_RESULTS as i64) as u32)
            .unwrap_or(DEFAULT_SEARCH_RESULTS);

        Ok(Self {
            search_query,
            max_results,
        })
    }

    fn user_message(&self) -> String {
        format!(
            "Create {} delicious recipes for: \"{}\".",
            self.max_results, self.search_query
        )
    }

    fn prompt(&self) -> Prompt {
        Prompt::new(
            self.system_message(),
            self.user_message(),
            Self::TEMPERATURE,
            Self::MAX_TOKENS,
        )
        .with_json_output()
    }

    fn model<'a>(&self, config: &'a OpenAiConfig) -> &'a str {
        &config.search_model
    }

    fn into_envelope(self, generated: String, timestamp: String) -> Result<RecipeSearchResponse> {
        let recipes =
            parse_recipes(&generated).map_err(|e| AppError::MalformedCompletion {
                artifact: Self::ARTIFACT,
                message: e.to_string(),
            })?;

        tracing::debug!(
            query = %self.search_query,
            count = recipes.len(),
            "Parsed recipe search results"
        );

        Ok(RecipeSearchResponse {
            success: true,
            search_query: self.search_query,
            recipes,
            timestamp,
        })
    }
}
