//! Business logic: prompt construction, the upstream gateway and the shared
//! generation pipeline with its per-endpoint tasks.

pub mod completion;
pub mod generation;
pub mod prompt;
pub mod recipe_search;
pub mod tasks;

pub use completion::{CompletionClient, CompletionError};
pub use generation::{generate, GenerationTask};
pub use prompt::Prompt;
pub use tasks::{NutritionTask, PlantCareTask, RecipeSearchTask, RecipesTask};
