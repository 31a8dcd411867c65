//! Turning recipe-search completion text into [`Recipe`] values.
//!
//! Models wrap JSON in markdown fences and drift between shapes (a bare
//! array, `{"recipes": [...]}`, or one recipe object), and between camelCase
//! and snake_case keys. Everything is normalized to one shape with defaults.

use crate::api::models::Recipe;
use serde_json::Value;

/// Remove markdown code fences around a JSON payload.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse completion text into normalized recipes.
pub fn parse_recipes(content: &str) -> Result<Vec<Recipe>, serde_json::Error> {
    let parsed: Value = serde_json::from_str(&strip_code_fences(content))?;

    let items = match parsed {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("recipes".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    Ok(items.iter().map(normalize_recipe).collect())
}

/// First present, non-empty text value among `keys`.
fn text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn text_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_recipe(value: &Value) -> Recipe {
    let or = |keys: &[&str], default: &str| text(value, keys).unwrap_or_else(|| default.to_string());

    Recipe {
        title: or(&["title"], "Delicious Recipe"),
        description: or(&["description"], ""),
        ingredients: text_list(value, "ingredients"),
        instructions: text_list(value, "instructions"),
        prep_time: or(&["prepTime", "prep_time"], "Not specified"),
        cook_time: or(&["cookTime", "cook_time"], "Not specified"),
        servings: or(&["servings"], "Not specified"),
        category: or(&["category"], "Other"),
        image_url: or(&["imageUrl", "image_url"], ""),
        source: or(&["source"], "Generated"),
    }
}
