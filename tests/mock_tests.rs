//! Tests against a mocked completion API.
//!
//! Each test starts a wiremock server standing in for the OpenAI chat
//! completions endpoint and drives the router with `oneshot`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use planted_api::core::config::OpenAiConfig;
use planted_api::{build_router, AppConfig, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Build a router whose completion client points at `mock_server`
fn app_for(mock_server: &MockServer) -> Router {
    let config = AppConfig {
        openai: OpenAiConfig {
            api_key: Some("test_key".to_string()),
            api_base: mock_server.uri(),
            ..Default::default()
        },
        ..Default::default()
    };
    build_router(Arc::new(AppState::new(config).unwrap()))
}

/// Chat completion body with one choice
fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    })
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_iso_timestamp(value: &Value) {
    let ts = value.as_str().expect("timestamp is a string");
    assert!(ts.ends_with('Z'), "timestamp not UTC: {ts}");
    assert!(
        chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
        "timestamp not RFC 3339: {ts}"
    );
}

#[tokio::test]
async fn test_plant_plan_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test_key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Plan X")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/plant-plan", json!({ "plantName": "Basil" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["plantName"], "Basil");
    assert_eq!(body["carePlan"], "Plan X");
    assert_iso_timestamp(&body["timestamp"]);
}

#[tokio::test]
async fn test_plant_plan_defaults_reach_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, _) = post(app, "/api/plant-plan", json!({ "plantName": "Basil" })).await;
    assert_eq!(status, StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["role"], "user");
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Basil"));
    assert!(user.contains("Location: indoor"));
    assert!(user.contains("Sunlight: medium"));
    assert!(user.contains("Watering frequency: weekly"));
    assert!((sent["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_nutrition_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "max_tokens": 1500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Eat lentils")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(
        app,
        "/api/nutrition",
        json!({ "goal": "more energy", "activityLevel": "high" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["goal"], "more energy");
    assert_eq!(body["nutritionPlan"], "Eat lentils");
    assert_iso_timestamp(&body["timestamp"]);

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("more energy"));
    assert!(user.contains("Activity level: high."));
    assert!(!user.contains("Current diet"));
}

#[tokio::test]
async fn test_recipes_success_echoes_ingredients() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "max_tokens": 2000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("1. Chickpea curry")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(
        app,
        "/api/recipes",
        json!({ "ingredients": ["chickpeas", "spinach"], "mealType": "dinner" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recipes"], "1. Chickpea curry");
    assert_eq!(body["ingredients"], json!(["chickpeas", "spinach"]));
    assert_iso_timestamp(&body["timestamp"]);

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("chickpeas, spinach"));
    assert!((sent["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn test_recipes_echoes_mixed_ingredients_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Tofu bowl")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/recipes", json!({ "ingredients": ["tofu", 2, 1.5] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredients"], json!(["tofu", 2, 1.5]));

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("tofu, 2, 1.5"));
}

#[tokio::test]
async fn test_ai_prefixed_recipe_search_reaches_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"recipes": [{"title": "Miso soup"}]}"#)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) =
        post(app, "/api/ai/recipe-search", json!({ "searchQuery": "miso" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipes"][0]["title"], "Miso soup");
}

#[tokio::test]
async fn test_identical_requests_produce_identical_upstream_bodies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("same")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let request = json!({
        "goal": "lose weight",
        "currentDiet": "vegetarian",
        "restrictions": "nut allergy"
    });

    let (first, _) = post(app.clone(), "/api/nutrition", request.clone()).await;
    let (second, _) = post(app, "/api/nutrition", request).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_upstream_error_is_relayed_with_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "error": "rate_limited" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/nutrition", json!({ "goal": "more energy" })).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({
            "error": "OpenAI API error",
            "details": { "error": "rate_limited" }
        })
    );
}

#[tokio::test]
async fn test_upstream_auth_error_is_relayed() {
    let mock_server = MockServer::start().await;

    let upstream_error = json!({
        "error": {
            "message": "Incorrect API key provided",
            "type": "invalid_request_error",
            "code": "invalid_api_key"
        }
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(upstream_error.clone()))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/recipes", json!({ "ingredients": ["rice"] })).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "OpenAI API error");
    assert_eq!(body["details"], upstream_error);
}

#[tokio::test]
async fn test_non_json_upstream_error_is_relayed_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/plant-plan", json!({ "plantName": "Basil" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "OpenAI API error");
    assert_eq!(body["details"], "Bad Gateway");
}

#[tokio::test]
async fn test_connection_failure_returns_500() {
    let config = AppConfig {
        openai: OpenAiConfig {
            api_key: Some("test_key".to_string()),
            api_base: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let app = build_router(Arc::new(AppState::new(config).unwrap()));

    let (status, body) = post(app, "/api/plant-plan", json!({ "plantName": "Basil" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate plant care plan");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_empty_choices_returns_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/nutrition", json!({ "goal": "more energy" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate nutrition plan");
}

#[tokio::test]
async fn test_non_json_success_body_returns_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/recipes", json!({ "ingredients": ["oats"] })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate recipes");
}

#[tokio::test]
async fn test_recipe_search_success() {
    let mock_server = MockServer::start().await;

    let content = r#"```json
{"recipes": [
  {"title": "Chana Masala", "ingredients": ["chickpeas", "tomato"], "instructions": ["Simmer"], "prep_time": "10 mins"},
  {"description": "No title here"}
]}
```"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 4000,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(
        app,
        "/api/recipe-search",
        json!({ "searchQuery": "  chickpea curry ", "maxResults": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["searchQuery"], "chickpea curry");
    assert_iso_timestamp(&body["timestamp"]);

    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["title"], "Chana Masala");
    assert_eq!(recipes[0]["prepTime"], "10 mins");
    assert_eq!(recipes[0]["cookTime"], "Not specified");
    assert_eq!(recipes[1]["title"], "Delicious Recipe");
    assert_eq!(recipes[1]["source"], "Generated");

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Create 2 delicious recipes"));
    let system = sent["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("- Create 2 diverse, high-quality recipes"));
    assert!(user.contains("\"chickpea curry\""));
}

#[tokio::test]
async fn test_recipe_search_unparseable_completion_returns_502() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Here are some recipes!")),
        )
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let (status, body) = post(app, "/api/recipe-search", json!({ "searchQuery": "soup" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to parse recipe results");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_trailing_slash_in_api_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = AppConfig {
        openai: OpenAiConfig {
            api_key: Some("test_key".to_string()),
            api_base: format!("{}/", mock_server.uri()),
            ..Default::default()
        },
        ..Default::default()
    };
    let app = build_router(Arc::new(AppState::new(config).unwrap()));

    let (status, _) = post(app, "/api/nutrition", json!({ "goal": "focus" })).await;
    assert_eq!(status, StatusCode::OK);
}
