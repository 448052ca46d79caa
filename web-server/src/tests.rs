use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use cardio_core::{EngineConfig, HistoryStore, MemoryHistory, RiskEngine};

use crate::{create_router, AppState};

type SharedHistory = Arc<Mutex<Box<dyn HistoryStore>>>;

fn test_app() -> (Router, SharedHistory) {
    let artifacts = Path::new(env!("CARGO_MANIFEST_DIR")).join("../artifacts");
    let engine = RiskEngine::load(
        &artifacts.join("model.json"),
        &artifacts.join("columns.json"),
        EngineConfig::default(),
    )
    .unwrap();

    let history: SharedHistory = Arc::new(Mutex::new(Box::new(MemoryHistory::new())));
    let state = AppState {
        engine: Arc::new(engine),
        history: history.clone(),
    };
    (create_router(state), history)
}

fn sample_body() -> Value {
    json!({
        "age": 63,
        "sex": "Male",
        "chest_pain_type": "Typical Angina",
        "resting_blood_pressure": 145,
        "cholesterol": 233,
        "fasting_blood_sugar": "Yes",
        "rest_ecg": "Normal",
        "max_heart_rate": 150,
        "exercise_induced_angina": "No",
        "oldpeak": 2.3,
        "slope": "Down"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_schema_lists_fields() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/schema", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["field_count"], 11);
    assert_eq!(body["fields"][0]["name"], "age");
    assert_eq!(body["fields"][0]["kind"], "number");
    assert_eq!(body["fields"][1]["options"][1]["slug"], "male");
}

#[tokio::test]
async fn test_predict_appends_one_entry() {
    let (app, history) = test_app();

    let (status, body) = send(&app, Method::POST, "/api/v1/predict", Some(sample_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["percent"], 58.9);
    assert_eq!(body["prediction"]["label"], "risk");
    assert_eq!(body["top_factors"].as_array().unwrap().len(), 5);
    assert_eq!(body["explanation"]["contributions"].as_array().unwrap().len(), 11);
    assert!(!body["tips"].as_array().unwrap().is_empty());
    assert!(body["tips_fallback"].is_null());
    assert_eq!(body["population"][1]["feature"], "cholesterol");
    assert_eq!(body["entry"]["explained"], true);

    assert_eq!(history.lock().len().unwrap(), 1);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range() {
    let (app, history) = test_app();
    let mut body = sample_body();
    body["age"] = json!(150);

    let (status, body) = send(&app, Method::POST, "/api/v1/predict", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("age"));
    assert!(history.lock().is_empty().unwrap());
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let (app, history) = test_app();
    let mut body = sample_body();
    body.as_object_mut().unwrap().remove("slope");

    let (status, _) = send(&app, Method::POST, "/api/v1/predict", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(history.lock().is_empty().unwrap());
}

#[tokio::test]
async fn test_predict_rejects_malformed_json() {
    let (app, _) = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"age\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_list_and_delete() {
    let (app, _) = test_app();
    for age in [40, 50, 60] {
        let mut body = sample_body();
        body["age"] = json!(age);
        send(&app, Method::POST, "/api/v1/predict", Some(body)).await;
    }

    let (status, list) = send(&app, Method::GET, "/api/v1/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 3);
    assert_eq!(list["items"][2]["index"], 2);
    assert_eq!(list["items"][2]["record"]["age"], 60.0);
    assert_eq!(list["items"][0]["current_layout"], true);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/history/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remaining"], 2);

    let (_, list) = send(&app, Method::GET, "/api/v1/history", None).await;
    assert_eq!(list["items"][1]["record"]["age"], 60.0);
}

#[tokio::test]
async fn test_delete_out_of_range_is_not_found() {
    let (app, history) = test_app();
    send(&app, Method::POST, "/api/v1/predict", Some(sample_body())).await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/history/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(history.lock().len().unwrap(), 1);
}

#[tokio::test]
async fn test_delete_invalid_index_is_json_not_found() {
    let (app, history) = test_app();
    send(&app, Method::POST, "/api/v1/predict", Some(sample_body())).await;

    for uri in ["/api/v1/history/-1", "/api/v1/history/first"] {
        let (status, body) = send(&app, Method::DELETE, uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["status"], 404);
        assert!(body["error"].as_str().unwrap().contains("invalid history index"));
    }
    assert_eq!(history.lock().len().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_predictions_all_stored() {
    let (app, history) = test_app();

    let (a, b, c, d) = tokio::join!(
        send(&app, Method::POST, "/api/v1/predict", Some(sample_body())),
        send(&app, Method::POST, "/api/v1/predict", Some(sample_body())),
        send(&app, Method::POST, "/api/v1/predict", Some(sample_body())),
        send(&app, Method::POST, "/api/v1/predict", Some(sample_body())),
    );

    for (status, _) in [a, b, c, d] {
        assert_eq!(status, StatusCode::OK);
    }

    let entries = history.lock().list().unwrap();
    assert_eq!(entries.len(), 4);
    let mut ids: Vec<_> = entries.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn test_delete_selected() {
    let (app, history) = test_app();
    for _ in 0..3 {
        send(&app, Method::POST, "/api/v1/predict", Some(sample_body())).await;
    }

    let (status, _) = send(&app, Method::POST, "/api/v1/history/delete", Some(json!({ "indices": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/v1/history/delete", Some(json!({ "indices": [0, 9] }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(history.lock().len().unwrap(), 3);

    let (status, body) =
        send(&app, Method::POST, "/api/v1/history/delete", Some(json!({ "indices": [0, 2] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);
    assert_eq!(body["remaining"], 1);
}

#[tokio::test]
async fn test_what_if_does_not_store() {
    let (app, history) = test_app();
    let request = json!({
        "record": sample_body(),
        "resting_blood_pressure": 120
    });

    let (status, body) = send(&app, Method::POST, "/api/v1/what-if", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseline"]["label"], "risk");
    assert_eq!(body["adjusted"]["label"], "no_risk");
    assert!(body["delta"].as_f64().unwrap() < 0.0);
    assert!(history.lock().is_empty().unwrap());
}

#[tokio::test]
async fn test_what_if_validates_adjustments() {
    let (app, _) = test_app();
    let request = json!({
        "record": sample_body(),
        "cholesterol": 700
    });

    let (status, _) = send(&app, Method::POST, "/api/v1/what-if", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_counts_predictions() {
    let (app, _) = test_app();
    send(&app, Method::POST, "/api/v1/predict", Some(sample_body())).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model"]["trees"], 3);
    assert_eq!(body["threshold"], 0.5);
    assert_eq!(body["inference_count"], 1);
}
