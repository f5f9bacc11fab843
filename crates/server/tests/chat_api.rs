//! Router tests driven in-process

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower::ServiceExt;

use triage_agent::{DialogEngine, PredictionAdapter, TableDiseaseModel};
use triage_config::{DiseaseTable, LexiconEntry, RepliesConfig, Settings, SymptomLexicon};
use triage_core::{DiseasePredictor, Error, Prediction, Result};
use triage_server::{create_router, AppState};
use triage_text_processing::{IntentDetector, LexiconSymptomExtractor};

fn lexicon() -> SymptomLexicon {
    SymptomLexicon {
        symptoms: vec![
            LexiconEntry {
                preferred_name: "fever".into(),
                synonyms: vec!["high temperature".into()],
            },
            LexiconEntry {
                preferred_name: "cough".into(),
                synonyms: vec!["coughing".into()],
            },
            LexiconEntry {
                preferred_name: "runny nose".into(),
                synonyms: vec![],
            },
        ],
    }
}

fn diseases() -> DiseaseTable {
    serde_json::from_value(json!({
        "diseases": [
            { "name": "flu", "symptoms": ["fever", "cough"] },
            { "name": "common cold", "symptoms": ["cough", "runny nose", "sneezing", "sore throat"] }
        ]
    }))
    .unwrap()
}

struct BrokenModel;

#[async_trait]
impl DiseasePredictor for BrokenModel {
    async fn predict(&self, _symptoms: &BTreeSet<String>, _top_n: usize) -> Result<Vec<Prediction>> {
        Err(Error::PredictionUnavailable("weights not loaded".into()))
    }

    fn model_name(&self) -> &str {
        "broken"
    }
}

fn app_with(predictor: Arc<dyn DiseasePredictor>) -> axum::Router {
    let settings = Settings::default();
    let engine = DialogEngine::new(
        Arc::new(IntentDetector::new()),
        Arc::new(LexiconSymptomExtractor::from_lexicon(&lexicon()).unwrap()),
        predictor,
        settings.dialog.clone(),
        RepliesConfig::default(),
    );
    create_router(AppState::new(settings, Arc::new(engine)))
}

fn app() -> axum::Router {
    app_with(Arc::new(PredictionAdapter::new(TableDiseaseModel::from_table(
        &diseases(),
    ))))
}

async fn post_chat(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_greeting_starts_conversation() {
    let (status, body) = post_chat(app(), json!({ "message": "Hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Hello! Please describe your symptoms.");
    assert_eq!(body["intent"], "greeting");
    assert_eq!(body["dialog_state"]["awaiting_symptoms"], true);
    assert_eq!(body["dialog_state"]["transcript"], json!(["Hello"]));
}

#[tokio::test]
async fn test_two_turn_conversation_finalizes() {
    let (_, first) = post_chat(app(), json!({ "message": "hello", "dialog_state": null })).await;

    let (status, second) = post_chat(
        app(),
        json!({
            "message": "I have a high temperature and coughing",
            "dialog_state": first["dialog_state"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply = second["reply"].as_str().unwrap();
    assert!(reply.contains("flu: 100.0%"));
    assert!(reply.contains("Final assessment: flu"));
    assert_eq!(second["dialog_state"]["final_assessment_delivered"], true);
    assert_eq!(
        second["dialog_state"]["last_predictions"][0],
        json!({ "disease": "flu", "probability": 1.0 })
    );
}

#[tokio::test]
async fn test_low_confidence_asks_for_confirmation() {
    let state = json!({ "awaiting_symptoms": true });
    let (status, body) =
        post_chat(app(), json!({ "message": "runny nose", "dialog_state": state })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dialog_state"]["awaiting_confirmation"], true);
    assert!(body["reply"].as_str().unwrap().ends_with("(yes/no)"));
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let (status, body) = post_chat(app(), json!({ "message": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("message"));
}

#[tokio::test]
async fn test_malformed_state_starts_fresh() {
    let bad_flags = json!({
        "symptoms": ["fever"],
        "awaiting_symptoms": true,
        "awaiting_confirmation": true
    });
    let (status, body) =
        post_chat(app(), json!({ "message": "hello", "dialog_state": bad_flags })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dialog_state"]["symptoms"], json!([]));
    assert_eq!(body["dialog_state"]["transcript"], json!(["hello"]));

    let (status, body) =
        post_chat(app(), json!({ "message": "hello", "dialog_state": "garbage" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "greeting");
}

#[tokio::test]
async fn test_unranked_predictions_are_not_finalized() {
    let tampered = json!({
        "last_predictions": [
            { "disease": "cold", "probability": 0.1 },
            { "disease": "flu", "probability": 7.5 }
        ],
        "awaiting_confirmation": true
    });
    let (status, body) =
        post_chat(app(), json!({ "message": "no", "dialog_state": tampered })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["reply"].as_str().unwrap().contains("Final assessment"));
    assert_eq!(body["dialog_state"]["last_predictions"], json!([]));
    assert_eq!(body["dialog_state"]["final_assessment_delivered"], false);
    assert_eq!(body["dialog_state"]["transcript"], json!(["no"]));
}

#[tokio::test]
async fn test_prediction_failure_is_service_error() {
    let (status, body) = post_chat(
        app_with(Arc::new(BrokenModel)),
        json!({ "message": "fever", "dialog_state": { "awaiting_symptoms": true } }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("weights not loaded"));
    assert!(body.get("reply").is_none());
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let response = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
