//! Web surface tests: request/response shapes and status codes, with the
//! orchestrator backed by the scripted dispatch.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use smartfields_core::config::SmartfieldsConfig;
use smartfields_core::orchestration::types::RetryPolicy;
use smartfields_core::orchestration::PipelineOrchestrator;
use smartfields_core::web::{create_app, AppState};

use common::{dispatch_arc, ScriptedDispatch, ScriptedWait};

fn test_app(dispatch: Arc<ScriptedDispatch>) -> axum::Router {
    let config = SmartfieldsConfig::default();
    let orchestrator = Arc::new(
        PipelineOrchestrator::new(config.steps(), dispatch).with_retry_policy(RetryPolicy {
            retry_delay: Duration::from_millis(10),
        }),
    );
    create_app(AppState::new(orchestrator, config))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn status_reports_idle_before_any_run() {
    let app = test_app(dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"])));
    let response = app
        .oneshot(Request::get("/pipeline_status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "idle");
    assert_eq!(json["pipeline_running"], false);
    assert_eq!(json["stop_requested"], false);
}

#[tokio::test]
async fn initiate_accepts_and_echoes_coordinates() {
    let app = test_app(dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"])));
    let response = app
        .oneshot(
            Request::post("/initiate_pipeline?lat=43.07&lon=-89.40&camid=ct-3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "pipeline_started");
    assert_eq!(json["coordinates"]["lat"], 43.07);
    assert_eq!(json["camera_id"], "ct-3");
}

#[tokio::test]
async fn initiate_rejects_out_of_range_coordinates() {
    let app = test_app(dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"])));
    let response = app
        .oneshot(
            Request::post("/initiate_pipeline?lat=123.0&lon=0.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_parameters");
}

#[tokio::test]
async fn initiate_while_running_returns_conflict() {
    let dispatch = dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"]));
    dispatch.script_wait("openpasslite", Some("LTT"), ScriptedWait::BlockUntilCancelled);
    let app = test_app(dispatch);

    let first = app
        .clone()
        .oneshot(
            Request::post("/initiate_pipeline?lat=43.0&lon=-89.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(
            Request::post("/initiate_pipeline?lat=43.0&lon=-89.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["error"], "already_running");

    // Unblock the background run before the test ends
    let stop = app
        .oneshot(Request::post("/stop_pipeline").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(stop.status(), StatusCode::OK);
}

#[tokio::test]
async fn stop_when_idle_reports_already_stopped() {
    let dispatch = dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"]));
    let app = test_app(dispatch.clone());

    let response = app
        .oneshot(Request::post("/stop_pipeline").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "already_stopped");
    assert!(dispatch.recorded().is_empty());
}

#[tokio::test]
async fn stop_while_running_lists_contacted_services() {
    let dispatch = dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"]));
    dispatch.script_wait("openpasslite", Some("LTT"), ScriptedWait::BlockUntilCancelled);
    let app = test_app(dispatch);

    app.clone()
        .oneshot(
            Request::post("/initiate_pipeline?lat=43.0&lon=-89.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(Request::post("/stop_pipeline").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "stopped");
    assert_eq!(json["stopped_services"], serde_json::json!(["openpasslite", "wildwings"]));
    assert_eq!(json["failed_services"], serde_json::json!([]));
}

#[tokio::test]
async fn health_lists_configured_services() {
    let app = test_app(dispatch_arc(ScriptedDispatch::new(&["openpasslite", "wildwings"])));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "smartfields");
    assert_eq!(
        json["services_configured"],
        serde_json::json!(["openpasslite", "wildwings"])
    );
}
