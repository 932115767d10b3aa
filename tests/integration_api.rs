//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use solar_quote::api::{AppState, router};

use common::{assert_close, default_config};

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: default_config(),
    })
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn quote_for_thousand_kwh_bill() {
    let (status, json) = get("/quote?bill=471.173882&bank=CIMB&months=24").await;
    assert_eq!(status, StatusCode::OK);

    let usage = json["estimated_usage_kwh"].as_f64().unwrap();
    assert_close(usage, 1000.0, 1e-3, "usage");
    assert_eq!(json["solar"]["panel_count"], 16);
    assert_eq!(json["system_price"], 30_888.0);
    assert_eq!(json["loan"]["bank"], "CIMB");
    assert_eq!(json["loan"]["duration_months"], 24);
    assert_eq!(json["loan"]["interest_rate_percent"], 3.5);
}

#[tokio::test]
async fn surcharge_and_discount_params_flow_through() {
    let (status, json) = get("/quote?bill=471.173882&surcharge=0.1&discount=10&rebate=2000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inputs"]["surcharge_rate"], 0.1);

    // a higher surcharge means less usage for the same bill
    let usage = json["estimated_usage_kwh"].as_f64().unwrap();
    assert!(usage < 1000.0);

    let pricing = &json["pricing"];
    assert!(pricing["effective_discount_percent"].as_f64().unwrap() <= 7.0);
    assert!(pricing["effective_fixed_rebate"].as_f64().unwrap() <= 1_000.0);
}

#[tokio::test]
async fn unknown_bank_is_bad_request() {
    let (status, json) = get("/quote?bill=471.173882&bank=Nowhere").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = json["error"].as_str().unwrap();
    assert!(msg.contains("Nowhere"));
}

#[tokio::test]
async fn unknown_query_param_is_rejected() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/quote?bill=100&colour=blue")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn banks_lists_every_configured_bank() {
    let (status, json) = get("/banks").await;
    assert_eq!(status, StatusCode::OK);

    let banks = json.as_array().unwrap();
    assert_eq!(banks.len(), default_config().financing.banks.len());
    let ambank = banks.iter().find(|b| b["name"] == "AmBank").unwrap();
    assert_eq!(ambank["durations"], serde_json::json!([12, 24, 36]));
}
