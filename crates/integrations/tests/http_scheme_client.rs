//! HttpSchemeClient against a local scheme endpoint

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use pawnshop_config::{SchemeApiStyle, SchemeEndpointConfig};
use pawnshop_core::{SchemeError, SchemeSource};
use pawnshop_integrations::HttpSchemeClient;

async fn current_scheme(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "3" => (
            StatusCode::OK,
            Json(json!({
                "id": 3,
                "name": "Gold Plus",
                "interest_rate": 12.0,
                "loan_duration": 90,
                "additional_conditions": {
                    "processing_fee_percentage": 1.5,
                    "grace_period_days": 15,
                    "scheme_type": "standard"
                }
            })),
        ),
        "500" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        ),
        "403" => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Permission denied"})),
        ),
        "garbled" => (StatusCode::OK, Json(json!({"unexpected": true}))),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Scheme not found"})),
        ),
    }
}

async fn legacy_scheme(Path(id): Path<String>) -> impl IntoResponse {
    Json(json!({
        "id": id,
        "name": "Legacy",
        "interest_rate": "18.00",
        "duration_days": 30,
        "processing_fee_percentage": "2.00",
        "scheme_type": "basic"
    }))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/schemes/:id/json/", get(current_scheme))
        .route("/api/schemes/:id/", get(legacy_scheme));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String, api_style: SchemeApiStyle) -> HttpSchemeClient {
    HttpSchemeClient::new(SchemeEndpointConfig {
        base_url,
        api_style,
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_current_endpoint() {
    let base = spawn_server().await;
    let scheme = client(base, SchemeApiStyle::Current)
        .fetch_scheme("3")
        .await
        .unwrap();

    assert_eq!(scheme.id, "3");
    assert_eq!(scheme.name, "Gold Plus");
    assert_eq!(scheme.interest_rate, 12.0);
    assert_eq!(scheme.loan_duration_days, 90);
    assert_eq!(scheme.processing_fee_percentage, Some(1.5));
    assert_eq!(scheme.grace_period_days, Some(15));
}

#[tokio::test]
async fn test_fetch_legacy_endpoint() {
    let base = spawn_server().await;
    let scheme = client(base, SchemeApiStyle::Legacy)
        .fetch_scheme("8")
        .await
        .unwrap();

    assert_eq!(scheme.id, "8");
    assert_eq!(scheme.interest_rate, 18.0);
    assert_eq!(scheme.loan_duration_days, 30);
    assert_eq!(scheme.processing_fee_percentage, Some(2.0));
}

#[tokio::test]
async fn test_not_found() {
    let base = spawn_server().await;
    let err = client(base, SchemeApiStyle::Current)
        .fetch_scheme("99")
        .await
        .unwrap_err();
    assert_eq!(err, SchemeError::NotFound("99".to_string()));
}

#[tokio::test]
async fn test_non_2xx_is_failure() {
    let base = spawn_server().await;
    let c = client(base, SchemeApiStyle::Current);

    let err = c.fetch_scheme("500").await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let err = c.fetch_scheme("403").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_invalid_body() {
    let base = spawn_server().await;
    let err = client(base, SchemeApiStyle::Current)
        .fetch_scheme("garbled")
        .await
        .unwrap_err();
    assert!(matches!(err, SchemeError::InvalidPayload(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}", addr), SchemeApiStyle::Current)
        .fetch_scheme("3")
        .await
        .unwrap_err();
    assert!(matches!(err, SchemeError::Request(_)));
}
