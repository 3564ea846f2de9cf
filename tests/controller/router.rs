use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use wasl::server::{model::app::AppState, router};
use wasl_test_utils::prelude::*;

fn app(test: &TestContext) -> Router {
    let state: AppState = test.to_app_state();

    router::routes()
        .with_state(state)
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    serde_json::from_slice(&bytes).unwrap()
}

/// Expect the region list to be served through the full router
#[tokio::test]
async fn serves_regions() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    let response = app(&test)
        .oneshot(
            Request::get("/api/locations/regions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.as_array().is_some_and(|regions| !regions.is_empty()));

    Ok(())
}

/// Expect the OpenAPI document to list the login route
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    let response = app(&test)
        .oneshot(
            Request::get("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"].get("/api/auth/login").is_some());
    assert!(body["paths"].get("/api/company/shipments").is_some());

    Ok(())
}

/// Expect 401 with a JSON error for a company route without a session cookie
#[tokio::test]
async fn company_route_requires_session() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;

    let response = app(&test)
        .oneshot(
            Request::get("/api/company/shipments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert!(body["error"].is_string());

    Ok(())
}
