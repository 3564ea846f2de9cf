use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use entity::status::ShipmentRequestStatus;
use wasl::{
    model::shipment::BrowseQuery,
    server::{
        controller::{location, shipment},
        model::app::AppState,
    },
};
use wasl_test_utils::prelude::*;

/// Expect 200 when browsing open requests without logging in
#[tokio::test]
async fn browses_without_login() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
    test.marketplace()
        .insert_shipment_request(company.id, ShipmentRequestStatus::Pending)
        .await?;
    let state: AppState = test.to_app_state();

    let result = shipment::browse(State(state), Query(BrowseQuery::default())).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Expect 404 for details of a request that does not exist
#[tokio::test]
async fn details_of_unknown_request_not_found() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let state: AppState = test.to_app_state();

    let result = shipment::details(State(state), Path(12)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect the region list to answer without a database
#[tokio::test]
async fn lists_regions() {
    let resp = location::regions().await.into_response();

    assert_eq!(resp.status(), StatusCode::OK);
}

/// Expect an unknown region to give an empty city list rather than an error
#[tokio::test]
async fn unknown_region_has_no_cities() {
    let resp = location::cities(Path("atlantis".to_string()))
        .await
        .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
}
