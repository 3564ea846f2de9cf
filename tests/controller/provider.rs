use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::status::{BidStatus, ShipmentRequestStatus, UserRole};
use rust_decimal::Decimal;
use wasl::{
    model::bid::SubmitBidDto,
    server::{controller::provider::bid, model::app::AppState},
};
use wasl_test_utils::prelude::*;

use crate::util::login_as;

fn offer(shipment_request_id: i32) -> SubmitBidDto {
    SubmitBidDto {
        shipment_request_id,
        price: Decimal::new(125_050, 2),
        estimated_delivery_days: 4,
        notes: Some("Refrigerated truck available".to_string()),
    }
}

/// Expect 201 for a first bid and 409 for a second bid on the same request
#[tokio::test]
async fn submits_single_bid_per_request() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
    let (user, _) = test.user().insert_provider("p@freight.sa", true).await?;
    let request = test
        .marketplace()
        .insert_shipment_request(company.id, ShipmentRequestStatus::Pending)
        .await?;
    login_as(&test.session, user.id, UserRole::Provider).await;
    let state: AppState = test.to_app_state();

    let result = bid::submit(
        State(state.clone()),
        test.session.clone(),
        Json(offer(request.id)),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let result = bid::submit(State(state), test.session.clone(), Json(offer(request.id))).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect 409 when bidding on a cancelled request
#[tokio::test]
async fn refuses_bid_on_closed_request() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
    let (user, _) = test.user().insert_provider("p@freight.sa", true).await?;
    let request = test
        .marketplace()
        .insert_shipment_request(company.id, ShipmentRequestStatus::Cancelled)
        .await?;
    login_as(&test.session, user.id, UserRole::Provider).await;
    let state: AppState = test.to_app_state();

    let result = bid::submit(State(state), test.session.clone(), Json(offer(request.id))).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect 404 when cancelling another provider's bid
#[tokio::test]
async fn hides_other_provider_bid() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
    let (_, owner) = test.user().insert_provider("owner@freight.sa", true).await?;
    let (user, _) = test.user().insert_provider("other@freight.sa", true).await?;
    let request = test
        .marketplace()
        .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
        .await?;
    let owned = test
        .marketplace()
        .insert_bid(request.id, owner.id, 800, BidStatus::Submitted)
        .await?;
    login_as(&test.session, user.id, UserRole::Provider).await;
    let state: AppState = test.to_app_state();

    let result = bid::cancel(State(state), test.session.clone(), Path(owned.id)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
