use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use entity::status::{BidStatus, PaymentStatus, ShipmentRequestStatus, UserRole};
use rust_decimal::Decimal;
use wasl::{
    model::{
        payment::CardDetailsDto,
        shipment::{ShipmentRequestPayload, ShipmentStatusQuery},
    },
    server::{
        controller::company::{bid, payment, shipment},
        model::app::AppState,
    },
};
use wasl_test_utils::prelude::*;

use crate::util::login_as;

fn shipment_payload() -> ShipmentRequestPayload {
    ShipmentRequestPayload {
        goods_type: "Furniture".to_string(),
        weight_kg: Decimal::from(420),
        pickup_location: "Warehouse 3".to_string(),
        pickup_city: "riyadh".to_string(),
        pickup_region: "riyadh".to_string(),
        delivery_location: "Corniche Road 8".to_string(),
        delivery_city: "jeddah".to_string(),
        delivery_region: "makkah".to_string(),
        delivery_deadline: Utc::now().naive_utc() + Duration::days(7),
        special_instructions: None,
    }
}

/// Expect 201 when a logged in company posts a shipment request
#[tokio::test]
async fn creates_shipment_request() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result = shipment::create(
        State(state),
        test.session.clone(),
        Json(shipment_payload()),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    Ok(())
}

/// Expect 400 for a delivery deadline in the past
#[tokio::test]
async fn rejects_past_deadline() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let mut payload = shipment_payload();
    payload.delivery_deadline = Utc::now().naive_utc() - Duration::days(1);

    let result = shipment::create(State(state), test.session.clone(), Json(payload)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 401 for an anonymous caller
#[tokio::test]
async fn shipment_list_requires_login() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let state: AppState = test.to_app_state();

    let result = shipment::list(
        State(state),
        test.session.clone(),
        Query(ShipmentStatusQuery::default()),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect 403 when a provider calls a company endpoint
#[tokio::test]
async fn shipment_list_refuses_provider() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_provider("p@freight.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Provider).await;
    let state: AppState = test.to_app_state();

    let result = shipment::list(
        State(state),
        test.session.clone(),
        Query(ShipmentStatusQuery::default()),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect 404 when reading another company's shipment request
#[tokio::test]
async fn hides_other_company_shipment() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (_, owner) = test.user().insert_company("owner@acme.sa", true).await?;
    let (user, _) = test.user().insert_company("other@acme.sa", true).await?;
    let request = test
        .marketplace()
        .insert_shipment_request(owner.id, ShipmentRequestStatus::Pending)
        .await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result = shipment::get(State(state), test.session.clone(), Path(request.id)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect 200 on accepting a submitted bid and 409 when accepting it again
#[tokio::test]
async fn accepts_bid_once() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, company) = test.user().insert_company("ops@acme.sa", true).await?;
    let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
    let request = test
        .marketplace()
        .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
        .await?;
    let submitted = test
        .marketplace()
        .insert_bid(request.id, provider.id, 900, BidStatus::Submitted)
        .await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result =
        bid::accept(State(state.clone()), test.session.clone(), Path(submitted.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let result = bid::accept(State(state), test.session.clone(), Path(submitted.id)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect 200 when a company reads its own payment
#[tokio::test]
async fn shows_own_payment() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let chain = test.marketplace().insert_contract_chain(true).await?;
    let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
    let paid = test
        .marketplace()
        .insert_payment(invoice.id, 1500, PaymentStatus::Successful)
        .await?;
    login_as(&test.session, chain.company_user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result = payment::show(State(state), test.session.clone(), Path(paid.id)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Expect 400 when processing a payment with an expired card
#[tokio::test]
async fn process_rejects_expired_card() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let chain = test.marketplace().insert_contract_chain(true).await?;
    let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
    let pending = test
        .marketplace()
        .insert_payment(invoice.id, 1500, PaymentStatus::Pending)
        .await?;
    login_as(&test.session, chain.company_user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();
    let card = CardDetailsDto {
        card_number: "4111 1111 1111 1111".to_string(),
        expiry: "01/20".to_string(),
        cvv: "123".to_string(),
        holder_name: "Sara Alharbi".to_string(),
    };

    let result = payment::process(
        State(state),
        test.session.clone(),
        Path(pending.id),
        Json(card),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
