use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use entity::status::UserRole;
use wasl::server::{
    controller::admin::{account, marketplace},
    model::app::AppState,
};
use wasl_test_utils::prelude::*;

use crate::util::login_as;

/// Expect 200 when an admin approves a pending company
#[tokio::test]
async fn toggles_company_approval() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (admin_user, _) = test.user().insert_admin("admin@wasl.sa").await?;
    let (_, company) = test.user().insert_company("ops@acme.sa", false).await?;
    login_as(&test.session, admin_user.id, UserRole::Admin).await;
    let state: AppState = test.to_app_state();

    let result =
        account::toggle_company_approval(State(state), test.session.clone(), Path(company.id))
            .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Expect 404 when toggling a company that does not exist
#[tokio::test]
async fn toggle_unknown_company_not_found() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (admin_user, _) = test.user().insert_admin("admin@wasl.sa").await?;
    login_as(&test.session, admin_user.id, UserRole::Admin).await;
    let state: AppState = test.to_app_state();

    let result =
        account::toggle_company_approval(State(state), test.session.clone(), Path(404)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect 403 when a company calls an admin endpoint
#[tokio::test]
async fn refuses_company_caller() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result = account::providers(State(state), test.session.clone()).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect 409 when deleting a shipment request that a contract references
#[tokio::test]
async fn refuses_deleting_contracted_request() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (admin_user, _) = test.user().insert_admin("admin@wasl.sa").await?;
    let chain = test.marketplace().insert_contract_chain(true).await?;
    login_as(&test.session, admin_user.id, UserRole::Admin).await;
    let state: AppState = test.to_app_state();

    let result = marketplace::delete_shipment_request(
        State(state),
        test.session.clone(),
        Path(chain.shipment_request.id),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}
