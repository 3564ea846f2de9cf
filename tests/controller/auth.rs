use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use entity::status::UserRole;
use wasl::{
    model::auth::{LoginDto, RegisterCompanyDto, RegisterProviderDto},
    server::{
        controller::auth::{get_user, login, logout, register_company, register_provider},
        model::{
            app::AppState,
            session::{role::SessionUserRole, user::SessionUserId},
        },
    },
};
use wasl_test_utils::prelude::*;

use crate::util::login_as;

fn credentials(email: &str) -> LoginDto {
    LoginDto {
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

fn company_registration(email: &str) -> RegisterCompanyDto {
    RegisterCompanyDto {
        company_name: "Acme Trading".to_string(),
        business_registration_number: "1010123456".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        phone_number: TEST_PHONE_NUMBER.to_string(),
        address: "King Fahd Road 1".to_string(),
        region: TEST_REGION.to_string(),
        city: TEST_CITY.to_string(),
    }
}

fn provider_registration(email: &str) -> RegisterProviderDto {
    RegisterProviderDto {
        company_name: "Fast Freight".to_string(),
        business_registration_number: "1010654321".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        phone_number: TEST_PHONE_NUMBER.to_string(),
        address: "Industrial Area 2".to_string(),
        region: TEST_REGION.to_string(),
        city: TEST_CITY.to_string(),
        service_description: None,
    }
}

/// Expect 200 and the user stored in session for an approved company
#[tokio::test]
async fn login_stores_user_in_session() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    let state: AppState = test.to_app_state();

    let result = login(
        State(state),
        test.session.clone(),
        Json(credentials("ops@acme.sa")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let session_user_id = SessionUserId::get(&test.session).await.unwrap();
    let session_role = SessionUserRole::get(&test.session).await.unwrap();
    assert_eq!(session_user_id, Some(user.id));
    assert_eq!(session_role, Some(UserRole::Company));

    Ok(())
}

/// Expect 403 for a company still awaiting approval
#[tokio::test]
async fn login_refuses_pending_company() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    test.user().insert_company("ops@acme.sa", false).await?;
    let state: AppState = test.to_app_state();

    let result = login(
        State(state),
        test.session.clone(),
        Json(credentials("ops@acme.sa")),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let session_user_id = SessionUserId::get(&test.session).await.unwrap();
    assert!(session_user_id.is_none());

    Ok(())
}

/// Expect 401 for a wrong password
#[tokio::test]
async fn login_refuses_wrong_password() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    test.user().insert_provider("p@freight.sa", true).await?;
    let state: AppState = test.to_app_state();

    let result = login(
        State(state),
        test.session.clone(),
        Json(LoginDto {
            email: "p@freight.sa".to_string(),
            password: "not-the-password".to_string(),
        }),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect 303 to the dashboard when the caller is already logged in
#[tokio::test]
async fn login_redirects_authenticated_user() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_admin("admin@wasl.sa").await?;
    login_as(&test.session, user.id, UserRole::Admin).await;
    let state: AppState = test.to_app_state();

    let result = login(
        State(state),
        test.session.clone(),
        Json(credentials("admin@wasl.sa")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    Ok(())
}

/// Expect 303 when a logged in user posts a company registration
#[tokio::test]
async fn register_company_redirects_authenticated_user() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Company).await;
    let state: AppState = test.to_app_state();

    let result = register_company(
        State(state),
        test.session.clone(),
        Json(company_registration("new@acme.sa")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    Ok(())
}

/// Expect 303 when a logged in user posts a provider registration
#[tokio::test]
async fn register_provider_redirects_authenticated_user() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_provider("p@freight.sa", true).await?;
    login_as(&test.session, user.id, UserRole::Provider).await;
    let state: AppState = test.to_app_state();

    let result = register_provider(
        State(state),
        test.session.clone(),
        Json(provider_registration("new@freight.sa")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    Ok(())
}

/// Expect 201 for a new company and 409 when the email is registered again
#[tokio::test]
async fn register_company_rejects_duplicate_email() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let state: AppState = test.to_app_state();

    let result = register_company(
        State(state.clone()),
        test.session.clone(),
        Json(company_registration("new@acme.sa")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let result = register_company(
        State(state),
        test.session.clone(),
        Json(company_registration("new@acme.sa")),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect 400 when the confirmation does not match the password
#[tokio::test]
async fn register_company_rejects_mismatched_password() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let state: AppState = test.to_app_state();

    let mut registration = company_registration("new@acme.sa");
    registration.confirm_password = "something-else-entirely".to_string();

    let result = register_company(State(state), test.session.clone(), Json(registration)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 307 redirect after logout and the session cleared
#[tokio::test]
async fn logout_clears_session() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    login_as(&test.session, 1, UserRole::Company).await;

    let result = logout(test.session.clone()).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let session_user_id = SessionUserId::get(&test.session).await.unwrap();
    assert!(session_user_id.is_none());

    Ok(())
}

/// Expect 307 redirect after logout even without session data
#[tokio::test]
async fn logout_without_session_redirects() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    let result = logout(test.session.clone()).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    Ok(())
}

/// Expect 401 when fetching the current user without a session
#[tokio::test]
async fn get_user_requires_session() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let state: AppState = test.to_app_state();

    let result = get_user(State(state), test.session.clone()).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
