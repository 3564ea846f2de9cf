use entity::status::{AccountStatus, UserRole};

use crate::server::data::{company::CompanyRepository, provider::ProviderRepository};

use super::*;

/// Expect a company user and an unapproved company profile
#[tokio::test]
async fn registers_pending_company() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let service = AuthService::new(&test.db);

    let user = service
        .register_company(company_registration("Ops@Acme.sa"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Company);
    assert_eq!(user.email, "ops@acme.sa");
    let company = CompanyRepository::new(&test.db)
        .find_by_user_id(user.id)
        .await?
        .unwrap();
    assert!(!company.is_approved);
    assert_eq!(company.status, AccountStatus::PendingApproval);
    assert_eq!(company.name, "Acme Trading");

    Ok(())
}

/// Expect the provider's service description to be stored
#[tokio::test]
async fn registers_provider_with_description() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let service = AuthService::new(&test.db);

    let user = service
        .register_provider(provider_registration("dispatch@freight.sa"))
        .await
        .unwrap();

    let provider = ProviderRepository::new(&test.db)
        .find_by_user_id(user.id)
        .await?
        .unwrap();
    assert_eq!(user.role, UserRole::Provider);
    assert!(provider.service_description.is_some());

    Ok(())
}

/// Expect a second registration with the same email to be refused
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let service = AuthService::new(&test.db);

    service
        .register_company(company_registration("ops@acme.sa"))
        .await
        .unwrap();
    let result = service
        .register_provider(provider_registration("ops@acme.sa"))
        .await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::EmailAlreadyRegistered(_)))
    ));

    Ok(())
}

/// Expect a city outside the chosen region to fail validation
#[tokio::test]
async fn rejects_city_outside_region() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let service = AuthService::new(&test.db);

    let mut payload = company_registration("ops@acme.sa");
    payload.city = "jeddah".to_string();
    let result = service.register_company(payload).await;

    assert!(matches!(result, Err(Error::ValidationError(_))));

    Ok(())
}

/// Expect mismatched password confirmation to fail validation
#[tokio::test]
async fn rejects_mismatched_confirmation() -> Result<(), TestError> {
    let test = test_setup_with_marketplace_tables!()?;
    let service = AuthService::new(&test.db);

    let mut payload = company_registration("ops@acme.sa");
    payload.confirm_password = "something-else".to_string();
    let result = service.register_company(payload).await;

    assert!(matches!(result, Err(Error::ValidationError(_))));

    Ok(())
}
