use entity::status::UserRole;

use super::*;

fn change(current: &str, new: &str, confirm: &str) -> ChangePasswordDto {
    ChangePasswordDto {
        current_password: current.to_string(),
        new_password: new.to_string(),
        confirm_password: confirm.to_string(),
    }
}

/// Expect the new password to work for login afterwards
#[tokio::test]
async fn changes_password() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_provider("p@freight.sa", true).await?;
    let service = AuthService::new(&test.db);

    service
        .change_password(
            user.id,
            change(TEST_PASSWORD, "brand-new-secret", "brand-new-secret"),
        )
        .await
        .unwrap();

    let result = service
        .login(LoginDto {
            email: "p@freight.sa".to_string(),
            password: "brand-new-secret".to_string(),
        })
        .await;
    assert!(result.is_ok());

    Ok(())
}

/// Expect an incorrect current password to be refused
#[tokio::test]
async fn rejects_incorrect_current_password() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let user = test
        .user()
        .insert_user("admin@wasl.sa", UserRole::Admin)
        .await?;
    let service = AuthService::new(&test.db);

    let result = service
        .change_password(
            user.id,
            change("wrong-password", "brand-new-secret", "brand-new-secret"),
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::IncorrectPassword(_)))
    ));

    Ok(())
}

/// Expect a short new password to fail validation
#[tokio::test]
async fn rejects_short_password() -> Result<(), TestError> {
    let mut test = test_setup_with_marketplace_tables!()?;
    let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
    let service = AuthService::new(&test.db);

    let result = service
        .change_password(user.id, change(TEST_PASSWORD, "short", "short"))
        .await;

    assert!(matches!(result, Err(Error::ValidationError(_))));

    Ok(())
}
