use tower_sessions::Session;

use crate::{
    model::auth::UserDto,
    server::{
        error::{auth::AuthError, Error},
        model::{app::AppState, session::user::SessionUserId},
        service::auth::AuthService,
    },
};

/// Retrieves user information from session and then from database
///
/// # Arguments
/// - `state`: Application state with database connection
/// - `session`: The user's session
///
/// # Returns
/// - `Ok(UserDto)`: User found
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: User ID not present in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User ID exists in session but not
///   found in database (session is cleared)
/// - `Err(Error)`: Internal errors (database query failures, session errors, etc.)
pub async fn get_user_from_session(state: &AppState, session: &Session) -> Result<UserDto, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = AuthService::new(&state.db).get_user(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}

#[cfg(test)]
mod tests {
    use entity::status::UserRole;
    use wasl_test_utils::prelude::*;

    use crate::server::{
        controller::util::get_user::get_user_from_session,
        error::{auth::AuthError, Error},
        model::{app::AppState, session::user::SessionUserId},
    };

    /// Expect the logged in user to be returned
    #[tokio::test]
    async fn returns_session_user() -> Result<(), TestError> {
        let mut test = test_setup_with_marketplace_tables!()?;
        let (user, _) = test.user().insert_company("ops@acme.sa", true).await?;
        SessionUserId::insert(&test.session, user.id).await.unwrap();
        let state: AppState = test.to_app_state();

        let found = get_user_from_session(&state, &test.session).await.unwrap();

        assert_eq!(found.id, user.id);
        assert_eq!(found.role, UserRole::Company);

        Ok(())
    }

    /// Expect a stale user id to clear the session
    #[tokio::test]
    async fn clears_session_for_missing_user() -> Result<(), TestError> {
        let test = test_setup_with_marketplace_tables!()?;
        SessionUserId::insert(&test.session, 42).await.unwrap();
        let state: AppState = test.to_app_state();

        let result = get_user_from_session(&state, &test.session).await;

        assert!(matches!(
            result,
            Err(Error::AuthError(AuthError::UserNotInDatabase(42)))
        ));
        assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

        Ok(())
    }
}
