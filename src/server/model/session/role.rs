use entity::status::UserRole;
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_ROLE_KEY: &str = "wasl:user:role";

/// Role of the logged in user, stored next to the user ID at login.
pub struct SessionUserRole;

impl SessionUserRole {
    pub async fn insert(session: &Session, role: UserRole) -> Result<(), Error> {
        session.insert(SESSION_USER_ROLE_KEY, role).await?;

        Ok(())
    }

    pub async fn get(session: &Session) -> Result<Option<UserRole>, Error> {
        Ok(session.get::<UserRole>(SESSION_USER_ROLE_KEY).await?)
    }
}

#[cfg(test)]
mod tests {
    use entity::status::UserRole;
    use wasl_test_utils::prelude::*;

    use super::SessionUserRole;

    /// Expect the stored role to be returned
    #[tokio::test]
    async fn round_trips_role() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;

        SessionUserRole::insert(&test.session, UserRole::Provider)
            .await
            .unwrap();
        let role = SessionUserRole::get(&test.session).await.unwrap();

        assert_eq!(role, Some(UserRole::Provider));

        Ok(())
    }

    /// Expect None before login
    #[tokio::test]
    async fn returns_none_without_login() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;

        let role = SessionUserRole::get(&test.session).await.unwrap();

        assert!(role.is_none());

        Ok(())
    }
}
