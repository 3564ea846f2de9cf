use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_USER_ID_KEY: &str = "wasl:user:id";

#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionUserId(pub String);

impl SessionUserId {
    /// Insert user ID into session
    pub async fn insert(session: &Session, user_id: i32) -> Result<(), Error> {
        session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user_id.to_string()))
            .await?;

        Ok(())
    }

    /// Get user ID from session
    pub async fn get(session: &Session) -> Result<Option<i32>, Error> {
        session
            .get::<SessionUserId>(SESSION_USER_ID_KEY)
            .await?
            .map(|SessionUserId(id_str)| {
                id_str.parse::<i32>().map_err(|e| {
                    Error::ParseError(format!("Failed to parse session user id: {}", e))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    mod insert {
        use wasl_test_utils::prelude::*;

        use crate::server::model::session::user::SessionUserId;

        /// Expect success when inserting valid user ID into session
        #[tokio::test]
        async fn inserts_user_id() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;

            let result = SessionUserId::insert(&test.session, 1).await;

            assert!(result.is_ok());

            Ok(())
        }
    }

    mod get {
        use wasl_test_utils::prelude::*;

        use crate::server::model::session::user::{SessionUserId, SESSION_USER_ID_KEY};

        /// Expect Some when user ID is present in session
        #[tokio::test]
        async fn returns_inserted_user_id() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;
            SessionUserId::insert(&test.session, 7).await.unwrap();

            let result = SessionUserId::get(&test.session).await;

            assert!(matches!(result, Ok(Some(7))));

            Ok(())
        }

        /// Expect None when no user ID is present in session
        #[tokio::test]
        async fn returns_none_for_empty_session() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;

            let result = SessionUserId::get(&test.session).await;

            assert!(matches!(result, Ok(None)));

            Ok(())
        }

        /// Expect parse error when user ID inserted into session is not an i32
        #[tokio::test]
        async fn fails_on_non_numeric_id() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;
            test.session
                .insert(SESSION_USER_ID_KEY, SessionUserId("invalid_id".to_string()))
                .await?;

            let result = SessionUserId::get(&test.session).await;

            assert!(result.is_err());

            Ok(())
        }
    }
}
