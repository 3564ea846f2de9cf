use entity::status::UserRole;
use tower_sessions::Session;
use wasl::server::model::session::{role::SessionUserRole, user::SessionUserId};

/// Store a user in the session the way a successful login does.
pub async fn login_as(session: &Session, user_id: i32, role: UserRole) {
    SessionUserId::insert(session, user_id).await.unwrap();
    SessionUserRole::insert(session, role).await.unwrap();
}
