//! Role policy checks against the session.

use entity::status::UserRole;
use tower_sessions::Session;

use crate::server::{
    data::{admin::AdminRepository, company::CompanyRepository, provider::ProviderRepository},
    error::{auth::AuthError, Error},
    model::{
        app::AppState,
        auth::Policy,
        session::{role::SessionUserRole, user::SessionUserId},
    },
};

/// The logged in caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionActor {
    pub user_id: i32,
    pub role: UserRole,
}

/// Require a logged in user whose role satisfies `policy`.
///
/// # Returns
/// - `Ok(SessionActor)` - The caller's user id and role
/// - `Err(Error::AuthError(AuthError::UserNotInSession))` - Nobody is logged in (401)
/// - `Err(Error::AuthError(AuthError::Forbidden))` - The role is not allowed (403)
pub async fn authorize(session: &Session, policy: Policy) -> Result<SessionActor, Error> {
    let user_id = SessionUserId::get(session).await?;
    let role = SessionUserRole::get(session).await?;

    let (Some(user_id), Some(role)) = (user_id, role) else {
        return Err(AuthError::UserNotInSession.into());
    };

    if !policy.allows(role) {
        return Err(AuthError::Forbidden {
            user_id,
            role,
            policy,
        }
        .into());
    }

    Ok(SessionActor { user_id, role })
}

/// Company profile id of a caller passing [`Policy::CompanyOnly`].
pub async fn company_id(state: &AppState, session: &Session) -> Result<i32, Error> {
    let actor = authorize(session, Policy::CompanyOnly).await?;

    CompanyRepository::new(&state.db)
        .find_by_user_id(actor.user_id)
        .await?
        .map(|company| company.id)
        .ok_or_else(|| profile_not_found(actor))
}

/// Provider profile id of a caller passing [`Policy::ProviderOnly`].
pub async fn provider_id(state: &AppState, session: &Session) -> Result<i32, Error> {
    let actor = authorize(session, Policy::ProviderOnly).await?;

    ProviderRepository::new(&state.db)
        .find_by_user_id(actor.user_id)
        .await?
        .map(|provider| provider.id)
        .ok_or_else(|| profile_not_found(actor))
}

/// Admin profile id of a caller passing [`Policy::AdminOnly`].
pub async fn admin_id(state: &AppState, session: &Session) -> Result<i32, Error> {
    let actor = authorize(session, Policy::AdminOnly).await?;

    AdminRepository::new(&state.db)
        .find_by_user_id(actor.user_id)
        .await?
        .map(|admin| admin.id)
        .ok_or_else(|| profile_not_found(actor))
}

fn profile_not_found(actor: SessionActor) -> Error {
    AuthError::ProfileNotFound {
        user_id: actor.user_id,
        role: actor.role,
    }
    .into()
}
