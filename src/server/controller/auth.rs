use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        auth::{
            ChangePasswordDto, ForgotPasswordDto, LoginDto, LoginResponseDto, RegisterCompanyDto,
            RegisterProviderDto, UserDto,
        },
    },
    server::{
        controller::util::{authorize::authorize, get_user::get_user_from_session},
        error::Error,
        model::{
            app::AppState,
            auth::{dashboard_path, Policy},
            session::{role::SessionUserRole, user::SessionUserId},
        },
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Message returned by the password reset request whether or not the email exists
pub static FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for this email, password reset instructions have been sent";

/// Registers a company account awaiting admin approval
///
/// Callers that are already logged in are redirected to their dashboard.
///
/// # Responses
/// - 201 (Created): Account created, login is possible once an admin approves it
/// - 303 (See Other): Caller is already logged in
/// - 400 (Bad Request): A field failed validation
/// - 409 (Conflict): Email is already registered
/// - 500 (Internal Server Error): Database or password hashing failure
#[utoipa::path(
    post,
    path = "/api/auth/register/company",
    tag = AUTH_TAG,
    request_body = RegisterCompanyDto,
    responses(
        (status = 201, description = "Company registered", body = UserDto),
        (status = 303, description = "Already logged in, redirect to dashboard"),
        (status = 400, description = "Invalid registration form", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_company(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterCompanyDto>,
) -> Result<Response, Error> {
    if let Some(redirect) = redirect_if_authenticated(&session).await? {
        return Ok(redirect);
    }

    let user = AuthService::new(&state.db).register_company(payload).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Registers a provider account awaiting admin approval
///
/// # Responses
/// - 201 (Created): Account created
/// - 303 (See Other): Caller is already logged in
/// - 400 (Bad Request): A field failed validation
/// - 409 (Conflict): Email is already registered
#[utoipa::path(
    post,
    path = "/api/auth/register/provider",
    tag = AUTH_TAG,
    request_body = RegisterProviderDto,
    responses(
        (status = 201, description = "Provider registered", body = UserDto),
        (status = 303, description = "Already logged in, redirect to dashboard"),
        (status = 400, description = "Invalid registration form", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_provider(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterProviderDto>,
) -> Result<Response, Error> {
    if let Some(redirect) = redirect_if_authenticated(&session).await? {
        return Ok(redirect);
    }

    let user = AuthService::new(&state.db).register_provider(payload).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Logs a user in with email and password
///
/// Stores the user's ID and role in the session and returns the dashboard the
/// client should navigate to.
///
/// # Responses
/// - 200 (OK): Logged in
/// - 303 (See Other): Caller is already logged in
/// - 401 (Unauthorized): Unknown email or wrong password
/// - 403 (Forbidden): Company or provider account is pending approval
/// - 500 (Internal Server Error): Database or session failure
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponseDto),
        (status = 303, description = "Already logged in, redirect to dashboard"),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 403, description = "Account pending approval", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginDto>,
) -> Result<Response, Error> {
    if let Some(redirect) = redirect_if_authenticated(&session).await? {
        return Ok(redirect);
    }

    let user = AuthService::new(&state.db).login(payload).await?;

    SessionUserId::insert(&session, user.id).await?;
    SessionUserRole::insert(&session, user.role).await?;

    let dashboard = dashboard_path(user.role).to_string();

    Ok(Json(LoginResponseDto {
        user: UserDto::from(user),
        dashboard,
    })
    .into_response())
}

/// Logs the user out by clearing their session
///
/// # Responses
/// - 307 (Temporary Redirect): Successfully logged out, redirect to login route
/// - 500 (Internal Server Error): There was an issue clearing the session
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Logged out, redirect to login"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    let maybe_user_id = SessionUserId::get(&session).await?;

    // Clearing a session that was never stored fails in the store
    if maybe_user_id.is_some() {
        session.clear().await;
    }

    Ok(Redirect::temporary("/auth/login"))
}

/// Returns the logged in user
///
/// # Responses
/// - 200 (OK): The user stored in the session
/// - 401 (Unauthorized): Nobody is logged in
/// - 404 (Not Found): The session user no longer exists, the session is cleared
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    Ok(Json(user))
}

/// Requests password reset instructions
///
/// The response is identical for known and unknown emails.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = AUTH_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Request accepted", body = MessageDto)
    ),
)]
pub async fn forgot_password(Json(payload): Json<ForgotPasswordDto>) -> impl IntoResponse {
    tracing::debug!(
        email_length = payload.email.trim().len(),
        "Password reset requested"
    );

    Json(MessageDto::new(FORGOT_PASSWORD_MESSAGE))
}

/// Changes the logged in user's password
///
/// # Responses
/// - 200 (OK): Password changed
/// - 400 (Bad Request): Current password is wrong or the new one is invalid
/// - 401 (Unauthorized): Nobody is logged in
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = AUTH_TAG,
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Invalid password", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = authorize(&session, Policy::Authenticated).await?;

    AuthService::new(&state.db)
        .change_password(actor.user_id, payload)
        .await?;

    Ok(Json(MessageDto::new("Password changed successfully")))
}

/// 303 to the caller's dashboard when the session already holds a user.
async fn redirect_if_authenticated(session: &Session) -> Result<Option<Response>, Error> {
    let role = SessionUserRole::get(session).await?;

    Ok(role.map(|role| Redirect::to(dashboard_path(role)).into_response()))
}
