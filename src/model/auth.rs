use entity::status::UserRole;
use serde::{Deserialize, Serialize};

use crate::server::model::db::UserModel;

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: UserRole,
}

impl From<UserModel> for UserDto {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Successful login with the dashboard the client should navigate to
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponseDto {
    pub user: UserDto,
    pub dashboard: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterCompanyDto {
    pub company_name: String,
    pub business_registration_number: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub address: String,
    pub region: String,
    pub city: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterProviderDto {
    pub company_name: String,
    pub business_registration_number: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
    pub address: String,
    pub region: String,
    pub city: String,
    pub service_description: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ForgotPasswordDto {
    pub email: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordDto {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
