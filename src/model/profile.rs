use entity::status::AccountStatus;
use serde::{Deserialize, Serialize};

use crate::server::model::db::{CompanyModel, ProviderModel};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompanyDto {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub business_registration_number: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub is_approved: bool,
    #[schema(value_type = String)]
    pub status: AccountStatus,
}

impl From<CompanyModel> for CompanyDto {
    fn from(company: CompanyModel) -> Self {
        Self {
            id: company.id,
            user_id: company.user_id,
            name: company.name,
            business_registration_number: company.business_registration_number,
            email: company.email,
            phone_number: company.phone_number,
            address: company.address,
            city: company.city,
            region: company.region,
            is_approved: company.is_approved,
            status: company.status,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProviderDto {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub business_registration_number: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub service_description: Option<String>,
    pub is_approved: bool,
    #[schema(value_type = String)]
    pub status: AccountStatus,
}

impl From<ProviderModel> for ProviderDto {
    fn from(provider: ProviderModel) -> Self {
        Self {
            id: provider.id,
            user_id: provider.user_id,
            name: provider.name,
            business_registration_number: provider.business_registration_number,
            email: provider.email,
            phone_number: provider.phone_number,
            address: provider.address,
            city: provider.city,
            region: provider.region,
            service_description: provider.service_description,
            is_approved: provider.is_approved,
            status: provider.status,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateCompanyProfileDto {
    pub name: String,
    pub phone_number: String,
    pub region: String,
    pub city: String,
    pub address: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateProviderProfileDto {
    pub name: String,
    pub phone_number: String,
    pub region: String,
    pub city: String,
    pub address: String,
    pub service_description: Option<String>,
}

/// Password confirmation required to delete a company account
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteAccountDto {
    pub password: String,
}
