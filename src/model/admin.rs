use entity::status::{AccountStatus, AdminStatus};
use serde::{Deserialize, Serialize};

use crate::{
    model::profile::{CompanyDto, ProviderDto},
    server::model::db::AdminModel,
};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminCompanyDto {
    pub company: CompanyDto,
    pub shipment_count: u64,
    pub contract_count: u64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminProviderDto {
    pub provider: ProviderDto,
    pub bid_count: u64,
    pub contract_count: u64,
}

/// Approval state after a toggle
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApprovalDto {
    pub id: i32,
    pub is_approved: bool,
    #[schema(value_type = String)]
    pub status: AccountStatus,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdminProfileDto {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[schema(value_type = String)]
    pub status: AdminStatus,
    pub admin_role: Option<String>,
}

impl From<AdminModel> for AdminProfileDto {
    fn from(admin: AdminModel) -> Self {
        Self {
            id: admin.id,
            user_id: admin.user_id,
            first_name: admin.first_name,
            last_name: admin.last_name,
            email: admin.email,
            phone_number: admin.phone_number,
            status: admin.status,
            admin_role: admin.admin_role,
        }
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateAdminProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}
