use sea_orm::entity::prelude::*;

use crate::status::AdminStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub status: AdminStatus,
    pub admin_role: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wasl_user::Entity",
        from = "Column::UserId",
        to = "super::wasl_user::Column::Id"
    )]
    WaslUser,
    #[sea_orm(has_many = "super::revenue_report::Entity")]
    RevenueReport,
}

impl Related<super::wasl_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaslUser.def()
    }
}

impl Related<super::revenue_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
