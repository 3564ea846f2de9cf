use sea_orm::entity::prelude::*;

use crate::status::AccountStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub name: String,
    pub business_registration_number: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub email: String,
    pub phone_number: String,
    pub is_approved: bool,
    pub status: AccountStatus,
    /// Admin who last changed the approval state
    pub admin_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wasl_user::Entity",
        from = "Column::UserId",
        to = "super::wasl_user::Column::Id"
    )]
    WaslUser,
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id"
    )]
    Admin,
    #[sea_orm(has_many = "super::shipment_request::Entity")]
    ShipmentRequest,
    #[sea_orm(has_many = "super::contract::Entity")]
    Contract,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::wasl_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaslUser.def()
    }
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::shipment_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentRequest.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
