use sea_orm::entity::prelude::*;

use crate::status::BidStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bid")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub shipment_request_id: i32,
    pub provider_id: i32,
    /// Zero until the provider answers a direct request
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
    pub status: BidStatus,
    pub submitted_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipment_request::Entity",
        from = "Column::ShipmentRequestId",
        to = "super::shipment_request::Column::Id"
    )]
    ShipmentRequest,
    #[sea_orm(
        belongs_to = "super::provider::Entity",
        from = "Column::ProviderId",
        to = "super::provider::Column::Id"
    )]
    Provider,
    #[sea_orm(has_one = "super::contract::Entity")]
    Contract,
}

impl Related<super::shipment_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentRequest.def()
    }
}

impl Related<super::provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
