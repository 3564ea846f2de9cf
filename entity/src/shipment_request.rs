use sea_orm::entity::prelude::*;

use crate::status::ShipmentRequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shipment_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: i32,
    /// Provider assigned once a bid or direct request is accepted
    pub provider_id: Option<i32>,
    pub goods_type: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub weight_kg: Decimal,
    pub pickup_location: String,
    pub pickup_city: String,
    pub pickup_region: String,
    pub delivery_location: String,
    pub delivery_city: String,
    pub delivery_region: String,
    pub delivery_deadline: DateTime,
    pub status: ShipmentRequestStatus,
    pub special_instructions: Option<String>,
    pub requested_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::provider::Entity",
        from = "Column::ProviderId",
        to = "super::provider::Column::Id"
    )]
    Provider,
    #[sea_orm(has_many = "super::bid::Entity")]
    Bid,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::bid::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bid.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
