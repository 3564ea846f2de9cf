use std::collections::HashMap;

use entity::status::BidStatus;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::{count_map, page_index},
    model::db::BidModel,
    util::time,
};

use entity::bid::Column;

/// Offer fields of a new bid or direct request.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub shipment_request_id: i32,
    pub provider_id: i32,
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
    pub status: BidStatus,
}

pub struct BidRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BidRepository<'a, C> {
    /// Creates a new instance of [`BidRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, bid: NewBid) -> Result<BidModel, DbErr> {
        let bid = entity::bid::ActiveModel {
            shipment_request_id: ActiveValue::Set(bid.shipment_request_id),
            provider_id: ActiveValue::Set(bid.provider_id),
            price: ActiveValue::Set(bid.price),
            estimated_delivery_days: ActiveValue::Set(bid.estimated_delivery_days),
            notes: ActiveValue::Set(bid.notes),
            status: ActiveValue::Set(bid.status),
            submitted_at: ActiveValue::Set(time::now()),
            ..Default::default()
        };

        bid.insert(self.db).await
    }

    pub async fn find_by_id(&self, bid_id: i32) -> Result<Option<BidModel>, DbErr> {
        entity::prelude::Bid::find_by_id(bid_id).one(self.db).await
    }

    /// Find a bid only if it was placed on one of the company's requests
    pub async fn find_for_company(
        &self,
        bid_id: i32,
        company_id: i32,
    ) -> Result<Option<BidModel>, DbErr> {
        entity::prelude::Bid::find_by_id(bid_id)
            .inner_join(entity::prelude::ShipmentRequest)
            .filter(entity::shipment_request::Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    /// Find a bid only if it belongs to the provider
    pub async fn find_for_provider(
        &self,
        bid_id: i32,
        provider_id: i32,
    ) -> Result<Option<BidModel>, DbErr> {
        entity::prelude::Bid::find_by_id(bid_id)
            .filter(Column::ProviderId.eq(provider_id))
            .one(self.db)
            .await
    }

    /// The provider's bid on a request, optionally only in `status`
    pub async fn find_by_provider_and_shipment(
        &self,
        provider_id: i32,
        shipment_request_id: i32,
        status: Option<BidStatus>,
    ) -> Result<Option<BidModel>, DbErr> {
        let mut query = entity::prelude::Bid::find()
            .filter(Column::ProviderId.eq(provider_id))
            .filter(Column::ShipmentRequestId.eq(shipment_request_id));

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.one(self.db).await
    }

    pub async fn find_by_ids(&self, bid_ids: &[i32]) -> Result<HashMap<i32, BidModel>, DbErr> {
        if bid_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let bids = entity::prelude::Bid::find()
            .filter(Column::Id.is_in(bid_ids.to_vec()))
            .all(self.db)
            .await?;

        Ok(bids.into_iter().map(|b| (b.id, b)).collect())
    }

    /// Bids on a request, cheapest first
    pub async fn list_by_shipment(&self, shipment_request_id: i32) -> Result<Vec<BidModel>, DbErr> {
        entity::prelude::Bid::find()
            .filter(Column::ShipmentRequestId.eq(shipment_request_id))
            .order_by_asc(Column::Price)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    /// Bids on the company's requests, cheapest first
    pub async fn list_for_company(
        &self,
        company_id: i32,
        status: Option<BidStatus>,
        shipment_request_id: Option<i32>,
    ) -> Result<Vec<BidModel>, DbErr> {
        let mut query = entity::prelude::Bid::find()
            .inner_join(entity::prelude::ShipmentRequest)
            .filter(entity::shipment_request::Column::CompanyId.eq(company_id))
            .order_by_asc(Column::Price)
            .order_by_asc(Column::Id);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }
        if let Some(shipment_request_id) = shipment_request_id {
            query = query.filter(Column::ShipmentRequestId.eq(shipment_request_id));
        }

        query.all(self.db).await
    }

    /// The provider's bids, newest first
    pub async fn list_by_provider(
        &self,
        provider_id: i32,
        status: Option<BidStatus>,
    ) -> Result<Vec<BidModel>, DbErr> {
        let mut query = entity::prelude::Bid::find()
            .filter(Column::ProviderId.eq(provider_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.all(self.db).await
    }

    /// One page of the provider's bids in `status`, newest first
    ///
    /// # Returns
    /// A tuple of the page items, total item count and total page count
    pub async fn page_by_provider(
        &self,
        provider_id: i32,
        status: BidStatus,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<BidModel>, u64, u64), DbErr> {
        let paginator = entity::prelude::Bid::find()
            .filter(Column::ProviderId.eq(provider_id))
            .filter(Column::Status.eq(status))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .paginate(self.db, page_size);
        let totals = paginator.num_items_and_pages().await?;
        let items = paginator
            .fetch_page(page_index(page, totals.number_of_pages))
            .await?;

        Ok((items, totals.number_of_items, totals.number_of_pages))
    }

    /// Move a bid from any of `from` to `to`, replacing its notes when given
    ///
    /// Returns the number of rows updated. A result of 0 means another request changed the
    /// bid first or it was never in an expected status.
    pub async fn transition_status(
        &self,
        bid_id: i32,
        from: &[BidStatus],
        to: BidStatus,
        notes: Option<String>,
    ) -> Result<u64, DbErr> {
        let mut update = entity::bid::ActiveModel {
            status: ActiveValue::Set(to),
            ..Default::default()
        };
        if let Some(notes) = notes {
            update.notes = ActiveValue::Set(Some(notes));
        }

        let result = entity::prelude::Bid::update_many()
            .set(update)
            .filter(Column::Id.eq(bid_id))
            .filter(Column::Status.is_in(from.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Replace the offer of a bid still in `expected` status
    pub async fn update_offer(
        &self,
        bid_id: i32,
        expected: BidStatus,
        price: Decimal,
        estimated_delivery_days: i32,
        notes: Option<String>,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Bid::update_many()
            .set(entity::bid::ActiveModel {
                price: ActiveValue::Set(price),
                estimated_delivery_days: ActiveValue::Set(estimated_delivery_days),
                notes: ActiveValue::Set(notes),
                ..Default::default()
            })
            .filter(Column::Id.eq(bid_id))
            .filter(Column::Status.eq(expected))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Reject every competing open offer on a request once one has been accepted
    pub async fn reject_others(
        &self,
        shipment_request_id: i32,
        accepted_bid_id: i32,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Bid::update_many()
            .set(entity::bid::ActiveModel {
                status: ActiveValue::Set(BidStatus::Rejected),
                ..Default::default()
            })
            .filter(Column::ShipmentRequestId.eq(shipment_request_id))
            .filter(Column::Id.ne(accepted_bid_id))
            .filter(Column::Status.is_in([BidStatus::Submitted, BidStatus::UnderReview]))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, bid_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Bid::delete_by_id(bid_id).exec(self.db).await
    }

    pub async fn delete_by_shipments(
        &self,
        shipment_request_ids: &[i32],
    ) -> Result<DeleteResult, DbErr> {
        entity::prelude::Bid::delete_many()
            .filter(Column::ShipmentRequestId.is_in(shipment_request_ids.to_vec()))
            .exec(self.db)
            .await
    }

    /// Number of bids per shipment request
    pub async fn count_by_shipments(
        &self,
        shipment_request_ids: &[i32],
    ) -> Result<HashMap<i32, u64>, DbErr> {
        if shipment_request_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = entity::prelude::Bid::find()
            .select_only()
            .column(Column::ShipmentRequestId)
            .column_as(Column::Id.count(), "count")
            .filter(Column::ShipmentRequestId.is_in(shipment_request_ids.to_vec()))
            .group_by(Column::ShipmentRequestId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(count_map(rows))
    }

    /// Number of bids per provider
    pub async fn count_by_provider_map(&self) -> Result<HashMap<i32, u64>, DbErr> {
        let rows = entity::prelude::Bid::find()
            .select_only()
            .column(Column::ProviderId)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::ProviderId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(count_map(rows))
    }

    pub async fn count_by_status_on_shipment(
        &self,
        shipment_request_id: i32,
        status: BidStatus,
    ) -> Result<u64, DbErr> {
        entity::prelude::Bid::find()
            .filter(Column::ShipmentRequestId.eq(shipment_request_id))
            .filter(Column::Status.eq(status))
            .count(self.db)
            .await
    }

    pub async fn count_by_provider(
        &self,
        provider_id: i32,
        status: Option<BidStatus>,
    ) -> Result<u64, DbErr> {
        let mut query = entity::prelude::Bid::find().filter(Column::ProviderId.eq(provider_id));

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.count(self.db).await
    }

    /// Bids in `status` on the company's requests
    pub async fn count_for_company(
        &self,
        company_id: i32,
        status: BidStatus,
    ) -> Result<u64, DbErr> {
        entity::prelude::Bid::find()
            .inner_join(entity::prelude::ShipmentRequest)
            .filter(entity::shipment_request::Column::CompanyId.eq(company_id))
            .filter(Column::Status.eq(status))
            .count(self.db)
            .await
    }
}
