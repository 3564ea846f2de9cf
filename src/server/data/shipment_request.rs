use std::collections::HashMap;

use chrono::NaiveDateTime;
use entity::status::ShipmentRequestStatus;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, DeleteResult, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use crate::server::{
    data::{count_map, page_index},
    model::db::ShipmentRequestModel,
    util::time,
};

use entity::shipment_request::Column;

/// Validated shipment fields written on create and update.
#[derive(Debug, Clone)]
pub struct ShipmentRequestFields {
    pub goods_type: String,
    pub weight_kg: Decimal,
    pub pickup_location: String,
    pub pickup_city: String,
    pub pickup_region: String,
    pub delivery_location: String,
    pub delivery_city: String,
    pub delivery_region: String,
    pub delivery_deadline: NaiveDateTime,
    pub special_instructions: Option<String>,
}

/// Weight buckets offered by the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightRange {
    UpTo100,
    UpTo500,
    UpTo1000,
    Over1000,
}

impl WeightRange {
    /// Parse the query string form, `None` for anything unrecognised
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0-100" => Some(Self::UpTo100),
            "100-500" => Some(Self::UpTo500),
            "500-1000" => Some(Self::UpTo1000),
            "1000+" => Some(Self::Over1000),
            _ => None,
        }
    }

    fn condition(self) -> Condition {
        let w = Column::WeightKg;
        match self {
            Self::UpTo100 => Condition::all().add(w.lte(Decimal::from(100))),
            Self::UpTo500 => Condition::all()
                .add(w.gt(Decimal::from(100)))
                .add(w.lte(Decimal::from(500))),
            Self::UpTo1000 => Condition::all()
                .add(w.gt(Decimal::from(500)))
                .add(w.lte(Decimal::from(1000))),
            Self::Over1000 => Condition::all().add(w.gt(Decimal::from(1000))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseSort {
    #[default]
    Newest,
    Deadline,
    Weight,
}

impl BrowseSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("deadline") => Self::Deadline,
            Some("weight") => Self::Weight,
            _ => Self::Newest,
        }
    }
}

/// Filters of the public shipment listing. Only open requests are ever listed.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub search: Option<String>,
    pub goods_type: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub weight_range: Option<WeightRange>,
    pub status: Option<ShipmentRequestStatus>,
    pub sort: BrowseSort,
}

/// One page of browse results with the totals needed for paging.
pub struct BrowsePage {
    pub items: Vec<ShipmentRequestModel>,
    pub total_items: u64,
    pub total_pages: u64,
}

const OPEN_STATUSES: [ShipmentRequestStatus; 2] =
    [ShipmentRequestStatus::Pending, ShipmentRequestStatus::Bidding];

pub struct ShipmentRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ShipmentRequestRepository<'a, C> {
    /// Creates a new instance of [`ShipmentRequestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a Pending shipment request for a company
    pub async fn create(
        &self,
        company_id: i32,
        fields: ShipmentRequestFields,
    ) -> Result<ShipmentRequestModel, DbErr> {
        let now = time::now();
        let request = entity::shipment_request::ActiveModel {
            company_id: ActiveValue::Set(company_id),
            provider_id: ActiveValue::Set(None),
            goods_type: ActiveValue::Set(fields.goods_type),
            weight_kg: ActiveValue::Set(fields.weight_kg),
            pickup_location: ActiveValue::Set(fields.pickup_location),
            pickup_city: ActiveValue::Set(fields.pickup_city),
            pickup_region: ActiveValue::Set(fields.pickup_region),
            delivery_location: ActiveValue::Set(fields.delivery_location),
            delivery_city: ActiveValue::Set(fields.delivery_city),
            delivery_region: ActiveValue::Set(fields.delivery_region),
            delivery_deadline: ActiveValue::Set(fields.delivery_deadline),
            status: ActiveValue::Set(ShipmentRequestStatus::Pending),
            special_instructions: ActiveValue::Set(fields.special_instructions),
            requested_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        request.insert(self.db).await
    }

    pub async fn find_by_id(&self, request_id: i32) -> Result<Option<ShipmentRequestModel>, DbErr> {
        entity::prelude::ShipmentRequest::find_by_id(request_id)
            .one(self.db)
            .await
    }

    /// Find a request only if it belongs to the given company
    pub async fn find_for_company(
        &self,
        request_id: i32,
        company_id: i32,
    ) -> Result<Option<ShipmentRequestModel>, DbErr> {
        entity::prelude::ShipmentRequest::find_by_id(request_id)
            .filter(Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(
        &self,
        request_ids: &[i32],
    ) -> Result<HashMap<i32, ShipmentRequestModel>, DbErr> {
        if request_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let requests = entity::prelude::ShipmentRequest::find()
            .filter(Column::Id.is_in(request_ids.to_vec()))
            .all(self.db)
            .await?;

        Ok(requests.into_iter().map(|r| (r.id, r)).collect())
    }

    /// The company's requests, newest first
    pub async fn list_by_company(
        &self,
        company_id: i32,
        status: Option<ShipmentRequestStatus>,
    ) -> Result<Vec<ShipmentRequestModel>, DbErr> {
        let mut query = entity::prelude::ShipmentRequest::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_desc(Column::RequestedAt)
            .order_by_desc(Column::Id);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.all(self.db).await
    }

    /// The most recent requests across every company
    pub async fn list_recent(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<ShipmentRequestModel>, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .order_by_desc(Column::RequestedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// The company's most recent requests
    pub async fn list_recent_for_company(
        &self,
        company_id: i32,
        limit: u64,
    ) -> Result<Vec<ShipmentRequestModel>, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_desc(Column::RequestedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Open requests matching `filter`
    ///
    /// # Arguments
    /// - `filter` - Search, location, weight and status filters plus sort order
    /// - `page` - 1-based page number, values below 1 are treated as 1
    /// - `page_size` - Number of items per page
    ///
    /// # Returns
    /// The requested page along with the total item and page counts
    pub async fn browse(
        &self,
        filter: &BrowseFilter,
        page: u64,
        page_size: u64,
    ) -> Result<BrowsePage, DbErr> {
        let paginator = browse_query(filter).paginate(self.db, page_size);
        let totals = paginator.num_items_and_pages().await?;
        let items = paginator
            .fetch_page(page_index(page, totals.number_of_pages))
            .await?;

        Ok(BrowsePage {
            items,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    /// Distinct goods types among open requests, alphabetical
    pub async fn open_goods_types(&self) -> Result<Vec<String>, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .select_only()
            .column(Column::GoodsType)
            .distinct()
            .filter(Column::Status.is_in(OPEN_STATUSES))
            .order_by_asc(Column::GoodsType)
            .into_tuple::<String>()
            .all(self.db)
            .await
    }

    /// The company's Pending requests, candidates for a direct request
    pub async fn list_pending_for_company(
        &self,
        company_id: i32,
    ) -> Result<Vec<ShipmentRequestModel>, DbErr> {
        self.list_by_company(company_id, Some(ShipmentRequestStatus::Pending))
            .await
    }

    pub async fn update_fields(
        &self,
        request: ShipmentRequestModel,
        fields: ShipmentRequestFields,
    ) -> Result<ShipmentRequestModel, DbErr> {
        let mut active = request.into_active_model();
        active.goods_type = ActiveValue::Set(fields.goods_type);
        active.weight_kg = ActiveValue::Set(fields.weight_kg);
        active.pickup_location = ActiveValue::Set(fields.pickup_location);
        active.pickup_city = ActiveValue::Set(fields.pickup_city);
        active.pickup_region = ActiveValue::Set(fields.pickup_region);
        active.delivery_location = ActiveValue::Set(fields.delivery_location);
        active.delivery_city = ActiveValue::Set(fields.delivery_city);
        active.delivery_region = ActiveValue::Set(fields.delivery_region);
        active.delivery_deadline = ActiveValue::Set(fields.delivery_deadline);
        active.special_instructions = ActiveValue::Set(fields.special_instructions);
        active.updated_at = ActiveValue::Set(time::now());

        active.update(self.db).await
    }

    /// Move a request from any of `from` to `to`
    ///
    /// Returns the number of rows updated, 0 when the request was not in an expected status.
    pub async fn transition_status(
        &self,
        request_id: i32,
        from: &[ShipmentRequestStatus],
        to: ShipmentRequestStatus,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::ShipmentRequest::update_many()
            .set(entity::shipment_request::ActiveModel {
                status: ActiveValue::Set(to),
                updated_at: ActiveValue::Set(time::now()),
                ..Default::default()
            })
            .filter(Column::Id.eq(request_id))
            .filter(Column::Status.is_in(from.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Unconditionally set a request's status
    pub async fn set_status(
        &self,
        request_id: i32,
        status: ShipmentRequestStatus,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::ShipmentRequest::update_many()
            .set(entity::shipment_request::ActiveModel {
                status: ActiveValue::Set(status),
                updated_at: ActiveValue::Set(time::now()),
                ..Default::default()
            })
            .filter(Column::Id.eq(request_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Mark a request Assigned to the provider whose offer was accepted
    pub async fn assign(&self, request_id: i32, provider_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::ShipmentRequest::update_many()
            .set(entity::shipment_request::ActiveModel {
                provider_id: ActiveValue::Set(Some(provider_id)),
                status: ActiveValue::Set(ShipmentRequestStatus::Assigned),
                updated_at: ActiveValue::Set(time::now()),
                ..Default::default()
            })
            .filter(Column::Id.eq(request_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, request_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::ShipmentRequest::delete_by_id(request_id)
            .exec(self.db)
            .await
    }

    pub async fn delete_by_company(&self, company_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::ShipmentRequest::delete_many()
            .filter(Column::CompanyId.eq(company_id))
            .exec(self.db)
            .await
    }

    pub async fn ids_by_company(&self, company_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::CompanyId.eq(company_id))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::ShipmentRequest::find().count(self.db).await
    }

    /// Requests that are neither delivered nor cancelled
    pub async fn count_active(&self) -> Result<u64, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .filter(Column::Status.is_not_in([
                ShipmentRequestStatus::Delivered,
                ShipmentRequestStatus::Cancelled,
            ]))
            .count(self.db)
            .await
    }

    pub async fn count_for_company(
        &self,
        company_id: i32,
        status: ShipmentRequestStatus,
    ) -> Result<u64, DbErr> {
        entity::prelude::ShipmentRequest::find()
            .filter(Column::CompanyId.eq(company_id))
            .filter(Column::Status.eq(status))
            .count(self.db)
            .await
    }

    /// Number of requests per company
    pub async fn count_by_company(&self) -> Result<HashMap<i32, u64>, DbErr> {
        let rows = entity::prelude::ShipmentRequest::find()
            .select_only()
            .column(Column::CompanyId)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::CompanyId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(count_map(rows))
    }
}

fn browse_query(filter: &BrowseFilter) -> Select<entity::shipment_request::Entity> {
    let mut query =
        entity::prelude::ShipmentRequest::find().filter(Column::Status.is_in(OPEN_STATUSES));

    if let Some(search) = filter.search.as_deref() {
        query = query.filter(
            Condition::any()
                .add(Column::GoodsType.contains(search))
                .add(Column::PickupCity.contains(search))
                .add(Column::DeliveryCity.contains(search))
                .add(Column::PickupRegion.contains(search))
                .add(Column::DeliveryRegion.contains(search)),
        );
    }
    if let Some(goods_type) = filter.goods_type.as_deref() {
        query = query.filter(Column::GoodsType.eq(goods_type));
    }
    if let Some(region) = filter.region.as_deref() {
        query = query.filter(Column::PickupRegion.eq(region));
    }
    if let Some(city) = filter.city.as_deref() {
        query = query.filter(Column::PickupCity.eq(city));
    }
    if let Some(range) = filter.weight_range {
        query = query.filter(range.condition());
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status));
    }

    match filter.sort {
        BrowseSort::Newest => query.order_by_desc(Column::RequestedAt),
        BrowseSort::Deadline => query.order_by_asc(Column::DeliveryDeadline),
        BrowseSort::Weight => query.order_by_desc(Column::WeightKg),
    }
    .order_by_desc(Column::Id)
}
