use std::collections::{HashMap, HashSet};

use entity::status::ShipmentRequestStatus;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        bid::BidDto,
        shipment::{
            BidStatsDto, BrowseQuery, ShipmentDetailsDto, ShipmentPageDto, ShipmentRequestDto,
            ShipmentRequestPayload, ShipmentSummaryDto,
        },
    },
    server::{
        data::{
            bid::BidRepository,
            company::CompanyRepository,
            provider::ProviderRepository,
            shipment_request::{
                BrowseFilter, BrowseSort, ShipmentRequestFields, ShipmentRequestRepository,
                WeightRange,
            },
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            validation::ValidationError,
            Error,
        },
        model::db::{BidModel, ShipmentRequestModel},
        util::{
            time,
            validation::{self, MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MAX_TEXT_LENGTH},
        },
    },
};

/// Items per page of the public shipment listing.
pub const BROWSE_PAGE_SIZE: u64 = 12;

pub struct ShipmentRequestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ShipmentRequestService<'a> {
    /// Creates a new instance of [`ShipmentRequestService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists open shipment requests for providers to bid on.
    ///
    /// # Arguments
    /// - `query` - Search, filter, sort and page parameters; unknown weight ranges and sorts
    ///   fall back to no filter and newest first
    ///
    /// # Returns
    /// - `Ok(ShipmentPageDto)` - One page of requests with bid counts and the goods types on offer
    pub async fn browse(&self, query: BrowseQuery) -> Result<ShipmentPageDto, Error> {
        let request_repo = ShipmentRequestRepository::new(self.db);

        let filter = BrowseFilter {
            search: non_blank(query.search),
            goods_type: non_blank(query.goods_type),
            region: non_blank(query.region),
            city: non_blank(query.city),
            weight_range: query.weight_range.as_deref().and_then(WeightRange::parse),
            status: query.status,
            sort: BrowseSort::parse(query.sort.as_deref()),
        };
        let page = query.page.unwrap_or(1).max(1);

        let result = request_repo.browse(&filter, page, BROWSE_PAGE_SIZE).await?;
        let items = self.summaries(result.items, true).await?;
        let goods_types = request_repo.open_goods_types().await?;

        Ok(ShipmentPageDto {
            items,
            page,
            total_pages: result.total_pages,
            total_items: result.total_items,
            goods_types,
        })
    }

    /// A shipment request with its bids, cheapest first, and price statistics
    pub async fn details(&self, request_id: i32) -> Result<ShipmentDetailsDto, Error> {
        let request = ShipmentRequestRepository::new(self.db)
            .find_by_id(request_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::ShipmentRequest, request_id))?;

        let company_name = CompanyRepository::new(self.db)
            .find_by_id(request.company_id)
            .await?
            .map(|company| company.name)
            .unwrap_or_default();

        let bids = BidRepository::new(self.db)
            .list_by_shipment(request.id)
            .await?;
        let stats = bid_stats(&bids);
        let bids = with_provider_names(self.db, bids).await?;

        Ok(ShipmentDetailsDto {
            request: ShipmentRequestDto::from(request),
            company_name,
            bids,
            stats,
        })
    }

    /// The company's requests, newest first, each with its bid count
    pub async fn list_for_company(
        &self,
        company_id: i32,
        status: Option<ShipmentRequestStatus>,
    ) -> Result<Vec<ShipmentSummaryDto>, Error> {
        let requests = ShipmentRequestRepository::new(self.db)
            .list_by_company(company_id, status)
            .await?;

        self.summaries(requests, false).await
    }

    /// Creates a Pending shipment request
    pub async fn create(
        &self,
        company_id: i32,
        payload: ShipmentRequestPayload,
    ) -> Result<ShipmentRequestDto, Error> {
        let fields = validate_payload(payload)?;

        let request = ShipmentRequestRepository::new(self.db)
            .create(company_id, fields)
            .await?;

        tracing::info!(
            company_id,
            shipment_request_id = request.id,
            "Created shipment request"
        );

        Ok(ShipmentRequestDto::from(request))
    }

    pub async fn get_for_company(
        &self,
        company_id: i32,
        request_id: i32,
    ) -> Result<ShipmentRequestDto, Error> {
        let request = self.find_owned(company_id, request_id).await?;

        Ok(ShipmentRequestDto::from(request))
    }

    /// Replaces the fields of a request that is still open for bids
    ///
    /// # Returns
    /// - `Ok(ShipmentRequestDto)` - The updated request
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Not the company's request
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Request is past bidding
    pub async fn update(
        &self,
        company_id: i32,
        request_id: i32,
        payload: ShipmentRequestPayload,
    ) -> Result<ShipmentRequestDto, Error> {
        let request = self.find_owned(company_id, request_id).await?;

        if !request.status.is_editable() {
            return Err(MarketplaceError::invalid_state(
                "Only pending or bidding shipment requests can be edited",
            )
            .into());
        }

        let fields = validate_payload(payload)?;
        let request = ShipmentRequestRepository::new(self.db)
            .update_fields(request, fields)
            .await?;

        Ok(ShipmentRequestDto::from(request))
    }

    /// Deletes a request still open for bids along with its bids
    pub async fn delete(&self, company_id: i32, request_id: i32) -> Result<(), Error> {
        let request = self.find_owned(company_id, request_id).await?;

        if !request.status.is_editable() {
            return Err(MarketplaceError::invalid_state(
                "Only pending or bidding shipment requests can be deleted",
            )
            .into());
        }

        let txn = self.db.begin().await?;

        BidRepository::new(&txn)
            .delete_by_shipments(&[request.id])
            .await?;
        ShipmentRequestRepository::new(&txn)
            .delete(request.id)
            .await?;

        txn.commit().await?;

        tracing::info!(company_id, shipment_request_id = request_id, "Deleted shipment request");

        Ok(())
    }

    pub async fn cancel(
        &self,
        company_id: i32,
        request_id: i32,
    ) -> Result<ShipmentRequestDto, Error> {
        let request_repo = ShipmentRequestRepository::new(self.db);
        let request = self.find_owned(company_id, request_id).await?;

        let from = [
            ShipmentRequestStatus::Pending,
            ShipmentRequestStatus::Bidding,
            ShipmentRequestStatus::Assigned,
        ];
        let updated = request_repo
            .transition_status(request.id, &from, ShipmentRequestStatus::Cancelled)
            .await?;

        if updated == 0 {
            return Err(MarketplaceError::invalid_state(
                "Only pending, bidding or assigned shipment requests can be cancelled",
            )
            .into());
        }

        let request = request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::ShipmentRequest, request_id))?;

        tracing::info!(company_id, shipment_request_id = request_id, "Cancelled shipment request");

        Ok(ShipmentRequestDto::from(request))
    }

    async fn find_owned(
        &self,
        company_id: i32,
        request_id: i32,
    ) -> Result<ShipmentRequestModel, Error> {
        ShipmentRequestRepository::new(self.db)
            .find_for_company(request_id, company_id)
            .await?
            .ok_or_else(|| {
                MarketplaceError::not_found(Resource::ShipmentRequest, request_id).into()
            })
    }

    async fn summaries(
        &self,
        requests: Vec<ShipmentRequestModel>,
        include_company: bool,
    ) -> Result<Vec<ShipmentSummaryDto>, Error> {
        let request_ids: Vec<i32> = requests.iter().map(|r| r.id).collect();
        let bid_counts = BidRepository::new(self.db)
            .count_by_shipments(&request_ids)
            .await?;

        let company_names: HashMap<i32, String> = if include_company {
            let company_ids: Vec<i32> = requests
                .iter()
                .map(|r| r.company_id)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            CompanyRepository::new(self.db)
                .find_by_ids(&company_ids)
                .await?
                .into_iter()
                .map(|company| (company.id, company.name))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(requests
            .into_iter()
            .map(|request| ShipmentSummaryDto {
                bid_count: bid_counts.get(&request.id).copied().unwrap_or(0),
                company_name: company_names.get(&request.company_id).cloned(),
                request: ShipmentRequestDto::from(request),
            })
            .collect())
    }
}

/// Price statistics over a set of bids
///
/// Direct requests the provider has not priced yet are left out of the price figures.
pub(crate) fn bid_stats(bids: &[BidModel]) -> BidStatsDto {
    let prices: Vec<Decimal> = bids
        .iter()
        .map(|bid| bid.price)
        .filter(|price| *price > Decimal::ZERO)
        .collect();
    let bidders: HashSet<i32> = bids.iter().map(|bid| bid.provider_id).collect();

    let average_price = if prices.is_empty() {
        None
    } else {
        let total: Decimal = prices.iter().copied().sum();
        Some((total / Decimal::from(prices.len())).round_dp(2))
    };

    BidStatsDto {
        bid_count: bids.len() as u64,
        average_price,
        min_price: prices.iter().copied().min(),
        max_price: prices.iter().copied().max(),
        bidder_count: bidders.len() as u64,
    }
}

/// Converts bids to DTOs carrying their provider's name
pub(crate) async fn with_provider_names(
    db: &DatabaseConnection,
    bids: Vec<BidModel>,
) -> Result<Vec<BidDto>, Error> {
    let provider_ids: Vec<i32> = bids
        .iter()
        .map(|bid| bid.provider_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let names: HashMap<i32, String> = ProviderRepository::new(db)
        .find_by_ids(&provider_ids)
        .await?
        .into_iter()
        .map(|provider| (provider.id, provider.name))
        .collect();

    Ok(bids
        .into_iter()
        .map(|bid| {
            let name = names.get(&bid.provider_id).cloned();
            BidDto::with_provider_name(bid, name)
        })
        .collect())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_payload(payload: ShipmentRequestPayload) -> Result<ShipmentRequestFields, Error> {
    let goods_type = validation::required("goods_type", &payload.goods_type, MAX_NAME_LENGTH)?;
    let weight_kg = validation::in_range(
        "weight_kg",
        payload.weight_kg,
        validation::min_weight(),
        validation::max_weight(),
    )?;
    let pickup_location =
        validation::required("pickup_location", &payload.pickup_location, MAX_TEXT_LENGTH)?;
    let (pickup_region, pickup_city) = validation::region_and_city(
        "pickup_region",
        "pickup_city",
        &payload.pickup_region,
        &payload.pickup_city,
    )?;
    let delivery_location = validation::required(
        "delivery_location",
        &payload.delivery_location,
        MAX_TEXT_LENGTH,
    )?;
    let (delivery_region, delivery_city) = validation::region_and_city(
        "delivery_region",
        "delivery_city",
        &payload.delivery_region,
        &payload.delivery_city,
    )?;
    if payload.delivery_deadline <= time::now() {
        return Err(ValidationError::field(
            "delivery_deadline",
            "Delivery deadline must be in the future",
        )
        .into());
    }
    let special_instructions = validation::optional(
        "special_instructions",
        payload.special_instructions.as_deref(),
        MAX_NOTES_LENGTH,
    )?;

    Ok(ShipmentRequestFields {
        goods_type,
        weight_kg,
        pickup_location,
        pickup_city,
        pickup_region,
        delivery_location,
        delivery_city,
        delivery_region,
        delivery_deadline: payload.delivery_deadline,
        special_instructions,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use crate::{model::shipment::ShipmentRequestPayload, server::util::time};

    fn payload() -> ShipmentRequestPayload {
        ShipmentRequestPayload {
            goods_type: "Furniture".to_string(),
            weight_kg: Decimal::new(12055, 1),
            pickup_location: "Exit 18 warehouse".to_string(),
            pickup_city: "riyadh".to_string(),
            pickup_region: "riyadh".to_string(),
            delivery_location: "Corniche showroom".to_string(),
            delivery_city: "jeddah".to_string(),
            delivery_region: "makkah".to_string(),
            delivery_deadline: time::now() + Duration::days(7),
            special_instructions: Some("  ".to_string()),
        }
    }

    mod create {
        use entity::status::ShipmentRequestStatus;
        use rust_decimal::Decimal;
        use wasl_test_utils::prelude::*;

        use super::payload;
        use crate::server::{error::Error, service::shipment_request::ShipmentRequestService};

        /// Expect a Pending request with blank instructions dropped
        #[tokio::test]
        async fn creates_pending_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let service = ShipmentRequestService::new(&test.db);

            let request = service.create(company.id, payload()).await.unwrap();

            assert_eq!(request.status, ShipmentRequestStatus::Pending);
            assert_eq!(request.company_id, company.id);
            assert!(request.special_instructions.is_none());
            assert_eq!(request.requested_at, request.updated_at);

            Ok(())
        }

        /// Expect a weight below 0.1 kg to fail validation
        #[tokio::test]
        async fn rejects_weight_below_minimum() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let service = ShipmentRequestService::new(&test.db);

            let mut light = payload();
            light.weight_kg = Decimal::new(5, 2);
            let result = service.create(company.id, light).await;

            assert!(matches!(result, Err(Error::ValidationError(_))));

            Ok(())
        }
    }

    mod update {
        use entity::status::ShipmentRequestStatus;
        use wasl_test_utils::prelude::*;

        use super::payload;
        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::shipment_request::ShipmentRequestService,
        };

        /// Expect an assigned request to be locked against edits
        #[tokio::test]
        async fn refuses_assigned_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Assigned)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            let result = service.update(company.id, request.id, payload()).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }

        /// Expect another company's request to be reported missing
        #[tokio::test]
        async fn hides_foreign_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, owner) = test.user().insert_company("owner@acme.sa", true).await?;
            let (_, other) = test.user().insert_company("other@acme.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(owner.id, ShipmentRequestStatus::Pending)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            let result = service.update(other.id, request.id, payload()).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::NotFound { .. }))
            ));

            Ok(())
        }
    }

    mod delete {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            data::{bid::BidRepository, shipment_request::ShipmentRequestRepository},
            service::shipment_request::ShipmentRequestService,
        };

        /// Expect the request's bids to be removed with it
        #[tokio::test]
        async fn removes_bids() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 700, BidStatus::Submitted)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            service.delete(company.id, request.id).await.unwrap();

            assert!(BidRepository::new(&test.db)
                .find_by_id(bid.id)
                .await?
                .is_none());
            assert!(ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .is_none());

            Ok(())
        }
    }

    mod cancel {
        use entity::status::ShipmentRequestStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::shipment_request::ShipmentRequestService,
        };

        /// Expect an assigned request to be cancellable
        #[tokio::test]
        async fn cancels_assigned_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Assigned)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            let cancelled = service.cancel(company.id, request.id).await.unwrap();

            assert_eq!(cancelled.status, ShipmentRequestStatus::Cancelled);

            Ok(())
        }

        /// Expect a request already in progress to stay as it is
        #[tokio::test]
        async fn refuses_in_progress_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::InProgress)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            let result = service.cancel(company.id, request.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }
    }

    mod details {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use rust_decimal::Decimal;
        use wasl_test_utils::prelude::*;

        use crate::server::service::shipment_request::ShipmentRequestService;

        /// Expect bids cheapest first with statistics over priced bids
        #[tokio::test]
        async fn orders_bids_and_computes_stats() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, a) = test.user().insert_provider("a@freight.sa", true).await?;
            let (_, b) = test.user().insert_provider("b@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            test.marketplace()
                .insert_bid(request.id, a.id, 1200, BidStatus::Submitted)
                .await?;
            test.marketplace()
                .insert_bid(request.id, b.id, 800, BidStatus::Submitted)
                .await?;
            let service = ShipmentRequestService::new(&test.db);

            let details = service.details(request.id).await.unwrap();

            assert_eq!(details.bids[0].price, Decimal::from(800));
            assert_eq!(details.bids[0].provider_name.as_deref(), Some("Provider b"));
            assert_eq!(details.stats.bid_count, 2);
            assert_eq!(details.stats.bidder_count, 2);
            assert_eq!(details.stats.average_price, Some(Decimal::from(1000)));
            assert_eq!(details.stats.min_price, Some(Decimal::from(800)));
            assert_eq!(details.company_name, "Company ops");

            Ok(())
        }
    }
}
