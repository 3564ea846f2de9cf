use entity::status::BidStatus;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        bid::{BidDetailsDto, BidDto, BidWithShipmentDto, CompanyBidQuery, ShipmentBidsDto},
        profile::ProviderDto,
        shipment::ShipmentRequestDto,
    },
    server::{
        data::{
            bid::BidRepository, feedback::FeedbackRepository, provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::BidModel,
        service::{
            bid::with_shipments,
            shipment_request::{bid_stats, with_provider_names},
        },
        util::validation::{self, MAX_NOTES_LENGTH},
    },
};

/// Notes recorded on a bid the company rejects without comment.
pub const DEFAULT_REJECTION_NOTES: &str = "Rejected by company";

pub struct CompanyBidService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyBidService<'a> {
    /// Creates a new instance of [`CompanyBidService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Bids placed on the company's requests, cheapest first
    ///
    /// # Arguments
    /// - `company_id` - Company whose requests the bids were placed on
    /// - `query` - Optional status and request filters plus a provider name search
    pub async fn list(
        &self,
        company_id: i32,
        query: CompanyBidQuery,
    ) -> Result<Vec<BidWithShipmentDto>, Error> {
        let bids = BidRepository::new(self.db)
            .list_for_company(company_id, query.status, query.shipment_id)
            .await?;
        let items = with_shipments(self.db, bids).await?;

        let search = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(match search {
            Some(search) => items
                .into_iter()
                .filter(|item| {
                    item.bid
                        .provider_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&search))
                })
                .collect(),
            None => items,
        })
    }

    /// A bid with the bidding provider's profile and rating
    pub async fn show(&self, company_id: i32, bid_id: i32) -> Result<BidDetailsDto, Error> {
        let bid = self.find_owned(company_id, bid_id).await?;

        let shipment = ShipmentRequestRepository::new(self.db)
            .find_by_id(bid.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                bid.shipment_request_id,
            ))?;
        let provider = ProviderRepository::new(self.db)
            .find_by_id(bid.provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Provider, bid.provider_id))?;
        let stats = FeedbackRepository::new(self.db)
            .rating_stats(Some(&[provider.id][..]))
            .await?
            .remove(&provider.id)
            .unwrap_or_default();

        Ok(BidDetailsDto {
            bid: BidDto::with_provider_name(bid, Some(provider.name.clone())),
            shipment: ShipmentRequestDto::from(shipment),
            provider: ProviderDto::from(provider),
            average_rating: stats.average(),
            feedback_count: stats.count,
        })
    }

    /// Accepts a submitted bid and assigns its provider to the request.
    ///
    /// In one transaction the bid becomes Accepted, the request becomes Assigned, and every
    /// other open bid on the request is rejected. The acceptance is a conditional update, so
    /// of two concurrent accepts only one succeeds.
    ///
    /// # Returns
    /// - `Ok(BidDto)` - The accepted bid
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Not a bid on the company's requests
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - The bid is not Submitted
    pub async fn accept(&self, company_id: i32, bid_id: i32) -> Result<BidDto, Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = bid_repo
            .find_for_company(bid_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        let accepted = bid_repo
            .transition_status(bid.id, &[BidStatus::Submitted], BidStatus::Accepted, None)
            .await?;
        if accepted == 0 {
            return Err(
                MarketplaceError::invalid_state("Only submitted bids can be accepted").into(),
            );
        }

        ShipmentRequestRepository::new(&txn)
            .assign(bid.shipment_request_id, bid.provider_id)
            .await?;
        let rejected = bid_repo
            .reject_others(bid.shipment_request_id, bid.id)
            .await?;

        let bid = bid_repo
            .find_by_id(bid.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        txn.commit().await?;

        tracing::info!(
            company_id,
            bid_id,
            shipment_request_id = bid.shipment_request_id,
            rejected_bids = rejected,
            "Accepted bid"
        );

        Ok(BidDto::from(bid))
    }

    /// Rejects a submitted bid, recording the company's notes
    pub async fn reject(
        &self,
        company_id: i32,
        bid_id: i32,
        notes: Option<String>,
    ) -> Result<BidDto, Error> {
        let bid_repo = BidRepository::new(self.db);
        let bid = self.find_owned(company_id, bid_id).await?;

        let notes = validation::optional("notes", notes.as_deref(), MAX_NOTES_LENGTH)?
            .unwrap_or_else(|| DEFAULT_REJECTION_NOTES.to_string());
        let rejected = bid_repo
            .transition_status(
                bid.id,
                &[BidStatus::Submitted],
                BidStatus::Rejected,
                Some(notes),
            )
            .await?;
        if rejected == 0 {
            return Err(
                MarketplaceError::invalid_state("Only submitted bids can be rejected").into(),
            );
        }

        let bid = bid_repo
            .find_by_id(bid_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        tracing::info!(company_id, bid_id, "Rejected bid");

        Ok(BidDto::from(bid))
    }

    /// Bids on one of the company's requests with price statistics
    pub async fn for_shipment(
        &self,
        company_id: i32,
        shipment_request_id: i32,
    ) -> Result<ShipmentBidsDto, Error> {
        let request = ShipmentRequestRepository::new(self.db)
            .find_for_company(shipment_request_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                shipment_request_id,
            ))?;

        let bids = BidRepository::new(self.db)
            .list_by_shipment(request.id)
            .await?;
        let stats = bid_stats(&bids);

        Ok(ShipmentBidsDto {
            shipment: ShipmentRequestDto::from(request),
            bids: with_provider_names(self.db, bids).await?,
            stats,
        })
    }

    /// Accepted bids that still need a contract
    pub async fn waiting_contracts(
        &self,
        company_id: i32,
    ) -> Result<Vec<BidWithShipmentDto>, Error> {
        let bids = BidRepository::new(self.db)
            .list_for_company(company_id, Some(BidStatus::Accepted), None)
            .await?;

        with_shipments(self.db, bids).await
    }

    async fn find_owned(&self, company_id: i32, bid_id: i32) -> Result<BidModel, Error> {
        BidRepository::new(self.db)
            .find_for_company(bid_id, company_id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found(Resource::Bid, bid_id).into())
    }
}

#[cfg(test)]
mod tests {
    mod accept {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            data::{bid::BidRepository, shipment_request::ShipmentRequestRepository},
            error::{marketplace::MarketplaceError, Error},
            service::bid::company::CompanyBidService,
        };

        /// Expect the request to be assigned and the competing bid rejected
        #[tokio::test]
        async fn assigns_request_and_rejects_others() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, winner) = test.user().insert_provider("win@freight.sa", true).await?;
            let (_, loser) = test.user().insert_provider("lose@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, winner.id, 900, BidStatus::Submitted)
                .await?;
            let other = test
                .marketplace()
                .insert_bid(request.id, loser.id, 1100, BidStatus::Submitted)
                .await?;
            let service = CompanyBidService::new(&test.db);

            let accepted = service.accept(company.id, bid.id).await.unwrap();

            assert_eq!(accepted.status, BidStatus::Accepted);
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Assigned);
            assert_eq!(request.provider_id, Some(winner.id));
            let other = BidRepository::new(&test.db)
                .find_by_id(other.id)
                .await?
                .unwrap();
            assert_eq!(other.status, BidStatus::Rejected);

            Ok(())
        }

        /// Expect a second accept of the same bid to be refused
        #[tokio::test]
        async fn refuses_second_accept() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 900, BidStatus::Submitted)
                .await?;
            let service = CompanyBidService::new(&test.db);

            service.accept(company.id, bid.id).await.unwrap();
            let result = service.accept(company.id, bid.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }

        /// Expect a bid on another company's request to be reported missing
        #[tokio::test]
        async fn hides_foreign_bid() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, owner) = test.user().insert_company("owner@acme.sa", true).await?;
            let (_, other) = test.user().insert_company("other@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(owner.id, ShipmentRequestStatus::Bidding)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 900, BidStatus::Submitted)
                .await?;
            let service = CompanyBidService::new(&test.db);

            let result = service.accept(other.id, bid.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::NotFound { .. }))
            ));

            Ok(())
        }
    }

    mod reject {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::service::bid::company::{CompanyBidService, DEFAULT_REJECTION_NOTES};

        /// Expect the default notes when the company gives none
        #[tokio::test]
        async fn records_default_notes() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 900, BidStatus::Submitted)
                .await?;
            let service = CompanyBidService::new(&test.db);

            let rejected = service.reject(company.id, bid.id, None).await.unwrap();

            assert_eq!(rejected.status, BidStatus::Rejected);
            assert_eq!(rejected.notes.as_deref(), Some(DEFAULT_REJECTION_NOTES));

            Ok(())
        }
    }

    mod list {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::{
            model::bid::CompanyBidQuery, server::service::bid::company::CompanyBidService,
        };

        /// Expect the search to match the provider's name only
        #[tokio::test]
        async fn searches_provider_name() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, falcon) = test.user().insert_provider("falcon@freight.sa", true).await?;
            let (_, oryx) = test.user().insert_provider("oryx@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            test.marketplace()
                .insert_bid(request.id, falcon.id, 900, BidStatus::Submitted)
                .await?;
            test.marketplace()
                .insert_bid(request.id, oryx.id, 800, BidStatus::Submitted)
                .await?;
            let service = CompanyBidService::new(&test.db);

            let all = service
                .list(company.id, CompanyBidQuery::default())
                .await
                .unwrap();
            let falcons = service
                .list(
                    company.id,
                    CompanyBidQuery {
                        search: Some("FALCON".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(all.len(), 2);
            assert_eq!(all[0].bid.provider_id, oryx.id);
            assert_eq!(falcons.len(), 1);
            assert_eq!(falcons[0].bid.provider_id, falcon.id);

            Ok(())
        }
    }
}
