use entity::status::{BidStatus, ShipmentRequestStatus};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        bid::BidDto,
        direct_request::{DirectRequestDto, SendDirectRequestDto},
    },
    server::{
        data::{
            bid::{BidRepository, NewBid},
            provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::BidModel,
        service::direct_request::{
            direct_request_items, has_response, release_request, DEFAULT_DIRECT_REQUEST_NOTES,
        },
        util::validation::{self, MAX_MESSAGE_LENGTH},
    },
};

pub struct CompanyDirectRequestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyDirectRequestService<'a> {
    /// Creates a new instance of [`CompanyDirectRequestService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sends one of the company's open requests straight to an approved provider.
    ///
    /// Creates an UnderReview bid with a zero price and moves the request to DirectRequest
    /// in one transaction.
    ///
    /// # Returns
    /// - `Ok(BidDto)` - The direct request awaiting the provider's offer
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Provider not approved or
    ///   request not the company's own
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Request not Pending or Bidding
    /// - `Err(Error::MarketplaceError(MarketplaceError::Duplicate))` - The provider already has a
    ///   bid on this request
    pub async fn send(
        &self,
        company_id: i32,
        payload: SendDirectRequestDto,
    ) -> Result<BidDto, Error> {
        let message = validation::optional(
            "message",
            payload.message.as_deref(),
            MAX_MESSAGE_LENGTH,
        )?;

        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);
        let request_repo = ShipmentRequestRepository::new(&txn);

        let provider = ProviderRepository::new(&txn)
            .find_by_id(payload.provider_id)
            .await?
            .filter(|provider| provider.is_approved)
            .ok_or(MarketplaceError::not_found(
                Resource::Provider,
                payload.provider_id,
            ))?;
        let request = request_repo
            .find_for_company(payload.shipment_request_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                payload.shipment_request_id,
            ))?;

        if !request.status.is_open_for_bids() {
            return Err(MarketplaceError::invalid_state(
                "Only pending or bidding shipment requests can be sent to a provider",
            )
            .into());
        }

        if bid_repo
            .find_by_provider_and_shipment(provider.id, request.id, None)
            .await?
            .is_some()
        {
            return Err(MarketplaceError::Duplicate(
                "This provider already has a bid on this shipment request".to_string(),
            )
            .into());
        }

        let bid = bid_repo
            .create(NewBid {
                shipment_request_id: request.id,
                provider_id: provider.id,
                price: Decimal::ZERO,
                estimated_delivery_days: 0,
                notes: Some(message.unwrap_or_else(|| DEFAULT_DIRECT_REQUEST_NOTES.to_string())),
                status: BidStatus::UnderReview,
            })
            .await?;
        request_repo
            .set_status(request.id, ShipmentRequestStatus::DirectRequest)
            .await?;

        txn.commit().await?;

        tracing::info!(
            company_id,
            provider_id = provider.id,
            shipment_request_id = request.id,
            bid_id = bid.id,
            "Sent direct request"
        );

        Ok(BidDto::with_provider_name(bid, Some(provider.name)))
    }

    /// The company's direct requests still under review
    pub async fn list(
        &self,
        company_id: i32,
        provider_id: Option<i32>,
    ) -> Result<Vec<DirectRequestDto>, Error> {
        let bids: Vec<BidModel> = BidRepository::new(self.db)
            .list_for_company(company_id, Some(BidStatus::UnderReview), None)
            .await?
            .into_iter()
            .filter(|bid| provider_id.is_none_or(|id| bid.provider_id == id))
            .collect();

        direct_request_items(self.db, bids).await
    }

    /// Withdraws a direct request
    pub async fn delete(&self, company_id: i32, bid_id: i32) -> Result<(), Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = bid_repo
            .find_for_company(bid_id, company_id)
            .await?
            .filter(|bid| bid.status == BidStatus::UnderReview)
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        bid_repo.delete(bid.id).await?;
        release_request(&txn, bid.shipment_request_id).await?;

        txn.commit().await?;

        tracing::info!(company_id, bid_id, "Deleted direct request");

        Ok(())
    }

    /// Accepts the provider's offer and assigns them to the request
    ///
    /// # Returns
    /// - `Ok(BidDto)` - The accepted bid
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - The provider has not
    ///   responded or the request was already decided
    pub async fn accept(&self, company_id: i32, bid_id: i32) -> Result<BidDto, Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = self.find_answered(&bid_repo, company_id, bid_id).await?;

        let accepted = bid_repo
            .transition_status(bid.id, &[BidStatus::UnderReview], BidStatus::Accepted, None)
            .await?;
        if accepted == 0 {
            return Err(MarketplaceError::invalid_state(
                "This direct request has already been decided",
            )
            .into());
        }

        ShipmentRequestRepository::new(&txn)
            .assign(bid.shipment_request_id, bid.provider_id)
            .await?;
        bid_repo
            .reject_others(bid.shipment_request_id, bid.id)
            .await?;

        let bid = bid_repo
            .find_by_id(bid.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        txn.commit().await?;

        tracing::info!(company_id, bid_id, "Accepted direct request offer");

        Ok(BidDto::from(bid))
    }

    /// Rejects the provider's offer and returns the request to Pending
    ///
    /// The request reverts even while other direct requests on it remain under review.
    pub async fn reject(&self, company_id: i32, bid_id: i32) -> Result<BidDto, Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = self.find_answered(&bid_repo, company_id, bid_id).await?;

        let rejected = bid_repo
            .transition_status(bid.id, &[BidStatus::UnderReview], BidStatus::Rejected, None)
            .await?;
        if rejected == 0 {
            return Err(MarketplaceError::invalid_state(
                "This direct request has already been decided",
            )
            .into());
        }
        ShipmentRequestRepository::new(&txn)
            .set_status(bid.shipment_request_id, ShipmentRequestStatus::Pending)
            .await?;

        let bid = bid_repo
            .find_by_id(bid.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        txn.commit().await?;

        tracing::info!(company_id, bid_id, "Rejected direct request offer");

        Ok(BidDto::from(bid))
    }

    async fn find_answered<C: sea_orm::ConnectionTrait>(
        &self,
        bid_repo: &BidRepository<'_, C>,
        company_id: i32,
        bid_id: i32,
    ) -> Result<BidModel, Error> {
        let bid = bid_repo
            .find_for_company(bid_id, company_id)
            .await?
            .filter(|bid| bid.status == BidStatus::UnderReview)
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        if !has_response(&bid) {
            return Err(MarketplaceError::invalid_state(
                "The provider has not responded to this direct request yet",
            )
            .into());
        }

        Ok(bid)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::direct_request::SendDirectRequestDto;

    fn request_for(provider_id: i32, shipment_request_id: i32) -> SendDirectRequestDto {
        SendDirectRequestDto {
            provider_id,
            shipment_request_id,
            message: None,
        }
    }

    mod send {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use rust_decimal::Decimal;
        use wasl_test_utils::prelude::*;

        use super::request_for;
        use crate::server::{
            data::shipment_request::ShipmentRequestRepository,
            error::{marketplace::MarketplaceError, Error},
            service::direct_request::{
                company::CompanyDirectRequestService, DEFAULT_DIRECT_REQUEST_NOTES,
            },
        };

        /// Expect an unpriced UnderReview bid and the request held as DirectRequest
        #[tokio::test]
        async fn holds_request_for_provider() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Pending)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let bid = service
                .send(company.id, request_for(provider.id, request.id))
                .await
                .unwrap();

            assert_eq!(bid.status, BidStatus::UnderReview);
            assert_eq!(bid.price, Decimal::ZERO);
            assert_eq!(bid.estimated_delivery_days, 0);
            assert_eq!(bid.notes.as_deref(), Some(DEFAULT_DIRECT_REQUEST_NOTES));
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::DirectRequest);

            Ok(())
        }

        /// Expect an unapproved provider to be unreachable
        #[tokio::test]
        async fn refuses_unapproved_provider() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", false).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Pending)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let result = service
                .send(company.id, request_for(provider.id, request.id))
                .await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::NotFound { .. }))
            ));

            Ok(())
        }

        /// Expect a request already held for a direct request to be refused
        #[tokio::test]
        async fn refuses_request_on_hold() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, a) = test.user().insert_provider("a@freight.sa", true).await?;
            let (_, b) = test.user().insert_provider("b@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Pending)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            service
                .send(company.id, request_for(a.id, request.id))
                .await
                .unwrap();
            let result = service.send(company.id, request_for(b.id, request.id)).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }

        /// Expect a provider that already bid on the request to be refused
        #[tokio::test]
        async fn refuses_provider_with_existing_bid() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::Bidding)
                .await?;
            test.marketplace()
                .insert_bid(request.id, provider.id, 1800, BidStatus::Rejected)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let result = service
                .send(company.id, request_for(provider.id, request.id))
                .await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::Duplicate(_)))
            ));
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Bidding);

            Ok(())
        }
    }

    mod accept {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            data::shipment_request::ShipmentRequestRepository,
            error::{marketplace::MarketplaceError, Error},
            service::direct_request::company::CompanyDirectRequestService,
        };

        /// Expect an answered request to be accepted and the shipment assigned
        #[tokio::test]
        async fn accepts_answered_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::DirectRequest)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 2200, BidStatus::UnderReview)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let accepted = service.accept(company.id, bid.id).await.unwrap();

            assert_eq!(accepted.status, BidStatus::Accepted);
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Assigned);
            assert_eq!(request.provider_id, Some(provider.id));

            Ok(())
        }

        /// Expect an unanswered request to be refused
        #[tokio::test]
        async fn refuses_unanswered_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::DirectRequest)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 0, BidStatus::UnderReview)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let result = service.accept(company.id, bid.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }
    }

    mod reject {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            data::shipment_request::ShipmentRequestRepository,
            service::direct_request::company::CompanyDirectRequestService,
        };

        /// Expect the request to return to Pending after rejecting the only offer
        #[tokio::test]
        async fn releases_request() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::DirectRequest)
                .await?;
            let bid = test
                .marketplace()
                .insert_bid(request.id, provider.id, 2200, BidStatus::UnderReview)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let rejected = service.reject(company.id, bid.id).await.unwrap();

            assert_eq!(rejected.status, BidStatus::Rejected);
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Pending);

            Ok(())
        }

        /// Expect the request to return to Pending even with another offer still open
        #[tokio::test]
        async fn reverts_request_with_other_offers_open() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, a) = test.user().insert_provider("a@freight.sa", true).await?;
            let (_, b) = test.user().insert_provider("b@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::DirectRequest)
                .await?;
            let answered = test
                .marketplace()
                .insert_bid(request.id, a.id, 2200, BidStatus::UnderReview)
                .await?;
            test.marketplace()
                .insert_bid(request.id, b.id, 0, BidStatus::UnderReview)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            service.reject(company.id, answered.id).await.unwrap();

            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Pending);

            Ok(())
        }
    }

    mod list {
        use entity::status::{BidStatus, ShipmentRequestStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::service::direct_request::company::CompanyDirectRequestService;

        /// Expect only open direct requests, flagged by whether the provider answered
        #[tokio::test]
        async fn lists_open_direct_requests() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, a) = test.user().insert_provider("a@freight.sa", true).await?;
            let (_, b) = test.user().insert_provider("b@freight.sa", true).await?;
            let request = test
                .marketplace()
                .insert_shipment_request(company.id, ShipmentRequestStatus::DirectRequest)
                .await?;
            test.marketplace()
                .insert_bid(request.id, a.id, 1900, BidStatus::UnderReview)
                .await?;
            test.marketplace()
                .insert_bid(request.id, b.id, 1500, BidStatus::Rejected)
                .await?;
            let service = CompanyDirectRequestService::new(&test.db);

            let all = service.list(company.id, None).await.unwrap();
            let for_b = service.list(company.id, Some(b.id)).await.unwrap();

            assert_eq!(all.len(), 1);
            assert!(all[0].has_response);
            assert_eq!(all[0].company_name, "Company ops");
            assert!(for_b.is_empty());

            Ok(())
        }
    }
}
