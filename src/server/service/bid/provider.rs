use entity::status::{BidStatus, ShipmentRequestStatus};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::bid::{BidDto, BidWithShipmentDto, SubmitBidDto, UpdateBidDto},
    server::{
        data::{
            bid::{BidRepository, NewBid},
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        service::{
            bid::{validate_offer, with_shipments},
            direct_request::release_request,
        },
    },
};

pub struct ProviderBidService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProviderBidService<'a> {
    /// Creates a new instance of [`ProviderBidService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The provider's bids, newest first
    pub async fn list(
        &self,
        provider_id: i32,
        status: Option<BidStatus>,
    ) -> Result<Vec<BidWithShipmentDto>, Error> {
        let bids = BidRepository::new(self.db)
            .list_by_provider(provider_id, status)
            .await?;

        with_shipments(self.db, bids).await
    }

    /// Places a bid on an open shipment request.
    ///
    /// A provider may bid once per request. The first bid on a Pending request moves it
    /// to Bidding.
    ///
    /// # Returns
    /// - `Ok(BidDto)` - The submitted bid
    /// - `Err(Error::ValidationError)` - Price, delivery days or notes out of bounds
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - No such request
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Request not open for bids
    /// - `Err(Error::MarketplaceError(MarketplaceError::Duplicate))` - Provider already bid
    pub async fn submit(&self, provider_id: i32, payload: SubmitBidDto) -> Result<BidDto, Error> {
        let offer = validate_offer(
            payload.price,
            payload.estimated_delivery_days,
            payload.notes.as_deref(),
        )?;

        let txn = self.db.begin().await?;
        let request_repo = ShipmentRequestRepository::new(&txn);
        let bid_repo = BidRepository::new(&txn);

        let request = request_repo
            .find_by_id(payload.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                payload.shipment_request_id,
            ))?;

        if !request.status.is_open_for_bids() {
            return Err(MarketplaceError::invalid_state(
                "This shipment request is no longer accepting bids",
            )
            .into());
        }

        if bid_repo
            .find_by_provider_and_shipment(provider_id, request.id, None)
            .await?
            .is_some()
        {
            return Err(MarketplaceError::Duplicate(
                "You have already placed a bid on this shipment request".to_string(),
            )
            .into());
        }

        let bid = bid_repo
            .create(NewBid {
                shipment_request_id: request.id,
                provider_id,
                price: offer.price,
                estimated_delivery_days: offer.estimated_delivery_days,
                notes: offer.notes,
                status: BidStatus::Submitted,
            })
            .await?;
        request_repo
            .transition_status(
                request.id,
                &[ShipmentRequestStatus::Pending],
                ShipmentRequestStatus::Bidding,
            )
            .await?;

        txn.commit().await?;

        tracing::info!(
            provider_id,
            bid_id = bid.id,
            shipment_request_id = request.id,
            "Submitted bid"
        );

        Ok(BidDto::from(bid))
    }

    /// Revises a bid that has not been decided on yet
    pub async fn update(
        &self,
        provider_id: i32,
        bid_id: i32,
        payload: UpdateBidDto,
    ) -> Result<BidDto, Error> {
        let offer = validate_offer(
            payload.price,
            payload.estimated_delivery_days,
            payload.notes.as_deref(),
        )?;
        let bid_repo = BidRepository::new(self.db);

        let bid = bid_repo
            .find_for_provider(bid_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        let updated = bid_repo
            .update_offer(
                bid.id,
                BidStatus::Submitted,
                offer.price,
                offer.estimated_delivery_days,
                offer.notes,
            )
            .await?;
        if updated == 0 {
            return Err(
                MarketplaceError::invalid_state("Only submitted bids can be edited").into(),
            );
        }

        let bid = bid_repo
            .find_by_id(bid_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        Ok(BidDto::from(bid))
    }

    /// Withdraws a submitted bid or an unanswered direct request by deleting it
    pub async fn cancel(&self, provider_id: i32, bid_id: i32) -> Result<(), Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = bid_repo
            .find_for_provider(bid_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;

        if !matches!(bid.status, BidStatus::Submitted | BidStatus::UnderReview) {
            return Err(MarketplaceError::invalid_state(
                "Only submitted or under review bids can be cancelled",
            )
            .into());
        }

        bid_repo.delete(bid.id).await?;
        if bid.status == BidStatus::UnderReview {
            release_request(&txn, bid.shipment_request_id).await?;
        }

        txn.commit().await?;

        tracing::info!(provider_id, bid_id, "Cancelled bid");

        Ok(())
    }
}
