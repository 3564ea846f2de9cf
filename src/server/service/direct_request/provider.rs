use entity::status::BidStatus;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        bid::BidDto,
        direct_request::{DirectRequestPageDto, RespondDirectRequestDto},
    },
    server::{
        data::bid::BidRepository,
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        service::{
            bid::validate_offer,
            direct_request::{direct_request_items, release_request},
        },
    },
};

pub const DIRECT_REQUEST_PAGE_SIZE: u64 = 10;

pub struct ProviderDirectRequestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProviderDirectRequestService<'a> {
    /// Creates a new instance of [`ProviderDirectRequestService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Direct requests awaiting the provider, newest first
    pub async fn list(&self, provider_id: i32, page: u64) -> Result<DirectRequestPageDto, Error> {
        let page = page.max(1);
        let (bids, total_items, total_pages) = BidRepository::new(self.db)
            .page_by_provider(provider_id, BidStatus::UnderReview, page, DIRECT_REQUEST_PAGE_SIZE)
            .await?;

        Ok(DirectRequestPageDto {
            items: direct_request_items(self.db, bids).await?,
            page,
            total_pages,
            total_items,
        })
    }

    /// Fills in the provider's offer, the request stays under review for the company
    pub async fn respond(
        &self,
        provider_id: i32,
        bid_id: i32,
        payload: RespondDirectRequestDto,
    ) -> Result<BidDto, Error> {
        let offer = validate_offer(
            payload.price,
            payload.estimated_delivery_days,
            payload.notes.as_deref(),
        )?;
        let bid_repo = BidRepository::new(self.db);

        bid_repo
            .find_for_provider(bid_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        let updated = bid_repo
            .update_offer(
                bid_id,
                BidStatus::UnderReview,
                offer.price,
                offer.estimated_delivery_days,
                offer.notes,
            )
            .await?;
        if updated == 0 {
            return Err(MarketplaceError::invalid_state(
                "Only direct requests under review can be answered",
            )
            .into());
        }

        let bid = bid_repo
            .find_by_id(bid_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        tracing::info!(provider_id, bid_id, price = %bid.price, "Responded to direct request");

        Ok(BidDto::from(bid))
    }

    /// Declines a direct request, deleting it
    pub async fn decline(&self, provider_id: i32, bid_id: i32) -> Result<(), Error> {
        let txn = self.db.begin().await?;
        let bid_repo = BidRepository::new(&txn);

        let bid = bid_repo
            .find_for_provider(bid_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::DirectRequest, bid_id))?;

        if bid.status != BidStatus::UnderReview {
            return Err(MarketplaceError::invalid_state(
                "Only direct requests under review can be declined",
            )
            .into());
        }

        bid_repo.delete(bid.id).await?;
        release_request(&txn, bid.shipment_request_id).await?;

        txn.commit().await?;

        tracing::info!(provider_id, bid_id, "Declined direct request");

        Ok(())
    }
}
