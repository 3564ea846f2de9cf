//! Direct request services.
//!
//! A direct request is a bid created by the company for one chosen provider, held in
//! UnderReview with a zero price until the provider answers with an offer. While any are
//! open the shipment request stays in DirectRequest and out of open bidding.

pub mod company;
pub mod directory;
pub mod provider;

use std::collections::{HashMap, HashSet};

use entity::status::{BidStatus, ShipmentRequestStatus};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{
    model::{direct_request::DirectRequestDto, shipment::ShipmentRequestDto},
    server::{
        data::{
            bid::BidRepository, company::CompanyRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::Error,
        model::db::BidModel,
        service::shipment_request::with_provider_names,
    },
};

/// Notes stored on a direct request sent without a message.
pub const DEFAULT_DIRECT_REQUEST_NOTES: &str = "Direct request from company";

/// Returns a request to Pending once its last open direct request is gone.
///
/// Requests in any status other than DirectRequest are left untouched.
pub(crate) async fn release_request<C: ConnectionTrait>(
    db: &C,
    shipment_request_id: i32,
) -> Result<(), Error> {
    let remaining = BidRepository::new(db)
        .count_by_status_on_shipment(shipment_request_id, BidStatus::UnderReview)
        .await?;

    if remaining == 0 {
        let released = ShipmentRequestRepository::new(db)
            .transition_status(
                shipment_request_id,
                &[ShipmentRequestStatus::DirectRequest],
                ShipmentRequestStatus::Pending,
            )
            .await?;

        if released > 0 {
            tracing::debug!(shipment_request_id, "Released shipment request to Pending");
        }
    }

    Ok(())
}

/// Whether the provider has answered the direct request with a price
pub(crate) fn has_response(bid: &BidModel) -> bool {
    bid.price > Decimal::ZERO
}

async fn direct_request_items(
    db: &DatabaseConnection,
    bids: Vec<BidModel>,
) -> Result<Vec<DirectRequestDto>, Error> {
    let request_ids: Vec<i32> = bids.iter().map(|bid| bid.shipment_request_id).collect();
    let requests = ShipmentRequestRepository::new(db)
        .find_by_ids(&request_ids)
        .await?;
    let company_ids: Vec<i32> = requests
        .values()
        .map(|request| request.company_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let company_names: HashMap<i32, String> = CompanyRepository::new(db)
        .find_by_ids(&company_ids)
        .await?
        .into_iter()
        .map(|company| (company.id, company.name))
        .collect();

    let responded: HashSet<i32> = bids
        .iter()
        .filter(|bid| has_response(bid))
        .map(|bid| bid.id)
        .collect();
    let bids = with_provider_names(db, bids).await?;

    let mut items = Vec::with_capacity(bids.len());
    for bid in bids {
        let request = requests.get(&bid.shipment_request_id).ok_or_else(|| {
            Error::InternalError(format!(
                "Shipment request {} of direct request {} is missing",
                bid.shipment_request_id, bid.id
            ))
        })?;

        items.push(DirectRequestDto {
            has_response: responded.contains(&bid.id),
            company_name: company_names
                .get(&request.company_id)
                .cloned()
                .unwrap_or_default(),
            shipment: ShipmentRequestDto::from(request.clone()),
            bid,
        });
    }

    Ok(items)
}
