//! Bid services.
//!
//! Companies review and decide on the bids placed on their requests, providers place,
//! revise and withdraw their own.

pub mod company;
pub mod provider;

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{
    model::{bid::BidWithShipmentDto, shipment::ShipmentRequestDto},
    server::{
        data::shipment_request::ShipmentRequestRepository,
        error::Error,
        model::db::BidModel,
        service::shipment_request::with_provider_names,
        util::validation::{
            self, MAX_BID_PRICE, MAX_DELIVERY_DAYS, MAX_NOTES_LENGTH, MIN_BID_PRICE,
            MIN_DELIVERY_DAYS,
        },
    },
};

/// A validated price, delivery estimate and notes.
pub(crate) struct Offer {
    pub price: Decimal,
    pub estimated_delivery_days: i32,
    pub notes: Option<String>,
}

pub(crate) fn validate_offer(
    price: Decimal,
    estimated_delivery_days: i32,
    notes: Option<&str>,
) -> Result<Offer, Error> {
    Ok(Offer {
        price: validation::in_range(
            "price",
            price,
            Decimal::from(MIN_BID_PRICE),
            Decimal::from(MAX_BID_PRICE),
        )?,
        estimated_delivery_days: validation::in_range(
            "estimated_delivery_days",
            estimated_delivery_days,
            MIN_DELIVERY_DAYS,
            MAX_DELIVERY_DAYS,
        )?,
        notes: validation::optional("notes", notes, MAX_NOTES_LENGTH)?,
    })
}

/// Pairs each bid with the shipment request it was placed on
pub(crate) async fn with_shipments(
    db: &DatabaseConnection,
    bids: Vec<BidModel>,
) -> Result<Vec<BidWithShipmentDto>, Error> {
    let request_ids: Vec<i32> = bids.iter().map(|bid| bid.shipment_request_id).collect();
    let mut requests = ShipmentRequestRepository::new(db)
        .find_by_ids(&request_ids)
        .await?;
    let bids = with_provider_names(db, bids).await?;

    let mut shipments: HashMap<i32, ShipmentRequestDto> = HashMap::new();
    let mut items = Vec::with_capacity(bids.len());
    for bid in bids {
        let shipment = match shipments.get(&bid.shipment_request_id) {
            Some(shipment) => shipment.clone(),
            None => {
                let request = requests.remove(&bid.shipment_request_id).ok_or_else(|| {
                    Error::InternalError(format!(
                        "Shipment request {} of bid {} is missing",
                        bid.shipment_request_id, bid.id
                    ))
                })?;
                let shipment = ShipmentRequestDto::from(request);
                shipments.insert(bid.shipment_request_id, shipment.clone());
                shipment
            }
        };

        items.push(BidWithShipmentDto { bid, shipment });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::validate_offer;
    use crate::server::error::Error;

    #[test]
    fn accepts_offer_within_bounds() {
        let offer = validate_offer(Decimal::from(2500), 4, Some(" Two trucks ")).unwrap();

        assert_eq!(offer.estimated_delivery_days, 4);
        assert_eq!(offer.notes.as_deref(), Some("Two trucks"));
    }

    #[test]
    fn rejects_zero_price() {
        let result = validate_offer(Decimal::ZERO, 4, None);

        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[test]
    fn rejects_delivery_beyond_a_year() {
        let result = validate_offer(Decimal::from(100), 366, None);

        assert!(matches!(result, Err(Error::ValidationError(_))));
    }
}
