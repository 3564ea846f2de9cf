use chrono::{Duration, NaiveDateTime, Utc};
use entity::status::{BidStatus, PaymentStatus, ShipmentRequestStatus, TrackingStatus};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

/// Every row between a company and a provider that a contract depends on.
pub struct ContractChain {
    pub company_user: entity::wasl_user::Model,
    pub company: entity::company::Model,
    pub provider_user: entity::wasl_user::Model,
    pub provider: entity::provider::Model,
    pub shipment_request: entity::shipment_request::Model,
    pub bid: entity::bid::Model,
    pub contract: entity::contract::Model,
}

impl TestContext {
    pub fn marketplace<'a>(&'a mut self) -> MarketplaceFixtures<'a> {
        MarketplaceFixtures { setup: self }
    }
}

pub struct MarketplaceFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> MarketplaceFixtures<'a> {
    /// Insert a 250 kg electronics shipment from Riyadh to Jeddah due in ten days.
    pub async fn insert_shipment_request(
        &self,
        company_id: i32,
        status: ShipmentRequestStatus,
    ) -> Result<entity::shipment_request::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::ShipmentRequest::insert(entity::shipment_request::ActiveModel {
                company_id: ActiveValue::Set(company_id),
                provider_id: ActiveValue::Set(None),
                goods_type: ActiveValue::Set("Electronics".to_string()),
                weight_kg: ActiveValue::Set(Decimal::from(250)),
                pickup_location: ActiveValue::Set("Warehouse 7, Industrial City".to_string()),
                pickup_city: ActiveValue::Set("riyadh".to_string()),
                pickup_region: ActiveValue::Set("riyadh".to_string()),
                delivery_location: ActiveValue::Set("Port Road 12".to_string()),
                delivery_city: ActiveValue::Set("jeddah".to_string()),
                delivery_region: ActiveValue::Set("makkah".to_string()),
                delivery_deadline: ActiveValue::Set(now + Duration::days(10)),
                status: ActiveValue::Set(status),
                special_instructions: ActiveValue::Set(None),
                requested_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a bid with a whole-riyal price and a five day estimate.
    pub async fn insert_bid(
        &self,
        shipment_request_id: i32,
        provider_id: i32,
        price: i64,
        status: BidStatus,
    ) -> Result<entity::bid::Model, TestError> {
        Ok(entity::prelude::Bid::insert(entity::bid::ActiveModel {
            shipment_request_id: ActiveValue::Set(shipment_request_id),
            provider_id: ActiveValue::Set(provider_id),
            price: ActiveValue::Set(Decimal::from(price)),
            estimated_delivery_days: ActiveValue::Set(if price > 0 { 5 } else { 0 }),
            notes: ActiveValue::Set(None),
            status: ActiveValue::Set(status),
            submitted_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Insert a contract for an accepted bid.
    ///
    /// The referenced document is not written to the upload directory.
    pub async fn insert_contract(
        &self,
        bid: &entity::bid::Model,
        company_id: i32,
        signed_at: Option<NaiveDateTime>,
    ) -> Result<entity::contract::Model, TestError> {
        Ok(entity::prelude::Contract::insert(entity::contract::ActiveModel {
            bid_id: ActiveValue::Set(bid.id),
            company_id: ActiveValue::Set(company_id),
            provider_id: ActiveValue::Set(bid.provider_id),
            shipment_request_id: ActiveValue::Set(bid.shipment_request_id),
            document: ActiveValue::Set(format!("contracts/contract-{}-fixture.pdf", bid.id)),
            signed_at: ActiveValue::Set(signed_at),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Insert an approved company and provider joined by a contract.
    ///
    /// The bid is priced at 1500 and marked ContractCreated, the request is Assigned.
    pub async fn insert_contract_chain(
        &mut self,
        signed: bool,
    ) -> Result<ContractChain, TestError> {
        let (company_user, company) = self
            .setup
            .user()
            .insert_company("chain-company@example.com", true)
            .await?;
        let (provider_user, provider) = self
            .setup
            .user()
            .insert_provider("chain-provider@example.com", true)
            .await?;

        let shipment_request = self
            .insert_shipment_request(company.id, ShipmentRequestStatus::Assigned)
            .await?;
        let bid = self
            .insert_bid(
                shipment_request.id,
                provider.id,
                1500,
                BidStatus::ContractCreated,
            )
            .await?;
        let signed_at = signed.then(|| Utc::now().naive_utc());
        let contract = self.insert_contract(&bid, company.id, signed_at).await?;

        Ok(ContractChain {
            company_user,
            company,
            provider_user,
            provider,
            shipment_request,
            bid,
            contract,
        })
    }

    /// Insert an invoice issued now and due in fifteen days.
    pub async fn insert_invoice(
        &self,
        contract_id: i32,
    ) -> Result<entity::invoice::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::Invoice::insert(entity::invoice::ActiveModel {
            contract_id: ActiveValue::Set(contract_id),
            invoice_number: ActiveValue::Set(format!("INV-FIXTURE-{}", contract_id)),
            issued_at: ActiveValue::Set(now),
            due_at: ActiveValue::Set(now + Duration::days(15)),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    pub async fn insert_payment(
        &self,
        invoice_id: i32,
        amount: i64,
        status: PaymentStatus,
    ) -> Result<entity::payment::Model, TestError> {
        Ok(entity::prelude::Payment::insert(entity::payment::ActiveModel {
            invoice_id: ActiveValue::Set(invoice_id),
            amount: ActiveValue::Set(Decimal::from(amount)),
            method: ActiveValue::Set("credit_card".to_string()),
            status: ActiveValue::Set(status),
            transaction_id: ActiveValue::Set(None),
            payment_date: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Append a shipment snapshot sharing the contract's fixture tracking number.
    pub async fn insert_shipment(
        &self,
        contract_id: i32,
        status: TrackingStatus,
    ) -> Result<entity::shipment::Model, TestError> {
        let now = Utc::now().naive_utc();
        let delivered_at = (status == TrackingStatus::Delivered).then_some(now);

        Ok(entity::prelude::Shipment::insert(entity::shipment::ActiveModel {
            contract_id: ActiveValue::Set(contract_id),
            tracking_number: ActiveValue::Set(format!("TRK-FIXTURE-{}", contract_id)),
            status: ActiveValue::Set(status),
            started_at: ActiveValue::Set(now),
            delivered_at: ActiveValue::Set(delivered_at),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    pub async fn insert_feedback(
        &self,
        shipment: &entity::shipment::Model,
        company_id: i32,
        provider_id: i32,
        rating: i32,
    ) -> Result<entity::feedback::Model, TestError> {
        Ok(entity::prelude::Feedback::insert(entity::feedback::ActiveModel {
            shipment_id: ActiveValue::Set(shipment.id),
            company_id: ActiveValue::Set(company_id),
            provider_id: ActiveValue::Set(provider_id),
            rating: ActiveValue::Set(rating),
            comments: ActiveValue::Set("On time and well handled".to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }
}
