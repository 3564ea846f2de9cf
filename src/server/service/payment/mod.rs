//! Contract payments and the card checks guarding them.

pub mod gateway;

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use entity::status::{PaymentStatus, ShipmentRequestStatus};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        contract::ContractDto,
        invoice::InvoiceDto,
        payment::{
            CardDetailsDto, PayContractDto, PaymentDetailsDto, PaymentDto, PaymentListItemDto,
        },
        profile::ProviderDto,
        shipment::ShipmentRequestDto,
    },
    server::{
        data::{
            bid::BidRepository, contract::ContractRepository, invoice::InvoiceRepository,
            payment::PaymentRepository, provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            validation::ValidationError,
            Error,
        },
        model::db::{InvoiceModel, PaymentModel},
        service::payment::gateway::{ChargeOutcome, ChargeRequest, PaymentGateway},
        util::{time, validation},
    },
};

pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";
pub const INVOICE_DUE_DAYS: i64 = 15;
const MAX_METHOD_LENGTH: usize = 50;

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
}

/// Result of charging a Pending payment inside a transaction
enum Settlement {
    Paid(PaymentModel),
    Declined { payment_id: i32, reason: String },
}

impl<'a> PaymentService<'a> {
    /// Creates a new instance of [`PaymentService`]
    pub fn new(db: &'a DatabaseConnection, gateway: &'a dyn PaymentGateway) -> Self {
        Self { db, gateway }
    }

    /// Pays a contract at the price of its accepted bid.
    ///
    /// Issues the invoice on first payment. A declined charge still commits the Failed
    /// payment so it can be retried.
    ///
    /// # Returns
    /// - `Ok(PaymentDto)` - The Successful payment
    /// - `Err(Error::ValidationError)` - Card details malformed or expired
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Contract not the company's
    /// - `Err(Error::MarketplaceError(MarketplaceError::Duplicate))` - Contract already paid
    /// - `Err(Error::MarketplaceError(MarketplaceError::PaymentDeclined))` - The gateway declined
    pub async fn pay_contract(
        &self,
        company_id: i32,
        contract_id: i32,
        payload: PayContractDto,
    ) -> Result<PaymentDto, Error> {
        validate_card(&payload.card, time::now().date())?;
        let method = validation::optional(
            "method",
            payload.method.as_deref(),
            MAX_METHOD_LENGTH,
        )?
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let txn = self.db.begin().await?;

        let contract = ContractRepository::new(&txn)
            .find_for_company(contract_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id))?;
        let invoice = issue_invoice(&txn, contract.id).await?;

        if PaymentRepository::new(&txn).has_successful(invoice.id).await? {
            return Err(already_paid());
        }

        let bid = BidRepository::new(&txn)
            .find_by_id(contract.bid_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, contract.bid_id))?;
        let payment = PaymentRepository::new(&txn)
            .create(invoice.id, bid.price, method)
            .await?;

        let settlement = self
            .settle(&txn, payment, contract.shipment_request_id)
            .await?;

        txn.commit().await?;

        self.finish(company_id, settlement)
    }

    /// The company's payments, newest first
    pub async fn list(
        &self,
        company_id: i32,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<PaymentListItemDto>, Error> {
        let contracts = ContractRepository::new(self.db)
            .list_by_company(company_id)
            .await?;
        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let invoices: HashMap<i32, InvoiceModel> = InvoiceRepository::new(self.db)
            .list_by_contracts(&contract_ids)
            .await?
            .into_iter()
            .map(|invoice| (invoice.id, invoice))
            .collect();
        let invoice_ids: Vec<i32> = invoices.keys().copied().collect();
        let payments = PaymentRepository::new(self.db)
            .list_by_invoices(&invoice_ids, status)
            .await?;

        let provider_ids: Vec<i32> = contracts
            .iter()
            .map(|contract| contract.provider_id)
            .collect();
        let provider_names: HashMap<i32, String> = ProviderRepository::new(self.db)
            .find_by_ids(&provider_ids)
            .await?
            .into_iter()
            .map(|provider| (provider.id, provider.name))
            .collect();
        let contract_providers: HashMap<i32, i32> = contracts
            .iter()
            .map(|contract| (contract.id, contract.provider_id))
            .collect();

        Ok(payments
            .into_iter()
            .filter_map(|payment| {
                let invoice = invoices.get(&payment.invoice_id)?;
                let provider_name = contract_providers
                    .get(&invoice.contract_id)
                    .and_then(|provider_id| provider_names.get(provider_id))
                    .cloned()
                    .unwrap_or_default();

                Some(PaymentListItemDto {
                    invoice_number: invoice.invoice_number.clone(),
                    contract_id: invoice.contract_id,
                    provider_name,
                    payment: PaymentDto::from(payment),
                })
            })
            .collect())
    }

    /// A payment of the company with the records it settles
    ///
    /// # Returns
    /// - `Ok(PaymentDetailsDto)` - Payment, invoice, contract, request and provider
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Payment not the company's
    pub async fn show(&self, company_id: i32, payment_id: i32) -> Result<PaymentDetailsDto, Error> {
        let (payment, invoice) = find_owned(self.db, company_id, payment_id).await?;
        let contract = ContractRepository::new(self.db)
            .find_for_company(invoice.contract_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Payment, payment_id))?;
        let request = ShipmentRequestRepository::new(self.db)
            .find_by_id(contract.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                contract.shipment_request_id,
            ))?;
        let provider = ProviderRepository::new(self.db)
            .find_by_id(contract.provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Provider, contract.provider_id))?;

        Ok(PaymentDetailsDto {
            payment: PaymentDto::from(payment),
            invoice: InvoiceDto::from(invoice),
            contract: ContractDto::from(contract),
            shipment: ShipmentRequestDto::from(request),
            provider: ProviderDto::from(provider),
        })
    }

    /// Charges a Pending payment through the gateway
    ///
    /// The card is checked before anything is read or charged.
    ///
    /// # Returns
    /// - `Ok(PaymentDto)` - The Successful payment
    /// - `Err(Error::ValidationError)` - Card details malformed or expired
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Payment not the company's
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Payment not Pending
    /// - `Err(Error::MarketplaceError(MarketplaceError::PaymentDeclined))` - The gateway declined
    pub async fn process(
        &self,
        company_id: i32,
        payment_id: i32,
        card: CardDetailsDto,
    ) -> Result<PaymentDto, Error> {
        validate_card(&card, time::now().date())?;

        let txn = self.db.begin().await?;

        let (payment, invoice) = find_owned(&txn, company_id, payment_id).await?;
        if payment.status != PaymentStatus::Pending {
            return Err(MarketplaceError::invalid_state(
                "Only pending payments can be processed",
            )
            .into());
        }
        if PaymentRepository::new(&txn).has_successful(invoice.id).await? {
            return Err(already_paid());
        }

        let contract = ContractRepository::new(&txn)
            .find_by_id(invoice.contract_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, invoice.contract_id))?;

        let settlement = self
            .settle(&txn, payment, contract.shipment_request_id)
            .await?;

        txn.commit().await?;

        self.finish(company_id, settlement)
    }

    /// Resets a Failed payment to Pending so it can be processed again
    pub async fn retry(&self, company_id: i32, payment_id: i32) -> Result<PaymentDto, Error> {
        let (payment, _) = find_owned(self.db, company_id, payment_id).await?;
        let repo = PaymentRepository::new(self.db);

        let reset = repo
            .transition(payment.id, &[PaymentStatus::Failed], PaymentStatus::Pending, None)
            .await?;
        if reset == 0 {
            return Err(
                MarketplaceError::invalid_state("Only failed payments can be retried").into(),
            );
        }

        let payment = repo
            .find_by_id(payment.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Payment, payment_id))?;

        tracing::info!(company_id, payment_id, "Reset failed payment for retry");

        Ok(PaymentDto::from(payment))
    }

    async fn settle<C: ConnectionTrait>(
        &self,
        db: &C,
        payment: PaymentModel,
        shipment_request_id: i32,
    ) -> Result<Settlement, Error> {
        let repo = PaymentRepository::new(db);
        let outcome = self.gateway.charge(&ChargeRequest {
            payment_id: payment.id,
            amount: payment.amount,
            method: payment.method.clone(),
        });

        let (to, transaction_id, declined) = match outcome {
            ChargeOutcome::Approved { transaction_id } => {
                (PaymentStatus::Successful, Some(transaction_id), None)
            }
            ChargeOutcome::Declined { reason } => (PaymentStatus::Failed, None, Some(reason)),
        };

        let moved = repo
            .transition(payment.id, &[PaymentStatus::Pending], to, transaction_id)
            .await?;
        if moved == 0 {
            return Err(MarketplaceError::invalid_state(
                "The payment is no longer pending",
            )
            .into());
        }

        if let Some(reason) = declined {
            return Ok(Settlement::Declined {
                payment_id: payment.id,
                reason,
            });
        }

        ShipmentRequestRepository::new(db)
            .set_status(shipment_request_id, ShipmentRequestStatus::InProgress)
            .await?;

        let payment = repo
            .find_by_id(payment.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Payment, payment.id))?;

        Ok(Settlement::Paid(payment))
    }

    fn finish(&self, company_id: i32, settlement: Settlement) -> Result<PaymentDto, Error> {
        match settlement {
            Settlement::Paid(payment) => {
                tracing::info!(
                    company_id,
                    payment_id = payment.id,
                    amount = %payment.amount,
                    "Payment successful"
                );

                Ok(PaymentDto::from(payment))
            }
            Settlement::Declined { payment_id, reason } => {
                tracing::info!(company_id, payment_id, reason = %reason, "Payment declined");

                Err(MarketplaceError::PaymentDeclined { payment_id, reason }.into())
            }
        }
    }
}

/// The contract's invoice, issued now with a 15 day term when missing
async fn issue_invoice<C: ConnectionTrait>(
    db: &C,
    contract_id: i32,
) -> Result<InvoiceModel, Error> {
    let repo = InvoiceRepository::new(db);

    if let Some(invoice) = repo.find_by_contract(contract_id).await? {
        return Ok(invoice);
    }

    let now = time::now();
    let invoice = repo
        .create(
            contract_id,
            invoice_number(now, contract_id),
            now,
            now + Duration::days(INVOICE_DUE_DAYS),
        )
        .await?;

    tracing::info!(contract_id, invoice_number = %invoice.invoice_number, "Issued invoice");

    Ok(invoice)
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    company_id: i32,
    payment_id: i32,
) -> Result<(PaymentModel, InvoiceModel), Error> {
    let payment = PaymentRepository::new(db)
        .find_by_id(payment_id)
        .await?
        .ok_or(MarketplaceError::not_found(Resource::Payment, payment_id))?;
    let invoice = InvoiceRepository::new(db)
        .find_for_company(payment.invoice_id, company_id)
        .await?
        .ok_or(MarketplaceError::not_found(Resource::Payment, payment_id))?;

    Ok((payment, invoice))
}

/// `INV-{yyyymmdd}-{contract}`
pub fn invoice_number(at: chrono::NaiveDateTime, contract_id: i32) -> String {
    format!("INV-{}-{}", time::date_stamp(at), contract_id)
}

fn already_paid() -> Error {
    MarketplaceError::Duplicate("This contract has already been paid".to_string()).into()
}

/// Checks card number, `MM/YY` expiry, CVV and holder name
pub fn validate_card(card: &CardDetailsDto, today: NaiveDate) -> Result<(), Error> {
    let digits: String = card
        .card_number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::field("card_number", "Card number must be 16 digits").into());
    }

    let (month, year) = card
        .expiry
        .trim()
        .split_once('/')
        .and_then(|(mm, yy)| {
            let month = mm.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
            let year = (yy.len() == 2).then(|| yy.parse::<i32>().ok()).flatten()?;
            Some((month, 2000 + year))
        })
        .ok_or(ValidationError::field("expiry", "Expiry must be in MM/YY format"))?;
    if (year, month) < (today.year(), today.month()) {
        return Err(ValidationError::field("expiry", "The card has expired").into());
    }

    let cvv = card.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::field("cvv", "CVV must be 3 or 4 digits").into());
    }

    validation::required("holder_name", &card.holder_name, validation::MAX_NAME_LENGTH)?;

    Ok(())
}
