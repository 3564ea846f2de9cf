use std::{
    collections::HashMap,
    fmt::{self, Write},
};

use chrono::NaiveDateTime;
use entity::status::PaymentStatus;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        contract::ContractDto,
        invoice::{InvoiceDetailsDto, InvoiceDto, InvoiceFilter, InvoiceListItemDto},
        payment::PaymentDto,
        profile::{CompanyDto, ProviderDto},
        shipment::ShipmentRequestDto,
    },
    server::{
        data::{
            bid::BidRepository, company::CompanyRepository, contract::ContractRepository,
            invoice::InvoiceRepository, payment::PaymentRepository, provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::{
            CompanyModel, ContractModel, InvoiceModel, PaymentModel, ProviderModel,
            ShipmentRequestModel,
        },
        util::time,
    },
};

/// A rendered plain-text invoice
pub struct InvoiceDocument {
    pub file_name: String,
    pub body: String,
}

pub struct InvoiceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InvoiceService<'a> {
    /// Creates a new instance of [`InvoiceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The company's invoices, newest first
    ///
    /// An invoice counts as paid when its latest payment is Successful, and as overdue
    /// when unpaid past its due date.
    pub async fn list(
        &self,
        company_id: i32,
        filter: InvoiceFilter,
    ) -> Result<Vec<InvoiceListItemDto>, Error> {
        let contracts = ContractRepository::new(self.db)
            .list_by_company(company_id)
            .await?;
        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let bid_ids: Vec<i32> = contracts.iter().map(|contract| contract.bid_id).collect();
        let provider_ids: Vec<i32> = contracts
            .iter()
            .map(|contract| contract.provider_id)
            .collect();

        let invoices = InvoiceRepository::new(self.db)
            .list_by_contracts(&contract_ids)
            .await?;
        let invoice_ids: Vec<i32> = invoices.iter().map(|invoice| invoice.id).collect();
        let mut latest = PaymentRepository::new(self.db)
            .latest_by_invoices(&invoice_ids)
            .await?;
        let bids = BidRepository::new(self.db).find_by_ids(&bid_ids).await?;
        let provider_names: HashMap<i32, String> = ProviderRepository::new(self.db)
            .find_by_ids(&provider_ids)
            .await?
            .into_iter()
            .map(|provider| (provider.id, provider.name))
            .collect();
        let contracts: HashMap<i32, _> = contracts
            .into_iter()
            .map(|contract| (contract.id, contract))
            .collect();

        let now = time::now();
        let mut items = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let Some(contract) = contracts.get(&invoice.contract_id) else {
                continue;
            };
            let latest_payment = latest.remove(&invoice.id);
            let is_paid = is_paid(latest_payment.as_ref());
            let is_overdue = !is_paid && invoice.due_at < now;

            let keep = match filter {
                InvoiceFilter::All => true,
                InvoiceFilter::Paid => is_paid,
                InvoiceFilter::Unpaid => !is_paid,
                InvoiceFilter::Overdue => is_overdue,
            };
            if !keep {
                continue;
            }

            items.push(InvoiceListItemDto {
                provider_name: provider_names
                    .get(&contract.provider_id)
                    .cloned()
                    .unwrap_or_default(),
                amount: bids
                    .get(&contract.bid_id)
                    .map(|bid| bid.price)
                    .unwrap_or_default(),
                latest_payment: latest_payment.map(PaymentDto::from),
                is_paid,
                is_overdue,
                invoice: InvoiceDto::from(invoice),
            });
        }

        Ok(items)
    }

    pub async fn show(&self, company_id: i32, invoice_id: i32) -> Result<InvoiceDetailsDto, Error> {
        let bundle = self.load(company_id, invoice_id).await?;

        Ok(InvoiceDetailsDto {
            invoice: InvoiceDto::from(bundle.invoice),
            contract: ContractDto::from(bundle.contract),
            shipment: ShipmentRequestDto::from(bundle.request),
            company: CompanyDto::from(bundle.company),
            provider: ProviderDto::from(bundle.provider),
            amount: bundle.amount,
            payments: bundle.payments.into_iter().map(PaymentDto::from).collect(),
        })
    }

    /// Renders the invoice as `invoice-{number}.txt`
    pub async fn download(
        &self,
        company_id: i32,
        invoice_id: i32,
    ) -> Result<InvoiceDocument, Error> {
        let bundle = self.load(company_id, invoice_id).await?;

        Ok(InvoiceDocument {
            file_name: format!("invoice-{}.txt", bundle.invoice.invoice_number),
            body: render(&bundle)
                .map_err(|e| Error::InternalError(format!("Failed to render invoice: {}", e)))?,
        })
    }

    async fn load(&self, company_id: i32, invoice_id: i32) -> Result<InvoiceBundle, Error> {
        let invoice = InvoiceRepository::new(self.db)
            .find_for_company(invoice_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Invoice, invoice_id))?;
        let contract = ContractRepository::new(self.db)
            .find_by_id(invoice.contract_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, invoice.contract_id))?;
        let request = ShipmentRequestRepository::new(self.db)
            .find_by_id(contract.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                contract.shipment_request_id,
            ))?;
        let company = CompanyRepository::new(self.db)
            .find_by_id(contract.company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Company, contract.company_id))?;
        let provider = ProviderRepository::new(self.db)
            .find_by_id(contract.provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Provider, contract.provider_id))?;
        let amount = BidRepository::new(self.db)
            .find_by_id(contract.bid_id)
            .await?
            .map(|bid| bid.price)
            .ok_or(MarketplaceError::not_found(Resource::Bid, contract.bid_id))?;
        let payments = PaymentRepository::new(self.db)
            .list_by_invoices(&[invoice.id], None)
            .await?;

        Ok(InvoiceBundle {
            invoice,
            contract,
            request,
            company,
            provider,
            amount,
            payments,
        })
    }
}

struct InvoiceBundle {
    invoice: InvoiceModel,
    contract: ContractModel,
    request: ShipmentRequestModel,
    company: CompanyModel,
    provider: ProviderModel,
    amount: Decimal,
    /// Newest first
    payments: Vec<PaymentModel>,
}

fn is_paid(latest: Option<&PaymentModel>) -> bool {
    latest.is_some_and(|payment| payment.status == PaymentStatus::Successful)
}

fn long_date(at: NaiveDateTime) -> String {
    at.format("%b %d, %Y").to_string()
}

fn render(bundle: &InvoiceBundle) -> Result<String, fmt::Error> {
    let InvoiceBundle {
        invoice,
        request,
        company,
        provider,
        amount,
        payments,
        ..
    } = bundle;
    let latest = payments.first();
    let mut out = String::new();

    writeln!(out, "INVOICE {}", invoice.invoice_number)?;
    writeln!(out, "========================")?;
    writeln!(out, "Issued: {}", long_date(invoice.issued_at))?;
    writeln!(out)?;

    writeln!(out, "Bill To:")?;
    writeln!(out, "--------")?;
    writeln!(out, "Company: {}", company.name)?;
    writeln!(out, "Email: {}", company.email)?;
    writeln!(out, "Phone: {}", company.phone_number)?;
    writeln!(out)?;

    writeln!(out, "Service Provider:")?;
    writeln!(out, "-----------------")?;
    writeln!(out, "Name: {}", provider.name)?;
    writeln!(out, "Email: {}", provider.email)?;
    writeln!(out)?;

    writeln!(out, "Shipment Details:")?;
    writeln!(out, "-----------------")?;
    writeln!(out, "Goods: {}", request.goods_type)?;
    writeln!(out, "Weight: {} kg", request.weight_kg.normalize())?;
    writeln!(
        out,
        "Route: {} to {}",
        request.pickup_city, request.delivery_city
    )?;
    writeln!(out)?;

    writeln!(out, "Payment Details:")?;
    writeln!(out, "----------------")?;
    writeln!(out, "Amount: SAR {:.2}", amount)?;
    match latest {
        Some(payment) => writeln!(out, "Status: {:?}", payment.status)?,
        None => writeln!(out, "Status: Unpaid")?,
    }
    writeln!(out, "Due Date: {}", long_date(invoice.due_at))?;
    if let Some(payment) = latest.filter(|payment| payment.status == PaymentStatus::Successful) {
        writeln!(out, "Paid Date: {}", long_date(payment.payment_date))?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    mod list {
        use entity::status::PaymentStatus;
        use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel};
        use wasl_test_utils::prelude::*;

        use crate::{
            model::invoice::InvoiceFilter,
            server::{service::invoice::InvoiceService, util::time},
        };

        /// Expect paid and unpaid invoices to follow the latest payment
        #[tokio::test]
        async fn filters_by_latest_payment() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            test.marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Failed)
                .await?;
            let service = InvoiceService::new(&test.db);

            let unpaid = service
                .list(chain.company.id, InvoiceFilter::Unpaid)
                .await
                .unwrap();
            let paid = service
                .list(chain.company.id, InvoiceFilter::Paid)
                .await
                .unwrap();
            let overdue = service
                .list(chain.company.id, InvoiceFilter::Overdue)
                .await
                .unwrap();

            assert_eq!(unpaid.len(), 1);
            assert!(!unpaid[0].is_paid);
            assert_eq!(unpaid[0].amount, rust_decimal::Decimal::from(1500));
            assert!(paid.is_empty());
            assert!(overdue.is_empty());

            Ok(())
        }

        /// Expect an unpaid invoice past its due date to be overdue
        #[tokio::test]
        async fn flags_overdue() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            let mut active = invoice.into_active_model();
            active.due_at = ActiveValue::Set(time::now() - chrono::Duration::days(1));
            active.update(&test.db).await?;
            let service = InvoiceService::new(&test.db);

            let overdue = service
                .list(chain.company.id, InvoiceFilter::Overdue)
                .await
                .unwrap();

            assert_eq!(overdue.len(), 1);
            assert!(overdue[0].is_overdue);

            Ok(())
        }
    }

    mod download {
        use entity::status::PaymentStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::invoice::InvoiceService,
        };

        /// Expect every section of the plain-text invoice
        #[tokio::test]
        async fn renders_sections() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            test.marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Successful)
                .await?;
            let service = InvoiceService::new(&test.db);

            let document = service.download(chain.company.id, invoice.id).await.unwrap();

            assert_eq!(
                document.file_name,
                format!("invoice-{}.txt", invoice.invoice_number)
            );
            assert!(document.body.contains("Bill To:"));
            assert!(document.body.contains(&chain.company.name));
            assert!(document.body.contains("Service Provider:"));
            assert!(document.body.contains(&chain.provider.name));
            assert!(document.body.contains("Shipment Details:"));
            assert!(document.body.contains("Amount: SAR 1500.00"));
            assert!(document.body.contains("Status: Successful"));
            assert!(document.body.contains("Paid Date:"));

            Ok(())
        }

        /// Expect another company's invoice to be hidden
        #[tokio::test]
        async fn hides_other_company_invoice() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            let (_, other) = test.user().insert_company("other@acme.sa", true).await?;
            let service = InvoiceService::new(&test.db);

            let result = service.show(other.id, invoice.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::NotFound { .. }))
            ));

            Ok(())
        }
    }
}
