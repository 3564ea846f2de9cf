//! Contract services for both sides of an accepted bid.

pub mod company;
pub mod provider;

use std::collections::{HashMap, HashSet};

use entity::status::PaymentStatus;
use sea_orm::ConnectionTrait;

use crate::{
    model::{
        bid::BidDto,
        contract::{ContractDetailsDto, ContractDto, ContractSummaryDto},
        invoice::InvoiceDto,
        payment::PaymentDto,
        profile::{CompanyDto, ProviderDto},
        shipment::ShipmentRequestDto,
        tracking::ShipmentSnapshotDto,
    },
    server::{
        data::{
            bid::BidRepository, company::CompanyRepository, invoice::InvoiceRepository,
            payment::PaymentRepository, provider::ProviderRepository,
            shipment::ShipmentRepository, shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::ContractModel,
        util::storage::{self, DocumentStorage},
    },
};

/// A stored contract document ready to be served.
pub struct ContractDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ContractDocument {
    pub fn content_type(&self) -> &'static str {
        storage::content_type(&self.file_name)
    }
}

pub(crate) async fn read_document(
    documents: &DocumentStorage,
    contract: &ContractModel,
) -> Result<ContractDocument, Error> {
    let bytes = documents.read(&contract.document).await?;

    Ok(ContractDocument {
        file_name: storage::file_name(&contract.document).to_string(),
        bytes,
    })
}

/// Contracts among `contract_ids` whose invoice has a Successful payment
pub(crate) async fn paid_contract_ids<C: ConnectionTrait>(
    db: &C,
    contract_ids: &[i32],
) -> Result<HashSet<i32>, Error> {
    let invoices = InvoiceRepository::new(db)
        .list_by_contracts(contract_ids)
        .await?;
    let invoice_ids: Vec<i32> = invoices.iter().map(|invoice| invoice.id).collect();
    let paid_invoices: HashSet<i32> = PaymentRepository::new(db)
        .list_by_invoices(&invoice_ids, Some(PaymentStatus::Successful))
        .await?
        .into_iter()
        .map(|payment| payment.invoice_id)
        .collect();

    Ok(invoices
        .into_iter()
        .filter(|invoice| paid_invoices.contains(&invoice.id))
        .map(|invoice| invoice.contract_id)
        .collect())
}

/// Joins each contract with its request, party names and agreed price
pub(crate) async fn summaries<C: ConnectionTrait>(
    db: &C,
    contracts: Vec<ContractModel>,
) -> Result<Vec<ContractSummaryDto>, Error> {
    let request_ids: Vec<i32> = contracts.iter().map(|c| c.shipment_request_id).collect();
    let bid_ids: Vec<i32> = contracts.iter().map(|c| c.bid_id).collect();
    let company_ids: Vec<i32> = unique(contracts.iter().map(|c| c.company_id));
    let provider_ids: Vec<i32> = unique(contracts.iter().map(|c| c.provider_id));

    let requests = ShipmentRequestRepository::new(db)
        .find_by_ids(&request_ids)
        .await?;
    let bids = BidRepository::new(db).find_by_ids(&bid_ids).await?;
    let company_names: HashMap<i32, String> = CompanyRepository::new(db)
        .find_by_ids(&company_ids)
        .await?
        .into_iter()
        .map(|company| (company.id, company.name))
        .collect();
    let provider_names: HashMap<i32, String> = ProviderRepository::new(db)
        .find_by_ids(&provider_ids)
        .await?
        .into_iter()
        .map(|provider| (provider.id, provider.name))
        .collect();

    let mut items = Vec::with_capacity(contracts.len());
    for contract in contracts {
        let request = requests
            .get(&contract.shipment_request_id)
            .cloned()
            .ok_or_else(|| missing("shipment request", &contract))?;
        let price = bids
            .get(&contract.bid_id)
            .map(|bid| bid.price)
            .ok_or_else(|| missing("bid", &contract))?;

        items.push(ContractSummaryDto {
            company_name: company_names
                .get(&contract.company_id)
                .cloned()
                .unwrap_or_default(),
            provider_name: provider_names
                .get(&contract.provider_id)
                .cloned()
                .unwrap_or_default(),
            shipment: ShipmentRequestDto::from(request),
            contract: ContractDto::from(contract),
            price,
        });
    }

    Ok(items)
}

/// The contract with every record hanging off it
pub(crate) async fn details<C: ConnectionTrait>(
    db: &C,
    contract: ContractModel,
) -> Result<ContractDetailsDto, Error> {
    let bid = BidRepository::new(db)
        .find_by_id(contract.bid_id)
        .await?
        .ok_or_else(|| missing("bid", &contract))?;
    let request = ShipmentRequestRepository::new(db)
        .find_by_id(contract.shipment_request_id)
        .await?
        .ok_or_else(|| missing("shipment request", &contract))?;
    let company = CompanyRepository::new(db)
        .find_by_id(contract.company_id)
        .await?
        .ok_or(MarketplaceError::not_found(Resource::Company, contract.company_id))?;
    let provider = ProviderRepository::new(db)
        .find_by_id(contract.provider_id)
        .await?
        .ok_or(MarketplaceError::not_found(Resource::Provider, contract.provider_id))?;

    let invoice = InvoiceRepository::new(db)
        .find_by_contract(contract.id)
        .await?;
    let latest_payment = match &invoice {
        Some(invoice) => {
            PaymentRepository::new(db)
                .latest_for_invoice(invoice.id)
                .await?
        }
        None => None,
    };
    let latest_snapshot = ShipmentRepository::new(db)
        .latest_for_contract(contract.id)
        .await?;

    Ok(ContractDetailsDto {
        contract: ContractDto::from(contract),
        bid: BidDto::with_provider_name(bid, Some(provider.name.clone())),
        shipment: ShipmentRequestDto::from(request),
        company: CompanyDto::from(company),
        provider: ProviderDto::from(provider),
        invoice: invoice.map(InvoiceDto::from),
        latest_payment: latest_payment.map(PaymentDto::from),
        latest_snapshot: latest_snapshot.map(ShipmentSnapshotDto::from),
    })
}

fn unique(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    ids.collect::<HashSet<_>>().into_iter().collect()
}

fn missing(record: &str, contract: &ContractModel) -> Error {
    Error::InternalError(format!(
        "The {} of contract {} is missing",
        record, contract.id
    ))
}
