use entity::status::BidStatus;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{
    model::contract::{ContractDetailsDto, ContractDto, ContractSummaryDto},
    server::{
        data::{bid::BidRepository, contract::ContractRepository},
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::{BidModel, ContractModel},
        service::contract::{details, paid_contract_ids, read_document, summaries, ContractDocument},
        util::{
            storage::{DocumentStorage, UploadedFile, CONTRACT_EXTENSIONS, CONTRACT_FOLDER},
            time,
        },
    },
};

pub struct CompanyContractService<'a> {
    db: &'a DatabaseConnection,
    documents: &'a DocumentStorage,
}

impl<'a> CompanyContractService<'a> {
    /// Creates a new instance of [`CompanyContractService`]
    pub fn new(db: &'a DatabaseConnection, documents: &'a DocumentStorage) -> Self {
        Self { db, documents }
    }

    /// Creates the contract for one of the company's accepted bids.
    ///
    /// The document is written to storage first and removed again if any database write
    /// fails, so a stored file always belongs to a committed contract.
    ///
    /// # Returns
    /// - `Ok(ContractDto)` - The unsigned contract
    /// - `Err(Error::UploadError)` - Empty document or extension not `.pdf`, `.doc` or `.docx`
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Bid not on the company's requests
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Bid not Accepted
    pub async fn create(
        &self,
        company_id: i32,
        bid_id: i32,
        document: UploadedFile,
    ) -> Result<ContractDto, Error> {
        document.check(CONTRACT_EXTENSIONS)?;

        let txn = self.db.begin().await?;

        let bid = BidRepository::new(&txn)
            .find_for_company(bid_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;
        if bid.status != BidStatus::Accepted {
            return Err(MarketplaceError::invalid_state(
                "A contract can only be created for an accepted bid",
            )
            .into());
        }

        let path = self
            .documents
            .store(
                CONTRACT_FOLDER,
                &format!("contract-{}", bid.id),
                &document.file_name,
                &document.bytes,
                time::now(),
            )
            .await?;

        let contract = match persist_contract(txn, &bid, company_id, path.clone()).await {
            Ok(contract) => contract,
            Err(err) => {
                if let Err(remove_err) = self.documents.remove(&path).await {
                    tracing::warn!(
                        path = %path,
                        "Failed to remove orphaned contract document: {}",
                        remove_err
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(
            company_id,
            bid_id,
            contract_id = contract.id,
            "Created contract"
        );

        Ok(ContractDto::from(contract))
    }

    /// Contracts with a Successful payment, newest first
    pub async fn list(&self, company_id: i32) -> Result<Vec<ContractSummaryDto>, Error> {
        self.list_by_payment(company_id, true).await
    }

    /// Contracts still waiting for a Successful payment, newest first
    pub async fn waiting_payment(&self, company_id: i32) -> Result<Vec<ContractSummaryDto>, Error> {
        self.list_by_payment(company_id, false).await
    }

    pub async fn show(
        &self,
        company_id: i32,
        contract_id: i32,
    ) -> Result<ContractDetailsDto, Error> {
        let contract = self.find_owned(company_id, contract_id).await?;

        details(self.db, contract).await
    }

    pub async fn document(
        &self,
        company_id: i32,
        contract_id: i32,
    ) -> Result<ContractDocument, Error> {
        let contract = self.find_owned(company_id, contract_id).await?;

        read_document(self.documents, &contract).await
    }

    async fn list_by_payment(
        &self,
        company_id: i32,
        paid: bool,
    ) -> Result<Vec<ContractSummaryDto>, Error> {
        let contracts = ContractRepository::new(self.db)
            .list_by_company(company_id)
            .await?;
        let ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let paid_ids = paid_contract_ids(self.db, &ids).await?;

        let contracts = contracts
            .into_iter()
            .filter(|contract| paid_ids.contains(&contract.id) == paid)
            .collect();

        summaries(self.db, contracts).await
    }

    async fn find_owned(&self, company_id: i32, contract_id: i32) -> Result<ContractModel, Error> {
        ContractRepository::new(self.db)
            .find_for_company(contract_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id).into())
    }
}

async fn persist_contract(
    txn: DatabaseTransaction,
    bid: &BidModel,
    company_id: i32,
    path: String,
) -> Result<ContractModel, Error> {
    let contract = ContractRepository::new(&txn)
        .create(bid, company_id, path)
        .await?;

    let moved = BidRepository::new(&txn)
        .transition_status(
            bid.id,
            &[BidStatus::Accepted],
            BidStatus::ContractCreated,
            None,
        )
        .await?;
    if moved == 0 {
        return Err(MarketplaceError::invalid_state(
            "A contract has already been created for this bid",
        )
        .into());
    }

    txn.commit().await?;

    Ok(contract)
}
