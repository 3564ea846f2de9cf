use sea_orm::DatabaseConnection;

use crate::{
    model::contract::{ContractDetailsDto, ContractDto, ContractFilter, ContractSummaryDto},
    server::{
        data::contract::ContractRepository,
        error::{
            marketplace::{MarketplaceError, Resource},
            validation::ValidationError,
            Error,
        },
        model::db::ContractModel,
        service::contract::{details, read_document, summaries, ContractDocument},
        util::{
            storage::{
                DocumentStorage, UploadedFile, CONTRACT_FOLDER, SIGNED_CONTRACT_EXTENSIONS,
            },
            time,
        },
    },
};

pub struct ProviderContractService<'a> {
    db: &'a DatabaseConnection,
    documents: &'a DocumentStorage,
}

impl<'a> ProviderContractService<'a> {
    /// Creates a new instance of [`ProviderContractService`]
    pub fn new(db: &'a DatabaseConnection, documents: &'a DocumentStorage) -> Self {
        Self { db, documents }
    }

    pub async fn list(
        &self,
        provider_id: i32,
        filter: ContractFilter,
    ) -> Result<Vec<ContractSummaryDto>, Error> {
        let signed = match filter {
            ContractFilter::All => None,
            ContractFilter::Signed => Some(true),
            ContractFilter::Pending => Some(false),
        };

        let contracts = ContractRepository::new(self.db)
            .list_by_provider(provider_id, signed)
            .await?;

        summaries(self.db, contracts).await
    }

    pub async fn show(
        &self,
        provider_id: i32,
        contract_id: i32,
    ) -> Result<ContractDetailsDto, Error> {
        let contract = self.find_owned(provider_id, contract_id).await?;

        details(self.db, contract).await
    }

    /// Signs a contract with the provider's signed PDF copy.
    ///
    /// The signed copy replaces the contract document. Signing is a conditional update on
    /// a missing sign date, so a contract is signed at most once.
    ///
    /// # Returns
    /// - `Ok(ContractDto)` - The signed contract
    /// - `Err(Error::ValidationError)` - Terms not accepted
    /// - `Err(Error::UploadError)` - Empty document or not a `.pdf`
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Already signed
    pub async fn sign(
        &self,
        provider_id: i32,
        contract_id: i32,
        terms_accepted: bool,
        document: UploadedFile,
    ) -> Result<ContractDto, Error> {
        if !terms_accepted {
            return Err(ValidationError::field(
                "terms_accepted",
                "You must accept the contract terms to sign",
            )
            .into());
        }
        document.check(SIGNED_CONTRACT_EXTENSIONS)?;

        let contract = self.find_owned(provider_id, contract_id).await?;
        if contract.signed_at.is_some() {
            return Err(already_signed());
        }

        let now = time::now();
        let path = self
            .documents
            .store(
                CONTRACT_FOLDER,
                &format!("contract-{}-signed", contract.id),
                &document.file_name,
                &document.bytes,
                now,
            )
            .await?;

        let repo = ContractRepository::new(self.db);
        let signed = match repo.mark_signed(contract.id, path.clone(), now).await {
            Ok(rows) => rows,
            Err(err) => {
                self.discard(&path).await;
                return Err(err.into());
            }
        };
        if signed == 0 {
            self.discard(&path).await;
            return Err(already_signed());
        }

        let contract = repo
            .find_by_id(contract.id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id))?;

        tracing::info!(provider_id, contract_id, "Signed contract");

        Ok(ContractDto::from(contract))
    }

    pub async fn document(
        &self,
        provider_id: i32,
        contract_id: i32,
    ) -> Result<ContractDocument, Error> {
        let contract = self.find_owned(provider_id, contract_id).await?;

        read_document(self.documents, &contract).await
    }

    async fn find_owned(&self, provider_id: i32, contract_id: i32) -> Result<ContractModel, Error> {
        ContractRepository::new(self.db)
            .find_for_provider(contract_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id).into())
    }

    async fn discard(&self, path: &str) {
        if let Err(err) = self.documents.remove(path).await {
            tracing::warn!(path = %path, "Failed to remove unused signed document: {}", err);
        }
    }
}

fn already_signed() -> Error {
    MarketplaceError::invalid_state("This contract has already been signed").into()
}

#[cfg(test)]
mod tests {
    use crate::server::util::storage::UploadedFile;

    fn signed_pdf() -> UploadedFile {
        UploadedFile {
            file_name: "signed.pdf".to_string(),
            bytes: b"%PDF-1.4 signed".to_vec(),
        }
    }

    mod sign {
        use wasl_test_utils::prelude::*;

        use super::signed_pdf;
        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::contract::provider::ProviderContractService,
            util::storage::{DocumentStorage, UploadedFile},
        };

        /// Expect the signed copy to replace the document and set the sign date
        #[tokio::test]
        async fn signs_contract() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let dir = tempfile::tempdir()?;
            let documents = DocumentStorage::new(dir.path());
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderContractService::new(&test.db, &documents);

            let contract = service
                .sign(chain.provider.id, chain.contract.id, true, signed_pdf())
                .await
                .unwrap();

            assert!(contract.signed_at.is_some());
            assert!(contract
                .document
                .starts_with(&format!("contract-{}-signed-", chain.contract.id)));
            let document = service
                .document(chain.provider.id, chain.contract.id)
                .await
                .unwrap();
            assert_eq!(document.bytes, b"%PDF-1.4 signed");

            Ok(())
        }

        /// Expect a second signature to be refused
        #[tokio::test]
        async fn refuses_signed_contract() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let dir = tempfile::tempdir()?;
            let documents = DocumentStorage::new(dir.path());
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let service = ProviderContractService::new(&test.db, &documents);

            let result = service
                .sign(chain.provider.id, chain.contract.id, true, signed_pdf())
                .await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }

        /// Expect signing without accepting the terms to be refused
        #[tokio::test]
        async fn requires_accepted_terms() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let dir = tempfile::tempdir()?;
            let documents = DocumentStorage::new(dir.path());
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderContractService::new(&test.db, &documents);

            let result = service
                .sign(chain.provider.id, chain.contract.id, false, signed_pdf())
                .await;

            assert!(matches!(result, Err(Error::ValidationError(_))));

            Ok(())
        }

        /// Expect a Word document to be refused for the signed copy
        #[tokio::test]
        async fn requires_pdf() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let dir = tempfile::tempdir()?;
            let documents = DocumentStorage::new(dir.path());
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderContractService::new(&test.db, &documents);
            let docx = UploadedFile {
                file_name: "signed.docx".to_string(),
                bytes: b"PK".to_vec(),
            };

            let result = service
                .sign(chain.provider.id, chain.contract.id, true, docx)
                .await;

            assert!(matches!(result, Err(Error::UploadError(_))));

            Ok(())
        }
    }

    mod list {
        use wasl_test_utils::prelude::*;

        use crate::{
            model::contract::ContractFilter,
            server::{
                service::contract::provider::ProviderContractService,
                util::storage::DocumentStorage,
            },
        };

        /// Expect the filter to split contracts by sign date presence
        #[tokio::test]
        async fn filters_by_signature() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let dir = tempfile::tempdir()?;
            let documents = DocumentStorage::new(dir.path());
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderContractService::new(&test.db, &documents);

            let all = service
                .list(chain.provider.id, ContractFilter::All)
                .await
                .unwrap();
            let pending = service
                .list(chain.provider.id, ContractFilter::Pending)
                .await
                .unwrap();
            let signed = service
                .list(chain.provider.id, ContractFilter::Signed)
                .await
                .unwrap();

            assert_eq!(all.len(), 1);
            assert_eq!(pending.len(), 1);
            assert!(signed.is_empty());
            assert_eq!(all[0].company_name, chain.company.name);

            Ok(())
        }
    }
}
