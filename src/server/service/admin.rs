//! Administration of accounts, marketplace records and the admin's own profile.

use std::collections::HashMap;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        admin::{
            AdminCompanyDto, AdminProfileDto, AdminProviderDto, ApprovalDto,
            UpdateAdminProfileDto,
        },
        contract::ContractSummaryDto,
        profile::{CompanyDto, ProviderDto},
        shipment::{ShipmentRequestDto, ShipmentSummaryDto},
    },
    server::{
        data::{
            admin::AdminRepository, bid::BidRepository, company::CompanyRepository,
            contract::ContractRepository, provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            auth::AuthError,
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        service::contract::summaries,
        util::validation::{self, MAX_NAME_LENGTH},
    },
};

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminService<'a> {
    /// Creates a new instance of [`AdminService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every company with its shipment request and contract counts
    pub async fn companies(&self) -> Result<Vec<AdminCompanyDto>, Error> {
        let companies = CompanyRepository::new(self.db).list_all().await?;
        let shipments = ShipmentRequestRepository::new(self.db)
            .count_by_company()
            .await?;
        let contracts = ContractRepository::new(self.db).count_by_company().await?;

        Ok(companies
            .into_iter()
            .map(|company| AdminCompanyDto {
                shipment_count: count(&shipments, company.id),
                contract_count: count(&contracts, company.id),
                company: CompanyDto::from(company),
            })
            .collect())
    }

    /// Every provider with its bid and contract counts
    pub async fn providers(&self) -> Result<Vec<AdminProviderDto>, Error> {
        let providers = ProviderRepository::new(self.db).list_all().await?;
        let bids = BidRepository::new(self.db).count_by_provider_map().await?;
        let contracts = ContractRepository::new(self.db).count_by_provider().await?;

        Ok(providers
            .into_iter()
            .map(|provider| AdminProviderDto {
                bid_count: count(&bids, provider.id),
                contract_count: count(&contracts, provider.id),
                provider: ProviderDto::from(provider),
            })
            .collect())
    }

    /// Flips a company's approval, suspending it when approval is withdrawn
    pub async fn toggle_company_approval(
        &self,
        admin_id: i32,
        company_id: i32,
    ) -> Result<ApprovalDto, Error> {
        let repo = CompanyRepository::new(self.db);

        let company = repo
            .find_by_id(company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Company, company_id))?;
        let approved = !company.is_approved;
        let company = repo.set_approval(company, approved, admin_id).await?;

        tracing::info!(admin_id, company_id, approved, "Toggled company approval");

        Ok(ApprovalDto {
            id: company.id,
            is_approved: company.is_approved,
            status: company.status,
        })
    }

    /// Flips a provider's approval, suspending it when approval is withdrawn
    pub async fn toggle_provider_approval(
        &self,
        admin_id: i32,
        provider_id: i32,
    ) -> Result<ApprovalDto, Error> {
        let repo = ProviderRepository::new(self.db);

        let provider = repo
            .find_by_id(provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Provider, provider_id))?;
        let approved = !provider.is_approved;
        let provider = repo.set_approval(provider, approved, admin_id).await?;

        tracing::info!(admin_id, provider_id, approved, "Toggled provider approval");

        Ok(ApprovalDto {
            id: provider.id,
            is_approved: provider.is_approved,
            status: provider.status,
        })
    }

    /// Every shipment request with its bid count, newest first
    pub async fn shipment_requests(&self) -> Result<Vec<ShipmentSummaryDto>, Error> {
        let requests = ShipmentRequestRepository::new(self.db)
            .list_recent(None)
            .await?;
        let request_ids: Vec<i32> = requests.iter().map(|request| request.id).collect();
        let company_ids: Vec<i32> = requests.iter().map(|request| request.company_id).collect();

        let bid_counts = BidRepository::new(self.db)
            .count_by_shipments(&request_ids)
            .await?;
        let company_names: HashMap<i32, String> = CompanyRepository::new(self.db)
            .find_by_ids(&company_ids)
            .await?
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| ShipmentSummaryDto {
                bid_count: count(&bid_counts, request.id),
                company_name: company_names.get(&request.company_id).cloned(),
                request: ShipmentRequestDto::from(request),
            })
            .collect())
    }

    /// Removes a shipment request and its bids unless a contract references it
    pub async fn delete_shipment_request(&self, request_id: i32) -> Result<(), Error> {
        let txn = self.db.begin().await?;
        let request_repo = ShipmentRequestRepository::new(&txn);

        let request = request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::ShipmentRequest, request_id))?;
        if ContractRepository::new(&txn)
            .exists_for_shipment_request(request.id)
            .await?
        {
            return Err(MarketplaceError::invalid_state(
                "This shipment request has a contract and cannot be deleted",
            )
            .into());
        }

        BidRepository::new(&txn)
            .delete_by_shipments(&[request.id])
            .await?;
        request_repo.delete(request.id).await?;

        txn.commit().await?;

        tracing::info!(request_id, "Admin deleted shipment request");

        Ok(())
    }

    /// Removes a bid unless a contract references it
    pub async fn delete_bid(&self, bid_id: i32) -> Result<(), Error> {
        let bid_repo = BidRepository::new(self.db);

        let bid = bid_repo
            .find_by_id(bid_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Bid, bid_id))?;
        if ContractRepository::new(self.db).exists_for_bid(bid.id).await? {
            return Err(MarketplaceError::invalid_state(
                "This bid has a contract and cannot be deleted",
            )
            .into());
        }

        bid_repo.delete(bid.id).await?;

        tracing::info!(bid_id, "Admin deleted bid");

        Ok(())
    }

    /// Every contract, newest first
    pub async fn contracts(&self) -> Result<Vec<ContractSummaryDto>, Error> {
        let contracts = ContractRepository::new(self.db).list_recent(None).await?;

        summaries(self.db, contracts).await
    }

    pub async fn profile(&self, user_id: i32) -> Result<AdminProfileDto, Error> {
        let admin = AdminRepository::new(self.db)
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::UserNotInDatabase(user_id))?;

        Ok(AdminProfileDto::from(admin))
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        payload: UpdateAdminProfileDto,
    ) -> Result<AdminProfileDto, Error> {
        let first_name = validation::required("first_name", &payload.first_name, MAX_NAME_LENGTH)?;
        let last_name = validation::required("last_name", &payload.last_name, MAX_NAME_LENGTH)?;
        let phone_number = match payload.phone_number.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => Some(validation::phone("phone_number", phone)?),
            _ => None,
        };

        let repo = AdminRepository::new(self.db);
        let admin = repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::UserNotInDatabase(user_id))?;
        let admin = repo
            .update_profile(admin, first_name, last_name, phone_number)
            .await?;

        tracing::info!(admin_id = admin.id, "Updated admin profile");

        Ok(AdminProfileDto::from(admin))
    }
}

fn count(counts: &HashMap<i32, u64>, id: i32) -> u64 {
    counts.get(&id).copied().unwrap_or(0)
}
