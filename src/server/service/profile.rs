//! Company and provider self-service profiles.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::profile::{
        CompanyDto, DeleteAccountDto, ProviderDto, UpdateCompanyProfileDto,
        UpdateProviderProfileDto,
    },
    server::{
        data::{
            bid::BidRepository,
            company::{CompanyRepository, ProfileFields},
            contract::ContractRepository,
            provider::ProviderRepository,
            shipment_request::ShipmentRequestRepository,
            user::UserRepository,
        },
        error::{
            auth::AuthError,
            marketplace::{MarketplaceError, Resource},
            Error,
        },
        model::db::{CompanyModel, ProviderModel},
        util::{
            password::verify_password,
            validation::{self, MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MAX_TEXT_LENGTH},
        },
    },
};

pub struct ProfileService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProfileService<'a> {
    /// Creates a new instance of [`ProfileService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn company(&self, company_id: i32) -> Result<CompanyDto, Error> {
        Ok(CompanyDto::from(self.find_company(company_id).await?))
    }

    /// Replaces the company's contact details and mirrors the name onto its login
    pub async fn update_company(
        &self,
        company_id: i32,
        payload: UpdateCompanyProfileDto,
    ) -> Result<CompanyDto, Error> {
        let profile = validate_profile(
            &payload.name,
            &payload.phone_number,
            &payload.region,
            &payload.city,
            &payload.address,
        )?;

        let company = self.find_company(company_id).await?;
        let user_id = company.user_id;

        let txn = self.db.begin().await?;
        UserRepository::new(&txn)
            .update_name(user_id, profile.name.clone())
            .await?;
        let company = CompanyRepository::new(&txn)
            .update_profile(company, profile)
            .await?;
        txn.commit().await?;

        tracing::info!(company_id, "Updated company profile");

        Ok(CompanyDto::from(company))
    }

    /// Deletes the company, its shipment requests with their bids, and its login
    ///
    /// # Returns
    /// - `Ok(())` - Account removed, the caller should end the session
    /// - `Err(Error::AuthError(AuthError::IncorrectPassword))` - Password did not verify
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - A contract exists
    pub async fn delete_company(
        &self,
        company_id: i32,
        payload: DeleteAccountDto,
    ) -> Result<(), Error> {
        let company = self.find_company(company_id).await?;
        let user = UserRepository::new(self.db)
            .find_by_id(company.user_id)
            .await?
            .ok_or(AuthError::UserNotInDatabase(company.user_id))?;

        if !verify_password(&payload.password, &user.password_hash)? {
            return Err(AuthError::IncorrectPassword(user.id).into());
        }

        let txn = self.db.begin().await?;

        if ContractRepository::new(&txn)
            .count_for_company(company.id)
            .await?
            > 0
        {
            return Err(MarketplaceError::invalid_state(
                "Accounts with contracts cannot be deleted",
            )
            .into());
        }

        let request_repo = ShipmentRequestRepository::new(&txn);
        let request_ids = request_repo.ids_by_company(company.id).await?;
        BidRepository::new(&txn)
            .delete_by_shipments(&request_ids)
            .await?;
        request_repo.delete_by_company(company.id).await?;
        CompanyRepository::new(&txn).delete(company.id).await?;
        UserRepository::new(&txn).delete(user.id).await?;

        txn.commit().await?;

        tracing::info!(company_id, user_id = user.id, "Deleted company account");

        Ok(())
    }

    pub async fn provider(&self, provider_id: i32) -> Result<ProviderDto, Error> {
        Ok(ProviderDto::from(self.find_provider(provider_id).await?))
    }

    pub async fn update_provider(
        &self,
        provider_id: i32,
        payload: UpdateProviderProfileDto,
    ) -> Result<ProviderDto, Error> {
        let profile = validate_profile(
            &payload.name,
            &payload.phone_number,
            &payload.region,
            &payload.city,
            &payload.address,
        )?;
        let service_description = validation::optional(
            "service_description",
            payload.service_description.as_deref(),
            MAX_NOTES_LENGTH,
        )?;

        let provider = self.find_provider(provider_id).await?;
        let user_id = provider.user_id;

        let txn = self.db.begin().await?;
        UserRepository::new(&txn)
            .update_name(user_id, profile.name.clone())
            .await?;
        let provider = ProviderRepository::new(&txn)
            .update_profile(provider, profile, service_description)
            .await?;
        txn.commit().await?;

        tracing::info!(provider_id, "Updated provider profile");

        Ok(ProviderDto::from(provider))
    }

    async fn find_company(&self, company_id: i32) -> Result<CompanyModel, Error> {
        CompanyRepository::new(self.db)
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found(Resource::Company, company_id).into())
    }

    async fn find_provider(&self, provider_id: i32) -> Result<ProviderModel, Error> {
        ProviderRepository::new(self.db)
            .find_by_id(provider_id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found(Resource::Provider, provider_id).into())
    }
}

fn validate_profile(
    name: &str,
    phone_number: &str,
    region: &str,
    city: &str,
    address: &str,
) -> Result<ProfileFields, Error> {
    let name = validation::required("name", name, MAX_NAME_LENGTH)?;
    let phone_number = validation::phone("phone_number", phone_number)?;
    let (region, city) = validation::region_and_city("region", "city", region, city)?;
    let address = validation::required("address", address, MAX_TEXT_LENGTH)?;

    Ok(ProfileFields {
        name,
        phone_number,
        address,
        city,
        region,
    })
}
