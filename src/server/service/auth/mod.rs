//! Authentication service layer.
//!
//! Registration of company and provider accounts, credential checks for login and
//! password changes. Session handling stays in the controllers.

#[cfg(test)]
mod tests;

use entity::status::UserRole;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::auth::{ChangePasswordDto, LoginDto, RegisterCompanyDto, RegisterProviderDto, UserDto},
    server::{
        data::{
            company::{CompanyRepository, ProfileFields},
            provider::ProviderRepository,
            user::UserRepository,
        },
        error::{auth::AuthError, validation::ValidationError, Error},
        model::db::UserModel,
        util::{
            password::{hash_password, verify_password},
            validation::{self, MAX_NAME_LENGTH, MAX_TEXT_LENGTH},
        },
    },
};

/// Validated fields shared by both registration forms.
struct Registration {
    email: String,
    password_hash: String,
    business_registration_number: String,
    profile: ProfileFields,
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a company account awaiting admin approval.
    ///
    /// The login user and company profile are created in one transaction.
    ///
    /// # Arguments
    /// - `payload` - Registration form submitted by the company
    ///
    /// # Returns
    /// - `Ok(UserDto)` - The created login user
    /// - `Err(Error::ValidationError)` - A field failed validation
    /// - `Err(Error::AuthError(AuthError::EmailAlreadyRegistered))` - Email is taken
    pub async fn register_company(&self, payload: RegisterCompanyDto) -> Result<UserDto, Error> {
        let registration = self
            .validate_registration(
                &payload.company_name,
                &payload.business_registration_number,
                &payload.email,
                &payload.password,
                &payload.confirm_password,
                &payload.phone_number,
                &payload.address,
                &payload.region,
                &payload.city,
            )
            .await?;

        let txn = self.db.begin().await?;

        let user = UserRepository::new(&txn)
            .create(
                registration.profile.name.clone(),
                registration.email.clone(),
                registration.password_hash,
                UserRole::Company,
            )
            .await?;
        let company = CompanyRepository::new(&txn)
            .create(
                user.id,
                registration.email,
                registration.business_registration_number,
                registration.profile,
            )
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, company_id = company.id, "Registered company");

        Ok(UserDto::from(user))
    }

    /// Registers a provider account awaiting admin approval.
    ///
    /// Behaves like [`Self::register_company`] with an optional service description.
    pub async fn register_provider(&self, payload: RegisterProviderDto) -> Result<UserDto, Error> {
        let registration = self
            .validate_registration(
                &payload.company_name,
                &payload.business_registration_number,
                &payload.email,
                &payload.password,
                &payload.confirm_password,
                &payload.phone_number,
                &payload.address,
                &payload.region,
                &payload.city,
            )
            .await?;
        let service_description = validation::optional(
            "service_description",
            payload.service_description.as_deref(),
            validation::MAX_NOTES_LENGTH,
        )?;

        let txn = self.db.begin().await?;

        let user = UserRepository::new(&txn)
            .create(
                registration.profile.name.clone(),
                registration.email.clone(),
                registration.password_hash,
                UserRole::Provider,
            )
            .await?;
        let provider = ProviderRepository::new(&txn)
            .create(
                user.id,
                registration.email,
                registration.business_registration_number,
                service_description,
                registration.profile,
            )
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, provider_id = provider.id, "Registered provider");

        Ok(UserDto::from(user))
    }

    /// Checks login credentials.
    ///
    /// Unknown emails and wrong passwords produce the same error. Company and provider
    /// accounts must be approved before they can log in.
    ///
    /// # Returns
    /// - `Ok(UserModel)` - The authenticated user
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))` - Unknown email or wrong password
    /// - `Err(Error::AuthError(AuthError::AccountPendingApproval))` - Profile not yet approved
    pub async fn login(&self, payload: LoginDto) -> Result<UserModel, Error> {
        let email = payload.email.trim().to_ascii_lowercase();

        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials(email).into());
        };

        if !verify_password(&payload.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials(email).into());
        }

        let approved = match user.role {
            UserRole::Admin => true,
            UserRole::Company => CompanyRepository::new(self.db)
                .find_by_user_id(user.id)
                .await?
                .is_some_and(|company| company.is_approved),
            UserRole::Provider => ProviderRepository::new(self.db)
                .find_by_user_id(user.id)
                .await?
                .is_some_and(|provider| provider.is_approved),
        };

        if !approved {
            return Err(AuthError::AccountPendingApproval(user.id).into());
        }

        tracing::info!(user_id = user.id, role = ?user.role, "User logged in");

        Ok(user)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<UserDto>, Error> {
        let user = UserRepository::new(self.db).find_by_id(user_id).await?;

        Ok(user.map(UserDto::from))
    }

    /// Replaces a user's password after verifying the current one.
    ///
    /// # Returns
    /// - `Ok(())` - Password changed
    /// - `Err(Error::AuthError(AuthError::IncorrectPassword))` - Current password did not verify
    /// - `Err(Error::ValidationError)` - New password too short or confirmation mismatch
    pub async fn change_password(
        &self,
        user_id: i32,
        payload: ChangePasswordDto,
    ) -> Result<(), Error> {
        let user_repo = UserRepository::new(self.db);

        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotInDatabase(user_id))?;

        if !verify_password(&payload.current_password, &user.password_hash)? {
            return Err(AuthError::IncorrectPassword(user_id).into());
        }

        validation::password("new_password", &payload.new_password)?;
        if payload.new_password != payload.confirm_password {
            return Err(
                ValidationError::field("confirm_password", "Passwords do not match").into(),
            );
        }

        user_repo
            .update_password(user_id, hash_password(&payload.new_password)?)
            .await?;

        tracing::info!(user_id, "Password changed");

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn validate_registration(
        &self,
        name: &str,
        business_registration_number: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        phone_number: &str,
        address: &str,
        region: &str,
        city: &str,
    ) -> Result<Registration, Error> {
        let name = validation::required("company_name", name, MAX_NAME_LENGTH)?;
        let business_registration_number = validation::required(
            "business_registration_number",
            business_registration_number,
            MAX_NAME_LENGTH,
        )?;
        let email = validation::email("email", email)?;
        validation::password("password", password)?;
        if password != confirm_password {
            return Err(
                ValidationError::field("confirm_password", "Passwords do not match").into(),
            );
        }
        let phone_number = validation::phone("phone_number", phone_number)?;
        let address = validation::required("address", address, MAX_TEXT_LENGTH)?;
        let (region, city) = validation::region_and_city("region", "city", region, city)?;

        if UserRepository::new(self.db)
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyRegistered(email).into());
        }

        Ok(Registration {
            email,
            password_hash: hash_password(password)?,
            business_registration_number,
            profile: ProfileFields {
                name,
                phone_number,
                address,
                city,
                region,
            },
        })
    }
}
