use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use entity::status::{AccountStatus, AdminStatus, UserRole};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::{TEST_CITY, TEST_PASSWORD, TEST_PHONE_NUMBER, TEST_REGION},
    error::TestError,
    TestContext,
};

static PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// Argon2 hash of [`TEST_PASSWORD`], computed once per test binary.
pub fn test_password_hash() -> Result<String, TestError> {
    if let Some(hash) = PASSWORD_HASH.get() {
        return Ok(hash.clone());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)
        .map_err(|e| TestError::PasswordHashError(e.to_string()))?
        .to_string();

    Ok(PASSWORD_HASH.get_or_init(|| hash).clone())
}

impl TestContext {
    pub fn user<'a>(&'a mut self) -> UserFixtures<'a> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert a login user with the shared test password.
    pub async fn insert_user(
        &self,
        email: &str,
        role: UserRole,
    ) -> Result<entity::wasl_user::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::WaslUser::insert(entity::wasl_user::ActiveModel {
                name: ActiveValue::Set(email.split('@').next().unwrap_or(email).to_string()),
                email: ActiveValue::Set(email.to_string()),
                password_hash: ActiveValue::Set(test_password_hash()?),
                role: ActiveValue::Set(role),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert an active admin with its login user.
    pub async fn insert_admin(
        &self,
        email: &str,
    ) -> Result<(entity::wasl_user::Model, entity::admin::Model), TestError> {
        let user = self.insert_user(email, UserRole::Admin).await?;

        let admin = entity::prelude::Admin::insert(entity::admin::ActiveModel {
            user_id: ActiveValue::Set(user.id),
            first_name: ActiveValue::Set("Test".to_string()),
            last_name: ActiveValue::Set("Admin".to_string()),
            email: ActiveValue::Set(email.to_string()),
            phone_number: ActiveValue::Set(Some(TEST_PHONE_NUMBER.to_string())),
            status: ActiveValue::Set(AdminStatus::Active),
            admin_role: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        Ok((user, admin))
    }

    /// Insert a company with its login user.
    ///
    /// # Arguments
    /// - `email` - Login and contact email, must be unique per test
    /// - `approved` - Whether the company has passed admin approval
    pub async fn insert_company(
        &self,
        email: &str,
        approved: bool,
    ) -> Result<(entity::wasl_user::Model, entity::company::Model), TestError> {
        let user = self.insert_user(email, UserRole::Company).await?;

        let company = entity::prelude::Company::insert(entity::company::ActiveModel {
            user_id: ActiveValue::Set(user.id),
            name: ActiveValue::Set(format!("Company {}", user.name)),
            business_registration_number: ActiveValue::Set(format!("CR-{}", user.id)),
            address: ActiveValue::Set("King Fahd Road".to_string()),
            city: ActiveValue::Set(TEST_CITY.to_string()),
            region: ActiveValue::Set(TEST_REGION.to_string()),
            email: ActiveValue::Set(email.to_string()),
            phone_number: ActiveValue::Set(TEST_PHONE_NUMBER.to_string()),
            is_approved: ActiveValue::Set(approved),
            status: ActiveValue::Set(account_status(approved)),
            admin_id: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        Ok((user, company))
    }

    /// Insert a provider with its login user.
    pub async fn insert_provider(
        &self,
        email: &str,
        approved: bool,
    ) -> Result<(entity::wasl_user::Model, entity::provider::Model), TestError> {
        let user = self.insert_user(email, UserRole::Provider).await?;

        let provider = entity::prelude::Provider::insert(entity::provider::ActiveModel {
            user_id: ActiveValue::Set(user.id),
            name: ActiveValue::Set(format!("Provider {}", user.name)),
            business_registration_number: ActiveValue::Set(format!("CR-{}", user.id)),
            address: ActiveValue::Set("Olaya Street".to_string()),
            city: ActiveValue::Set(TEST_CITY.to_string()),
            region: ActiveValue::Set(TEST_REGION.to_string()),
            service_description: ActiveValue::Set(Some("Refrigerated freight".to_string())),
            email: ActiveValue::Set(email.to_string()),
            phone_number: ActiveValue::Set(TEST_PHONE_NUMBER.to_string()),
            is_approved: ActiveValue::Set(approved),
            status: ActiveValue::Set(account_status(approved)),
            admin_id: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        Ok((user, provider))
    }
}

fn account_status(approved: bool) -> AccountStatus {
    if approved {
        AccountStatus::Approved
    } else {
        AccountStatus::PendingApproval
    }
}
