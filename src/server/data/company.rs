use entity::status::AccountStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::db::CompanyModel;

/// Validated profile fields shared by companies and providers.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub region: String,
}

pub struct CompanyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CompanyRepository<'a, C> {
    /// Creates a new instance of [`CompanyRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an unapproved company profile for a login user
    pub async fn create(
        &self,
        user_id: i32,
        email: String,
        business_registration_number: String,
        profile: ProfileFields,
    ) -> Result<CompanyModel, DbErr> {
        let company = entity::company::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(profile.name),
            business_registration_number: ActiveValue::Set(business_registration_number),
            address: ActiveValue::Set(profile.address),
            city: ActiveValue::Set(profile.city),
            region: ActiveValue::Set(profile.region),
            email: ActiveValue::Set(email),
            phone_number: ActiveValue::Set(profile.phone_number),
            is_approved: ActiveValue::Set(false),
            status: ActiveValue::Set(AccountStatus::PendingApproval),
            admin_id: ActiveValue::Set(None),
            ..Default::default()
        };

        company.insert(self.db).await
    }

    pub async fn find_by_id(&self, company_id: i32) -> Result<Option<CompanyModel>, DbErr> {
        entity::prelude::Company::find_by_id(company_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<CompanyModel>, DbErr> {
        entity::prelude::Company::find()
            .filter(entity::company::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, company_ids: &[i32]) -> Result<Vec<CompanyModel>, DbErr> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Company::find()
            .filter(entity::company::Column::Id.is_in(company_ids.to_vec()))
            .all(self.db)
            .await
    }

    /// All companies ordered by name
    pub async fn list_all(&self) -> Result<Vec<CompanyModel>, DbErr> {
        entity::prelude::Company::find()
            .order_by_asc(entity::company::Column::Name)
            .all(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Company::find().count(self.db).await
    }

    pub async fn update_profile(
        &self,
        company: CompanyModel,
        profile: ProfileFields,
    ) -> Result<CompanyModel, DbErr> {
        let mut active = company.into_active_model();
        active.name = ActiveValue::Set(profile.name);
        active.phone_number = ActiveValue::Set(profile.phone_number);
        active.address = ActiveValue::Set(profile.address);
        active.city = ActiveValue::Set(profile.city);
        active.region = ActiveValue::Set(profile.region);

        active.update(self.db).await
    }

    /// Record an admin's approval decision
    pub async fn set_approval(
        &self,
        company: CompanyModel,
        approved: bool,
        admin_id: i32,
    ) -> Result<CompanyModel, DbErr> {
        let mut active = company.into_active_model();
        active.is_approved = ActiveValue::Set(approved);
        active.status = ActiveValue::Set(if approved {
            AccountStatus::Approved
        } else {
            AccountStatus::Suspended
        });
        active.admin_id = ActiveValue::Set(Some(admin_id));

        active.update(self.db).await
    }

    pub async fn delete(&self, company_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Company::delete_by_id(company_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod set_approval {
        use entity::status::AccountStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::data::company::CompanyRepository;

        /// Expect approval to mark the company Approved and record the admin
        #[tokio::test]
        async fn approves_company() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, admin) = test.user().insert_admin("admin@wasl.sa").await?;
            let (_, company) = test.user().insert_company("ops@acme.sa", false).await?;
            let repo = CompanyRepository::new(&test.db);

            let updated = repo.set_approval(company, true, admin.id).await?;

            assert!(updated.is_approved);
            assert_eq!(updated.status, AccountStatus::Approved);
            assert_eq!(updated.admin_id, Some(admin.id));

            Ok(())
        }

        /// Expect revoking approval to suspend the company
        #[tokio::test]
        async fn suspends_company() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, admin) = test.user().insert_admin("admin@wasl.sa").await?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let repo = CompanyRepository::new(&test.db);

            let updated = repo.set_approval(company, false, admin.id).await?;

            assert!(!updated.is_approved);
            assert_eq!(updated.status, AccountStatus::Suspended);

            Ok(())
        }
    }

    mod find_by_ids {
        use wasl_test_utils::prelude::*;

        use crate::server::data::company::CompanyRepository;

        /// Expect an empty list without querying when no IDs are given
        #[tokio::test]
        async fn empty_ids_return_empty_list() -> Result<(), TestError> {
            let test = test_setup_with_marketplace_tables!()?;
            let repo = CompanyRepository::new(&test.db);

            let companies = repo.find_by_ids(&[]).await?;

            assert!(companies.is_empty());

            Ok(())
        }
    }
}
