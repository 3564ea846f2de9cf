use entity::status::AccountStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{data::company::ProfileFields, model::db::ProviderModel};

pub struct ProviderRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProviderRepository<'a, C> {
    /// Creates a new instance of [`ProviderRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an unapproved provider profile for a login user
    pub async fn create(
        &self,
        user_id: i32,
        email: String,
        business_registration_number: String,
        service_description: Option<String>,
        profile: ProfileFields,
    ) -> Result<ProviderModel, DbErr> {
        let provider = entity::provider::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(profile.name),
            business_registration_number: ActiveValue::Set(business_registration_number),
            address: ActiveValue::Set(profile.address),
            city: ActiveValue::Set(profile.city),
            region: ActiveValue::Set(profile.region),
            service_description: ActiveValue::Set(service_description),
            email: ActiveValue::Set(email),
            phone_number: ActiveValue::Set(profile.phone_number),
            is_approved: ActiveValue::Set(false),
            status: ActiveValue::Set(AccountStatus::PendingApproval),
            admin_id: ActiveValue::Set(None),
            ..Default::default()
        };

        provider.insert(self.db).await
    }

    pub async fn find_by_id(&self, provider_id: i32) -> Result<Option<ProviderModel>, DbErr> {
        entity::prelude::Provider::find_by_id(provider_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<ProviderModel>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, provider_ids: &[i32]) -> Result<Vec<ProviderModel>, DbErr> {
        if provider_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Provider::find()
            .filter(entity::provider::Column::Id.is_in(provider_ids.to_vec()))
            .all(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<ProviderModel>, DbErr> {
        entity::prelude::Provider::find()
            .order_by_asc(entity::provider::Column::Name)
            .all(self.db)
            .await
    }

    /// Approved providers, optionally narrowed by a name/description search and region
    pub async fn list_approved(
        &self,
        search: Option<&str>,
        region: Option<&str>,
    ) -> Result<Vec<ProviderModel>, DbErr> {
        let mut query = entity::prelude::Provider::find()
            .filter(entity::provider::Column::IsApproved.eq(true))
            .order_by_asc(entity::provider::Column::Name);

        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(entity::provider::Column::Name.contains(search))
                    .add(entity::provider::Column::City.contains(search))
                    .add(entity::provider::Column::ServiceDescription.contains(search)),
            );
        }
        if let Some(region) = region {
            query = query.filter(entity::provider::Column::Region.eq(region));
        }

        query.all(self.db).await
    }

    /// Most recently registered providers still waiting for approval
    pub async fn list_pending(&self, limit: u64) -> Result<Vec<ProviderModel>, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::IsApproved.eq(false))
            .filter(entity::provider::Column::Status.eq(AccountStatus::PendingApproval))
            .order_by_desc(entity::provider::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Provider::find().count(self.db).await
    }

    pub async fn count_by_approval(&self, approved: bool) -> Result<u64, DbErr> {
        entity::prelude::Provider::find()
            .filter(entity::provider::Column::IsApproved.eq(approved))
            .count(self.db)
            .await
    }

    pub async fn update_profile(
        &self,
        provider: ProviderModel,
        profile: ProfileFields,
        service_description: Option<String>,
    ) -> Result<ProviderModel, DbErr> {
        let mut active = provider.into_active_model();
        active.name = ActiveValue::Set(profile.name);
        active.phone_number = ActiveValue::Set(profile.phone_number);
        active.address = ActiveValue::Set(profile.address);
        active.city = ActiveValue::Set(profile.city);
        active.region = ActiveValue::Set(profile.region);
        active.service_description = ActiveValue::Set(service_description);

        active.update(self.db).await
    }

    /// Record an admin's approval decision
    pub async fn set_approval(
        &self,
        provider: ProviderModel,
        approved: bool,
        admin_id: i32,
    ) -> Result<ProviderModel, DbErr> {
        let mut active = provider.into_active_model();
        active.is_approved = ActiveValue::Set(approved);
        active.status = ActiveValue::Set(if approved {
            AccountStatus::Approved
        } else {
            AccountStatus::Suspended
        });
        active.admin_id = ActiveValue::Set(Some(admin_id));

        active.update(self.db).await
    }

    pub async fn delete(&self, provider_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Provider::delete_by_id(provider_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod list_approved {
        use wasl_test_utils::prelude::*;

        use crate::server::data::provider::ProviderRepository;

        /// Expect unapproved providers to be excluded from the directory
        #[tokio::test]
        async fn excludes_unapproved() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("fast@freight.sa", true).await?;
            test.user().insert_provider("slow@freight.sa", false).await?;
            let repo = ProviderRepository::new(&test.db);

            let providers = repo.list_approved(None, None).await?;

            assert_eq!(providers.len(), 1);
            assert_eq!(providers[0].email, "fast@freight.sa");

            Ok(())
        }

        /// Expect the search to match the service description
        #[tokio::test]
        async fn searches_service_description() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("cold@freight.sa", true).await?;
            let repo = ProviderRepository::new(&test.db);

            let hits = repo.list_approved(Some("Refrigerated"), None).await?;
            let misses = repo.list_approved(Some("Livestock"), None).await?;

            assert_eq!(hits.len(), 1);
            assert!(misses.is_empty());

            Ok(())
        }

        /// Expect the region filter to match the stored region key
        #[tokio::test]
        async fn filters_by_region() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("cold@freight.sa", true).await?;
            let repo = ProviderRepository::new(&test.db);

            let riyadh = repo.list_approved(None, Some(TEST_REGION)).await?;
            let makkah = repo.list_approved(None, Some("makkah")).await?;

            assert_eq!(riyadh.len(), 1);
            assert!(makkah.is_empty());

            Ok(())
        }
    }

    mod list_pending {
        use wasl_test_utils::prelude::*;

        use crate::server::data::provider::ProviderRepository;

        /// Expect only providers awaiting approval, newest first
        #[tokio::test]
        async fn lists_newest_pending_first() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("a@freight.sa", false).await?;
            test.user().insert_provider("b@freight.sa", true).await?;
            test.user().insert_provider("c@freight.sa", false).await?;
            let repo = ProviderRepository::new(&test.db);

            let pending = repo.list_pending(5).await?;

            let emails: Vec<_> = pending.iter().map(|p| p.email.as_str()).collect();
            assert_eq!(emails, vec!["c@freight.sa", "a@freight.sa"]);

            Ok(())
        }
    }
}
