use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

use crate::server::model::db::AdminModel;

pub struct AdminRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AdminRepository<'a, C> {
    /// Creates a new instance of [`AdminRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<AdminModel>, DbErr> {
        entity::prelude::Admin::find()
            .filter(entity::admin::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    /// Update the editable profile fields of an admin
    pub async fn update_profile(
        &self,
        admin: AdminModel,
        first_name: String,
        last_name: String,
        phone_number: Option<String>,
    ) -> Result<AdminModel, DbErr> {
        let mut active = admin.into_active_model();
        active.first_name = ActiveValue::Set(first_name);
        active.last_name = ActiveValue::Set(last_name);
        active.phone_number = ActiveValue::Set(phone_number);

        active.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use wasl_test_utils::prelude::*;

    use crate::server::data::admin::AdminRepository;

    /// Expect the admin profile to be found by its login user and updated in place
    #[tokio::test]
    async fn finds_and_updates_profile() -> Result<(), TestError> {
        let mut test = test_setup_with_marketplace_tables!()?;
        let (user, _) = test.user().insert_admin("admin@wasl.sa").await?;
        let repo = AdminRepository::new(&test.db);

        let admin = repo.find_by_user_id(user.id).await?.unwrap();
        let updated = repo
            .update_profile(admin, "Noura".to_string(), "Saleh".to_string(), None)
            .await?;

        assert_eq!(updated.first_name, "Noura");
        assert!(updated.phone_number.is_none());

        Ok(())
    }
}
