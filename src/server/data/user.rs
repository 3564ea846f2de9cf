use entity::status::UserRole;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter,
};

use crate::server::{model::db::UserModel, util::time};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new login user
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Result<UserModel, DbErr> {
        let now = time::now();
        let user = entity::wasl_user::ActiveModel {
            name: ActiveValue::Set(name),
            email: ActiveValue::Set(email),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set(role),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::WaslUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    /// Find a user by their lowercased login email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::WaslUser::find()
            .filter(entity::wasl_user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    /// Replace the stored password hash
    ///
    /// Returns the number of rows updated, 0 when the user does not exist.
    pub async fn update_password(&self, user_id: i32, password_hash: String) -> Result<u64, DbErr> {
        let result = entity::prelude::WaslUser::update_many()
            .set(entity::wasl_user::ActiveModel {
                password_hash: ActiveValue::Set(password_hash),
                updated_at: ActiveValue::Set(time::now()),
                ..Default::default()
            })
            .filter(entity::wasl_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Keep the login display name in line with the profile name
    pub async fn update_name(&self, user_id: i32, name: String) -> Result<u64, DbErr> {
        let result = entity::prelude::WaslUser::update_many()
            .set(entity::wasl_user::ActiveModel {
                name: ActiveValue::Set(name),
                updated_at: ActiveValue::Set(time::now()),
                ..Default::default()
            })
            .filter(entity::wasl_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_by_role(&self, role: UserRole) -> Result<u64, DbErr> {
        entity::prelude::WaslUser::find()
            .filter(entity::wasl_user::Column::Role.eq(role))
            .count(self.db)
            .await
    }

    /// Deletes a user
    ///
    /// Returns OK regardless of user existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, user_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::WaslUser::delete_by_id(user_id)
            .exec(self.db)
            .await
    }
}
