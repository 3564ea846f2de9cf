use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{model::db::FeedbackModel, util::time};

use entity::feedback::Column;

/// Sum and count of a provider's ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingStats {
    pub total: i64,
    pub count: u64,
}

impl RatingStats {
    /// Mean rating, `None` when the provider has no reviews
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / self.count as f64)
    }
}

pub struct FeedbackRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FeedbackRepository<'a, C> {
    /// Creates a new instance of [`FeedbackRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        shipment_id: i32,
        company_id: i32,
        provider_id: i32,
        rating: i32,
        comments: String,
    ) -> Result<FeedbackModel, DbErr> {
        let feedback = entity::feedback::ActiveModel {
            shipment_id: ActiveValue::Set(shipment_id),
            company_id: ActiveValue::Set(company_id),
            provider_id: ActiveValue::Set(provider_id),
            rating: ActiveValue::Set(rating),
            comments: ActiveValue::Set(comments),
            created_at: ActiveValue::Set(time::now()),
            ..Default::default()
        };

        feedback.insert(self.db).await
    }

    pub async fn find_by_id(&self, feedback_id: i32) -> Result<Option<FeedbackModel>, DbErr> {
        entity::prelude::Feedback::find_by_id(feedback_id)
            .one(self.db)
            .await
    }

    /// Whether the company already rated any snapshot in `shipment_ids`
    pub async fn exists_for(&self, shipment_ids: &[i32], company_id: i32) -> Result<bool, DbErr> {
        if shipment_ids.is_empty() {
            return Ok(false);
        }

        let count = entity::prelude::Feedback::find()
            .filter(Column::ShipmentId.is_in(shipment_ids.to_vec()))
            .filter(Column::CompanyId.eq(company_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// The provider's feedback, newest first
    pub async fn list_by_provider(&self, provider_id: i32) -> Result<Vec<FeedbackModel>, DbErr> {
        entity::prelude::Feedback::find()
            .filter(Column::ProviderId.eq(provider_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<FeedbackModel>, DbErr> {
        entity::prelude::Feedback::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Feedback::find().count(self.db).await
    }

    /// Rating sum and count per provider
    ///
    /// `provider_ids` limits the result to those providers, `None` covers every provider.
    pub async fn rating_stats(
        &self,
        provider_ids: Option<&[i32]>,
    ) -> Result<HashMap<i32, RatingStats>, DbErr> {
        let mut query = entity::prelude::Feedback::find()
            .select_only()
            .column(Column::ProviderId)
            .column(Column::Rating);

        if let Some(provider_ids) = provider_ids {
            if provider_ids.is_empty() {
                return Ok(HashMap::new());
            }
            query = query.filter(Column::ProviderId.is_in(provider_ids.to_vec()));
        }

        let rows = query.into_tuple::<(i32, i32)>().all(self.db).await?;

        let mut stats: HashMap<i32, RatingStats> = HashMap::new();
        for (provider_id, rating) in rows {
            let entry = stats.entry(provider_id).or_default();
            entry.total += i64::from(rating);
            entry.count += 1;
        }

        Ok(stats)
    }

    pub async fn delete(&self, feedback_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Feedback::delete_by_id(feedback_id)
            .exec(self.db)
            .await
    }
}
