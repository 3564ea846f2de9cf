use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect,
};

use crate::server::{model::db::RevenueReportModel, util::time};

use entity::revenue_report::Column;

pub struct RevenueReportRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RevenueReportRepository<'a, C> {
    /// Creates a new instance of [`RevenueReportRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Persist a computed revenue report
    pub async fn create(
        &self,
        admin_id: i32,
        period_covered: String,
        total_revenue: Decimal,
        total_commission: Decimal,
    ) -> Result<RevenueReportModel, DbErr> {
        let report = entity::revenue_report::ActiveModel {
            admin_id: ActiveValue::Set(Some(admin_id)),
            period_covered: ActiveValue::Set(period_covered),
            total_revenue: ActiveValue::Set(total_revenue),
            total_commission: ActiveValue::Set(total_commission),
            generated_at: ActiveValue::Set(time::now()),
            ..Default::default()
        };

        report.insert(self.db).await
    }

    /// Saved reports, newest first
    pub async fn list(&self) -> Result<Vec<RevenueReportModel>, DbErr> {
        entity::prelude::RevenueReport::find()
            .order_by_desc(Column::GeneratedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }

    /// Sum of revenue across every saved report
    pub async fn total_revenue(&self) -> Result<Decimal, DbErr> {
        let totals = entity::prelude::RevenueReport::find()
            .select_only()
            .column(Column::TotalRevenue)
            .into_tuple::<Decimal>()
            .all(self.db)
            .await?;

        Ok(totals.into_iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use wasl_test_utils::prelude::*;

    use crate::server::data::revenue_report::RevenueReportRepository;

    /// Expect the platform total to add up every saved report
    #[tokio::test]
    async fn sums_saved_reports() -> Result<(), TestError> {
        let mut test = test_setup_with_marketplace_tables!()?;
        let (_, admin) = test.user().insert_admin("admin@wasl.sa").await?;
        let repo = RevenueReportRepository::new(&test.db);

        repo.create(
            admin.id,
            "2026-08-01 - 2026-08-31".to_string(),
            Decimal::from(1000),
            Decimal::from(100),
        )
        .await?;
        repo.create(
            admin.id,
            "2026-09-01 - 2026-09-30".to_string(),
            Decimal::new(25050, 2),
            Decimal::new(2505, 2),
        )
        .await?;

        assert_eq!(repo.total_revenue().await?, Decimal::new(125050, 2));
        assert_eq!(repo.list().await?.len(), 2);

        Ok(())
    }
}
