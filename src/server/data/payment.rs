use std::collections::HashMap;

use entity::status::PaymentStatus;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::{model::db::PaymentModel, util::time};

use entity::payment::Column;

pub struct PaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    /// Creates a new instance of [`PaymentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a Pending payment against an invoice
    pub async fn create(
        &self,
        invoice_id: i32,
        amount: Decimal,
        method: String,
    ) -> Result<PaymentModel, DbErr> {
        let payment = entity::payment::ActiveModel {
            invoice_id: ActiveValue::Set(invoice_id),
            amount: ActiveValue::Set(amount),
            method: ActiveValue::Set(method),
            status: ActiveValue::Set(PaymentStatus::Pending),
            transaction_id: ActiveValue::Set(None),
            payment_date: ActiveValue::Set(time::now()),
            ..Default::default()
        };

        payment.insert(self.db).await
    }

    pub async fn find_by_id(&self, payment_id: i32) -> Result<Option<PaymentModel>, DbErr> {
        entity::prelude::Payment::find_by_id(payment_id)
            .one(self.db)
            .await
    }

    /// Payments against the given invoices, newest first
    pub async fn list_by_invoices(
        &self,
        invoice_ids: &[i32],
        status: Option<PaymentStatus>,
    ) -> Result<Vec<PaymentModel>, DbErr> {
        if invoice_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = entity::prelude::Payment::find()
            .filter(Column::InvoiceId.is_in(invoice_ids.to_vec()))
            .order_by_desc(Column::PaymentDate)
            .order_by_desc(Column::Id);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.all(self.db).await
    }

    /// The most recent payment of each invoice
    pub async fn latest_by_invoices(
        &self,
        invoice_ids: &[i32],
    ) -> Result<HashMap<i32, PaymentModel>, DbErr> {
        let payments = self.list_by_invoices(invoice_ids, None).await?;

        let mut latest = HashMap::new();
        for payment in payments {
            latest.entry(payment.invoice_id).or_insert(payment);
        }

        Ok(latest)
    }

    pub async fn latest_for_invoice(&self, invoice_id: i32) -> Result<Option<PaymentModel>, DbErr> {
        entity::prelude::Payment::find()
            .filter(Column::InvoiceId.eq(invoice_id))
            .order_by_desc(Column::PaymentDate)
            .order_by_desc(Column::Id)
            .one(self.db)
            .await
    }

    pub async fn has_successful(&self, invoice_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Payment::find()
            .filter(Column::InvoiceId.eq(invoice_id))
            .filter(Column::Status.eq(PaymentStatus::Successful))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Move a payment from any of `from` to `to`
    ///
    /// The transaction id is overwritten when given. Returns the number of rows updated,
    /// 0 when the payment was not in an expected status.
    pub async fn transition(
        &self,
        payment_id: i32,
        from: &[PaymentStatus],
        to: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<u64, DbErr> {
        let mut update = entity::payment::ActiveModel {
            status: ActiveValue::Set(to),
            payment_date: ActiveValue::Set(time::now()),
            ..Default::default()
        };
        if transaction_id.is_some() {
            update.transaction_id = ActiveValue::Set(transaction_id);
        }

        let result = entity::prelude::Payment::update_many()
            .set(update)
            .filter(Column::Id.eq(payment_id))
            .filter(Column::Status.is_in(from.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    mod transition {
        use entity::status::PaymentStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::data::payment::PaymentRepository;

        /// Expect a transition to record the gateway transaction id
        #[tokio::test]
        async fn records_transaction_id() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            let payment = test
                .marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Pending)
                .await?;
            let repo = PaymentRepository::new(&test.db);

            let rows = repo
                .transition(
                    payment.id,
                    &[PaymentStatus::Pending, PaymentStatus::Processing],
                    PaymentStatus::Successful,
                    Some("ABCDEF0123456789".to_string()),
                )
                .await?;

            assert_eq!(rows, 1);
            let stored = repo.find_by_id(payment.id).await?.unwrap();
            assert_eq!(stored.status, PaymentStatus::Successful);
            assert_eq!(stored.transaction_id.as_deref(), Some("ABCDEF0123456789"));
            assert!(repo.has_successful(invoice.id).await?);

            Ok(())
        }

        /// Expect a payment outside the expected statuses to be left alone
        #[tokio::test]
        async fn refuses_unexpected_status() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            let payment = test
                .marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Successful)
                .await?;
            let repo = PaymentRepository::new(&test.db);

            let rows = repo
                .transition(
                    payment.id,
                    &[PaymentStatus::Failed],
                    PaymentStatus::Pending,
                    None,
                )
                .await?;

            assert_eq!(rows, 0);

            Ok(())
        }
    }

    mod latest_by_invoices {
        use entity::status::PaymentStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::data::payment::PaymentRepository;

        /// Expect the most recently inserted payment to win
        #[tokio::test]
        async fn picks_latest_payment() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            test.marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Failed)
                .await?;
            let retry = test
                .marketplace()
                .insert_payment(invoice.id, 1500, PaymentStatus::Successful)
                .await?;
            let repo = PaymentRepository::new(&test.db);

            let latest = repo.latest_by_invoices(&[invoice.id]).await?;

            assert_eq!(latest[&invoice.id].id, retry.id);

            Ok(())
        }
    }
}
