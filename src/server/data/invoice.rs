use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::model::db::InvoiceModel;

use entity::invoice::Column;

pub struct InvoiceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvoiceRepository<'a, C> {
    /// Creates a new instance of [`InvoiceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        contract_id: i32,
        invoice_number: String,
        issued_at: NaiveDateTime,
        due_at: NaiveDateTime,
    ) -> Result<InvoiceModel, DbErr> {
        let invoice = entity::invoice::ActiveModel {
            contract_id: ActiveValue::Set(contract_id),
            invoice_number: ActiveValue::Set(invoice_number),
            issued_at: ActiveValue::Set(issued_at),
            due_at: ActiveValue::Set(due_at),
            ..Default::default()
        };

        invoice.insert(self.db).await
    }

    pub async fn find_by_id(&self, invoice_id: i32) -> Result<Option<InvoiceModel>, DbErr> {
        entity::prelude::Invoice::find_by_id(invoice_id)
            .one(self.db)
            .await
    }

    /// Find an invoice only if its contract belongs to the company
    pub async fn find_for_company(
        &self,
        invoice_id: i32,
        company_id: i32,
    ) -> Result<Option<InvoiceModel>, DbErr> {
        entity::prelude::Invoice::find_by_id(invoice_id)
            .inner_join(entity::prelude::Contract)
            .filter(entity::contract::Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_contract(&self, contract_id: i32) -> Result<Option<InvoiceModel>, DbErr> {
        entity::prelude::Invoice::find()
            .filter(Column::ContractId.eq(contract_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(
        &self,
        invoice_ids: &[i32],
    ) -> Result<HashMap<i32, InvoiceModel>, DbErr> {
        if invoice_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let invoices = entity::prelude::Invoice::find()
            .filter(Column::Id.is_in(invoice_ids.to_vec()))
            .all(self.db)
            .await?;

        Ok(invoices.into_iter().map(|i| (i.id, i)).collect())
    }

    /// Invoices of the given contracts, newest first
    pub async fn list_by_contracts(
        &self,
        contract_ids: &[i32],
    ) -> Result<Vec<InvoiceModel>, DbErr> {
        if contract_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Invoice::find()
            .filter(Column::ContractId.is_in(contract_ids.to_vec()))
            .order_by_desc(Column::IssuedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    mod find_for_company {
        use wasl_test_utils::prelude::*;

        use crate::server::data::invoice::InvoiceRepository;

        /// Expect another company's invoice to be invisible
        #[tokio::test]
        async fn scopes_to_contract_company() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let (_, other) = test.user().insert_company("other@acme.sa", true).await?;
            let invoice = test.marketplace().insert_invoice(chain.contract.id).await?;
            let repo = InvoiceRepository::new(&test.db);

            assert!(repo
                .find_for_company(invoice.id, chain.company.id)
                .await?
                .is_some());
            assert!(repo.find_for_company(invoice.id, other.id).await?.is_none());

            Ok(())
        }
    }
}
