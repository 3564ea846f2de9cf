use std::collections::HashMap;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::{
    data::count_map,
    model::db::{BidModel, ContractModel},
    util::time,
};

use entity::contract::Column;

pub struct ContractRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContractRepository<'a, C> {
    /// Creates a new instance of [`ContractRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an unsigned contract for an accepted bid
    ///
    /// # Arguments
    /// - `bid` - The accepted bid the contract is instantiated from
    /// - `company_id` - Company that owns the bid's shipment request
    /// - `document` - Stored document path relative to the upload root
    pub async fn create(
        &self,
        bid: &BidModel,
        company_id: i32,
        document: String,
    ) -> Result<ContractModel, DbErr> {
        let contract = entity::contract::ActiveModel {
            bid_id: ActiveValue::Set(bid.id),
            company_id: ActiveValue::Set(company_id),
            provider_id: ActiveValue::Set(bid.provider_id),
            shipment_request_id: ActiveValue::Set(bid.shipment_request_id),
            document: ActiveValue::Set(document),
            signed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(time::now()),
            ..Default::default()
        };

        contract.insert(self.db).await
    }

    pub async fn find_by_id(&self, contract_id: i32) -> Result<Option<ContractModel>, DbErr> {
        entity::prelude::Contract::find_by_id(contract_id)
            .one(self.db)
            .await
    }

    pub async fn find_for_company(
        &self,
        contract_id: i32,
        company_id: i32,
    ) -> Result<Option<ContractModel>, DbErr> {
        entity::prelude::Contract::find_by_id(contract_id)
            .filter(Column::CompanyId.eq(company_id))
            .one(self.db)
            .await
    }

    pub async fn find_for_provider(
        &self,
        contract_id: i32,
        provider_id: i32,
    ) -> Result<Option<ContractModel>, DbErr> {
        entity::prelude::Contract::find_by_id(contract_id)
            .filter(Column::ProviderId.eq(provider_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(
        &self,
        contract_ids: &[i32],
    ) -> Result<HashMap<i32, ContractModel>, DbErr> {
        if contract_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let contracts = entity::prelude::Contract::find()
            .filter(Column::Id.is_in(contract_ids.to_vec()))
            .all(self.db)
            .await?;

        Ok(contracts.into_iter().map(|c| (c.id, c)).collect())
    }

    pub async fn exists_for_bid(&self, bid_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Contract::find()
            .filter(Column::BidId.eq(bid_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn exists_for_shipment_request(
        &self,
        shipment_request_id: i32,
    ) -> Result<bool, DbErr> {
        let count = entity::prelude::Contract::find()
            .filter(Column::ShipmentRequestId.eq(shipment_request_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// The company's contracts, newest first
    pub async fn list_by_company(&self, company_id: i32) -> Result<Vec<ContractModel>, DbErr> {
        entity::prelude::Contract::find()
            .filter(Column::CompanyId.eq(company_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(self.db)
            .await
    }

    /// The provider's contracts, newest first
    ///
    /// `signed` narrows the list to signed (`Some(true)`) or unsigned (`Some(false)`) contracts.
    pub async fn list_by_provider(
        &self,
        provider_id: i32,
        signed: Option<bool>,
    ) -> Result<Vec<ContractModel>, DbErr> {
        let mut query = entity::prelude::Contract::find()
            .filter(Column::ProviderId.eq(provider_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        match signed {
            Some(true) => query = query.filter(Column::SignedAt.is_not_null()),
            Some(false) => query = query.filter(Column::SignedAt.is_null()),
            None => {}
        }

        query.all(self.db).await
    }

    /// The most recent contracts across the platform
    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<ContractModel>, DbErr> {
        entity::prelude::Contract::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Contracts signed within the half-open range `[start, end)`
    pub async fn list_signed_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        company_id: Option<i32>,
    ) -> Result<Vec<ContractModel>, DbErr> {
        let mut query = entity::prelude::Contract::find()
            .filter(Column::SignedAt.gte(start))
            .filter(Column::SignedAt.lt(end))
            .order_by_asc(Column::SignedAt);

        if let Some(company_id) = company_id {
            query = query.filter(Column::CompanyId.eq(company_id));
        }

        query.all(self.db).await
    }

    /// Record the signed document, only if the contract has not been signed yet
    ///
    /// Returns the number of rows updated, 0 when the contract was already signed.
    pub async fn mark_signed(
        &self,
        contract_id: i32,
        document: String,
        signed_at: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Contract::update_many()
            .set(entity::contract::ActiveModel {
                document: ActiveValue::Set(document),
                signed_at: ActiveValue::Set(Some(signed_at)),
                ..Default::default()
            })
            .filter(Column::Id.eq(contract_id))
            .filter(Column::SignedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Contract::find().count(self.db).await
    }

    pub async fn count_for_company(&self, company_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Contract::find()
            .filter(Column::CompanyId.eq(company_id))
            .count(self.db)
            .await
    }

    pub async fn count_for_provider(&self, provider_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Contract::find()
            .filter(Column::ProviderId.eq(provider_id))
            .count(self.db)
            .await
    }

    /// Number of contracts per company
    pub async fn count_by_company(&self) -> Result<HashMap<i32, u64>, DbErr> {
        let rows = entity::prelude::Contract::find()
            .select_only()
            .column(Column::CompanyId)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::CompanyId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(count_map(rows))
    }

    /// Number of contracts per provider
    pub async fn count_by_provider(&self) -> Result<HashMap<i32, u64>, DbErr> {
        let rows = entity::prelude::Contract::find()
            .select_only()
            .column(Column::ProviderId)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::ProviderId)
            .into_tuple::<(i32, i64)>()
            .all(self.db)
            .await?;

        Ok(count_map(rows))
    }
}

#[cfg(test)]
mod tests {
    mod mark_signed {
        use wasl_test_utils::prelude::*;

        use crate::server::{data::contract::ContractRepository, util::time};

        /// Expect the first signature to apply and a second to be refused
        #[tokio::test]
        async fn signs_only_once() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let repo = ContractRepository::new(&test.db);

            let first = repo
                .mark_signed(chain.contract.id, "contracts/signed-a.pdf".to_string(), time::now())
                .await?;
            let second = repo
                .mark_signed(chain.contract.id, "contracts/signed-b.pdf".to_string(), time::now())
                .await?;

            assert_eq!(first, 1);
            assert_eq!(second, 0);
            let stored = repo.find_by_id(chain.contract.id).await?.unwrap();
            assert_eq!(stored.document, "contracts/signed-a.pdf");
            assert!(stored.signed_at.is_some());

            Ok(())
        }
    }

    mod list_by_provider {
        use wasl_test_utils::prelude::*;

        use crate::server::data::contract::ContractRepository;

        /// Expect the signed filter to follow sign date presence
        #[tokio::test]
        async fn filters_by_signature() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let repo = ContractRepository::new(&test.db);

            let all = repo.list_by_provider(chain.provider.id, None).await?;
            let signed = repo.list_by_provider(chain.provider.id, Some(true)).await?;
            let pending = repo.list_by_provider(chain.provider.id, Some(false)).await?;

            assert_eq!(all.len(), 1);
            assert!(signed.is_empty());
            assert_eq!(pending.len(), 1);

            Ok(())
        }
    }

    mod list_signed_between {
        use chrono::Duration;
        use wasl_test_utils::prelude::*;

        use crate::server::data::contract::ContractRepository;

        /// Expect the range end to be exclusive
        #[tokio::test]
        async fn excludes_range_end() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let signed_at = chain.contract.signed_at.unwrap();
            let repo = ContractRepository::new(&test.db);

            let inside = repo
                .list_signed_between(signed_at, signed_at + Duration::seconds(1), None)
                .await?;
            let before = repo
                .list_signed_between(signed_at - Duration::days(1), signed_at, None)
                .await?;

            assert_eq!(inside.len(), 1);
            assert!(before.is_empty());

            Ok(())
        }
    }
}
