use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use entity::status::TrackingStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::db::ShipmentModel;

use entity::shipment::Column;

pub struct ShipmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ShipmentRepository<'a, C> {
    /// Creates a new instance of [`ShipmentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Append a tracking snapshot
    ///
    /// Snapshots are never updated, each status change is a new row sharing the tracking number.
    pub async fn create(
        &self,
        contract_id: i32,
        tracking_number: String,
        status: TrackingStatus,
        started_at: NaiveDateTime,
    ) -> Result<ShipmentModel, DbErr> {
        let delivered_at = (status == TrackingStatus::Delivered).then_some(started_at);
        let shipment = entity::shipment::ActiveModel {
            contract_id: ActiveValue::Set(contract_id),
            tracking_number: ActiveValue::Set(tracking_number),
            status: ActiveValue::Set(status),
            started_at: ActiveValue::Set(started_at),
            delivered_at: ActiveValue::Set(delivered_at),
            ..Default::default()
        };

        shipment.insert(self.db).await
    }

    pub async fn find_by_id(&self, shipment_id: i32) -> Result<Option<ShipmentModel>, DbErr> {
        entity::prelude::Shipment::find_by_id(shipment_id)
            .one(self.db)
            .await
    }

    /// Every snapshot sharing a tracking number, oldest first
    pub async fn history(&self, tracking_number: &str) -> Result<Vec<ShipmentModel>, DbErr> {
        entity::prelude::Shipment::find()
            .filter(Column::TrackingNumber.eq(tracking_number))
            .order_by_asc(Column::StartedAt)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    pub async fn latest_for_contract(
        &self,
        contract_id: i32,
    ) -> Result<Option<ShipmentModel>, DbErr> {
        entity::prelude::Shipment::find()
            .filter(Column::ContractId.eq(contract_id))
            .order_by_desc(Column::StartedAt)
            .order_by_desc(Column::Id)
            .one(self.db)
            .await
    }

    pub async fn latest_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<ShipmentModel>, DbErr> {
        entity::prelude::Shipment::find()
            .filter(Column::TrackingNumber.eq(tracking_number))
            .order_by_desc(Column::StartedAt)
            .order_by_desc(Column::Id)
            .one(self.db)
            .await
    }

    /// The latest snapshot of each contract that has started tracking
    pub async fn latest_by_contracts(
        &self,
        contract_ids: &[i32],
    ) -> Result<HashMap<i32, ShipmentModel>, DbErr> {
        let snapshots = self.list_by_contracts(contract_ids, None).await?;

        let mut latest = HashMap::new();
        for snapshot in snapshots {
            latest.entry(snapshot.contract_id).or_insert(snapshot);
        }

        Ok(latest)
    }

    pub async fn exists_for_contract(&self, contract_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Shipment::find()
            .filter(Column::ContractId.eq(contract_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Snapshots of the given contracts, newest first
    pub async fn list_by_contracts(
        &self,
        contract_ids: &[i32],
        status: Option<TrackingStatus>,
    ) -> Result<Vec<ShipmentModel>, DbErr> {
        if contract_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = entity::prelude::Shipment::find()
            .filter(Column::ContractId.is_in(contract_ids.to_vec()))
            .order_by_desc(Column::StartedAt)
            .order_by_desc(Column::Id);

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        query.all(self.db).await
    }

    /// Contracts among `contract_ids` with a Delivered snapshot
    pub async fn delivered_contract_ids(
        &self,
        contract_ids: &[i32],
    ) -> Result<HashSet<i32>, DbErr> {
        if contract_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids = entity::prelude::Shipment::find()
            .select_only()
            .column(Column::ContractId)
            .filter(Column::ContractId.is_in(contract_ids.to_vec()))
            .filter(Column::Status.eq(TrackingStatus::Delivered))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    mod history {
        use chrono::Duration;
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::{data::shipment::ShipmentRepository, util::time};

        /// Expect appended snapshots to share the chain and come back oldest first
        #[tokio::test]
        async fn orders_oldest_first() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let repo = ShipmentRepository::new(&test.db);
            let start = time::now();

            repo.create(
                chain.contract.id,
                "TRK-1".to_string(),
                TrackingStatus::Received,
                start,
            )
            .await?;
            let delivered = repo
                .create(
                    chain.contract.id,
                    "TRK-1".to_string(),
                    TrackingStatus::Delivered,
                    start + Duration::hours(5),
                )
                .await?;

            let history = repo.history("TRK-1").await?;
            let latest = repo.latest_for_contract(chain.contract.id).await?.unwrap();

            assert_eq!(history.len(), 2);
            assert_eq!(history[0].status, TrackingStatus::Received);
            assert!(history[0].delivered_at.is_none());
            assert_eq!(latest.id, delivered.id);
            assert_eq!(latest.delivered_at, Some(start + Duration::hours(5)));

            Ok(())
        }
    }

    mod delivered_contract_ids {
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::data::shipment::ShipmentRepository;

        /// Expect only contracts with a Delivered snapshot
        #[tokio::test]
        async fn finds_delivered_contracts() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            test.marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::InTransit)
                .await?;
            let repo = ShipmentRepository::new(&test.db);

            assert!(repo
                .delivered_contract_ids(&[chain.contract.id])
                .await?
                .is_empty());

            test.marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::Delivered)
                .await?;
            let repo = ShipmentRepository::new(&test.db);

            assert!(repo
                .delivered_contract_ids(&[chain.contract.id])
                .await?
                .contains(&chain.contract.id));

            Ok(())
        }
    }
}
