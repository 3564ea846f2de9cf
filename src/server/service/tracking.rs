//! Shipment tracking as an append-only chain of status snapshots per contract.

use std::collections::HashMap;

use entity::status::{ShipmentRequestStatus, TrackingStatus};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        contract::ContractDto,
        shipment::ShipmentRequestDto,
        tracking::{
            ContractTrackingDto, ShipmentSnapshotDto, TrackingDetailsDto, TrackingListItemDto,
            TrackingLookupDto, TrackingLookupQuery,
        },
    },
    server::{
        data::{
            contract::ContractRepository, feedback::FeedbackRepository,
            provider::ProviderRepository, shipment::ShipmentRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            validation::ValidationError,
            Error,
        },
        model::db::{ContractModel, ShipmentModel},
        util::time,
    },
};

/// `TRK-{yyyymmdd}-{contract}`
pub fn tracking_number(at: chrono::NaiveDateTime, contract_id: i32) -> String {
    format!("TRK-{}-{}", time::date_stamp(at), contract_id)
}

pub struct ProviderTrackingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProviderTrackingService<'a> {
    /// Creates a new instance of [`ProviderTrackingService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Starts tracking a signed contract with a Received snapshot
    ///
    /// # Returns
    /// - `Ok(ShipmentSnapshotDto)` - The first snapshot
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - Contract not the provider's
    /// - `Err(Error::MarketplaceError(MarketplaceError::InvalidState))` - Contract not signed
    /// - `Err(Error::MarketplaceError(MarketplaceError::Duplicate))` - Tracking already started
    pub async fn start(
        &self,
        provider_id: i32,
        contract_id: i32,
    ) -> Result<ShipmentSnapshotDto, Error> {
        let txn = self.db.begin().await?;
        let shipment_repo = ShipmentRepository::new(&txn);

        let contract = ContractRepository::new(&txn)
            .find_for_provider(contract_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id))?;
        if contract.signed_at.is_none() {
            return Err(MarketplaceError::invalid_state(
                "The contract must be signed before tracking starts",
            )
            .into());
        }
        if shipment_repo.exists_for_contract(contract.id).await? {
            return Err(MarketplaceError::Duplicate(
                "Tracking has already started for this contract".to_string(),
            )
            .into());
        }

        let now = time::now();
        let snapshot = shipment_repo
            .create(
                contract.id,
                tracking_number(now, contract.id),
                TrackingStatus::Received,
                now,
            )
            .await?;

        txn.commit().await?;

        tracing::info!(
            provider_id,
            contract_id,
            tracking_number = %snapshot.tracking_number,
            "Started shipment tracking"
        );

        Ok(ShipmentSnapshotDto::from(snapshot))
    }

    /// Appends a snapshot with a later status to the chain
    ///
    /// Existing snapshots are never modified. Reaching Delivered also marks the shipment
    /// request Delivered.
    pub async fn update_status(
        &self,
        provider_id: i32,
        shipment_id: i32,
        status: TrackingStatus,
    ) -> Result<ShipmentSnapshotDto, Error> {
        let txn = self.db.begin().await?;
        let shipment_repo = ShipmentRepository::new(&txn);

        let snapshot = shipment_repo
            .find_by_id(shipment_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Shipment, shipment_id))?;
        let contract = ContractRepository::new(&txn)
            .find_for_provider(snapshot.contract_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Shipment, shipment_id))?;
        let latest = shipment_repo
            .latest_by_tracking_number(&snapshot.tracking_number)
            .await?
            .unwrap_or(snapshot);

        if latest.status == TrackingStatus::Delivered {
            return Err(
                MarketplaceError::invalid_state("This shipment has already been delivered").into(),
            );
        }
        if status <= latest.status {
            return Err(MarketplaceError::invalid_state(format!(
                "Tracking status cannot move from {:?} to {:?}",
                latest.status, status
            ))
            .into());
        }

        let appended = shipment_repo
            .create(contract.id, latest.tracking_number, status, time::now())
            .await?;
        if status == TrackingStatus::Delivered {
            ShipmentRequestRepository::new(&txn)
                .set_status(contract.shipment_request_id, ShipmentRequestStatus::Delivered)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(
            provider_id,
            contract_id = contract.id,
            status = ?status,
            "Updated shipment status"
        );

        Ok(ShipmentSnapshotDto::from(appended))
    }

    pub async fn show(
        &self,
        provider_id: i32,
        shipment_id: i32,
    ) -> Result<TrackingDetailsDto, Error> {
        let shipment_repo = ShipmentRepository::new(self.db);

        let snapshot = shipment_repo
            .find_by_id(shipment_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Shipment, shipment_id))?;
        let contract = ContractRepository::new(self.db)
            .find_for_provider(snapshot.contract_id, provider_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Shipment, shipment_id))?;
        let history = shipment_repo.history(&snapshot.tracking_number).await?;
        let request = ShipmentRequestRepository::new(self.db)
            .find_by_id(contract.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                contract.shipment_request_id,
            ))?;

        Ok(TrackingDetailsDto {
            snapshot: ShipmentSnapshotDto::from(snapshot),
            history: history.into_iter().map(ShipmentSnapshotDto::from).collect(),
            shipment: ShipmentRequestDto::from(request),
        })
    }

    /// Every snapshot across the provider's contracts, newest first
    pub async fn list(
        &self,
        provider_id: i32,
        status: Option<TrackingStatus>,
    ) -> Result<Vec<TrackingListItemDto>, Error> {
        let contracts = ContractRepository::new(self.db)
            .list_by_provider(provider_id, None)
            .await?;
        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let request_ids: Vec<i32> = contracts
            .iter()
            .map(|contract| contract.shipment_request_id)
            .collect();
        let request_by_contract: HashMap<i32, i32> = contracts
            .iter()
            .map(|contract| (contract.id, contract.shipment_request_id))
            .collect();

        let snapshots = ShipmentRepository::new(self.db)
            .list_by_contracts(&contract_ids, status)
            .await?;
        let requests = ShipmentRequestRepository::new(self.db)
            .find_by_ids(&request_ids)
            .await?;

        Ok(snapshots
            .into_iter()
            .filter_map(|snapshot| {
                let request = request_by_contract
                    .get(&snapshot.contract_id)
                    .and_then(|request_id| requests.get(request_id))?;

                Some(TrackingListItemDto {
                    shipment: ShipmentRequestDto::from(request.clone()),
                    snapshot: ShipmentSnapshotDto::from(snapshot),
                })
            })
            .collect())
    }
}

pub struct CompanyTrackingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyTrackingService<'a> {
    /// Creates a new instance of [`CompanyTrackingService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The company's contracts with their latest tracking snapshot
    pub async fn contracts(&self, company_id: i32) -> Result<Vec<ContractTrackingDto>, Error> {
        let contracts = ContractRepository::new(self.db)
            .list_by_company(company_id)
            .await?;
        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let request_ids: Vec<i32> = contracts
            .iter()
            .map(|contract| contract.shipment_request_id)
            .collect();
        let provider_ids: Vec<i32> = contracts
            .iter()
            .map(|contract| contract.provider_id)
            .collect();

        let mut latest = ShipmentRepository::new(self.db)
            .latest_by_contracts(&contract_ids)
            .await?;
        let requests = ShipmentRequestRepository::new(self.db)
            .find_by_ids(&request_ids)
            .await?;
        let provider_names: HashMap<i32, String> = ProviderRepository::new(self.db)
            .find_by_ids(&provider_ids)
            .await?
            .into_iter()
            .map(|provider| (provider.id, provider.name))
            .collect();

        let mut items = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let Some(request) = requests.get(&contract.shipment_request_id) else {
                continue;
            };

            items.push(ContractTrackingDto {
                shipment: ShipmentRequestDto::from(request.clone()),
                provider_name: provider_names
                    .get(&contract.provider_id)
                    .cloned()
                    .unwrap_or_default(),
                latest_snapshot: latest.remove(&contract.id).map(ShipmentSnapshotDto::from),
                contract: ContractDto::from(contract),
            });
        }

        Ok(items)
    }

    /// Looks a shipment up by contract id or tracking number
    ///
    /// The contract id wins when both are given.
    ///
    /// # Returns
    /// - `Ok(TrackingLookupDto)` - The contract with its tracking history and feedback flags
    /// - `Err(Error::ValidationError)` - Neither a contract id nor a tracking number given
    /// - `Err(Error::MarketplaceError(MarketplaceError::NotFound))` - No such shipment for the company
    pub async fn lookup(
        &self,
        company_id: i32,
        query: TrackingLookupQuery,
    ) -> Result<TrackingLookupDto, Error> {
        let contract = self.find_contract(company_id, &query).await?;
        let shipment_repo = ShipmentRepository::new(self.db);

        let latest = shipment_repo.latest_for_contract(contract.id).await?;
        let history = match &latest {
            Some(snapshot) => shipment_repo.history(&snapshot.tracking_number).await?,
            None => Vec::new(),
        };

        let snapshot_ids: Vec<i32> = history.iter().map(|snapshot| snapshot.id).collect();
        let has_provided_feedback = FeedbackRepository::new(self.db)
            .exists_for(&snapshot_ids, company_id)
            .await?;
        let can_provide_feedback = is_delivered(latest.as_ref());

        let request = ShipmentRequestRepository::new(self.db)
            .find_by_id(contract.shipment_request_id)
            .await?
            .ok_or(MarketplaceError::not_found(
                Resource::ShipmentRequest,
                contract.shipment_request_id,
            ))?;
        let provider_name = ProviderRepository::new(self.db)
            .find_by_id(contract.provider_id)
            .await?
            .map(|provider| provider.name)
            .unwrap_or_default();

        Ok(TrackingLookupDto {
            contract: ContractDto::from(contract),
            shipment: ShipmentRequestDto::from(request),
            provider_name,
            history: history.into_iter().map(ShipmentSnapshotDto::from).collect(),
            latest_snapshot: latest.map(ShipmentSnapshotDto::from),
            can_provide_feedback,
            has_provided_feedback,
        })
    }

    async fn find_contract(
        &self,
        company_id: i32,
        query: &TrackingLookupQuery,
    ) -> Result<ContractModel, Error> {
        let contract_repo = ContractRepository::new(self.db);
        let tracking_number = query
            .tracking_number
            .as_deref()
            .map(str::trim)
            .filter(|tn| !tn.is_empty());

        let contract_id = match (query.contract_id, tracking_number) {
            (Some(contract_id), _) => contract_id,
            (None, Some(tracking_number)) => ShipmentRepository::new(self.db)
                .latest_by_tracking_number(tracking_number)
                .await?
                .map(|snapshot| snapshot.contract_id)
                .ok_or(MarketplaceError::not_found(Resource::Shipment, 0))?,
            (None, None) => {
                return Err(ValidationError::field(
                    "tracking_number",
                    "Enter a contract ID or a tracking number",
                )
                .into())
            }
        };

        contract_repo
            .find_for_company(contract_id, company_id)
            .await?
            .ok_or(MarketplaceError::not_found(Resource::Contract, contract_id).into())
    }
}

/// Whether the latest snapshot of a chain is Delivered
pub(crate) fn is_delivered(latest: Option<&ShipmentModel>) -> bool {
    latest.is_some_and(|snapshot| snapshot.status == TrackingStatus::Delivered)
}

#[cfg(test)]
mod tests {
    mod start {
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::tracking::ProviderTrackingService,
        };

        /// Expect a Received snapshot with a contract based tracking number
        #[tokio::test]
        async fn starts_tracking_signed_contract() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let service = ProviderTrackingService::new(&test.db);

            let snapshot = service
                .start(chain.provider.id, chain.contract.id)
                .await
                .unwrap();

            assert_eq!(snapshot.status, TrackingStatus::Received);
            assert!(snapshot.tracking_number.starts_with("TRK-"));
            assert!(snapshot
                .tracking_number
                .ends_with(&format!("-{}", chain.contract.id)));

            Ok(())
        }

        /// Expect a second chain for the same contract to be refused
        #[tokio::test]
        async fn refuses_second_chain() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let service = ProviderTrackingService::new(&test.db);

            service
                .start(chain.provider.id, chain.contract.id)
                .await
                .unwrap();
            let result = service.start(chain.provider.id, chain.contract.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::Duplicate(_)))
            ));

            Ok(())
        }

        /// Expect an unsigned contract to be refused
        #[tokio::test]
        async fn refuses_unsigned_contract() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderTrackingService::new(&test.db);

            let result = service.start(chain.provider.id, chain.contract.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }
    }

    mod update_status {
        use entity::status::{ShipmentRequestStatus, TrackingStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            data::{shipment::ShipmentRepository, shipment_request::ShipmentRequestRepository},
            error::{marketplace::MarketplaceError, Error},
            service::tracking::ProviderTrackingService,
        };

        /// Expect each update to append a snapshot and delivery to close the request
        #[tokio::test]
        async fn appends_snapshots_through_delivery() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let service = ProviderTrackingService::new(&test.db);

            let received = service
                .start(chain.provider.id, chain.contract.id)
                .await
                .unwrap();
            let in_transit = service
                .update_status(chain.provider.id, received.id, TrackingStatus::InTransit)
                .await
                .unwrap();
            let delivered = service
                .update_status(chain.provider.id, in_transit.id, TrackingStatus::Delivered)
                .await
                .unwrap();

            assert!(delivered.delivered_at.is_some());
            let history = ShipmentRepository::new(&test.db)
                .history(&received.tracking_number)
                .await?;
            let statuses: Vec<_> = history.iter().map(|s| s.status).collect();
            assert_eq!(
                statuses,
                vec![
                    TrackingStatus::Received,
                    TrackingStatus::InTransit,
                    TrackingStatus::Delivered
                ]
            );
            let request = ShipmentRequestRepository::new(&test.db)
                .find_by_id(chain.shipment_request.id)
                .await?
                .unwrap();
            assert_eq!(request.status, ShipmentRequestStatus::Delivered);

            Ok(())
        }

        /// Expect a backwards move to be refused
        #[tokio::test]
        async fn refuses_backwards_move() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let service = ProviderTrackingService::new(&test.db);

            let received = service
                .start(chain.provider.id, chain.contract.id)
                .await
                .unwrap();
            service
                .update_status(chain.provider.id, received.id, TrackingStatus::InTransit)
                .await
                .unwrap();
            let result = service
                .update_status(chain.provider.id, received.id, TrackingStatus::Received)
                .await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }

        /// Expect nothing to be accepted after delivery
        #[tokio::test]
        async fn refuses_after_delivery() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let delivered = test
                .marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::Delivered)
                .await?;
            let service = ProviderTrackingService::new(&test.db);

            let result = service
                .update_status(chain.provider.id, delivered.id, TrackingStatus::Delivered)
                .await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::InvalidState(_)))
            ));

            Ok(())
        }
    }

    mod lookup {
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::{
            model::tracking::TrackingLookupQuery,
            server::{
                error::Error,
                service::tracking::{CompanyTrackingService, ProviderTrackingService},
            },
        };

        /// Expect a lookup by tracking number to return the history and feedback flags
        #[tokio::test]
        async fn finds_by_tracking_number() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let provider = ProviderTrackingService::new(&test.db);
            let received = provider
                .start(chain.provider.id, chain.contract.id)
                .await
                .unwrap();
            provider
                .update_status(chain.provider.id, received.id, TrackingStatus::Delivered)
                .await
                .unwrap();
            let service = CompanyTrackingService::new(&test.db);

            let lookup = service
                .lookup(
                    chain.company.id,
                    TrackingLookupQuery {
                        contract_id: None,
                        tracking_number: Some(received.tracking_number.clone()),
                    },
                )
                .await
                .unwrap();

            assert_eq!(lookup.contract.id, chain.contract.id);
            assert_eq!(lookup.history.len(), 2);
            assert!(lookup.can_provide_feedback);
            assert!(!lookup.has_provided_feedback);

            Ok(())
        }

        /// Expect a lookup without a contract id or tracking number to be rejected
        #[tokio::test]
        async fn requires_a_key() -> Result<(), TestError> {
            let test = test_setup_with_marketplace_tables!()?;
            let service = CompanyTrackingService::new(&test.db);

            let result = service.lookup(1, TrackingLookupQuery::default()).await;

            assert!(matches!(result, Err(Error::ValidationError(_))));

            Ok(())
        }
    }

    mod contracts {
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::server::service::tracking::CompanyTrackingService;

        /// Expect each contract to carry its latest snapshot
        #[tokio::test]
        async fn carries_latest_snapshot() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            test.marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::InTransit)
                .await?;
            let service = CompanyTrackingService::new(&test.db);

            let contracts = service.contracts(chain.company.id).await.unwrap();

            assert_eq!(contracts.len(), 1);
            assert_eq!(
                contracts[0].latest_snapshot.as_ref().map(|s| s.status),
                Some(TrackingStatus::InTransit)
            );
            assert_eq!(contracts[0].provider_name, chain.provider.name);

            Ok(())
        }
    }
}
