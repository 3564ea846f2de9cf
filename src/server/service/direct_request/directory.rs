//! Directory of approved providers a company can send direct requests to.

use std::cmp::Ordering;

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        contract::ContractDto,
        direct_request::{
            ProviderDetailsDto, ProviderDirectoryQuery, ProviderListItemDto, ProviderPageDto,
        },
        profile::ProviderDto,
        shipment::ShipmentRequestDto,
    },
    server::{
        data::{
            contract::ContractRepository, feedback::FeedbackRepository, page_index,
            provider::ProviderRepository, shipment::ShipmentRepository,
            shipment_request::ShipmentRequestRepository,
        },
        error::{
            marketplace::{MarketplaceError, Resource},
            Error,
        },
    },
};

pub const DIRECTORY_PAGE_SIZE: u64 = 12;
pub const COMPLETED_CONTRACTS_SHOWN: usize = 5;

/// Ordering of the provider directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirectorySort {
    #[default]
    Name,
    /// Highest average rating first, unrated providers last
    Rating,
    /// Most contracts first
    Projects,
}

impl DirectorySort {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("rating") => Self::Rating,
            Some("projects") => Self::Projects,
            _ => Self::Name,
        }
    }
}

pub struct ProviderDirectoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProviderDirectoryService<'a> {
    /// Creates a new instance of [`ProviderDirectoryService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists approved providers with their rating and contract counts.
    ///
    /// A `rating` of N keeps providers whose average falls in [N, N + 1). Filtering by
    /// rating and sorting happen after the aggregates are joined, so paging is applied
    /// last.
    pub async fn providers(&self, query: ProviderDirectoryQuery) -> Result<ProviderPageDto, Error> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let region = query
            .region
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let providers = ProviderRepository::new(self.db)
            .list_approved(search, region)
            .await?;
        let ids: Vec<i32> = providers.iter().map(|provider| provider.id).collect();
        let ratings = FeedbackRepository::new(self.db)
            .rating_stats(Some(&ids))
            .await?;
        let contracts = ContractRepository::new(self.db).count_by_provider().await?;

        let mut items: Vec<ProviderListItemDto> = providers
            .into_iter()
            .map(|provider| {
                let stats = ratings.get(&provider.id).copied().unwrap_or_default();
                ProviderListItemDto {
                    average_rating: stats.average(),
                    feedback_count: stats.count,
                    contract_count: contracts.get(&provider.id).copied().unwrap_or(0),
                    provider: ProviderDto::from(provider),
                }
            })
            .filter(|item| match query.rating {
                Some(n) => item
                    .average_rating
                    .is_some_and(|avg| avg >= f64::from(n) && avg < f64::from(n + 1)),
                None => true,
            })
            .collect();

        match DirectorySort::parse(query.sort.as_deref()) {
            DirectorySort::Name => {}
            DirectorySort::Rating => items.sort_by(|a, b| compare_ratings(b, a)),
            DirectorySort::Projects => {
                items.sort_by(|a, b| b.contract_count.cmp(&a.contract_count))
            }
        }

        let total_items = items.len() as u64;
        let total_pages = total_items.div_ceil(DIRECTORY_PAGE_SIZE);
        let index = page_index(query.page.unwrap_or(1), total_pages);
        let items = items
            .into_iter()
            .skip((index * DIRECTORY_PAGE_SIZE) as usize)
            .take(DIRECTORY_PAGE_SIZE as usize)
            .collect();

        Ok(ProviderPageDto {
            items,
            page: index + 1,
            total_pages,
            total_items,
        })
    }

    /// An approved provider with delivered work and the company's requests it could receive
    pub async fn provider_details(
        &self,
        company_id: i32,
        provider_id: i32,
    ) -> Result<ProviderDetailsDto, Error> {
        let provider = ProviderRepository::new(self.db)
            .find_by_id(provider_id)
            .await?
            .filter(|provider| provider.is_approved)
            .ok_or(MarketplaceError::not_found(Resource::Provider, provider_id))?;

        let stats = FeedbackRepository::new(self.db)
            .rating_stats(Some(&[provider.id][..]))
            .await?
            .remove(&provider.id)
            .unwrap_or_default();

        let contracts = ContractRepository::new(self.db)
            .list_by_provider(provider.id, None)
            .await?;
        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let delivered = ShipmentRepository::new(self.db)
            .delivered_contract_ids(&contract_ids)
            .await?;
        let completed_contracts = contracts
            .into_iter()
            .filter(|contract| delivered.contains(&contract.id))
            .take(COMPLETED_CONTRACTS_SHOWN)
            .map(ContractDto::from)
            .collect();

        let available_requests = ShipmentRequestRepository::new(self.db)
            .list_pending_for_company(company_id)
            .await?
            .into_iter()
            .map(ShipmentRequestDto::from)
            .collect();

        Ok(ProviderDetailsDto {
            provider: ProviderDto::from(provider),
            average_rating: stats.average(),
            feedback_count: stats.count,
            completed_contracts,
            available_requests,
        })
    }
}

fn compare_ratings(a: &ProviderListItemDto, b: &ProviderListItemDto) -> Ordering {
    match (a.average_rating, b.average_rating) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::DirectorySort;

    #[test]
    fn parses_sort() {
        assert_eq!(DirectorySort::parse(Some("rating")), DirectorySort::Rating);
        assert_eq!(DirectorySort::parse(Some("projects")), DirectorySort::Projects);
        assert_eq!(DirectorySort::parse(Some("unknown")), DirectorySort::Name);
        assert_eq!(DirectorySort::parse(None), DirectorySort::Name);
    }

    mod providers {
        use entity::status::TrackingStatus;
        use wasl_test_utils::prelude::*;

        use crate::{
            model::direct_request::ProviderDirectoryQuery,
            server::service::direct_request::directory::ProviderDirectoryService,
        };

        /// Expect only approved providers, with their rating and contract counts
        #[tokio::test]
        async fn lists_approved_with_counts() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let shipment = test
                .marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::Delivered)
                .await?;
            test.marketplace()
                .insert_feedback(&shipment, chain.company.id, chain.provider.id, 4)
                .await?;
            test.user().insert_provider("idle@freight.sa", false).await?;
            let service = ProviderDirectoryService::new(&test.db);

            let page = service
                .providers(ProviderDirectoryQuery::default())
                .await
                .unwrap();

            assert_eq!(page.total_items, 1);
            assert_eq!(page.items[0].provider.id, chain.provider.id);
            assert_eq!(page.items[0].average_rating, Some(4.0));
            assert_eq!(page.items[0].feedback_count, 1);
            assert_eq!(page.items[0].contract_count, 1);

            Ok(())
        }

        /// Expect the rating filter to keep averages in [N, N + 1)
        #[tokio::test]
        async fn filters_by_rating_band() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            let shipment = test
                .marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::Delivered)
                .await?;
            test.marketplace()
                .insert_feedback(&shipment, chain.company.id, chain.provider.id, 4)
                .await?;
            let service = ProviderDirectoryService::new(&test.db);

            let fours = service
                .providers(ProviderDirectoryQuery {
                    rating: Some(4),
                    ..Default::default()
                })
                .await
                .unwrap();
            let fives = service
                .providers(ProviderDirectoryQuery {
                    rating: Some(5),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(fours.total_items, 1);
            assert_eq!(fives.total_items, 0);

            Ok(())
        }

        /// Expect the projects sort to put the busiest provider first
        #[tokio::test]
        async fn sorts_by_projects() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("aaa@freight.sa", true).await?;
            let chain = test.marketplace().insert_contract_chain(false).await?;
            let service = ProviderDirectoryService::new(&test.db);

            let by_projects = service
                .providers(ProviderDirectoryQuery {
                    sort: Some("projects".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert_eq!(by_projects.total_items, 2);
            assert_eq!(by_projects.items[0].provider.id, chain.provider.id);

            Ok(())
        }

        /// Expect an absurdly large page number to yield an empty page
        #[tokio::test]
        async fn huge_page_is_empty() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            test.user().insert_provider("p@freight.sa", true).await?;
            let service = ProviderDirectoryService::new(&test.db);

            let page = service
                .providers(ProviderDirectoryQuery {
                    page: Some(u64::MAX),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert!(page.items.is_empty());
            assert_eq!(page.total_items, 1);
            assert_eq!(page.page, 2);

            Ok(())
        }
    }

    mod provider_details {
        use entity::status::{ShipmentRequestStatus, TrackingStatus};
        use wasl_test_utils::prelude::*;

        use crate::server::{
            error::{marketplace::MarketplaceError, Error},
            service::direct_request::directory::ProviderDirectoryService,
        };

        /// Expect delivered work and the company's pending requests
        #[tokio::test]
        async fn includes_completed_work_and_candidates() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let chain = test.marketplace().insert_contract_chain(true).await?;
            test.marketplace()
                .insert_shipment(chain.contract.id, TrackingStatus::Delivered)
                .await?;
            let pending = test
                .marketplace()
                .insert_shipment_request(chain.company.id, ShipmentRequestStatus::Pending)
                .await?;
            let service = ProviderDirectoryService::new(&test.db);

            let details = service
                .provider_details(chain.company.id, chain.provider.id)
                .await
                .unwrap();

            assert_eq!(details.completed_contracts.len(), 1);
            assert_eq!(details.available_requests.len(), 1);
            assert_eq!(details.available_requests[0].id, pending.id);

            Ok(())
        }

        /// Expect an unapproved provider to be hidden
        #[tokio::test]
        async fn hides_unapproved_provider() -> Result<(), TestError> {
            let mut test = test_setup_with_marketplace_tables!()?;
            let (_, company) = test.user().insert_company("ops@acme.sa", true).await?;
            let (_, provider) = test.user().insert_provider("p@freight.sa", false).await?;
            let service = ProviderDirectoryService::new(&test.db);

            let result = service.provider_details(company.id, provider.id).await;

            assert!(matches!(
                result,
                Err(Error::MarketplaceError(MarketplaceError::NotFound { .. }))
            ));

            Ok(())
        }
    }
}
