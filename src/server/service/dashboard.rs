//! Counters and recent activity for the three dashboards.

use chrono::Datelike;
use entity::status::{BidStatus, ShipmentRequestStatus, UserRole};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        contract::ContractDto,
        dashboard::{
            ActivityDto, AdminDashboardDto, CompanyDashboardDto, MonthlyAmountDto,
            ProviderDashboardDto,
        },
        profile::ProviderDto,
        shipment::ShipmentRequestDto,
    },
    server::{
        data::{
            bid::BidRepository, company::CompanyRepository, contract::ContractRepository,
            feedback::FeedbackRepository, provider::ProviderRepository,
            revenue_report::RevenueReportRepository,
            shipment_request::ShipmentRequestRepository, user::UserRepository,
        },
        error::Error,
        util::time::{self, MONTH_LABELS},
    },
};

/// Items shown in each recent list
pub const RECENT_LIMIT: u64 = 5;
/// Requests and contracts each contributing to the company's activity feed
const ACTIVITY_SOURCE_LIMIT: usize = 3;

pub struct DashboardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DashboardService<'a> {
    /// Creates a new instance of [`DashboardService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn company(&self, company_id: i32) -> Result<CompanyDashboardDto, Error> {
        let request_repo = ShipmentRequestRepository::new(self.db);

        let active_shipments = request_repo
            .count_for_company(company_id, ShipmentRequestStatus::InProgress)
            .await?;
        let pending_shipments = request_repo
            .count_for_company(company_id, ShipmentRequestStatus::Pending)
            .await?;
        let completed_shipments = request_repo
            .count_for_company(company_id, ShipmentRequestStatus::Delivered)
            .await?;
        let pending_bids = BidRepository::new(self.db)
            .count_for_company(company_id, BidStatus::Submitted)
            .await?;

        let contracts = ContractRepository::new(self.db)
            .list_by_company(company_id)
            .await?;
        let bid_ids: Vec<i32> = contracts.iter().map(|contract| contract.bid_id).collect();
        let bids = BidRepository::new(self.db).find_by_ids(&bid_ids).await?;
        let price_of = |bid_id: i32| bids.get(&bid_id).map(|bid| bid.price).unwrap_or_default();

        let total_spent: Decimal = contracts.iter().map(|contract| price_of(contract.bid_id)).sum();

        let year = time::now().year();
        let mut monthly = [Decimal::ZERO; 12];
        for contract in &contracts {
            if let Some(signed_at) = contract.signed_at.filter(|at| at.year() == year) {
                monthly[signed_at.month0() as usize] += price_of(contract.bid_id);
            }
        }
        let monthly_spending = MONTH_LABELS
            .iter()
            .zip(monthly)
            .map(|(label, amount)| MonthlyAmountDto {
                label: label.to_string(),
                amount,
            })
            .collect();

        let mut recent_activities: Vec<ActivityDto> = request_repo
            .list_recent_for_company(company_id, ACTIVITY_SOURCE_LIMIT as u64)
            .await?
            .into_iter()
            .map(|request| ActivityDto {
                title: "Shipment request posted".to_string(),
                description: format!(
                    "{} from {} to {}",
                    request.goods_type, request.pickup_city, request.delivery_city
                ),
                at: request.requested_at,
            })
            .chain(contracts.iter().take(ACTIVITY_SOURCE_LIMIT).map(|contract| {
                ActivityDto {
                    title: "Contract created".to_string(),
                    description: format!("Contract #{}", contract.id),
                    at: contract.created_at,
                }
            }))
            .collect();
        recent_activities.sort_by(|a, b| b.at.cmp(&a.at));
        recent_activities.truncate(RECENT_LIMIT as usize);

        Ok(CompanyDashboardDto {
            active_shipments,
            pending_shipments,
            completed_shipments,
            contracts: contracts.len() as u64,
            pending_bids,
            total_spent,
            monthly_spending,
            recent_activities,
        })
    }

    pub async fn provider(&self, provider_id: i32) -> Result<ProviderDashboardDto, Error> {
        let bid_repo = BidRepository::new(self.db);

        let total_bids = bid_repo.count_by_provider(provider_id, None).await?;
        let active_bids = bid_repo
            .count_by_provider(provider_id, Some(BidStatus::Submitted))
            .await?;
        let direct_requests = bid_repo
            .count_by_provider(provider_id, Some(BidStatus::UnderReview))
            .await?;
        let won_contracts = ContractRepository::new(self.db)
            .count_for_provider(provider_id)
            .await?;
        let stats = FeedbackRepository::new(self.db)
            .rating_stats(Some(&[provider_id][..]))
            .await?
            .remove(&provider_id)
            .unwrap_or_default();

        Ok(ProviderDashboardDto {
            total_bids,
            active_bids,
            won_contracts,
            direct_requests,
            average_rating: stats.average(),
            review_count: stats.count,
        })
    }

    pub async fn admin(&self) -> Result<AdminDashboardDto, Error> {
        let user_repo = UserRepository::new(self.db);
        let provider_repo = ProviderRepository::new(self.db);
        let request_repo = ShipmentRequestRepository::new(self.db);
        let contract_repo = ContractRepository::new(self.db);

        Ok(AdminDashboardDto {
            company_users: user_repo.count_by_role(UserRole::Company).await?,
            provider_users: user_repo.count_by_role(UserRole::Provider).await?,
            companies: CompanyRepository::new(self.db).count_all().await?,
            approved_providers: provider_repo.count_by_approval(true).await?,
            pending_providers: provider_repo.count_by_approval(false).await?,
            shipment_requests: request_repo.count_all().await?,
            active_shipment_requests: request_repo.count_active().await?,
            contracts: contract_repo.count_all().await?,
            feedback: FeedbackRepository::new(self.db).count_all().await?,
            total_revenue: RevenueReportRepository::new(self.db).total_revenue().await?,
            recent_requests: request_repo
                .list_recent(Some(RECENT_LIMIT))
                .await?
                .into_iter()
                .map(ShipmentRequestDto::from)
                .collect(),
            recent_contracts: contract_repo
                .list_recent(Some(RECENT_LIMIT))
                .await?
                .into_iter()
                .map(ContractDto::from)
                .collect(),
            pending_provider_list: provider_repo
                .list_pending(RECENT_LIMIT)
                .await?
                .into_iter()
                .map(ProviderDto::from)
                .collect(),
        })
    }
}
