//! Platform revenue reporting for administrators.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use entity::status::PaymentStatus;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{
    model::report::{
        MonthlyRevenueDto, PartyRevenueDto, PaymentBreakdownDto, RevenueQuery, RevenueReportDto,
        SavedRevenueReportDto,
    },
    server::{
        data::{
            bid::BidRepository, company::CompanyRepository, contract::ContractRepository,
            invoice::InvoiceRepository, payment::PaymentRepository, provider::ProviderRepository,
            revenue_report::RevenueReportRepository,
        },
        error::{validation::ValidationError, Error},
        util::time,
    },
};

/// Companies and providers listed in each ranking
pub const TOP_PARTIES: usize = 10;

pub struct ReportService<'a> {
    db: &'a DatabaseConnection,
    commission_percent: Decimal,
}

impl<'a> ReportService<'a> {
    /// Creates a new instance of [`ReportService`]
    ///
    /// # Arguments
    /// - `commission_percent` - Platform cut applied to revenue, between 0 and 100
    pub fn new(db: &'a DatabaseConnection, commission_percent: Decimal) -> Self {
        Self {
            db,
            commission_percent,
        }
    }

    /// Revenue generated by contracts signed within the requested range
    ///
    /// # Returns
    /// - `Ok(RevenueReportDto)` - Totals, payment breakdown, monthly buckets and rankings
    /// - `Err(Error::ValidationError)` - The range ends before it starts
    pub async fn revenue(&self, query: RevenueQuery) -> Result<RevenueReportDto, Error> {
        let (start, end) = resolve_range(&query, time::now().date())?;
        let (from, until) = time::inclusive_day_range(start, end)?;

        let contracts = ContractRepository::new(self.db)
            .list_signed_between(from, until, None)
            .await?;
        let bid_ids: Vec<i32> = contracts.iter().map(|contract| contract.bid_id).collect();
        let bids = BidRepository::new(self.db).find_by_ids(&bid_ids).await?;
        let price_of = |bid_id: i32| bids.get(&bid_id).map(|bid| bid.price).unwrap_or_default();

        let mut total_revenue = Decimal::ZERO;
        let mut by_month: HashMap<(i32, u32), Decimal> = HashMap::new();
        let mut by_company: HashMap<i32, (Decimal, u64)> = HashMap::new();
        let mut by_provider: HashMap<i32, (Decimal, u64)> = HashMap::new();
        for contract in &contracts {
            let price = price_of(contract.bid_id);
            total_revenue += price;

            if let Some(signed_at) = contract.signed_at {
                *by_month
                    .entry((signed_at.year(), signed_at.month()))
                    .or_default() += price;
            }

            let company = by_company.entry(contract.company_id).or_default();
            company.0 += price;
            company.1 += 1;

            let provider = by_provider.entry(contract.provider_id).or_default();
            provider.0 += price;
            provider.1 += 1;
        }

        let contract_ids: Vec<i32> = contracts.iter().map(|contract| contract.id).collect();
        let invoices = InvoiceRepository::new(self.db)
            .list_by_contracts(&contract_ids)
            .await?;
        let invoice_ids: Vec<i32> = invoices.iter().map(|invoice| invoice.id).collect();
        let latest_payments = PaymentRepository::new(self.db)
            .latest_by_invoices(&invoice_ids)
            .await?;

        // Invoices arrive newest first, so the first one seen per contract is current
        let mut contract_status: HashMap<i32, PaymentStatus> = HashMap::new();
        for invoice in &invoices {
            if contract_status.contains_key(&invoice.contract_id) {
                continue;
            }
            if let Some(payment) = latest_payments.get(&invoice.id) {
                contract_status.insert(invoice.contract_id, payment.status);
            }
        }

        let mut breakdown = PaymentBreakdownDto::default();
        for contract in &contracts {
            match contract_status.get(&contract.id) {
                Some(PaymentStatus::Successful) => breakdown.completed += 1,
                Some(PaymentStatus::Failed | PaymentStatus::Refunded) => breakdown.failed += 1,
                Some(PaymentStatus::Pending | PaymentStatus::Processing) | None => {
                    breakdown.pending += 1
                }
            }
        }

        let company_ids: Vec<i32> = by_company.keys().copied().collect();
        let companies: Vec<(i32, String)> = CompanyRepository::new(self.db)
            .find_by_ids(&company_ids)
            .await?
            .into_iter()
            .filter(|company| company.is_approved)
            .map(|company| (company.id, company.name))
            .collect();

        let provider_ids: Vec<i32> = by_provider.keys().copied().collect();
        let providers: Vec<(i32, String)> = ProviderRepository::new(self.db)
            .find_by_ids(&provider_ids)
            .await?
            .into_iter()
            .filter(|provider| provider.is_approved)
            .map(|provider| (provider.id, provider.name))
            .collect();

        Ok(RevenueReportDto {
            start,
            end,
            total_commission: commission(total_revenue, self.commission_percent),
            commission_percent: self.commission_percent,
            total_revenue,
            contract_count: contracts.len() as u64,
            payments: breakdown,
            monthly_revenue: monthly_buckets(start, end, &by_month, self.commission_percent),
            top_companies: rank(companies, &by_company),
            top_providers: rank(providers, &by_provider),
        })
    }

    /// Computes the report for the range and stores its totals
    pub async fn save_revenue(
        &self,
        admin_id: i32,
        query: RevenueQuery,
    ) -> Result<SavedRevenueReportDto, Error> {
        let report = self.revenue(query).await?;
        let period = format!("{} to {}", report.start, report.end);

        let saved = RevenueReportRepository::new(self.db)
            .create(
                admin_id,
                period,
                report.total_revenue,
                report.total_commission,
            )
            .await?;

        tracing::info!(
            admin_id,
            report_id = saved.id,
            total_revenue = %saved.total_revenue,
            "Saved revenue report"
        );

        Ok(SavedRevenueReportDto::from(saved))
    }

    /// Saved reports, newest first
    pub async fn list(&self) -> Result<Vec<SavedRevenueReportDto>, Error> {
        let reports = RevenueReportRepository::new(self.db).list().await?;

        Ok(reports.into_iter().map(SavedRevenueReportDto::from).collect())
    }
}

/// Inclusive `(start, end)` dates for a report query
///
/// Without any bound the month ending `today` is used. A lone start runs
/// through `today`, a lone end covers the month before it.
pub fn resolve_range(
    query: &RevenueQuery,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), Error> {
    let (start, end) = match (query.start, query.end) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, today),
        (None, Some(end)) => (time::month_before(end)?, end),
        (None, None) => (time::month_before(today)?, today),
    };

    if end < start {
        return Err(
            ValidationError::field("end", "The end date must not be before the start date").into(),
        );
    }

    Ok((start, end))
}

fn commission(total: Decimal, percent: Decimal) -> Decimal {
    (total * percent / Decimal::ONE_HUNDRED).round_dp(2)
}

/// One `MMM yyyy` bucket for every month the range touches
fn monthly_buckets(
    start: NaiveDate,
    end: NaiveDate,
    amounts: &HashMap<(i32, u32), Decimal>,
    commission_percent: Decimal,
) -> Vec<MonthlyRevenueDto> {
    let mut buckets = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());

    while (year, month) <= (end.year(), end.month()) {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            break;
        };
        let revenue = amounts.get(&(year, month)).copied().unwrap_or_default();
        buckets.push(MonthlyRevenueDto {
            label: first.format("%b %Y").to_string(),
            revenue,
            commission: commission(revenue, commission_percent),
        });

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    buckets
}

/// Highest amounts first, ties broken by name
fn rank(
    parties: Vec<(i32, String)>,
    totals: &HashMap<i32, (Decimal, u64)>,
) -> Vec<PartyRevenueDto> {
    let mut ranked: Vec<PartyRevenueDto> = parties
        .into_iter()
        .filter_map(|(id, name)| {
            totals.get(&id).map(|(amount, contract_count)| PartyRevenueDto {
                id,
                name,
                amount: *amount,
                contract_count: *contract_count,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_PARTIES);

    ranked
}
