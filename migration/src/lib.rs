pub use sea_orm_migration::prelude::*;

mod m20251101_000001_wasl_user;
mod m20251101_000002_admin;
mod m20251101_000003_company;
mod m20251101_000004_provider;
mod m20251101_000005_shipment_request;
mod m20251101_000006_bid;
mod m20251101_000007_contract;
mod m20251101_000008_invoice;
mod m20251101_000009_payment;
mod m20251101_000010_shipment;
mod m20251101_000011_feedback;
mod m20251101_000012_revenue_report;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_wasl_user::Migration),
            Box::new(m20251101_000002_admin::Migration),
            Box::new(m20251101_000003_company::Migration),
            Box::new(m20251101_000004_provider::Migration),
            Box::new(m20251101_000005_shipment_request::Migration),
            Box::new(m20251101_000006_bid::Migration),
            Box::new(m20251101_000007_contract::Migration),
            Box::new(m20251101_000008_invoice::Migration),
            Box::new(m20251101_000009_payment::Migration),
            Box::new(m20251101_000010_shipment::Migration),
            Box::new(m20251101_000011_feedback::Migration),
            Box::new(m20251101_000012_revenue_report::Migration),
        ]
    }
}
