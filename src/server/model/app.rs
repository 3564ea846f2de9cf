use std::{path::PathBuf, sync::Arc};

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::server::{
    config::{Config, DEFAULT_COMMISSION_PERCENT},
    service::payment::gateway::{PaymentGateway, SettlementGateway},
    util::storage::DocumentStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Contract document storage rooted at the upload directory
    pub documents: DocumentStorage,
    pub gateway: Arc<dyn PaymentGateway>,
    /// Platform commission applied to revenue reports, in percent
    pub commission_percent: Decimal,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            documents: DocumentStorage::new(config.upload_dir.clone()),
            gateway: Arc::new(SettlementGateway),
            commission_percent: config.commission_percent,
        }
    }

    /// Replace the payment gateway, used to exercise declined charges.
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }
}

/// Builds state from a database and upload root with the default gateway and commission.
impl From<(DatabaseConnection, PathBuf)> for AppState {
    fn from((db, upload_dir): (DatabaseConnection, PathBuf)) -> Self {
        Self {
            db,
            documents: DocumentStorage::new(upload_dir),
            gateway: Arc::new(SettlementGateway),
            commission_percent: Decimal::from(DEFAULT_COMMISSION_PERCENT),
        }
    }
}
