//! App Context

use std::{fmt, sync::Arc};

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    config::{StoreConfig, StoreKind},
    database,
    domain::{
        discount_history::{DiscountHistoryLog, DiscountHistoryService},
        pricing::{VendorPricing, VendorPricingService},
        vendors::{VendorsManager, VendorsService},
    },
    store::{MemoryVendorStore, PgVendorStore, SharedStore},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("DATABASE_URL is required for the postgres store")]
    MissingDatabaseUrl,

    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] MigrateError),
}

/// The services a front end needs, sharing one store.
#[derive(Clone)]
pub struct AppContext {
    pub vendors: Arc<dyn VendorsService>,
    pub history: Arc<dyn DiscountHistoryService>,
    pub pricing: Arc<dyn VendorPricingService>,
}

impl AppContext {
    /// Wire services to an existing store.
    #[must_use]
    pub fn from_store(store: SharedStore) -> Self {
        let vendors: Arc<dyn VendorsService> = Arc::new(VendorsManager::new(store.clone()));

        Self {
            history: Arc::new(DiscountHistoryLog::new(store)),
            pricing: Arc::new(VendorPricing::new(vendors.clone())),
            vendors,
        }
    }

    /// Build application context from store settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the postgres store is selected without a database
    /// URL, or connecting or migrating fails.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, AppInitError> {
        let store: SharedStore = match config.store {
            StoreKind::Memory => {
                info!("using in-memory store");

                Arc::new(MemoryVendorStore::new())
            }
            StoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or(AppInitError::MissingDatabaseUrl)?;

                let pool = database::connect(url)
                    .await
                    .map_err(AppInitError::Database)?;

                if config.migrate {
                    database::migrate(&pool)
                        .await
                        .map_err(AppInitError::Migrate)?;
                }

                Arc::new(PgVendorStore::new(pool))
            }
        };

        Ok(Self::from_store(store))
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn postgres_store_needs_a_url() {
        let config = StoreConfig {
            store: StoreKind::Postgres,
            database_url: None,
            migrate: false,
        };

        let result = AppContext::from_config(&config).await;

        assert!(matches!(result, Err(AppInitError::MissingDatabaseUrl)));
    }

    #[tokio::test]
    async fn memory_context_serves_requests() -> TestResult {
        let config = StoreConfig {
            store: StoreKind::Memory,
            database_url: None,
            migrate: false,
        };

        let context = AppContext::from_config(&config).await?;

        let vendor = context
            .vendors
            .get_vendor_by_user(crate::domain::users::records::UserUuid::new())
            .await?;

        assert!(vendor.is_none());

        Ok(())
    }
}
