//! # Marketplace Context
//!
//! Dependency container wiring configuration, the selected store backend and
//! the four services together.

use crate::config::{AppConfig, ConfigManager, StoreBackend};
use crate::database::{run_migrations, DatabaseConnection};
use crate::error::SwiggyResult;
use crate::seed::{CatalogSeeder, SeedReport};
use crate::services::{CartService, OrderService, RestaurantService, UserService};
use crate::store::{MarketplaceStore, MemoryStore, PgStore};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared marketplace dependencies
pub struct Marketplace {
    /// Instance ID, attached to startup logs
    pub instance_id: Uuid,

    pub config_manager: Arc<ConfigManager>,

    /// Present only for the postgres backend
    pub database: Option<DatabaseConnection>,

    pub restaurants: RestaurantService,
    pub users: UserService,
    pub carts: CartService,
    pub orders: OrderService,
}

impl std::fmt::Debug for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marketplace")
            .field("instance_id", &self.instance_id)
            .field("environment", &self.config_manager.environment())
            .field("backend", &self.config_manager.config().database.backend)
            .field(
                "database",
                &self
                    .database
                    .as_ref()
                    .map(|db| format!("PgPool(size={})", db.pool().size()))
                    .unwrap_or_else(|| "None".to_string()),
            )
            .finish()
    }
}

impl Marketplace {
    /// Build the marketplace from auto-detected configuration
    pub async fn new() -> SwiggyResult<Self> {
        let config_manager = ConfigManager::load()?;
        Self::from_config(config_manager).await
    }

    /// Connect the configured backend, migrate and seed as configured
    pub async fn from_config(config_manager: Arc<ConfigManager>) -> SwiggyResult<Self> {
        let marketplace = Self::connect(config_manager).await?;

        if marketplace.config().seed.enabled {
            marketplace.seed_catalog(None).await?;
        }

        info!(instance_id = %marketplace.instance_id, "Marketplace ready");
        Ok(marketplace)
    }

    /// Connect the configured backend and apply migrations, without seeding
    pub async fn connect(config_manager: Arc<ConfigManager>) -> SwiggyResult<Self> {
        let config = config_manager.config();
        info!(
            environment = config_manager.environment(),
            backend = ?config.database.backend,
            "Initializing marketplace"
        );

        match config.database.backend {
            StoreBackend::Postgres => {
                let database = DatabaseConnection::new(&config.database).await?;
                if config.database.run_migrations {
                    run_migrations(database.pool()).await?;
                }
                Ok(Self::from_database(database, config_manager.clone()))
            }
            StoreBackend::Memory => Ok(Self::with_store(
                MemoryStore::new(),
                None,
                config_manager.clone(),
            )),
        }
    }

    /// Wrap an existing pool; used by integration tests
    pub fn from_pool(pool: PgPool, config_manager: Arc<ConfigManager>) -> Self {
        Self::from_database(DatabaseConnection::from_pool(pool), config_manager)
    }

    /// In-memory marketplace with default settings
    pub fn in_memory() -> SwiggyResult<Self> {
        let config_manager = ConfigManager::from_config(AppConfig::in_memory(), "test")?;
        Ok(Self::with_store(MemoryStore::new(), None, config_manager))
    }

    fn from_database(database: DatabaseConnection, config_manager: Arc<ConfigManager>) -> Self {
        let store = PgStore::new(database.pool().clone());
        Self::with_store(store, Some(database), config_manager)
    }

    fn with_store<S>(
        store: S,
        database: Option<DatabaseConnection>,
        config_manager: Arc<ConfigManager>,
    ) -> Self
    where
        S: MarketplaceStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            instance_id: Uuid::new_v4(),
            config_manager,
            database,
            restaurants: RestaurantService::new(store.clone()),
            users: UserService::new(store.clone()),
            carts: CartService::new(store.clone()),
            orders: OrderService::new(store),
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config_manager.config()
    }

    /// Seed the catalog from `path`, or from `seed.catalog_path` when omitted
    pub async fn seed_catalog(&self, path: Option<&std::path::Path>) -> SwiggyResult<SeedReport> {
        let seed = &self.config().seed;
        let path = path.unwrap_or(seed.catalog_path.as_path());
        CatalogSeeder::new(self.restaurants.clone(), seed.skip_if_populated)
            .seed_from_path(path)
            .await
    }

    /// True when the backing store answers; the memory backend always does
    pub async fn health_check(&self) -> SwiggyResult<bool> {
        match &self.database {
            Some(database) => database.health_check().await,
            None => Ok(true),
        }
    }

    pub async fn shutdown(self) {
        if let Some(database) = self.database {
            database.close().await;
        }
    }
}
