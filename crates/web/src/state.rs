//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BasketConfig;
use crate::services::{
    AccessResolver, CatalogService, HistoryService, ListService, SharingService,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections, configuration and the
/// in-process caches.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BasketConfig,
    pool: PgPool,
    access: AccessResolver,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Basket configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: BasketConfig, pool: PgPool) -> Self {
        let access = AccessResolver::new(pool.clone());
        let catalog = CatalogService::new(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                access,
                catalog,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BasketConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the accessible-user resolver.
    #[must_use]
    pub fn access(&self) -> &AccessResolver {
        &self.inner.access
    }

    /// Get the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// List operations.
    #[must_use]
    pub fn lists(&self) -> ListService<'_> {
        ListService::new(&self.inner.pool, &self.inner.access, &self.inner.catalog)
    }

    /// History operations.
    #[must_use]
    pub fn history(&self) -> HistoryService<'_> {
        HistoryService::new(&self.inner.pool, &self.inner.access, &self.inner.catalog)
    }

    /// Sharing operations.
    #[must_use]
    pub fn sharing(&self) -> SharingService<'_> {
        SharingService::new(&self.inner.pool, &self.inner.access, &self.inner.catalog)
    }
}
