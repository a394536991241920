//! Shopping history: completed lists, JSON export and import.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use basket_core::snapshot::{HistorySnapshot, SnapshotItem, SnapshotList};
use basket_core::{ListStatus, Money, Quantity, UserId, line_total};

use super::{AccessResolver, CatalogService, ServiceError};
use crate::db::{ImportedItem, ItemRepository, ListRepository};
use crate::models::HistoryEntry;

/// Outcome of a history import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Lists written.
    pub imported: usize,
    /// Lists rejected and logged.
    pub skipped: usize,
    /// Items written across all imported lists.
    pub items: usize,
}

/// History operations on behalf of one caller.
pub struct HistoryService<'a> {
    pool: &'a PgPool,
    access: &'a AccessResolver,
    catalog: &'a CatalogService,
}

impl<'a> HistoryService<'a> {
    /// Create a history service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, access: &'a AccessResolver, catalog: &'a CatalogService) -> Self {
        Self {
            pool,
            access,
            catalog,
        }
    }

    /// Completed lists of every owner the caller can access, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn completed(&self, user: UserId) -> Result<Vec<HistoryEntry>, ServiceError> {
        let owners = self.access.accessible_user_ids(user).await;
        Ok(ListRepository::new(self.pool)
            .list_completed_for(&owners)
            .await?)
    }

    /// Snapshot of the caller's own completed lists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    #[instrument(skip(self))]
    pub async fn export(&self, user: UserId) -> Result<HistorySnapshot, ServiceError> {
        let entries = ListRepository::new(self.pool)
            .list_completed_for(&[user])
            .await?;
        let items = ItemRepository::new(self.pool);

        let mut snapshot = HistorySnapshot::new(Utc::now());
        for entry in entries {
            let lines = items.list_for_list(entry.id).await?;
            snapshot.lists.push(SnapshotList {
                date: entry.list_date,
                status: ListStatus::Completed,
                total: entry.total,
                items: lines
                    .into_iter()
                    .map(|line| SnapshotItem {
                        product: line.product_name,
                        category: line.category_name,
                        quantity: line.quantity,
                        unit_price: line.unit_price,
                    })
                    .collect(),
            });
        }

        info!(lists = snapshot.lists.len(), items = snapshot.item_count(), "History exported");
        Ok(snapshot)
    }

    /// Import a snapshot as completed lists owned by the caller.
    ///
    /// Each list is written in its own transaction. A list that fails is
    /// logged and skipped; lists already written stay.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidSnapshot` if the payload cannot be
    /// parsed or has another format version.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn import(&self, user: UserId, bytes: &[u8]) -> Result<ImportReport, ServiceError> {
        let snapshot = HistorySnapshot::from_json(bytes)?;

        let mut report = ImportReport::default();
        for (index, list) in snapshot.lists.iter().enumerate() {
            match self.import_list(user, list).await {
                Ok(count) => {
                    report.imported += 1;
                    report.items += count;
                }
                Err(e) => {
                    warn!(index, date = %list.date, error = %e, "Skipping list in history import");
                    report.skipped += 1;
                }
            }
        }

        info!(
            imported = report.imported,
            skipped = report.skipped,
            items = report.items,
            "History imported"
        );
        Ok(report)
    }

    async fn import_list(&self, user: UserId, list: &SnapshotList) -> Result<usize, ServiceError> {
        let mut lines = Vec::with_capacity(list.items.len());
        let mut running_total = Money::ZERO;
        for item in &list.items {
            let quantity = Quantity::new(item.quantity.value())
                .map_err(|e| ServiceError::Invalid(e.to_string()))?;
            let unit_price = item
                .unit_price
                .map(|p| Money::new(p.amount()))
                .transpose()
                .map_err(|e| ServiceError::Invalid(e.to_string()))?;
            running_total = running_total.checked_add(line_total(quantity, unit_price)?)?;
            let product = self
                .catalog
                .upsert_product(user, &item.product, item.category.as_deref())
                .await?;
            lines.push(ImportedItem {
                product: product.id,
                quantity,
                unit_price,
            });
        }

        ListRepository::new(self.pool)
            .import_completed(user, list.date, &lines)
            .await?;
        Ok(lines.len())
    }
}
