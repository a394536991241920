//! JSON snapshot of a user's shopping history.
//!
//! Snapshots are what `/history/export` downloads and `/history/import`
//! accepts. They reference products by name rather than by ID so a snapshot
//! can be loaded into a different account or a fresh database.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ListStatus, Money, Quantity};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised when reading a snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// The payload is not valid snapshot JSON.
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload was written by an incompatible version.
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the payload.
        found: u32,
    },
}

/// A full history export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Format version, see [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Completed lists, newest first.
    pub lists: Vec<SnapshotList>,
}

/// One archived shopping trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotList {
    /// Date of the trip.
    pub date: NaiveDate,
    /// Status at export time. Imports always archive as completed.
    #[serde(default = "completed")]
    pub status: ListStatus,
    /// Total recorded for the trip.
    pub total: Money,
    /// Line items.
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// One line item inside a [`SnapshotList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Catalog product name.
    pub product: String,
    /// Category name, if the product had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Quantity bought.
    #[serde(default)]
    pub quantity: Quantity,
    /// Price per unit, if one was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
}

const fn completed() -> ListStatus {
    ListStatus::Completed
}

impl HistorySnapshot {
    /// Start an empty snapshot stamped with the current format version.
    #[must_use]
    pub const fn new(exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at,
            lists: Vec::new(),
        }
    }

    /// Parse a snapshot and check its version.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] for malformed input and
    /// [`SnapshotError::UnsupportedVersion`] for other format versions.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Total number of line items across all lists.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lists.iter().map(|l| l.items.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 1,
        "exported_at": "2026-03-01T10:00:00Z",
        "lists": [
            {
                "date": "2026-02-28",
                "total": "7.47",
                "items": [
                    {"product": "Milk", "category": "Dairy & Eggs", "quantity": "2", "unit_price": "1.49"},
                    {"product": "Bread", "unit_price": "4.49"},
                    {"product": "Birthday candles"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parses_with_defaults() {
        let snapshot = HistorySnapshot::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.item_count(), 3);

        let list = &snapshot.lists[0];
        assert_eq!(list.status, ListStatus::Completed);
        assert_eq!(list.items[1].quantity, Quantity::ONE);
        assert_eq!(list.items[1].category, None);
        assert_eq!(list.items[2].unit_price, None);
    }

    #[test]
    fn test_rejects_other_versions() {
        let json = SAMPLE.replacen("\"version\": 1", "\"version\": 2", 1);
        assert!(matches!(
            HistorySnapshot::from_json(json.as_bytes()),
            Err(SnapshotError::UnsupportedVersion { found: 2 })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            HistorySnapshot::from_json(b"not json"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_skips_empty_optionals_when_writing() {
        let item = SnapshotItem {
            product: "Eggs".to_owned(),
            category: None,
            quantity: Quantity::ONE,
            unit_price: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("category"));
        assert!(!json.contains("unit_price"));
    }
}
