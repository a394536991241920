//! Shopping list lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a shopping list.
///
/// A list is `Open` while it is being built and shopped, and becomes
/// `Completed` when the trip is finished and archived into history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "basket.list_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListStatus {
    #[default]
    Open,
    Completed,
}

impl ListStatus {
    /// Whether items on a list with this status may still change.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for ListStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("invalid list status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_open_is_editable() {
        assert!(ListStatus::Open.is_editable());
        assert!(!ListStatus::Completed.is_editable());
    }

    #[test]
    fn test_round_trips_through_text() {
        for status in [ListStatus::Open, ListStatus::Completed] {
            assert_eq!(status.to_string().parse::<ListStatus>().unwrap(), status);
        }
        assert_eq!("completed".parse::<ListStatus>().unwrap(), ListStatus::Completed);
        assert!("archived".parse::<ListStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase() {
        assert_eq!(
            serde_json::to_string(&ListStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }
}
