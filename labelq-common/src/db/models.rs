//! Database models

use serde::{Deserialize, Serialize};

/// An immutable unit of content awaiting labels
///
/// Created by out-of-band ingestion; never mutated or deleted by the
/// request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DatasetItem {
    pub id: String,
    pub content: String,
}

/// Status of one user's labeling attempt on one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionStatus {
    Started,
    Completed,
}

impl InteractionStatus {
    /// Storage representation (the `status` column)
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionStatus::Started => "started",
            InteractionStatus::Completed => "completed",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "started" => Some(InteractionStatus::Started),
            "completed" => Some(InteractionStatus::Completed),
            _ => None,
        }
    }
}

/// One user's labeling attempt on one item
///
/// At most one row exists per (user_id, item_id) pair; the row is created
/// in `started` status on assignment and transitions to `completed` with a
/// label exactly once. Timestamps are RFC 3339 UTC strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub item_id: String,
    pub status: InteractionStatus,
    pub label: Option<String>,
    pub assigned_at: String,
    pub completed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        assert_eq!(
            InteractionStatus::parse(InteractionStatus::Started.as_str()),
            Some(InteractionStatus::Started)
        );
        assert_eq!(
            InteractionStatus::parse(InteractionStatus::Completed.as_str()),
            Some(InteractionStatus::Completed)
        );
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert_eq!(InteractionStatus::parse("abandoned"), None);
        assert_eq!(InteractionStatus::parse(""), None);
    }
}
