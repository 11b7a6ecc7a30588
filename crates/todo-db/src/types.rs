use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1_000;

/// One row of the `todos` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoQuery {
    pub completed: Option<bool>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for TodoQuery {
    fn default() -> Self {
        Self {
            completed: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TodoQuery {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit,
            ..Self::default()
        }
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.min(MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serializes_with_flat_fields() {
        let record = TodoRecord {
            id: 7,
            text: "water plants".to_string(),
            completed: true,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["text"], "water plants");
        assert_eq!(value["completed"], true);
        assert_eq!(value["created_at"], "2024-03-01T09:30:00Z");

        let back: TodoRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn query_defaults_and_clamps() {
        let query = TodoQuery::default();
        assert_eq!((query.completed, query.skip, query.limit), (None, 0, DEFAULT_LIMIT));
        assert_eq!(TodoQuery::page(0, 5_000).effective_limit(), MAX_LIMIT);
        assert_eq!(TodoQuery::completed(true).completed, Some(true));
    }
}
