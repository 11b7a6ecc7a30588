use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TodoError;
use crate::item::TodoItem;

/// Which items a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !item.completed,
            TodoFilter::Completed => item.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoFilter::All => "all",
            TodoFilter::Active => "active",
            TodoFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TodoFilter::All),
            "active" => Ok(TodoFilter::Active),
            "completed" => Ok(TodoFilter::Completed),
            other => Err(TodoError::Validation(format!(
                "Unknown filter '{}', expected all, active or completed",
                other
            ))),
        }
    }
}

/// Counts shown in a list footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    pub fn from_items(items: &[TodoItem]) -> Self {
        let completed = items.iter().filter(|item| item.completed).count();
        Self {
            total: items.len(),
            active: items.len() - completed,
            completed,
        }
    }
}
