//! Todo item types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TodoError, TodoResult};

/// Longest text accepted for a todo, in characters after trimming.
pub const MAX_TEXT_LEN: usize = 500;

/// Trim `raw` and check it is usable as todo text.
pub fn validate_text(raw: &str) -> TodoResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TodoError::Validation(
            "Text cannot be empty or whitespace".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(TodoError::Validation(format!(
            "Text must be between 1 and {} characters (got {})",
            MAX_TEXT_LEN, len
        )));
    }
    Ok(text.to_string())
}

/// Todo item
///
/// `created_at` is set by [`TodoItem::new`] and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    created_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn new(text: &str) -> TodoResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            text: validate_text(text)?,
            completed: false,
            created_at: Utc::now(),
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Apply a patch that has already been through [`TodoPatch::validated`].
    fn apply(&mut self, patch: &TodoPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    /// Checked copy of this item with `patch` applied. `self` is untouched on error.
    pub fn patched(&self, patch: &TodoPatch) -> TodoResult<Self> {
        let patch = patch.validated()?;
        let mut next = self.clone();
        next.apply(&patch);
        Ok(next)
    }
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Same patch with its text trimmed and checked.
    pub fn validated(&self) -> TodoResult<Self> {
        let text = self.text.as_deref().map(validate_text).transpose()?;
        Ok(Self {
            text,
            completed: self.completed,
        })
    }
}
