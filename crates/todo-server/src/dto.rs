use serde::{Deserialize, Serialize};

use todo_core::TodoPatch;
use todo_db::{TodoQuery, TodoRecord, DEFAULT_LIMIT, MAX_LIMIT};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        TodoPatch {
            text: request.text,
            completed: request.completed,
        }
    }
}

/// Query string of `GET /todos`. Signed so that negative values reach
/// [`ListTodosQuery::into_query`] and get a readable error.
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosQuery {
    pub completed: Option<bool>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListTodosQuery {
    pub fn into_query(self) -> Result<TodoQuery, ApiError> {
        let skip = self.skip.unwrap_or(0);
        if skip < 0 {
            return Err(ApiError::Validation("skip must be >= 0".to_string()));
        }
        let limit = self.limit.unwrap_or(i64::from(DEFAULT_LIMIT));
        if !(1..=i64::from(MAX_LIMIT)).contains(&limit) {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok(TodoQuery {
            completed: self.completed,
            skip: u32::try_from(skip)
                .map_err(|_| ApiError::Validation("skip is too large".to_string()))?,
            limit: limit as u32,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub items: Vec<TodoRecord>,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCompletedResponse {
    pub deleted: u64,
    pub message: String,
}

impl ClearCompletedResponse {
    pub fn new(deleted: u64) -> Self {
        Self {
            deleted,
            message: format!("Deleted {} completed todo(s)", deleted),
        }
    }
}
