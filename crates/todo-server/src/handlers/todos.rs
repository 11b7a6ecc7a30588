use actix_web::{web, HttpResponse};

use crate::dto::{
    ClearCompletedResponse, CreateTodoRequest, ListTodosQuery, TodoListResponse,
    UpdateTodoRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// GET /todos
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListTodosQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner().into_query()?;
    let items = state.repository.list(query).await?;
    let total = state.repository.count(query.completed).await?;
    Ok(HttpResponse::Ok().json(TodoListResponse { items, total }))
}

/// POST /todos
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateTodoRequest>,
) -> Result<HttpResponse> {
    let todo = state.repository.create(&body.text).await?;
    log::info!("Created todo {}", todo.id);
    Ok(HttpResponse::Created().json(todo))
}

/// GET /todos/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let todo = state.repository.get(id).await?.ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(todo))
}

/// PUT /todos/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let todo = state
        .repository
        .update(id, body.into_inner().into())
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(todo))
}

/// DELETE /todos/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !state.repository.delete(id).await? {
        return Err(ApiError::NotFound(id));
    }
    log::info!("Deleted todo {}", id);
    Ok(HttpResponse::NoContent().finish())
}

/// POST /todos/{id}/toggle
pub async fn toggle(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let todo = state
        .repository
        .toggle(id)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(todo))
}

/// POST /todos/clear_completed, DELETE /todos/completed/clear
pub async fn clear_completed(state: web::Data<AppState>) -> Result<HttpResponse> {
    let deleted = state.repository.clear_completed().await?;
    log::info!("Cleared {} completed todos", deleted);
    Ok(HttpResponse::Ok().json(ClearCompletedResponse::new(deleted)))
}
