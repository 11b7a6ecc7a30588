use actix_web::HttpResponse;

pub async fn handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "TodoList API",
        "version": env!("CARGO_PKG_VERSION"),
        "todos": "/todos",
    }))
}
