use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

/// Routes plus extractor configuration; shared by `run_server` and the tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/", web::get().to(handlers::health::root))
        .route("/health", web::get().to(handlers::health::handler))
        .service(
            web::scope("/todos")
                .route("", web::get().to(handlers::todos::list))
                .route("", web::post().to(handlers::todos::create))
                .route(
                    "/clear_completed",
                    web::post().to(handlers::todos::clear_completed),
                )
                .route(
                    "/completed/clear",
                    web::delete().to(handlers::todos::clear_completed),
                )
                .route("/{id}", web::get().to(handlers::todos::get))
                .route("/{id}", web::put().to(handlers::todos::update))
                .route("/{id}", web::delete().to(handlers::todos::delete))
                .route("/{id}/toggle", web::post().to(handlers::todos::toggle)),
        );
}

// Malformed bodies, query strings and ids are client errors, reported in the
// same JSON shape as every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|error, _req| ApiError::Validation(error.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|error, _req| ApiError::Validation(error.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|error, _req| {
        ApiError::Validation(format!("Invalid todo id: {}", error)).into()
    })
}

pub async fn run_server(config: ServerConfig) -> io::Result<()> {
    let state = AppState::with_sqlite(&config.database_path)
        .await
        .map_err(|e| {
            log::error!("Failed to initialize database: {}", e);
            io::Error::new(io::ErrorKind::Other, e.to_string())
        })?;
    let state = web::Data::new(state);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(app_config)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    log::info!("Starting server at http://{}", config.bind_addr());

    server
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
