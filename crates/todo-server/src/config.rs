//! Server configuration
//!
//! Values come from the command line with environment fallbacks (see
//! `main.rs`); everything not given falls back to the defaults here.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DATABASE_FILE: &str = "todos.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// `None` lets actix pick one worker per core.
    pub workers: Option<usize>,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: default_database_path(),
            workers: None,
            debug: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn default_database_path() -> PathBuf {
    todo_core::default_data_dir().join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.database_path.ends_with(DATABASE_FILE));
        assert!(config.workers.is_none());
    }
}
