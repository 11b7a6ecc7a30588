use std::path::Path;
use std::sync::Arc;

use todo_db::{RepositoryResult, SqliteTodoRepository, TodoRepository};

pub struct AppState {
    pub repository: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    /// Open (and create if needed) the SQLite database at `db_path`.
    pub async fn with_sqlite(db_path: &Path) -> RepositoryResult<Self> {
        log::info!("Initializing database at: {:?}", db_path);
        let repository = SqliteTodoRepository::new(db_path);
        repository.init().await?;
        Ok(Self::new(Arc::new(repository)))
    }
}
