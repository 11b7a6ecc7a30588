use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use todo_core::{validate_text, TodoError, TodoPatch};

use crate::types::{TodoQuery, TodoRecord};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("time parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error(transparent)]
    Invalid(#[from] TodoError),
}

impl RepositoryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RepositoryError::Invalid(error) if error.is_validation())
    }
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn init(&self) -> RepositoryResult<()>;

    /// Newest first.
    async fn list(&self, query: TodoQuery) -> RepositoryResult<Vec<TodoRecord>>;
    async fn count(&self, completed: Option<bool>) -> RepositoryResult<u64>;
    async fn get(&self, id: i64) -> RepositoryResult<Option<TodoRecord>>;

    async fn create(&self, text: &str) -> RepositoryResult<TodoRecord>;
    async fn update(&self, id: i64, patch: TodoPatch) -> RepositoryResult<Option<TodoRecord>>;
    async fn toggle(&self, id: i64) -> RepositoryResult<Option<TodoRecord>>;
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
    async fn clear_completed(&self) -> RepositoryResult<u64>;
}

#[derive(Debug, Clone)]
pub struct SqliteTodoRepository {
    db_path: PathBuf,
}

impl SqliteTodoRepository {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<T, F>(&self, func: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RepositoryResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| RepositoryError::Task(error.to_string()))?
    }
}

const SELECT_COLUMNS: &str = "SELECT id, text, completed, created_at FROM todos";

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> RepositoryResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS todos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL,
                    completed INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);
                "#,
            )?;
            Ok(())
        })
        .await?;
        log::info!("Todo database ready at {:?}", self.db_path);
        Ok(())
    }

    async fn list(&self, query: TodoQuery) -> RepositoryResult<Vec<TodoRecord>> {
        self.with_connection(move |connection| {
            let sql = format!(
                "{} WHERE (?1 IS NULL OR completed = ?1) ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                SELECT_COLUMNS
            );
            let mut stmt = connection.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    query.completed,
                    i64::from(query.effective_limit()),
                    i64::from(query.skip)
                ],
                read_row,
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(into_record(row?)?);
            }
            Ok(records)
        })
        .await
    }

    async fn count(&self, completed: Option<bool>) -> RepositoryResult<u64> {
        self.with_connection(move |connection| {
            let count: i64 = connection.query_row(
                "SELECT COUNT(*) FROM todos WHERE (?1 IS NULL OR completed = ?1)",
                params![completed],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn get(&self, id: i64) -> RepositoryResult<Option<TodoRecord>> {
        self.with_connection(move |connection| fetch(connection, id)).await
    }

    async fn create(&self, text: &str) -> RepositoryResult<TodoRecord> {
        let text = validate_text(text)?;
        let created_at = Utc::now();
        let created_at_str = format_timestamp(created_at);

        self.with_connection(move |connection| {
            connection.execute(
                "INSERT INTO todos (text, completed, created_at) VALUES (?1, 0, ?2)",
                params![text, created_at_str],
            )?;
            let id = connection.last_insert_rowid();
            fetch(connection, id)?.ok_or(RepositoryError::Sqlite(
                rusqlite::Error::QueryReturnedNoRows,
            ))
        })
        .await
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> RepositoryResult<Option<TodoRecord>> {
        let patch = patch.validated()?;

        self.with_connection(move |connection| {
            let changed = connection.execute(
                "UPDATE todos SET text = COALESCE(?1, text), completed = COALESCE(?2, completed) WHERE id = ?3",
                params![patch.text, patch.completed, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch(connection, id)
        })
        .await
    }

    async fn toggle(&self, id: i64) -> RepositoryResult<Option<TodoRecord>> {
        self.with_connection(move |connection| {
            let changed = connection.execute(
                "UPDATE todos SET completed = NOT completed WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch(connection, id)
        })
        .await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        self.with_connection(move |connection| {
            let changed = connection.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
    }

    async fn clear_completed(&self) -> RepositoryResult<u64> {
        self.with_connection(|connection| {
            let changed = connection.execute("DELETE FROM todos WHERE completed = 1", [])?;
            Ok(changed as u64)
        })
        .await
    }
}

type RawRow = (i64, String, bool, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_record((id, text, completed, created_at): RawRow) -> RepositoryResult<TodoRecord> {
    Ok(TodoRecord {
        id,
        text,
        completed,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn fetch(connection: &Connection, id: i64) -> RepositoryResult<Option<TodoRecord>> {
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    connection
        .query_row(&sql, params![id], read_row)
        .optional()?
        .map(into_record)
        .transpose()
}

fn open_connection(path: &Path) -> RepositoryResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

// Fixed precision keeps lexical order equal to chronological order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> RepositoryResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
