use log::{debug, error, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::TodoPersistence;
use crate::error::{TodoError, TodoResult};
use crate::item::{validate_text, TodoItem};

/// Stores the collection as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "todos.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_atomically(&self, items: &[TodoItem]) -> TodoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(items)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, contents).await?;
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(TodoError::Persistence(format!(
                "failed to replace {:?}: {}",
                self.path, e
            )));
        }
        Ok(())
    }

    /// Drop entries with invalid text or an id already seen earlier in the file.
    fn retain_valid(&self, items: Vec<TodoItem>) -> Vec<TodoItem> {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|item| {
                if let Err(e) = validate_text(&item.text) {
                    warn!("Skipping todo {} in {:?}: {}", item.id, self.path, e);
                    return false;
                }
                if !seen.insert(item.id) {
                    warn!("Skipping duplicate todo id {} in {:?}", item.id, self.path);
                    return false;
                }
                true
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl TodoPersistence for JsonFileStorage {
    async fn load(&self) -> Vec<TodoItem> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No todo file at {:?}, starting empty", self.path);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read todo file {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<TodoItem>>(&contents) {
            Ok(items) => {
                let items = self.retain_valid(items);
                debug!("Loaded {} todos from {:?}", items.len(), self.path);
                items
            }
            Err(e) => {
                warn!("Failed to parse todo file {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    async fn save(&self, items: &[TodoItem]) -> TodoResult<()> {
        match self.write_atomically(items).await {
            Ok(()) => {
                debug!("Saved {} todos to {:?}", items.len(), self.path);
                Ok(())
            }
            Err(e) => {
                error!("Failed to save todos to {:?}: {}", self.path, e);
                Err(e)
            }
        }
    }
}
