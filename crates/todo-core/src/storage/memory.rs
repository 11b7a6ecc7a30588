use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::TodoPersistence;
use crate::error::{TodoError, TodoResult};
use crate::item::TodoItem;

/// Keeps the saved collection in process memory.
///
/// `set_fail_saves(true)` makes every later `save` fail, which lets callers
/// exercise their persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<Vec<TodoItem>>,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<TodoItem>) -> Self {
        Self {
            items: Mutex::new(items),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<TodoItem> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(_) => {
                log::warn!("Memory storage lock poisoned, reporting no todos");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl TodoPersistence for MemoryStorage {
    async fn load(&self) -> Vec<TodoItem> {
        self.snapshot()
    }

    async fn save(&self, items: &[TodoItem]) -> TodoResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            log::error!("Memory storage rejected save of {} todos", items.len());
            return Err(TodoError::Persistence("memory storage is failing saves".into()));
        }
        let mut stored = self
            .items
            .lock()
            .map_err(|_| TodoError::Persistence("memory storage lock poisoned".into()))?;
        *stored = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn poisoned_lock_loads_empty_and_rejects_saves() {
        let storage = MemoryStorage::with_items(vec![TodoItem::new("held").unwrap()]);

        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _guard = storage.items.lock().unwrap();
                panic!("poison the lock");
            });
            assert!(poisoner.join().is_err());
        });

        assert!(storage.load().await.is_empty());
        let result = storage.save(&[TodoItem::new("after").unwrap()]).await;
        assert!(result.unwrap_err().is_persistence());
    }
}
