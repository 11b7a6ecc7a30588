//! Persistence backends for the file-backed todo store

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::TodoResult;
use crate::item::TodoItem;

/// Whole-collection persistence.
///
/// `load` never fails: missing or unreadable state is logged and reads as an
/// empty collection. `save` replaces whatever was stored before.
#[async_trait::async_trait]
pub trait TodoPersistence: Send + Sync {
    async fn load(&self) -> Vec<TodoItem>;
    async fn save(&self, items: &[TodoItem]) -> TodoResult<()>;
}
