//! # Todo Core
//!
//! The todo item model and the file-backed Todo Store shared by every front-end.

pub mod error;
pub mod filter;
pub mod item;
pub mod paths;
pub mod presenter;
pub mod storage;
pub mod store;

pub use error::{TodoError, TodoResult};
pub use filter::{TodoFilter, TodoStats};
pub use item::{validate_text, TodoItem, TodoPatch, MAX_TEXT_LEN};
pub use paths::default_data_dir;
pub use presenter::{TodoEvents, TodoPresenter, TodoView};
pub use storage::{JsonFileStorage, MemoryStorage, TodoPersistence};
pub use store::TodoStore;
