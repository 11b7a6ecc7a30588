//! UI-agnostic event handling
//!
//! Front-ends forward user actions to [`TodoEvents`]; the presenter mutates the
//! store and then re-renders the [`TodoView`] from the updated collection,
//! whatever the mutation's outcome.

use uuid::Uuid;

use crate::error::TodoResult;
use crate::filter::{TodoFilter, TodoStats};
use crate::item::{TodoItem, TodoPatch};
use crate::storage::TodoPersistence;
use crate::store::TodoStore;

pub trait TodoView: Send {
    /// `items` is already narrowed to `filter`; `stats` covers the whole collection.
    fn render(&mut self, items: &[TodoItem], stats: TodoStats, filter: TodoFilter);
}

#[async_trait::async_trait]
pub trait TodoEvents {
    async fn on_create(&mut self, text: &str) -> TodoResult<TodoItem>;

    /// `Ok(false)` when the id is unknown.
    async fn on_toggle(&mut self, id: Uuid) -> TodoResult<bool>;

    /// `Ok(false)` when the id is unknown.
    async fn on_delete(&mut self, id: Uuid) -> TodoResult<bool>;

    /// `Ok(false)` when the id is unknown.
    async fn on_update(&mut self, id: Uuid, patch: TodoPatch) -> TodoResult<bool>;

    async fn on_clear_completed(&mut self) -> TodoResult<usize>;

    async fn on_toggle_all(&mut self, completed: bool) -> TodoResult<usize>;

    fn on_filter(&mut self, filter: TodoFilter);
}

pub struct TodoPresenter<P: TodoPersistence, V: TodoView> {
    store: TodoStore<P>,
    view: V,
    filter: TodoFilter,
}

impl<P: TodoPersistence, V: TodoView> TodoPresenter<P, V> {
    pub fn new(store: TodoStore<P>, view: V) -> Self {
        Self {
            store,
            view,
            filter: TodoFilter::All,
        }
    }

    pub fn store(&self) -> &TodoStore<P> {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn filter(&self) -> TodoFilter {
        self.filter
    }

    pub fn refresh(&mut self) {
        let visible = self.store.filtered(self.filter);
        self.view.render(&visible, self.store.stats(), self.filter);
    }

    fn rendered<T>(&mut self, result: TodoResult<T>) -> TodoResult<T> {
        self.refresh();
        result
    }
}

#[async_trait::async_trait]
impl<P, V> TodoEvents for TodoPresenter<P, V>
where
    P: TodoPersistence,
    V: TodoView,
{
    async fn on_create(&mut self, text: &str) -> TodoResult<TodoItem> {
        let result = self.store.create(text).await;
        self.rendered(result)
    }

    async fn on_toggle(&mut self, id: Uuid) -> TodoResult<bool> {
        let result = self.store.toggle(id).await.map(|item| item.is_some());
        self.rendered(result)
    }

    async fn on_delete(&mut self, id: Uuid) -> TodoResult<bool> {
        let result = self.store.delete(id).await;
        self.rendered(result)
    }

    async fn on_update(&mut self, id: Uuid, patch: TodoPatch) -> TodoResult<bool> {
        let result = self.store.update(id, patch).await.map(|item| item.is_some());
        self.rendered(result)
    }

    async fn on_clear_completed(&mut self) -> TodoResult<usize> {
        let result = self.store.clear_completed().await;
        self.rendered(result)
    }

    async fn on_toggle_all(&mut self, completed: bool) -> TodoResult<usize> {
        let result = self.store.set_all_completed(completed).await;
        self.rendered(result)
    }

    fn on_filter(&mut self, filter: TodoFilter) {
        self.filter = filter;
        self.refresh();
    }
}
