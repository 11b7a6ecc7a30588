//! Todo Store
//!
//! Owns the in-memory collection and rewrites it through a [`TodoPersistence`]
//! after every mutation. A mutation is staged on a copy of the collection and
//! only becomes visible once the save succeeded.

use log::{debug, info};
use uuid::Uuid;

use crate::error::TodoResult;
use crate::filter::{TodoFilter, TodoStats};
use crate::item::{TodoItem, TodoPatch};
use crate::storage::TodoPersistence;

pub struct TodoStore<P: TodoPersistence> {
    items: Vec<TodoItem>,
    persistence: P,
}

impl<P: TodoPersistence> TodoStore<P> {
    /// Load persisted state and wrap it in a store.
    pub async fn open(persistence: P) -> Self {
        let items = persistence.load().await;
        info!("Todo store opened with {} items", items.len());
        Self { items, persistence }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn filtered(&self, filter: TodoFilter) -> Vec<TodoItem> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_items(&self.items)
    }

    /// Replace the in-memory collection with whatever is persisted now.
    pub async fn reload(&mut self) {
        self.items = self.persistence.load().await;
    }

    async fn commit(&mut self, next: Vec<TodoItem>) -> TodoResult<()> {
        self.persistence.save(&next).await?;
        self.items = next;
        Ok(())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub async fn create(&mut self, text: &str) -> TodoResult<TodoItem> {
        let item = TodoItem::new(text)?;
        let mut next = self.items.clone();
        next.push(item.clone());
        self.commit(next).await?;
        debug!("Created todo {}", item.id);
        Ok(item)
    }

    /// Flip `completed`. `None` if no item has this id.
    pub async fn toggle(&mut self, id: Uuid) -> TodoResult<Option<TodoItem>> {
        let Some(index) = self.position(id) else {
            debug!("Toggle ignored, todo {} not found", id);
            return Ok(None);
        };
        let mut next = self.items.clone();
        next[index].toggle();
        let toggled = next[index].clone();
        self.commit(next).await?;
        Ok(Some(toggled))
    }

    /// Apply the provided fields of `patch`. `None` if no item has this id.
    pub async fn update(&mut self, id: Uuid, patch: TodoPatch) -> TodoResult<Option<TodoItem>> {
        let Some(index) = self.position(id) else {
            debug!("Update ignored, todo {} not found", id);
            return Ok(None);
        };
        let updated = self.items[index].patched(&patch)?;
        let mut next = self.items.clone();
        next[index] = updated.clone();
        self.commit(next).await?;
        Ok(Some(updated))
    }

    /// Remove the item. `false` if no item has this id.
    pub async fn delete(&mut self, id: Uuid) -> TodoResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("Delete ignored, todo {} not found", id);
            return Ok(false);
        };
        let mut next = self.items.clone();
        next.remove(index);
        self.commit(next).await?;
        Ok(true)
    }

    /// Drop every completed item and return how many went.
    pub async fn clear_completed(&mut self) -> TodoResult<usize> {
        let next: Vec<TodoItem> = self
            .items
            .iter()
            .filter(|item| !item.completed)
            .cloned()
            .collect();
        let removed = self.items.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(next).await?;
        info!("Cleared {} completed todos", removed);
        Ok(removed)
    }

    /// Mark every item `completed`, returning how many actually changed.
    pub async fn set_all_completed(&mut self, completed: bool) -> TodoResult<usize> {
        let changed = self
            .items
            .iter()
            .filter(|item| item.completed != completed)
            .count();
        if changed == 0 {
            return Ok(0);
        }
        let next = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.completed = completed;
                item
            })
            .collect();
        self.commit(next).await?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStorage, MemoryStorage};
    use std::collections::HashSet;
    use tempfile::tempdir;

    async fn memory_store() -> TodoStore<MemoryStorage> {
        TodoStore::open(MemoryStorage::new()).await
    }

    #[tokio::test]
    async fn open_starts_from_persisted_items() {
        let mut done = TodoItem::new("filed").unwrap();
        done.toggle();
        let seeded = vec![TodoItem::new("pending").unwrap(), done];

        let mut store = TodoStore::open(MemoryStorage::with_items(seeded.clone())).await;

        assert_eq!(store.items(), seeded.as_slice());
        assert_eq!(store.stats().completed, 1);
        assert_eq!(store.clear_completed().await.unwrap(), 1);
        assert_eq!(store.persistence().snapshot(), vec![seeded[0].clone()]);
    }

    #[tokio::test]
    async fn create_appends_and_persists() {
        let mut store = memory_store().await;

        let item = store.create("  buy milk ").await.unwrap();

        assert_eq!(item.text, "buy milk");
        assert!(!item.completed);
        assert_eq!(store.items(), std::slice::from_ref(&item));
        assert_eq!(store.persistence().snapshot(), vec![item]);
    }

    #[tokio::test]
    async fn create_yields_fresh_ids() {
        let mut store = memory_store().await;
        let mut seen = HashSet::new();
        for n in 0..20 {
            let item = store.create(&format!("item {}", n)).await.unwrap();
            assert!(seen.insert(item.id));
        }
        assert_eq!(store.len(), 20);
    }

    #[tokio::test]
    async fn create_rejects_blank_text_without_change() {
        let mut store = memory_store().await;
        store.create("existing").await.unwrap();

        for blank in ["", "  ", "\n\t"] {
            let error = store.create(blank).await.unwrap_err();
            assert!(error.is_validation());
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.persistence().snapshot().len(), 1);
    }

    #[tokio::test]
    async fn toggle_is_an_involution() {
        let mut store = memory_store().await;
        let item = store.create("flip").await.unwrap();

        let once = store.toggle(item.id).await.unwrap().unwrap();
        assert!(once.completed);
        let twice = store.toggle(item.id).await.unwrap().unwrap();
        assert_eq!(twice, item);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported_and_not_saved() {
        let storage = MemoryStorage::new();
        storage.set_fail_saves(true);
        let mut store = TodoStore::open(storage).await;
        let missing = Uuid::new_v4();

        // Would fail if a save were attempted.
        assert!(store.toggle(missing).await.unwrap().is_none());
        assert!(store.update(missing, TodoPatch::text("x")).await.unwrap().is_none());
        assert!(!store.delete(missing).await.unwrap());
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let mut store = memory_store().await;
        let item = store.create("draft").await.unwrap();

        let updated = store
            .update(item.id, TodoPatch::text(" final copy "))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "final copy");
        assert!(!updated.completed);
        assert_eq!(updated.created_at(), item.created_at());

        let updated = store
            .update(item.id, TodoPatch::completed(true))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "final copy");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn update_with_blank_text_changes_nothing() {
        let mut store = memory_store().await;
        let item = store.create("stable").await.unwrap();

        let error = store
            .update(item.id, TodoPatch::text(" ").with_completed(true))
            .await
            .unwrap_err();

        assert!(error.is_validation());
        assert_eq!(store.get(item.id), Some(&item));
    }

    #[tokio::test]
    async fn delete_removes_matching_item() {
        let mut store = memory_store().await;
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();

        assert!(store.delete(a.id).await.unwrap());
        assert_eq!(store.items(), std::slice::from_ref(&b));
    }

    #[tokio::test]
    async fn clear_completed_keeps_others_in_order() {
        let mut store = memory_store().await;
        let a = store.create("a").await.unwrap();
        let b = store.create("b").await.unwrap();
        let c = store.create("c").await.unwrap();
        let d = store.create("d").await.unwrap();
        store.toggle(b.id).await.unwrap();
        store.toggle(d.id).await.unwrap();

        let removed = store.clear_completed().await.unwrap();

        assert_eq!(removed, 2);
        let remaining: Vec<_> = store.items().iter().map(|item| item.id).collect();
        assert_eq!(remaining, vec![a.id, c.id]);
        assert_eq!(store.clear_completed().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_save_preserves_previous_state() {
        let mut store = memory_store().await;
        let item = store.create("safe").await.unwrap();
        store.persistence().set_fail_saves(true);

        assert!(store.create("lost").await.unwrap_err().is_persistence());
        assert!(store.toggle(item.id).await.unwrap_err().is_persistence());
        assert!(store.delete(item.id).await.unwrap_err().is_persistence());

        assert_eq!(store.items(), std::slice::from_ref(&item));
        assert_eq!(store.persistence().snapshot(), vec![item]);
    }

    #[tokio::test]
    async fn set_all_completed_counts_changes() {
        let mut store = memory_store().await;
        let a = store.create("a").await.unwrap();
        store.create("b").await.unwrap();
        store.toggle(a.id).await.unwrap();

        assert_eq!(store.set_all_completed(true).await.unwrap(), 1);
        assert_eq!(store.stats().completed, 2);
        assert_eq!(store.set_all_completed(true).await.unwrap(), 0);
        assert_eq!(store.set_all_completed(false).await.unwrap(), 2);
        assert_eq!(store.stats().active, 2);
    }

    #[tokio::test]
    async fn filtered_and_stats_reflect_completion() {
        let mut store = memory_store().await;
        let a = store.create("a").await.unwrap();
        store.create("b").await.unwrap();
        store.toggle(a.id).await.unwrap();

        assert_eq!(store.filtered(TodoFilter::Completed).len(), 1);
        assert_eq!(store.filtered(TodoFilter::Active)[0].text, "b");
        assert_eq!(store.filtered(TodoFilter::All).len(), 2);
        assert_eq!(store.stats().total, 2);
    }

    #[tokio::test]
    async fn end_to_end_with_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let mut store = TodoStore::open(JsonFileStorage::new(&path)).await;
        assert!(store.is_empty());

        let item = store.create("buy milk").await.unwrap();
        let loaded = JsonFileStorage::new(&path).load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].text, "buy milk");
        assert!(!loaded[0].completed);

        let toggled = store.toggle(item.id).await.unwrap().unwrap();
        assert!(toggled.completed);

        assert_eq!(store.clear_completed().await.unwrap(), 1);
        assert!(JsonFileStorage::new(&path).load().await.is_empty());

        store.reload().await;
        assert!(store.is_empty());
    }
}
