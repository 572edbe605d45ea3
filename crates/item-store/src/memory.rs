use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Item, ItemFilter, ItemId, ItemStoreError, Page, PageRequest, Result, Version,
    store::{ItemStore, ReplaceOptions},
};

/// In-memory item store.
///
/// Provides the same interface and version semantics as the PostgreSQL
/// implementation; a single write lock makes every call atomic.
#[derive(Clone, Default)]
pub struct InMemoryItemStore {
    items: Arc<RwLock<HashMap<ItemId, Item>>>,
}

impl InMemoryItemStore {
    /// Creates a new empty in-memory item store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of items stored.
    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Removes every item.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn find(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn insert(&self, mut item: Item) -> Result<Item> {
        let mut items = self.items.write().await;

        if items.contains_key(&item.id) {
            return Err(ItemStoreError::DuplicateId(item.id));
        }

        item.version = Version::first();
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn replace(&self, mut item: Item, options: ReplaceOptions) -> Result<Item> {
        let mut items = self.items.write().await;

        let current = items
            .get(&item.id)
            .map(|stored| stored.version)
            .ok_or(ItemStoreError::NotFound(item.id))?;

        if let Some(expected) = options.expected_version
            && current != expected
        {
            return Err(ItemStoreError::ConcurrencyConflict {
                item_id: item.id,
                expected,
                actual: current,
            });
        }

        item.version = current.next();
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<()> {
        self.items
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(ItemStoreError::NotFound(id))
    }

    async fn list(&self, filter: ItemFilter, request: PageRequest) -> Result<Page<Item>> {
        let items = self.items.read().await;
        let mut matching: Vec<_> = items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        drop(items);

        matching.sort_by(|a, b| request.compare(a, b));

        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content: Vec<_> = matching
            .into_iter()
            .skip(offset)
            .take(request.size() as usize)
            .collect();

        Ok(Page::new(content, &request, total))
    }
}
