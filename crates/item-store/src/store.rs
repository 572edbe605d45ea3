use async_trait::async_trait;

use crate::{Item, ItemFilter, ItemId, ItemStoreError, Page, PageRequest, Result, Version};

/// Options for replacing a stored item.
#[derive(Debug, Clone, Default)]
pub struct ReplaceOptions {
    /// Version the stored item must still be at for the write to succeed.
    /// If None, the write is unconditional (last writer wins).
    pub expected_version: Option<Version>,
}

impl ReplaceOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the stored item to be at a specific version.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }
}

/// Storage port for item records.
///
/// Each call is atomic on its own; callers needing read-modify-write
/// consistency pass the version they read to [`ItemStore::replace`].
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Looks an item up by id.
    ///
    /// Returns None if the item doesn't exist.
    async fn find(&self, id: ItemId) -> Result<Option<Item>>;

    /// Stores a new item at [`Version::first`].
    ///
    /// Fails with `DuplicateId` if the id is already taken.
    async fn insert(&self, item: Item) -> Result<Item>;

    /// Overwrites a stored item and bumps its version.
    ///
    /// Fails with `NotFound` if the item doesn't exist, and with
    /// `ConcurrencyConflict` if `options.expected_version` is set and the
    /// stored version differs.
    async fn replace(&self, item: Item, options: ReplaceOptions) -> Result<Item>;

    /// Removes an item.
    ///
    /// Fails with `NotFound` if the item doesn't exist.
    async fn delete(&self, id: ItemId) -> Result<()>;

    /// Returns one page of the items matching `filter`.
    async fn list(&self, filter: ItemFilter, request: PageRequest) -> Result<Page<Item>>;
}

/// Extension trait providing convenience methods for item stores.
#[async_trait]
pub trait ItemStoreExt: ItemStore {
    /// Loads an item, failing with `NotFound` if it is absent.
    async fn get(&self, id: ItemId) -> Result<Item> {
        self.find(id).await?.ok_or(ItemStoreError::NotFound(id))
    }

    /// Checks if an item exists.
    async fn exists(&self, id: ItemId) -> Result<bool> {
        Ok(self.find(id).await?.is_some())
    }
}

// Blanket implementation for all ItemStore implementations
impl<T: ItemStore + ?Sized> ItemStoreExt for T {}
