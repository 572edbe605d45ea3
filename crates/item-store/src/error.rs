use thiserror::Error;

use crate::{ItemId, Version};

/// Errors that can occur when interacting with the item store.
#[derive(Debug, Error)]
pub enum ItemStoreError {
    /// The item does not exist.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// An item with this id is already stored.
    #[error("Item already exists: {0}")]
    DuplicateId(ItemId),

    /// A conditional replace found a different version than expected.
    #[error("Concurrency conflict for item {item_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        item_id: ItemId,
        expected: Version,
        actual: Version,
    },

    /// A stored row could not be turned back into an item.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for item store operations.
pub type Result<T> = std::result::Result<T, ItemStoreError>;
