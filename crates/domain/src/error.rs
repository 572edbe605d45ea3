//! Domain error types.

use item_store::ItemStoreError;
use thiserror::Error;

use crate::item::ItemError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the item store.
    #[error("Item store error: {0}")]
    Store(#[from] ItemStoreError),

    /// An item invariant or precondition was violated.
    #[error("Item error: {0}")]
    Item(ItemError),
}

impl DomainError {
    /// Returns the item error, if this is one.
    pub fn as_item_error(&self) -> Option<&ItemError> {
        match self {
            DomainError::Item(err) => Some(err),
            DomainError::Store(_) => None,
        }
    }
}

impl From<ItemError> for DomainError {
    fn from(err: ItemError) -> Self {
        DomainError::Item(err)
    }
}
