//! Stock lifecycle manager.

use chrono::{DateTime, Utc};
use common::ItemId;
use item_store::{
    Item, ItemFilter, ItemStore, ItemStoreError, Page, PageRequest, ReplaceOptions,
};

use crate::error::DomainError;

use super::{ItemError, ItemPatch, NewItem, transitions};

/// Applies create/update/restock/dispatch transitions to items and persists
/// them through an [`ItemStore`].
///
/// Every mutation is an optimistic read-modify-write: the current record is
/// read, the next record is computed, and the write only lands if the stored
/// version is still the one that was read. On a conflict the whole cycle,
/// preconditions included, runs again against the fresh record.
pub struct StockManager<S: ItemStore> {
    store: S,
    max_write_attempts: usize,
}

impl<S: ItemStore> StockManager<S> {
    /// Number of read-modify-write cycles attempted before giving up.
    pub const DEFAULT_WRITE_ATTEMPTS: usize = 5;

    /// Creates a new manager over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_write_attempts: Self::DEFAULT_WRITE_ATTEMPTS,
        }
    }

    /// Sets how many read-modify-write cycles a mutation may take.
    pub fn with_write_attempts(mut self, attempts: usize) -> Self {
        self.max_write_attempts = attempts.max(1);
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a new item with a freshly assigned id.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewItem) -> Result<Item, DomainError> {
        let item = transitions::created(ItemId::new(), new, Utc::now())?;
        let item = self.store.insert(item).await?;

        metrics::counter!("items_created_total").increment(1);
        tracing::info!(item_id = %item.id, "item created");
        Ok(item)
    }

    /// Loads an item by id.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: ItemId) -> Result<Item, DomainError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| ItemError::NotFound(id).into())
    }

    /// Lists one page of items matching `filter`.
    #[tracing::instrument(skip(self))]
    pub async fn find_all(
        &self,
        filter: ItemFilter,
        request: PageRequest,
    ) -> Result<Page<Item>, DomainError> {
        Ok(self.store.list(filter, request).await?)
    }

    /// Applies a partial update. Fields absent from `patch` keep their values.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, DomainError> {
        if patch.is_empty() {
            let item = self.find_by_id(id).await?;
            if item.status.is_terminal() {
                return Err(ItemError::Discontinued(id).into());
            }
            return Ok(item);
        }

        let item = self
            .modify(id, |item, now| transitions::patched(item, &patch, now).map(Some))
            .await?;

        tracing::info!(item_id = %id, version = %item.version, "item updated");
        Ok(item)
    }

    /// Deletes an item.
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: ItemId) -> Result<(), DomainError> {
        self.store.delete(id).await.map_err(not_found_as_item_error)?;

        metrics::counter!("items_deleted_total").increment(1);
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }

    /// Adds `quantity` units to an item's stock.
    #[tracing::instrument(skip(self))]
    pub async fn restock(&self, id: ItemId, quantity: i64) -> Result<Item, DomainError> {
        transitions::ensure_positive_quantity(quantity)?;

        let item = self
            .modify(id, |item, now| {
                transitions::restocked(item, quantity, now).map(Some)
            })
            .await?;

        metrics::counter!("items_restocked_units_total").increment(quantity.unsigned_abs());
        tracing::info!(item_id = %id, quantity, stock = item.stock, "item restocked");
        Ok(item)
    }

    /// Removes `quantity` units from an item's stock.
    ///
    /// Fails with `InsufficientStock` rather than letting stock go negative,
    /// even when other writers change the item concurrently.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&self, id: ItemId, quantity: i64) -> Result<Item, DomainError> {
        transitions::ensure_positive_quantity(quantity)?;

        let result = self
            .modify(id, |item, now| {
                transitions::dispatched(item, quantity, now).map(Some)
            })
            .await;

        match result {
            Ok(item) => {
                metrics::counter!("items_dispatched_units_total")
                    .increment(quantity.unsigned_abs());
                tracing::info!(item_id = %id, quantity, stock = item.stock, "item dispatched");
                Ok(item)
            }
            Err(err) => {
                if let DomainError::Item(ItemError::InsufficientStock { .. }) = err {
                    metrics::counter!("items_dispatch_rejected_total").increment(1);
                }
                Err(err)
            }
        }
    }

    /// Moves an item into the terminal DISCONTINUED status. Discontinuing an
    /// already discontinued item returns it without writing.
    #[tracing::instrument(skip(self))]
    pub async fn discontinue(&self, id: ItemId) -> Result<Item, DomainError> {
        let item = self
            .modify(id, |item, now| Ok(transitions::discontinued(item, now)))
            .await?;

        tracing::info!(item_id = %id, "item discontinued");
        Ok(item)
    }

    /// Runs an optimistic read-modify-write cycle for one item.
    ///
    /// A transition yielding `None` leaves the stored record as it is.
    async fn modify<F>(&self, id: ItemId, transition: F) -> Result<Item, DomainError>
    where
        F: Fn(&Item, DateTime<Utc>) -> Result<Option<Item>, ItemError>,
    {
        let mut attempt = 1;
        loop {
            let current = self.find_by_id(id).await?;
            let Some(next) = transition(&current, Utc::now())? else {
                return Ok(current);
            };

            let options = ReplaceOptions::expect_version(current.version);
            match self.store.replace(next, options).await {
                Ok(item) => return Ok(item),
                Err(ItemStoreError::ConcurrencyConflict {
                    expected, actual, ..
                }) if attempt < self.max_write_attempts => {
                    metrics::counter!("item_write_conflicts_total").increment(1);
                    tracing::debug!(
                        item_id = %id,
                        %expected,
                        %actual,
                        attempt,
                        "write conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err @ ItemStoreError::ConcurrencyConflict { .. }) => {
                    metrics::counter!("item_write_conflicts_total").increment(1);
                    tracing::warn!(item_id = %id, attempt, "giving up after repeated write conflicts");
                    return Err(err.into());
                }
                Err(err) => return Err(not_found_as_item_error(err)),
            }
        }
    }
}

fn not_found_as_item_error(err: ItemStoreError) -> DomainError {
    match err {
        ItemStoreError::NotFound(id) => ItemError::NotFound(id).into(),
        other => other.into(),
    }
}
