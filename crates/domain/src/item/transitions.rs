//! Pure item transitions.
//!
//! Each function takes the current record and returns the next one, or the
//! invariant it would break. Nothing here touches storage, so the stock
//! manager can re-run a transition against a fresher record after a write
//! conflict.

use chrono::{DateTime, Utc};
use common::{ItemId, ItemStatus};
use item_store::{Item, Version};
use rust_decimal::Decimal;

use super::{ItemError, ItemPatch, NewItem};

/// Rejects non-positive restock/dispatch quantities.
pub fn ensure_positive_quantity(quantity: i64) -> Result<(), ItemError> {
    if quantity <= 0 {
        return Err(ItemError::InvalidQuantity { quantity });
    }
    Ok(())
}

fn ensure_valid_name(name: &str) -> Result<(), ItemError> {
    if name.trim().is_empty() {
        return Err(ItemError::EmptyName);
    }
    Ok(())
}

/// Most decimal places a price may carry (`NUMERIC(19, 4)`).
pub const PRICE_SCALE: u32 = 4;

/// Prices must stay strictly below this bound (15 integer digits).
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Whether `price` is positive and fits the stored price column exactly.
pub fn is_valid_price(price: Decimal) -> bool {
    price > Decimal::ZERO && price < PRICE_LIMIT && price.normalize().scale() <= PRICE_SCALE
}

fn ensure_valid_price(price: Decimal) -> Result<(), ItemError> {
    if !is_valid_price(price) {
        return Err(ItemError::InvalidPrice { price });
    }
    Ok(())
}

fn ensure_valid_stock(stock: i64) -> Result<(), ItemError> {
    if stock < 0 {
        return Err(ItemError::NegativeStock { stock });
    }
    Ok(())
}

fn ensure_settable(status: ItemStatus) -> Result<(), ItemError> {
    if !status.is_settable() {
        return Err(ItemError::StatusNotSettable { status });
    }
    Ok(())
}

/// Builds the record for a new item.
pub fn created(id: ItemId, new: NewItem, now: DateTime<Utc>) -> Result<Item, ItemError> {
    ensure_valid_name(&new.name)?;
    ensure_valid_price(new.price)?;
    let stock = new.stock.unwrap_or(0);
    ensure_valid_stock(stock)?;
    let status = new.status.unwrap_or_default();
    ensure_settable(status)?;

    Ok(Item {
        id,
        name: new.name,
        description: new.description,
        market: new.market,
        price: new.price,
        stock,
        status,
        version: Version::initial(),
        created_at: now,
        updated_at: now,
    })
}

/// Merges the present fields of `patch` onto `item`.
pub fn patched(item: &Item, patch: &ItemPatch, now: DateTime<Utc>) -> Result<Item, ItemError> {
    if item.status.is_terminal() {
        return Err(ItemError::Discontinued(item.id));
    }

    let mut next = item.clone();
    if let Some(ref name) = patch.name {
        ensure_valid_name(name)?;
        next.name = name.clone();
    }
    if let Some(ref description) = patch.description {
        next.description = Some(description.clone());
    }
    if let Some(ref market) = patch.market {
        next.market = market.clone();
    }
    if let Some(price) = patch.price {
        ensure_valid_price(price)?;
        next.price = price;
    }
    if let Some(stock) = patch.stock {
        ensure_valid_stock(stock)?;
        next.stock = stock;
    }
    if let Some(status) = patch.status {
        ensure_settable(status)?;
        next.status = status;
    }
    next.updated_at = now;

    Ok(next)
}

/// Adds `quantity` units to the item's stock.
pub fn restocked(item: &Item, quantity: i64, now: DateTime<Utc>) -> Result<Item, ItemError> {
    ensure_positive_quantity(quantity)?;
    if !item.status.can_restock() {
        return Err(ItemError::Discontinued(item.id));
    }

    let stock = item
        .stock
        .checked_add(quantity)
        .ok_or(ItemError::StockOverflow {
            item_id: item.id,
            stock: item.stock,
            quantity,
        })?;

    let mut next = item.clone();
    next.stock = stock;
    next.updated_at = now;
    Ok(next)
}

/// Removes `quantity` units from the item's stock, refusing to go below zero.
pub fn dispatched(item: &Item, quantity: i64, now: DateTime<Utc>) -> Result<Item, ItemError> {
    ensure_positive_quantity(quantity)?;
    if quantity > item.stock {
        return Err(ItemError::InsufficientStock {
            item_id: item.id,
            requested: quantity,
            available: item.stock,
        });
    }

    let mut next = item.clone();
    next.stock = item.stock - quantity;
    next.updated_at = now;
    Ok(next)
}

/// Moves the item into its terminal status. Returns `None` when the item is
/// already discontinued and there is nothing to write.
pub fn discontinued(item: &Item, now: DateTime<Utc>) -> Option<Item> {
    if item.status.is_terminal() {
        return None;
    }
    let mut next = item.clone();
    next.status = ItemStatus::Discontinued;
    next.updated_at = now;
    Some(next)
}
