//! Item lifecycle: inputs, transitions and the stock manager.

mod commands;
mod manager;
pub mod transitions;

pub use commands::{ItemPatch, NewItem};
pub use manager::StockManager;

use common::{ItemId, ItemStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during item operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// No item with this id exists.
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Restock and dispatch quantities must be positive.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// Dispatch asked for more units than are on hand.
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: i64,
        available: i64,
    },

    /// Prices must be strictly positive and fit `NUMERIC(19, 4)` exactly.
    #[error(
        "Invalid price: {price} (must be greater than 0, below 10^15, with at most 4 decimal places)"
    )]
    InvalidPrice { price: Decimal },

    /// Stock levels can never be negative.
    #[error("Invalid stock: {stock} (must not be negative)")]
    NegativeStock { stock: i64 },

    /// Item names must contain something other than whitespace.
    #[error("Item name must not be blank")]
    EmptyName,

    /// Clients may only set ACTIVE or INACTIVE.
    #[error("Status {status} cannot be set directly")]
    StatusNotSettable { status: ItemStatus },

    /// The item is discontinued and refuses the operation.
    #[error("Item {0} is discontinued")]
    Discontinued(ItemId),

    /// Restocking would exceed the largest representable stock level.
    #[error("Restocking item {item_id} by {quantity} would overflow its stock of {stock}")]
    StockOverflow {
        item_id: ItemId,
        stock: i64,
        quantity: i64,
    },
}
