//! Domain layer for the item storage service.
//!
//! This crate provides the stock lifecycle manager and its inputs:
//! - `NewItem` and `ItemPatch` describing creations and partial updates
//! - pure transition functions enforcing the item invariants
//! - `StockManager`, which applies transitions through an `ItemStore`
//!   with optimistic read-modify-write cycles

pub mod error;
pub mod item;

pub use error::DomainError;
pub use item::{ItemError, ItemPatch, NewItem, StockManager, transitions};
pub use item_store::{Item, ItemFilter, ItemId, ItemStatus, Market, Page, PageRequest};
