//! Value types shared by every crate of the item storage service.

mod market;
mod status;
mod types;

pub use market::{InvalidMarket, Market};
pub use status::{ItemStatus, ParseStatusError};
pub use types::ItemId;
