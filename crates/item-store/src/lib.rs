pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{ItemId, ItemStatus, Market};
pub use error::{ItemStoreError, Result};
pub use memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;
pub use query::{DEFAULT_PAGE_SIZE, ItemFilter, Page, PageRequest, QueryError, SortDirection, SortField};
pub use record::{Item, Version};
pub use store::{ItemStore, ItemStoreExt, ReplaceOptions};
