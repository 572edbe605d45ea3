//! Inputs accepted by the stock manager.

use common::{ItemStatus, Market};
use rust_decimal::Decimal;

/// A request to create an item. The manager assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub market: Market,
    pub price: Decimal,
    /// Initial stock; zero when absent.
    pub stock: Option<i64>,
    /// Initial status; ACTIVE when absent.
    pub status: Option<ItemStatus>,
}

impl NewItem {
    /// Creates a request with the required fields only.
    pub fn new(name: impl Into<String>, market: Market, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: None,
            market,
            price,
            stock: None,
            status: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A partial update. Only `Some` fields replace the stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub market: Option<Market>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub status: Option<ItemStatus>,
}

impl ItemPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn market(mut self, market: Market) -> Self {
        self.market = Some(market);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.market.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_defaults() {
        let item = NewItem::new("Widget", Market::parse("PT").unwrap(), Decimal::ONE);
        assert_eq!(item.stock, None);
        assert_eq!(item.status, None);
        assert_eq!(item.description, None);
    }

    #[test]
    fn patch_emptiness() {
        assert!(ItemPatch::new().is_empty());
        assert!(!ItemPatch::new().stock(0).is_empty());
        assert!(!ItemPatch::new().description("x").is_empty());
    }
}
