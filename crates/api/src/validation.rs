//! Request field validation.
//!
//! Handlers run every field through a [`Violations`] collector so a client
//! gets all problems with a request body at once instead of one per round
//! trip.

use common::{ItemStatus, Market};
use domain::transitions::{PRICE_LIMIT, PRICE_SCALE};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ApiError;

/// A single invalid request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Collects field violations while a request is being converted.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `value` if no violation was recorded, the collected
    /// violations otherwise.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ApiError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }

    /// Records a violation if a required field is missing.
    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "must not be null");
        }
        value
    }

    pub fn name(&mut self, name: String) -> Option<String> {
        if name.trim().is_empty() {
            self.add("name", "must not be blank");
            return None;
        }
        Some(name)
    }

    pub fn description(&mut self, description: String) -> Option<String> {
        if description.trim().is_empty() {
            self.add("description", "must not be blank");
            return None;
        }
        Some(description)
    }

    pub fn market(&mut self, market: &str) -> Option<Market> {
        match Market::parse(market.trim()) {
            Ok(market) => Some(market),
            Err(err) => {
                self.add("market", err.to_string());
                None
            }
        }
    }

    pub fn price(&mut self, price: Decimal) -> Option<Decimal> {
        if price <= Decimal::ZERO {
            self.add("price", "must be greater than 0");
            return None;
        }
        if price >= PRICE_LIMIT {
            self.add("price", format!("must be less than {PRICE_LIMIT}"));
            return None;
        }
        if price.normalize().scale() > PRICE_SCALE {
            self.add(
                "price",
                format!("must have at most {PRICE_SCALE} decimal places"),
            );
            return None;
        }
        Some(price)
    }

    pub fn stock(&mut self, stock: i64) -> Option<i64> {
        if stock < 0 {
            self.add("stock", "must be greater than or equal to 0");
            return None;
        }
        Some(stock)
    }

    /// Accepts only the statuses a client may set.
    pub fn status(&mut self, status: &str) -> Option<ItemStatus> {
        match ItemStatus::from_name(status) {
            Ok(status) if status.is_settable() => Some(status),
            Ok(status) => {
                self.add("status", format!("{status} cannot be set directly"));
                None
            }
            Err(err) => {
                self.add("status", err.to_string());
                None
            }
        }
    }

    pub fn quantity(&mut self, quantity: i64) -> Option<i64> {
        if quantity <= 0 {
            self.add("quantity", "must be greater than 0");
            return None;
        }
        Some(quantity)
    }
}
