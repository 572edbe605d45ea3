//! Item status enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of an item in its lifecycle.
///
/// ```text
/// Active ◄──► Inactive
///    │            │
///    └─────┬──────┘
///          ▼
///    Discontinued   (terminal, internal only)
/// ```
///
/// Clients may only set `Active` or `Inactive`. `Discontinued` is reached
/// through the stock manager and never leaves that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Item is listed and can be restocked and dispatched.
    #[default]
    Active,

    /// Item is hidden but otherwise behaves like an active one.
    Inactive,

    /// Item is withdrawn; remaining stock may still be dispatched.
    Discontinued,
}

/// Returned when a string does not name a known [`ItemStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid enum value '{value}' for item status (expected one of ACTIVE, INACTIVE)")]
pub struct ParseStatusError {
    pub value: String,
}

impl ItemStatus {
    /// Statuses a client is allowed to set directly.
    pub const SETTABLE: [ItemStatus; 2] = [ItemStatus::Active, ItemStatus::Inactive];

    /// Looks a status up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self, ParseStatusError> {
        let name = name.trim();
        [
            ItemStatus::Active,
            ItemStatus::Inactive,
            ItemStatus::Discontinued,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| ParseStatusError {
            value: name.to_string(),
        })
    }

    /// Returns true if clients may set this status through an update.
    pub fn is_settable(&self) -> bool {
        Self::SETTABLE.contains(self)
    }

    /// Returns true if no further status transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Discontinued)
    }

    /// Returns true if stock may be added in this status.
    pub fn can_restock(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "ACTIVE",
            ItemStatus::Inactive => "INACTIVE",
            ItemStatus::Discontinued => "DISCONTINUED",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
