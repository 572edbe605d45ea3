use std::str::FromStr;

use common::ItemStatus;
use thiserror::Error;

use crate::Item;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Errors raised while building a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page size must be at least one.
    #[error("Page size must not be less than one (got {0})")]
    InvalidPageSize(u32),

    /// The sort field does not name a sortable item attribute.
    #[error("Unknown sort field '{0}'")]
    UnknownSortField(String),

    /// The sort direction is neither ASC nor DESC.
    #[error("Invalid sort direction '{0}' (expected ASC or DESC)")]
    UnknownDirection(String),
}

/// Filter applied when listing items.
///
/// Every field is optional; `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the item name.
    pub name: Option<String>,

    /// Case-insensitive market code.
    pub market: Option<String>,

    /// Exact status.
    pub status: Option<ItemStatus>,
}

impl ItemFilter {
    /// Creates a filter that matches every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by name substring. Blank values are ignored.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into());
        self
    }

    /// Filters by market code. Blank values are ignored.
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = non_blank(market.into());
        self
    }

    /// Filters by status.
    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the item passes every configured criterion.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(ref name) = self.name
            && !item.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        if let Some(ref market) = self.market
            && !item.market.as_str().eq_ignore_ascii_case(market)
        {
            return false;
        }
        if let Some(status) = self.status
            && item.status != status
        {
            return false;
        }
        true
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Item attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Market,
    Price,
    Stock,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Returns the request-facing name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Market => "market",
            SortField::Price => "price",
            SortField::Stock => "stock",
            SortField::Status => "status",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Returns the database column backing the field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Market => "market",
            SortField::Price => "price",
            SortField::Stock => "stock",
            SortField::Status => "status",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Orders two items by this field alone.
    pub fn compare(&self, a: &Item, b: &Item) -> std::cmp::Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Market => a.market.as_str().cmp(b.market.as_str()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Stock => a.stock.cmp(&b.stock),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SortField::Id,
            SortField::Name,
            SortField::Market,
            SortField::Price,
            SortField::Stock,
            SortField::Status,
            SortField::CreatedAt,
            SortField::UpdatedAt,
        ]
        .into_iter()
        .find(|field| field.as_str() == s || field.column() == s)
        .ok_or_else(|| QueryError::UnknownSortField(s.to_string()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns the upper-case name (`ASC` / `DESC`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(QueryError::UnknownDirection(s.to_string()))
        }
    }
}

/// A request for one page of a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: SortField,
    direction: SortDirection,
}

impl PageRequest {
    /// Creates a request for page `page` (zero-based) of `size` items,
    /// ordered by id ascending.
    pub fn new(page: u32, size: u32) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::InvalidPageSize(size));
        }
        Ok(Self {
            page,
            size,
            sort: SortField::default(),
            direction: SortDirection::default(),
        })
    }

    /// Orders by the given field and direction.
    pub fn sorted_by(mut self, sort: SortField, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Orders two items by the requested field and direction, breaking
    /// ties by id ascending.
    pub fn compare(&self, a: &Item, b: &Item) -> std::cmp::Ordering {
        let ordering = self.sort.compare(a, b);
        let ordering = match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

/// One page of a listing plus the metadata needed to navigate it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
    /// Number of items across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Builds a page for `request` holding `content` out of `total_elements`.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    /// Number of pages needed to hold every element.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.size.max(1));
        u32::try_from(self.total_elements.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// Number of elements on this page.
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Maps the content while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
