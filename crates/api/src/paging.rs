//! Listing query parsing and paged response bodies.

use std::collections::BTreeMap;

use common::ItemStatus;
use item_store::{DEFAULT_PAGE_SIZE, ItemFilter, Page, PageRequest, SortDirection, SortField};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Query string accepted by `GET /items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub name: Option<String>,
    pub market: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}

impl ListQuery {
    /// Builds the store filter. Blank parameters do not filter.
    pub fn filter(&self) -> Result<ItemFilter, ApiError> {
        let mut filter = ItemFilter::new();
        if let Some(name) = &self.name {
            filter = filter.name(name.as_str());
        }
        if let Some(market) = &self.market {
            filter = filter.market(market.as_str());
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            filter = filter.status(ItemStatus::from_name(status)?);
        }
        Ok(filter)
    }

    /// Builds the page request, defaulting to the first page of
    /// [`DEFAULT_PAGE_SIZE`] items ordered by id ascending.
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        let sort = match self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            Some(field) => field.parse::<SortField>()?,
            None => SortField::default(),
        };
        let direction = match self.direction.as_deref().filter(|s| !s.is_empty()) {
            Some(direction) => direction.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };

        Ok(PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .sorted_by(sort, direction))
    }
}

/// A hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Paging metadata rendered next to the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

#[derive(Debug, Serialize)]
pub struct Embedded<T> {
    pub items: Vec<T>,
}

/// Paged listing body with navigation links.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
    #[serde(rename = "_links")]
    pub links: BTreeMap<&'static str, Link>,
    pub page: PageMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkQuery<'a> {
    page: u32,
    size: u32,
    sort_by: &'static str,
    direction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
}

impl<T> PagedResponse<T> {
    /// Wraps `page` and derives links that repeat the filter and ordering of
    /// the request. `first` and `prev` appear only after the first page,
    /// `next` and `last` only before the last one.
    pub fn new(page: Page<T>, filter: &ItemFilter, request: &PageRequest, base_path: &str) -> Self {
        let href = |number: u32| {
            let query = LinkQuery {
                page: number,
                size: request.size(),
                sort_by: request.sort().as_str(),
                direction: request.direction().as_str(),
                name: filter.name.as_deref(),
                market: filter.market.as_deref(),
                status: filter.status.map(|s| s.as_str()),
            };
            let query = serde_urlencoded::to_string(&query).unwrap_or_default();
            Link {
                href: format!("{base_path}/items?{query}"),
            }
        };

        let total_pages = page.total_pages();
        let mut links = BTreeMap::new();
        links.insert("self", href(page.number));
        if page.has_previous() {
            links.insert("first", href(0));
            links.insert("prev", href(page.number - 1));
        }
        if page.has_next() {
            links.insert("next", href(page.number + 1));
            links.insert("last", href(total_pages.saturating_sub(1)));
        }

        Self {
            page: PageMetadata {
                size: page.size,
                total_elements: page.total_elements,
                total_pages,
                number: page.number,
            },
            embedded: Embedded {
                items: page.content,
            },
            links,
        }
    }
}
