//! Item CRUD and stock movement endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use common::{ItemId, ItemStatus};
use domain::{ItemPatch, NewItem, StockManager};
use item_store::{Item, ItemStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::paging::{ListQuery, PagedResponse};
use crate::validation::Violations;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ItemStore> {
    pub manager: StockManager<S>,
    /// Prefix for `Location` headers and paging links.
    pub base_path: String,
}

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub market: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub status: Option<String>,
}

impl CreateItemRequest {
    /// Checks every field and builds the creation input.
    pub fn validate(self) -> Result<NewItem, ApiError> {
        let mut v = Violations::new();

        let name = v.required("name", self.name).and_then(|n| v.name(n));
        let description = self.description.and_then(|d| v.description(d));
        let market = v
            .required("market", self.market)
            .and_then(|m| v.market(&m));
        let price = v.required("price", self.price).and_then(|p| v.price(p));
        let stock = self.stock.and_then(|s| v.stock(s));
        let status = self.status.as_deref().and_then(|s| v.status(s));

        v.finish(|| ())?;

        match (name, market, price) {
            (Some(name), Some(market), Some(price)) => Ok(NewItem {
                name,
                description,
                market,
                price,
                stock,
                status,
            }),
            _ => Err(ApiError::BadRequest(
                "name, market and price are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub market: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub status: Option<String>,
}

impl UpdateItemRequest {
    /// Checks the present fields and builds the patch.
    pub fn validate(self) -> Result<ItemPatch, ApiError> {
        let mut v = Violations::new();

        let patch = ItemPatch {
            name: self.name.and_then(|n| v.name(n)),
            description: self.description.and_then(|d| v.description(d)),
            market: self.market.and_then(|m| v.market(&m)),
            price: self.price.and_then(|p| v.price(p)),
            stock: self.stock.and_then(|s| v.stock(s)),
            status: self.status.and_then(|s| v.status(&s)),
        };

        v.finish(|| patch)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

impl QuantityRequest {
    pub fn validate(self) -> Result<i64, ApiError> {
        let mut v = Violations::new();
        let quantity = v
            .required("quantity", self.quantity)
            .and_then(|q| v.quantity(q));
        v.finish(|| quantity.unwrap_or_default())
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub market: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            market: item.market.to_string(),
            price: item.price,
            stock: item.stock,
            status: item.status,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// -- Handlers --

/// GET /items — one page of items matching the query.
#[tracing::instrument(skip(state))]
pub async fn list<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResponse<ItemResponse>>, ApiError> {
    let filter = query.filter()?;
    let request = query.page_request()?;

    let page = state
        .manager
        .find_all(filter.clone(), request)
        .await?
        .map(ItemResponse::from);

    Ok(Json(PagedResponse::new(
        page,
        &filter,
        &request,
        &state.base_path,
    )))
}

/// GET /items/{id} — load a single item.
#[tracing::instrument(skip(state))]
pub async fn get<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id = parse_item_id(&id)?;
    let item = state.manager.find_by_id(item_id).await?;
    Ok(Json(item.into()))
}

/// POST /items — create an item.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = req.validate()?;
    let item = state.manager.create(new).await?;

    let location = format!("{}/items/{}", state.base_path, item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ItemResponse::from(item)),
    ))
}

/// PATCH /items/{id} — change the fields present in the body.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id = parse_item_id(&id)?;
    let patch = req.validate()?;
    let item = state.manager.update(item_id, patch).await?;
    Ok(Json(item.into()))
}

/// DELETE /items/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let item_id = parse_item_id(&id)?;
    state.manager.delete_by_id(item_id).await?;
    Ok(StatusCode::OK)
}

/// POST /items/{id}/restock — add units to stock.
#[tracing::instrument(skip(state, req))]
pub async fn restock<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<QuantityRequest>,
) -> Result<StatusCode, ApiError> {
    let item_id = parse_item_id(&id)?;
    let quantity = req.validate()?;
    state.manager.restock(item_id, quantity).await?;
    Ok(StatusCode::OK)
}

/// POST /items/{id}/dispatch — remove units from stock.
#[tracing::instrument(skip(state, req))]
pub async fn dispatch<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<QuantityRequest>,
) -> Result<StatusCode, ApiError> {
    let item_id = parse_item_id(&id)?;
    let quantity = req.validate()?;
    state.manager.dispatch(item_id, quantity).await?;
    Ok(StatusCode::OK)
}

/// POST /items/{id}/discontinue — withdraw an item for good.
#[tracing::instrument(skip(state))]
pub async fn discontinue<S: ItemStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id = parse_item_id(&id)?;
    let item = state.manager.discontinue(item_id).await?;
    Ok(Json(item.into()))
}

fn parse_item_id(id: &str) -> Result<ItemId, ApiError> {
    id.parse::<ItemId>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
