//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ParseStatusError;
use domain::{DomainError, ItemError};
use item_store::{ItemStoreError, QueryError};

use crate::validation::FieldViolation;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// One or more request fields failed validation.
    Validation(Vec<FieldViolation>),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "Validation failed",
                    "violations": violations,
                }),
            ),
            ApiError::Domain(err) => {
                let (status, msg) = domain_error_to_response(err);
                (status, error_body(msg))
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Item(item_err) => match item_err {
            ItemError::NotFound(_) => (StatusCode::NOT_FOUND, item_err.to_string()),
            ItemError::InsufficientStock { .. } | ItemError::Discontinued(_) => {
                (StatusCode::CONFLICT, item_err.to_string())
            }
            ItemError::InvalidQuantity { .. }
            | ItemError::InvalidPrice { .. }
            | ItemError::NegativeStock { .. }
            | ItemError::EmptyName
            | ItemError::StatusNotSettable { .. }
            | ItemError::StockOverflow { .. } => (StatusCode::BAD_REQUEST, item_err.to_string()),
        },
        DomainError::Store(store_err) => match store_err {
            ItemStoreError::NotFound(_) => (StatusCode::NOT_FOUND, store_err.to_string()),
            ItemStoreError::ConcurrencyConflict { .. } | ItemStoreError::DuplicateId(_) => {
                (StatusCode::CONFLICT, store_err.to_string())
            }
            ItemStoreError::Database(_)
            | ItemStoreError::Migration(_)
            | ItemStoreError::Decode(_) => {
                tracing::error!(error = %store_err, "item store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        },
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ParseStatusError> for ApiError {
    fn from(err: ParseStatusError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use common::ItemId;
    use item_store::Version;

    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn item_errors_map_to_client_statuses() {
        let id = ItemId::new();
        let cases = [
            (ItemError::NotFound(id), StatusCode::NOT_FOUND),
            (
                ItemError::InvalidQuantity { quantity: 0 },
                StatusCode::BAD_REQUEST,
            ),
            (ItemError::EmptyName, StatusCode::BAD_REQUEST),
            (
                ItemError::InsufficientStock {
                    item_id: id,
                    requested: 2,
                    available: 1,
                },
                StatusCode::CONFLICT,
            ),
            (ItemError::Discontinued(id), StatusCode::CONFLICT),
        ];

        for (err, expected) in cases {
            assert_eq!(status_of(DomainError::Item(err).into()), expected);
        }
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let id = ItemId::new();
        let conflict = ItemStoreError::ConcurrencyConflict {
            item_id: id,
            expected: Version::new(1),
            actual: Version::new(2),
        };
        assert_eq!(
            status_of(DomainError::Store(conflict).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Store(ItemStoreError::DuplicateId(id)).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Store(ItemStoreError::Decode("bad row".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn query_errors_are_bad_requests() {
        assert_eq!(
            status_of(QueryError::UnknownSortField("colour".into()).into()),
            StatusCode::BAD_REQUEST
        );

        let unknown_status = common::ItemStatus::from_name("SOLD").unwrap_err();
        assert_eq!(status_of(unknown_status.into()), StatusCode::BAD_REQUEST);
    }
}
