//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container and truncate the table before
//! each test, so they run serially. Run with:
//!
//! ```bash
//! cargo test -p item-store --test postgres_integration
//! ```

use std::sync::Arc;

use chrono::Utc;
use item_store::{
    Item, ItemFilter, ItemId, ItemStatus, ItemStore, ItemStoreError, ItemStoreExt, Market,
    PageRequest, PostgresItemStore, ReplaceOptions, SortDirection, SortField, Version,
};
use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresItemStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and an empty table
async fn get_test_store() -> PostgresItemStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE items")
        .execute(&pool)
        .await
        .unwrap();

    PostgresItemStore::new(pool)
}

fn create_test_item(name: &str, market: &str, stock: i64) -> Item {
    let now = Utc::now();
    Item {
        id: ItemId::new(),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        market: Market::parse(market).unwrap(),
        price: Decimal::new(1250, 2),
        stock,
        status: ItemStatus::Active,
        version: Version::initial(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[serial]
async fn insert_and_find() {
    let store = get_test_store().await;
    let item = create_test_item("Widget", "PT", 10);

    let stored = store.insert(item.clone()).await.unwrap();
    assert_eq!(stored.version, Version::first());

    let found = store.get(item.id).await.unwrap();
    assert_eq!(found.name, "Widget");
    assert_eq!(found.description.as_deref(), Some("Widget description"));
    assert_eq!(found.market.as_str(), "PT");
    assert_eq!(found.price, Decimal::new(1250, 2));
    assert_eq!(found.stock, 10);
    assert_eq!(found.status, ItemStatus::Active);
}

#[tokio::test]
#[serial]
async fn insert_duplicate_id() {
    let store = get_test_store().await;
    let item = create_test_item("Widget", "PT", 1);
    store.insert(item.clone()).await.unwrap();

    let result = store.insert(item).await;
    assert!(matches!(result, Err(ItemStoreError::DuplicateId(_))));
}

#[tokio::test]
#[serial]
async fn find_missing_item() {
    let store = get_test_store().await;
    assert!(store.find(ItemId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn conditional_replace_success() {
    let store = get_test_store().await;
    let mut item = store
        .insert(create_test_item("Widget", "PT", 10))
        .await
        .unwrap();

    item.stock = 4;
    let replaced = store
        .replace(item.clone(), ReplaceOptions::expect_version(Version::first()))
        .await
        .unwrap();

    assert_eq!(replaced.version, Version::new(2));
    assert_eq!(replaced.stock, 4);
}

#[tokio::test]
#[serial]
async fn conditional_replace_conflict() {
    let store = get_test_store().await;
    let item = store
        .insert(create_test_item("Widget", "PT", 10))
        .await
        .unwrap();

    store
        .replace(item.clone(), ReplaceOptions::new())
        .await
        .unwrap();

    let mut stale = item.clone();
    stale.stock = 0;
    let result = store
        .replace(stale, ReplaceOptions::expect_version(Version::first()))
        .await;

    match result {
        Err(ItemStoreError::ConcurrencyConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected, Version::first());
            assert_eq!(actual, Version::new(2));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(store.get(item.id).await.unwrap().stock, 10);
}

#[tokio::test]
#[serial]
async fn replace_missing_item() {
    let store = get_test_store().await;
    let result = store
        .replace(
            create_test_item("Ghost", "PT", 1),
            ReplaceOptions::expect_version(Version::first()),
        )
        .await;
    assert!(matches!(result, Err(ItemStoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn negative_stock_rejected_by_schema() {
    let store = get_test_store().await;
    let mut item = store
        .insert(create_test_item("Widget", "PT", 1))
        .await
        .unwrap();

    item.stock = -1;
    let result = store.replace(item, ReplaceOptions::new()).await;
    assert!(matches!(result, Err(ItemStoreError::Database(_))));
}

#[tokio::test]
#[serial]
async fn delete_item() {
    let store = get_test_store().await;
    let item = store
        .insert(create_test_item("Widget", "PT", 1))
        .await
        .unwrap();

    store.delete(item.id).await.unwrap();
    assert!(!store.exists(item.id).await.unwrap());
    assert!(matches!(
        store.delete(item.id).await,
        Err(ItemStoreError::NotFound(_))
    ));
}

#[tokio::test]
#[serial]
async fn list_with_filters_sorting_and_paging() {
    let store = get_test_store().await;
    for (name, market, stock) in [
        ("Blue Widget", "PT", 3),
        ("Red Widget", "PT", 1),
        ("Gadget", "ES", 2),
        ("Widget 100%", "ES", 9),
    ] {
        store
            .insert(create_test_item(name, market, stock))
            .await
            .unwrap();
    }

    let request = PageRequest::new(0, 2)
        .unwrap()
        .sorted_by(SortField::Stock, SortDirection::Desc);
    let page = store
        .list(ItemFilter::new().name("WIDGET"), request)
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages(), 2);
    let stocks: Vec<_> = page.content.iter().map(|i| i.stock).collect();
    assert_eq!(stocks, vec![9, 3]);

    let literal = store
        .list(ItemFilter::new().name("100%"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(literal.total_elements, 1);

    let spain = store
        .list(ItemFilter::new().market("es"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(spain.total_elements, 2);

    let inactive = store
        .list(
            ItemFilter::new().status(ItemStatus::Inactive),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(inactive.total_elements, 0);
}

#[tokio::test]
#[serial]
async fn price_round_trips_exactly() {
    let store = get_test_store().await;

    for price in ["1.2345", "0.0001", "999999999999999.9999"] {
        let mut item = create_test_item("Widget", "PT", 1);
        item.price = price.parse().unwrap();

        let stored = store.insert(item.clone()).await.unwrap();
        assert_eq!(stored.price, item.price);
        assert_eq!(store.get(item.id).await.unwrap().price, item.price);
    }
}

#[tokio::test]
#[serial]
async fn name_order_matches_in_memory_store() {
    let store = get_test_store().await;
    let memory = item_store::InMemoryItemStore::new();
    for name in ["apple", "Banana", "cherry", "Apricot"] {
        let item = create_test_item(name, "PT", 1);
        store.insert(item.clone()).await.unwrap();
        memory.insert(item).await.unwrap();
    }

    let request = PageRequest::default().sorted_by(SortField::Name, SortDirection::Asc);
    let names = |page: item_store::Page<Item>| -> Vec<String> {
        page.content.into_iter().map(|item| item.name).collect()
    };

    let from_db = names(store.list(ItemFilter::new(), request).await.unwrap());
    let from_memory = names(memory.list(ItemFilter::new(), request).await.unwrap());
    assert_eq!(from_db, ["Apricot", "Banana", "apple", "cherry"]);
    assert_eq!(from_db, from_memory);
}
