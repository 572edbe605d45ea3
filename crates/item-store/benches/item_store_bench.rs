use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use item_store::{
    InMemoryItemStore, Item, ItemFilter, ItemId, ItemStatus, ItemStore, Market, PageRequest,
    ReplaceOptions, SortDirection, SortField, Version,
};
use rust_decimal::Decimal;

fn make_item(n: i64) -> Item {
    let now = Utc::now();
    Item {
        id: ItemId::new(),
        name: format!("Item {n}"),
        description: None,
        market: Market::parse(if n % 2 == 0 { "PT" } else { "ES" }).unwrap(),
        price: Decimal::new(100 + n, 2),
        stock: n,
        status: ItemStatus::Active,
        version: Version::initial(),
        created_at: now,
        updated_at: now,
    }
}

fn bench_insert(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryItemStore::new();

    c.bench_function("item_store/insert", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.insert(make_item(1)).await.unwrap();
            });
        });
    });
}

fn bench_conditional_replace(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryItemStore::new();
    let item = rt.block_on(async { store.insert(make_item(1)).await.unwrap() });
    let id = item.id;

    c.bench_function("item_store/conditional_replace", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut current = store.find(id).await.unwrap().unwrap();
                let expected = current.version;
                current.stock += 1;
                store
                    .replace(current, ReplaceOptions::expect_version(expected))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_list_page(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryItemStore::new();
    rt.block_on(async {
        for n in 0..1_000 {
            store.insert(make_item(n)).await.unwrap();
        }
    });

    c.bench_function("item_store/list_filtered_page", |b| {
        b.iter(|| {
            rt.block_on(async {
                let request = PageRequest::new(2, 20)
                    .unwrap()
                    .sorted_by(SortField::Price, SortDirection::Desc);
                store
                    .list(ItemFilter::new().market("PT"), request)
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_conditional_replace,
    bench_list_page
);
criterion_main!(benches);
