use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{ItemId, ItemPatch, Market, NewItem, StockManager, transitions};
use item_store::InMemoryItemStore;
use rust_decimal::Decimal;

fn widget(stock: i64) -> NewItem {
    NewItem::new("Widget", Market::parse("PT").unwrap(), Decimal::new(999, 2)).with_stock(stock)
}

fn bench_create_item(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let manager = StockManager::new(InMemoryItemStore::new());

    c.bench_function("domain/create_item", |b| {
        b.iter(|| {
            rt.block_on(async {
                manager.create(widget(10)).await.unwrap();
            });
        });
    });
}

fn bench_restock_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let manager = StockManager::new(InMemoryItemStore::new());
    let item = rt.block_on(async { manager.create(widget(10)).await.unwrap() });

    c.bench_function("domain/restock_then_dispatch", |b| {
        b.iter(|| {
            rt.block_on(async {
                manager.restock(item.id, 3).await.unwrap();
                manager.dispatch(item.id, 3).await.unwrap();
            });
        });
    });
}

fn bench_update(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let manager = StockManager::new(InMemoryItemStore::new());
    let item = rt.block_on(async { manager.create(widget(10)).await.unwrap() });

    c.bench_function("domain/partial_update", |b| {
        b.iter(|| {
            rt.block_on(async {
                let patch = ItemPatch::new()
                    .price(Decimal::new(1250, 2))
                    .description("Updated");
                manager.update(item.id, patch).await.unwrap();
            });
        });
    });
}

fn bench_transitions(c: &mut Criterion) {
    let item = transitions::created(ItemId::new(), widget(1_000), Utc::now()).unwrap();

    c.bench_function("domain/pure_dispatch_transition", |b| {
        b.iter(|| transitions::dispatched(&item, 7, Utc::now()).unwrap());
    });
}

criterion_group!(
    benches,
    bench_create_item,
    bench_restock_dispatch,
    bench_update,
    bench_transitions,
);
criterion_main!(benches);
