use rust_decimal::Decimal;
use tempfile::TempDir;

use stitchcart::{
    core::store::CartStore,
    item::ProductSummary,
    persist::{CartSink, decode_cart_record, encode_cart_record, sqlite::SqliteCartSink},
    types::DEFAULT_STORAGE_KEY,
};

fn product(id: &str, price: i64) -> ProductSummary {
    ProductSummary::new(id, format!("Item {id}"), Decimal::new(price, 2), "")
}

#[test]
fn sqlite_round_trips_items_and_order() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("cart.db");

    let mut store = CartStore::new();
    store.add_to_cart(product("b", 1999));
    store.add_to_cart(product("a", 2550));
    store.add_to_cart(product("b", 1999));
    store.update_quantity("a", 3);

    let mut sink = SqliteCartSink::open(&db_path).expect("open sqlite");
    let record = encode_cart_record(&store.snapshot()).expect("encode");
    sink.store(DEFAULT_STORAGE_KEY, &record).expect("store");
    drop(sink);

    let reopened = SqliteCartSink::open(&db_path).expect("reopen");
    let hydrated = reopened.load_store(DEFAULT_STORAGE_KEY).expect("hydrate");

    assert_eq!(hydrated.items(), store.items());
    assert_eq!(hydrated.revision(), store.revision());
    assert_eq!(hydrated.total_price(), store.total_price());
}

#[test]
fn missing_key_hydrates_an_empty_cart() {
    let sink = SqliteCartSink::open_in_memory().expect("open");
    let store = sink.load_store(DEFAULT_STORAGE_KEY).expect("hydrate");
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
}

#[test]
fn later_writes_replace_earlier_ones() {
    let mut sink = SqliteCartSink::open_in_memory().expect("open");
    let mut store = CartStore::new();

    store.add_to_cart(product("1", 100));
    sink.store(DEFAULT_STORAGE_KEY, &encode_cart_record(&store.snapshot()).expect("encode"))
        .expect("store");
    store.clear_cart();
    sink.store(DEFAULT_STORAGE_KEY, &encode_cart_record(&store.snapshot()).expect("encode"))
        .expect("store");

    let raw = sink.load(DEFAULT_STORAGE_KEY).expect("load").expect("record");
    let snapshot = decode_cart_record(&raw).expect("decode");
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.revision, 2);
    assert!(sink.updated_ms(DEFAULT_STORAGE_KEY).expect("ts").is_some());
}

#[test]
fn removing_the_key_resets_to_empty() {
    let mut sink = SqliteCartSink::open_in_memory().expect("open");
    let mut store = CartStore::new();
    store.add_to_cart(product("1", 100));
    sink.store("cart", &encode_cart_record(&store.snapshot()).expect("encode"))
        .expect("store");

    assert!(sink.remove("cart").expect("remove"));
    assert!(!sink.remove("cart").expect("remove again"));
    assert!(sink.load_store("cart").expect("hydrate").is_empty());
}
