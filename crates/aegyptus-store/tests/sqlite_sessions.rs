//! End-to-end cart sessions against a SQLite database file.

use aegyptus_core::{CartScope, CatalogSnapshot, Money, MutationOutcome, ProductId};
use aegyptus_store::{CartSession, Database, DbConfig, KeyValueStore};
use uuid::Uuid;

fn snapshot(id: u64, price_cents: i64, stock: u32) -> CatalogSnapshot {
    CatalogSnapshot::new(
        ProductId::new(id),
        format!("Artifact {}", id),
        Money::from_cents(price_cents),
        stock,
    )
}

fn temp_db_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("aegyptus-test-{}.db", Uuid::new_v4()))
}

#[tokio::test]
async fn cart_survives_restart() {
    let path = temp_db_path();

    {
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let mut session = CartSession::open(db.cart_store(), "cart").await;
        session.add_units(&snapshot(1, 2500, 3), 2).await;
        session.add_item(&snapshot(2, 999, 1)).await;
        db.close().await;
    }

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let session = CartSession::open(db.cart_store(), "cart").await;

    assert_eq!(session.cart().len(), 2);
    assert_eq!(session.cart().item_count(), 3);
    assert_eq!(session.cart().subtotal(), Money::from_cents(5999));
    db.close().await;

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn corrupt_row_is_discarded() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = db.cart_store();
    store.set("cart", "[{\"productId\":").await.unwrap();

    let mut session = CartSession::open(store.clone(), "cart").await;
    assert!(session.cart().is_empty());
    assert!(store.get("cart").await.unwrap().is_none());

    assert_eq!(
        session.add_item(&snapshot(1, 100, 2)).await,
        MutationOutcome::Applied
    );
    assert!(store.get("cart").await.unwrap().is_some());
}

#[tokio::test]
async fn guest_and_account_carts_are_separate() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = db.cart_store();
    let guest = CartScope::new_guest();
    let account = CartScope::Account("42".into());

    let mut session = CartSession::open_scope(store.clone(), "cart", &guest).await;
    session.add_item(&snapshot(1, 100, 5)).await;

    session.rebind_scope("cart", &account).await;
    assert!(session.cart().is_empty());
    session.add_units(&snapshot(2, 100, 5), 2).await;

    let keys = store.keys_with_prefix("cart:").await.unwrap();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"cart:account:42".to_string()));
    assert!(keys.contains(&guest.storage_key("cart")));
}
