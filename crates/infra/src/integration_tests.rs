//! Integration tests for the full mutation pipeline.
//!
//! Tests: gate → mutator → store → classification → rollup, and the bulk
//! engine over the same store, with the in-memory backends.

use std::sync::Arc;

use stockdeck_catalog::{ProductKind, ProductRecord, ProductStore};
use stockdeck_core::{CatalogError, FieldName, ProductId, StockSettings};
use stockdeck_engine::{BulkOperation, BulkOperationEngine, StockEditor};
use stockdeck_licensing::{StaticLicenseValidator, UsageGate};

use crate::changelog::InMemoryChangeLog;
use crate::product_store::InMemoryProductStore;

fn pid(raw: u64) -> ProductId {
    ProductId::new(raw)
}

/// One variable parent with three variations, plus two simple products.
fn seeded_store() -> Arc<InMemoryProductStore> {
    let parent = ProductRecord::new(pid(10), ProductKind::Variable, "Hoodie");
    let mut small = ProductRecord::variation(pid(11), pid(10), "Hoodie - S");
    small.stock_quantity = Some(2);
    small.total_sales = 14;
    let mut medium = ProductRecord::variation(pid(12), pid(10), "Hoodie - M");
    medium.stock_quantity = Some(5);
    medium.total_sales = 9;
    let large = ProductRecord::variation(pid(13), pid(10), "Hoodie - L");

    let mut mug = ProductRecord::new(pid(1), ProductKind::Simple, "Mug");
    mug.stock_quantity = Some(20);
    mug.regular_price = 12.0;
    let mut poster = ProductRecord::new(pid(2), ProductKind::Simple, "Poster");
    poster.stock_quantity = Some(1);
    poster.regular_price = 8.0;

    Arc::new(InMemoryProductStore::seed([
        parent, small, medium, large, mug, poster,
    ]))
}

fn free_gate() -> Arc<UsageGate<StaticLicenseValidator>> {
    Arc::new(UsageGate::new(StaticLicenseValidator::always_invalid()))
}

#[test]
fn variation_update_rolls_up_into_the_parent() {
    stockdeck_observability::init();

    let store = seeded_store();
    let changelog = Arc::new(InMemoryChangeLog::new());
    let editor = StockEditor::new(
        store.clone(),
        free_gate(),
        changelog.clone(),
        StockSettings::default(),
    );

    let outcome = editor
        .update_field(pid(11), FieldName::StockQuantity, "3", None)
        .unwrap();

    // 3 (updated S) + 5 (M) + 0 (L, untracked) = 8.
    let rollup = outcome.parent.expect("parent rollup");
    assert_eq!(rollup.parent_id, pid(10));
    assert_eq!(rollup.total_stock, 8);
    assert_eq!(rollup.total_sales, 23);
    assert_eq!(rollup.color.as_str(), "#48bb78");

    // The journal saw exactly this change.
    let entries = changelog.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product_id, pid(11));
    assert_eq!(entries[0].old_value, "2");
    assert_eq!(entries[0].new_value, "3");
}

#[test]
fn bulk_and_single_updates_share_the_same_counter() {
    let store = seeded_store();
    let gate = free_gate();
    let settings = StockSettings::default();

    let editor = StockEditor::new(
        store.clone(),
        gate.clone(),
        Arc::new(InMemoryChangeLog::new()),
        settings.clone(),
    );
    let bulk = BulkOperationEngine::new(store.clone(), gate.clone(), settings);

    editor
        .update_field(pid(1), FieldName::RegularPrice, "13.5", None)
        .unwrap();
    bulk.bulk_apply(
        &[pid(1), pid(2)],
        FieldName::RegularPrice,
        BulkOperation::Increase,
        1.0,
    )
    .unwrap();

    assert_eq!(gate.change_count(), 3);
    assert!((store.get(pid(1)).unwrap().regular_price - 14.5).abs() < 1e-9);
    assert!((store.get(pid(2)).unwrap().regular_price - 9.0).abs() < 1e-9);
}

#[test]
fn exhausting_the_free_tier_locks_both_surfaces() {
    let store = seeded_store();
    let gate = Arc::new(UsageGate::with_change_count(
        StaticLicenseValidator::always_invalid(),
        19,
    ));
    let settings = StockSettings::default();

    let editor = StockEditor::new(
        store.clone(),
        gate.clone(),
        Arc::new(InMemoryChangeLog::new()),
        settings.clone(),
    );
    let bulk = BulkOperationEngine::new(store.clone(), gate.clone(), settings);

    // The 20th change goes through and trips the limit.
    editor
        .update_field(pid(1), FieldName::StockQuantity, "19", None)
        .unwrap();
    assert_eq!(gate.change_count(), 20);

    let err = editor
        .update_field(pid(1), FieldName::StockQuantity, "18", None)
        .unwrap_err();
    assert!(matches!(err, CatalogError::Denied(_)));

    let err = bulk
        .bulk_apply(&[pid(1)], FieldName::StockQuantity, BulkOperation::Set, 5.0)
        .unwrap_err();
    assert!(matches!(err, CatalogError::Denied(_)));
}

#[test]
fn a_valid_license_reopens_an_exhausted_gate() {
    let store = seeded_store();
    let gate = Arc::new(UsageGate::with_change_count(
        StaticLicenseValidator::always_valid(),
        500,
    ));
    let mut settings = StockSettings::default();
    settings.license_key = "ABC-123".to_string();

    let editor = StockEditor::new(
        store,
        gate,
        Arc::new(InMemoryChangeLog::new()),
        settings,
    );
    editor
        .update_field(pid(1), FieldName::StockQuantity, "7", None)
        .unwrap();
}

#[test]
fn bulk_skips_are_isolated_and_ordered() {
    let store = seeded_store();
    let bulk = BulkOperationEngine::new(store.clone(), free_gate(), StockSettings::default());

    // 10 is a variable parent, 99 does not exist; both skip, the rest apply.
    let result = bulk
        .bulk_apply(
            &[pid(10), pid(1), pid(99), pid(2)],
            FieldName::StockQuantity,
            BulkOperation::Decrease,
            1.0,
        )
        .unwrap();

    assert_eq!(result.updated_count, 2);
    assert_eq!(result.skipped_ids, vec![pid(10), pid(99)]);
    assert_eq!(store.get(pid(1)).unwrap().stock_quantity, Some(19));
    assert_eq!(store.get(pid(2)).unwrap().stock_quantity, Some(0));
}

#[test]
fn outcomes_serialize_for_the_transport_layer() {
    let store = seeded_store();
    let editor = StockEditor::new(
        store,
        free_gate(),
        Arc::new(InMemoryChangeLog::new()),
        StockSettings::default(),
    );

    let outcome = editor
        .update_field(pid(1), FieldName::StockQuantity, "5", None)
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["product_id"], 1);
    assert_eq!(json["field"], "stock_quantity");
    assert_eq!(json["stock_quantity"], 5);
    assert_eq!(json["stock_status"], "instock");
    assert_eq!(json["color"], "#ed8936");
    assert!(json["parent"].is_null());
}
