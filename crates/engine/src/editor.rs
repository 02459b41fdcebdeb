//! Single-update orchestration: gate → mutate → journal → classify → rollup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockdeck_catalog::{ProductRecord, ProductStore};
use stockdeck_core::{
    ActorId, CatalogError, CatalogResult, ColorToken, FieldName, FieldValue, ProductId,
    StockSettings, StockStatus, classify,
};
use stockdeck_licensing::{GateDecision, LicenseValidator, UsageGate};

use crate::audit::{ChangeEntry, ChangeLog};
use crate::mutator::FieldMutator;
use crate::rollup::{AggregationEngine, ParentRollup};

/// Fully refreshed row data the dashboard repaints after one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub product_id: ProductId,
    pub field: FieldName,
    pub new_value: FieldValue,
    pub name: String,
    pub stock_quantity: Option<i64>,
    pub stock_status: StockStatus,
    pub regular_price: f64,
    pub sale_price: f64,
    pub color: ColorToken,
    /// Present when the write was a variation stock change: the parent row
    /// needs its freshly recomputed total.
    pub parent: Option<ParentRollup>,
}

/// Orchestrates one validated field change end to end.
///
/// Request-scoped: build it from the current settings snapshot, run one or
/// more updates, drop it. Only the gate outlives requests.
#[derive(Debug)]
pub struct StockEditor<S, V, L> {
    mutator: FieldMutator<S>,
    rollups: AggregationEngine<S>,
    gate: Arc<UsageGate<V>>,
    changelog: L,
    settings: StockSettings,
}

impl<S, V, L> StockEditor<S, V, L>
where
    S: ProductStore + Clone,
    V: LicenseValidator,
    L: ChangeLog,
{
    pub fn new(store: S, gate: Arc<UsageGate<V>>, changelog: L, settings: StockSettings) -> Self {
        let mutator = FieldMutator::new(store.clone());
        let rollups = AggregationEngine::new(
            store,
            settings.thresholds,
            settings.colors.clone(),
        );
        Self {
            mutator,
            rollups,
            gate,
            changelog,
            settings,
        }
    }

    /// Apply one field change and return the refreshed row.
    ///
    /// The gate is consulted before any store work; a denial leaves the
    /// catalog and the counter untouched. Journal failures are logged and
    /// swallowed — the mutation already happened.
    pub fn update_field(
        &self,
        id: ProductId,
        field: FieldName,
        raw_value: &str,
        actor: Option<ActorId>,
    ) -> CatalogResult<UpdateOutcome> {
        if let GateDecision::Denied(reason) = self.gate.check_allowed(&self.settings.license_key) {
            return Err(CatalogError::denied(reason));
        }

        let snapshot = self.mutator.apply(id, field, raw_value)?;
        self.gate.record_change();

        let entry = ChangeEntry::record(id, field, &snapshot.old_value, &snapshot.new_value, actor);
        if let Err(e) = self.changelog.append(entry) {
            warn!(product = %id, error = %e, "change journal append failed");
        }

        let record = snapshot.record;
        let color = classify(
            record.display_quantity(),
            &self.settings.thresholds,
            &self.settings.colors,
        );

        let parent = if record.is_variation() && field == FieldName::StockQuantity {
            self.parent_rollup_for(&record)
        } else {
            None
        };

        debug!(product = %id, field = %field, "field updated");

        Ok(UpdateOutcome {
            product_id: record.id,
            field,
            new_value: snapshot.new_value,
            name: record.name,
            stock_quantity: record.stock_quantity,
            stock_status: record.stock_status,
            regular_price: record.regular_price,
            sale_price: record.sale_price,
            color,
            parent,
        })
    }

    /// Recompute the parent total after a variation stock write. The write
    /// itself already succeeded, so a rollup failure degrades to a missing
    /// parent block rather than failing the update.
    fn parent_rollup_for(&self, record: &ProductRecord) -> Option<ParentRollup> {
        let parent_id = record.parent_id?;
        match self.rollups.recompute_parent(parent_id) {
            Ok(rollup) => Some(rollup),
            Err(e) => {
                warn!(parent = %parent_id, error = %e, "parent rollup recompute failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use stockdeck_catalog::{ProductKind, ProductRecord, StoreError};
    use stockdeck_licensing::StaticLicenseValidator;

    use crate::audit::{AuditError, NoopChangeLog};

    #[derive(Debug, Default)]
    struct MapStore {
        records: RwLock<HashMap<ProductId, ProductRecord>>,
        fail_saves: bool,
    }

    impl MapStore {
        fn with(records: impl IntoIterator<Item = ProductRecord>) -> Self {
            Self {
                records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
                fail_saves: false,
            }
        }
    }

    impl ProductStore for MapStore {
        fn get(&self, id: ProductId) -> Option<ProductRecord> {
            self.records.read().unwrap().get(&id).cloned()
        }

        fn save(&self, record: &ProductRecord) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::backend("write refused"));
            }
            self.records.write().unwrap().insert(record.id, record.clone());
            Ok(())
        }

        fn children_of(&self, parent_id: ProductId) -> Vec<ProductRecord> {
            let mut children: Vec<_> = self
                .records
                .read()
                .unwrap()
                .values()
                .filter(|r| r.is_variation() && r.parent_id == Some(parent_id))
                .cloned()
                .collect();
            children.sort_by_key(|r| r.id);
            children
        }
    }

    #[derive(Debug, Default)]
    struct VecChangeLog {
        entries: RwLock<Vec<ChangeEntry>>,
    }

    impl ChangeLog for VecChangeLog {
        fn append(&self, entry: ChangeEntry) -> Result<(), AuditError> {
            self.entries.write().unwrap().push(entry);
            Ok(())
        }
    }

    fn pid(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    fn simple(id: u64) -> ProductRecord {
        let mut record = ProductRecord::new(pid(id), ProductKind::Simple, "Mug");
        record.stock_quantity = Some(10);
        record
    }

    fn editor<'a>(
        store: &'a MapStore,
        changelog: &'a VecChangeLog,
    ) -> StockEditor<&'a MapStore, StaticLicenseValidator, &'a VecChangeLog> {
        let gate = Arc::new(UsageGate::new(StaticLicenseValidator::always_invalid()));
        StockEditor::new(store, gate, changelog, StockSettings::default())
    }

    #[test]
    fn update_returns_the_refreshed_row() {
        let store = MapStore::with([simple(1)]);
        let changelog = VecChangeLog::default();
        let outcome = editor(&store, &changelog)
            .update_field(pid(1), FieldName::StockQuantity, "2", None)
            .unwrap();

        assert_eq!(outcome.product_id, pid(1));
        assert_eq!(outcome.new_value, FieldValue::Int(2));
        assert_eq!(outcome.stock_quantity, Some(2));
        // 2 < low threshold 3.
        assert_eq!(outcome.color.as_str(), "#f56565");
        assert!(outcome.parent.is_none());
    }

    #[test]
    fn updates_are_journaled() {
        let store = MapStore::with([simple(1)]);
        let changelog = VecChangeLog::default();
        editor(&store, &changelog)
            .update_field(pid(1), FieldName::RegularPrice, "19.90", None)
            .unwrap();

        let entries = changelog.entries.read().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, FieldName::RegularPrice);
        assert_eq!(entries[0].old_value, "0");
        assert_eq!(entries[0].new_value, "19.9");
    }

    #[test]
    fn each_update_counts_one_change() {
        let store = MapStore::with([simple(1)]);
        let gate = Arc::new(UsageGate::new(StaticLicenseValidator::always_invalid()));
        let editor = StockEditor::new(&store, gate.clone(), NoopChangeLog, StockSettings::default());

        editor
            .update_field(pid(1), FieldName::StockQuantity, "4", None)
            .unwrap();
        editor
            .update_field(pid(1), FieldName::StockQuantity, "5", None)
            .unwrap();
        assert_eq!(gate.change_count(), 2);
    }

    #[test]
    fn denied_gate_blocks_before_any_work() {
        let store = MapStore::with([simple(1)]);
        let gate = Arc::new(UsageGate::with_change_count(
            StaticLicenseValidator::always_invalid(),
            20,
        ));
        let editor = StockEditor::new(&store, gate, NoopChangeLog, StockSettings::default());

        let err = editor
            .update_field(pid(1), FieldName::StockQuantity, "4", None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Denied(_)));
        assert_eq!(store.get(pid(1)).unwrap().stock_quantity, Some(10));
    }

    #[test]
    fn failed_saves_do_not_count_changes() {
        let mut store = MapStore::with([simple(1)]);
        store.fail_saves = true;
        let gate = Arc::new(UsageGate::new(StaticLicenseValidator::always_invalid()));
        let editor = StockEditor::new(&store, gate.clone(), NoopChangeLog, StockSettings::default());

        let err = editor
            .update_field(pid(1), FieldName::StockQuantity, "4", None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Persistence(_)));
        assert_eq!(gate.change_count(), 0);
    }

    #[test]
    fn variation_stock_writes_return_the_parent_rollup() {
        let parent = ProductRecord::new(pid(10), ProductKind::Variable, "Hoodie");
        let mut a = ProductRecord::variation(pid(11), pid(10), "S");
        a.stock_quantity = Some(2);
        let mut b = ProductRecord::variation(pid(12), pid(10), "M");
        b.stock_quantity = Some(5);
        let store = MapStore::with([parent, a, b]);
        let changelog = VecChangeLog::default();

        let outcome = editor(&store, &changelog)
            .update_field(pid(11), FieldName::StockQuantity, "3", None)
            .unwrap();

        let rollup = outcome.parent.expect("variation stock write must roll up");
        assert_eq!(rollup.parent_id, pid(10));
        assert_eq!(rollup.total_stock, 8);
        // 8 > medium threshold 7.
        assert_eq!(rollup.color.as_str(), "#48bb78");
    }

    #[test]
    fn variation_price_writes_do_not_roll_up() {
        let parent = ProductRecord::new(pid(10), ProductKind::Variable, "Hoodie");
        let a = ProductRecord::variation(pid(11), pid(10), "S");
        let store = MapStore::with([parent, a]);
        let changelog = VecChangeLog::default();

        let outcome = editor(&store, &changelog)
            .update_field(pid(11), FieldName::RegularPrice, "24.5", None)
            .unwrap();
        assert!(outcome.parent.is_none());
    }

    #[test]
    fn actor_flows_into_the_journal() {
        let store = MapStore::with([simple(1)]);
        let changelog = VecChangeLog::default();
        let actor = ActorId::new();

        editor(&store, &changelog)
            .update_field(pid(1), FieldName::Name, "Enamel Mug", Some(actor))
            .unwrap();

        let entries = changelog.entries.read().unwrap();
        assert_eq!(entries[0].actor, Some(actor));
    }
}
