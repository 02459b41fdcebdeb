//! Batch mutations with per-item failure isolation.

use core::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockdeck_catalog::{ProductKind, ProductRecord, ProductStore};
use stockdeck_core::{CatalogError, CatalogResult, FieldName, ProductId, StockSettings};
use stockdeck_licensing::{GateDecision, LicenseValidator, UsageGate};

use crate::rollup::AggregationEngine;

/// Arithmetic applied to the current field value of every selected product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    Set,
    Increase,
    Decrease,
    IncreasePercent,
    DecreasePercent,
}

impl BulkOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkOperation::Set => "set",
            BulkOperation::Increase => "increase",
            BulkOperation::Decrease => "decrease",
            BulkOperation::IncreasePercent => "increase_percent",
            BulkOperation::DecreasePercent => "decrease_percent",
        }
    }

    /// Next value for a current one. `Set` ignores the current value; the
    /// percent operations scale it.
    pub fn apply(self, current: f64, value: f64) -> f64 {
        match self {
            BulkOperation::Set => value,
            BulkOperation::Increase => current + value,
            BulkOperation::Decrease => current - value,
            BulkOperation::IncreasePercent => current * (1.0 + value / 100.0),
            BulkOperation::DecreasePercent => current * (1.0 - value / 100.0),
        }
    }
}

impl core::fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkOperation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(BulkOperation::Set),
            "increase" => Ok(BulkOperation::Increase),
            "decrease" => Ok(BulkOperation::Decrease),
            "increase_percent" => Ok(BulkOperation::IncreasePercent),
            "decrease_percent" => Ok(BulkOperation::DecreasePercent),
            other => Err(CatalogError::invalid_enum("operation", other)),
        }
    }
}

/// Summary of one bulk call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub updated_count: u64,
    /// Ids that were not mutated, in selection order.
    pub skipped_ids: Vec<ProductId>,
    /// Set when this call pushed the change counter to the free limit with no
    /// valid license. The writes stand; the next call will be denied.
    pub limit_reached: bool,
}

/// Applies one arithmetic transformation across a selection of products.
///
/// The gate is consulted once per call. Per-item failures (missing record,
/// variable parent, store error) record the id and move on; a single bad item
/// never aborts the batch.
#[derive(Debug)]
pub struct BulkOperationEngine<S, V> {
    store: S,
    rollups: AggregationEngine<S>,
    gate: Arc<UsageGate<V>>,
    settings: StockSettings,
}

impl<S, V> BulkOperationEngine<S, V>
where
    S: ProductStore + Clone,
    V: LicenseValidator,
{
    pub fn new(store: S, gate: Arc<UsageGate<V>>, settings: StockSettings) -> Self {
        let rollups = AggregationEngine::new(
            store.clone(),
            settings.thresholds,
            settings.colors.clone(),
        );
        Self {
            store,
            rollups,
            gate,
            settings,
        }
    }

    /// Apply `operation` with `value` to `field` on every selected id.
    ///
    /// Bulk edits are restricted to stock quantity and the two prices; other
    /// fields abort before any work. A gate denial also aborts the whole
    /// call.
    pub fn bulk_apply(
        &self,
        ids: &[ProductId],
        field: FieldName,
        operation: BulkOperation,
        value: f64,
    ) -> CatalogResult<BulkResult> {
        if ids.is_empty() {
            return Err(CatalogError::validation("no products selected"));
        }
        if !is_bulk_field(field) {
            return Err(CatalogError::unsupported_field(field.as_str()));
        }
        if let GateDecision::Denied(reason) = self.gate.check_allowed(&self.settings.license_key) {
            return Err(CatalogError::denied(reason));
        }

        let mut skipped_ids = Vec::new();
        let mut updated_count = 0u64;

        for &id in ids {
            let Some(mut record) = self.store.get(id) else {
                skipped_ids.push(id);
                continue;
            };

            // Variable parents have no directly-settable stock or price,
            // only the rollup over their variations.
            if record.kind == ProductKind::Variable {
                skipped_ids.push(id);
                continue;
            }

            let Some(current) = current_value(&record, field) else {
                skipped_ids.push(id);
                continue;
            };

            let next = operation.apply(current, value);
            write_value(&mut record, field, next);

            if let Err(e) = self.store.save(&record) {
                warn!(product = %id, error = %e, "bulk save failed, skipping item");
                skipped_ids.push(id);
                continue;
            }

            self.gate.record_change();
            updated_count += 1;

            if record.is_variation() && field == FieldName::StockQuantity {
                self.refresh_parent(&record);
            }
        }

        // The items already written stand either way; the flag tells the
        // caller the free tier ran out during this call.
        let limit_reached = updated_count > 0
            && !self
                .gate
                .check_allowed(&self.settings.license_key)
                .is_allowed();

        debug!(
            updated = updated_count,
            skipped = skipped_ids.len(),
            limit_reached,
            "bulk operation finished"
        );

        Ok(BulkResult {
            updated_count,
            skipped_ids,
            limit_reached,
        })
    }

    fn refresh_parent(&self, record: &ProductRecord) {
        let Some(parent_id) = record.parent_id else {
            return;
        };
        match self.rollups.recompute_parent(parent_id) {
            Ok(rollup) => debug!(
                parent = %parent_id,
                total_stock = rollup.total_stock,
                "parent rollup refreshed"
            ),
            Err(e) => warn!(parent = %parent_id, error = %e, "parent rollup recompute failed"),
        }
    }
}

fn is_bulk_field(field: FieldName) -> bool {
    matches!(
        field,
        FieldName::StockQuantity | FieldName::RegularPrice | FieldName::SalePrice
    )
}

/// Current value of a bulk-editable field. Unknown stock reads as zero.
fn current_value(record: &ProductRecord, field: FieldName) -> Option<f64> {
    match field {
        FieldName::StockQuantity => Some(record.display_quantity() as f64),
        FieldName::RegularPrice => Some(record.regular_price),
        FieldName::SalePrice => Some(record.sale_price),
        _ => None,
    }
}

fn write_value(record: &mut ProductRecord, field: FieldName, next: f64) {
    match field {
        // Stock counts in whole units; fractional results truncate toward
        // zero.
        FieldName::StockQuantity => record.stock_quantity = Some(next.trunc() as i64),
        FieldName::RegularPrice => record.regular_price = next,
        FieldName::SalePrice => record.sale_price = next,
        _ => {}
    }
}
