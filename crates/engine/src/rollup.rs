//! Parent rollups: variation totals recomputed on every variation write.

use serde::{Deserialize, Serialize};

use stockdeck_catalog::ProductStore;
use stockdeck_core::{CatalogError, CatalogResult, ColorScheme, ColorToken, ProductId, Thresholds, classify};

/// Aggregate view of a variable parent, derived from its live variations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRollup {
    pub parent_id: ProductId,
    pub total_stock: i64,
    pub total_sales: i64,
    pub color: ColorToken,
}

/// Recomputes a parent's stock and sales totals from its variation set.
///
/// The total is never cached: every variation write triggers a fresh
/// synchronous recompute, so a parent row can never display a stale total or
/// a single variation's quantity.
#[derive(Debug)]
pub struct AggregationEngine<S> {
    store: S,
    thresholds: Thresholds,
    colors: ColorScheme,
}

impl<S: ProductStore> AggregationEngine<S> {
    pub fn new(store: S, thresholds: Thresholds, colors: ColorScheme) -> Self {
        Self {
            store,
            thresholds,
            colors,
        }
    }

    /// Sum the parent's variation quantities (unknown quantity contributes 0)
    /// and sales, and classify the total.
    pub fn recompute_parent(&self, parent_id: ProductId) -> CatalogResult<ParentRollup> {
        if self.store.get(parent_id).is_none() {
            return Err(CatalogError::not_found(parent_id));
        }

        let children = self.store.children_of(parent_id);
        let total_stock: i64 = children.iter().map(|c| c.stock_quantity.unwrap_or(0)).sum();
        let total_sales: i64 = children.iter().map(|c| c.total_sales).sum();
        let color = classify(total_stock, &self.thresholds, &self.colors);

        Ok(ParentRollup {
            parent_id,
            total_stock,
            total_sales,
            color,
        })
    }
}
