//! The product record as the engine sees it.

use serde::{Deserialize, Serialize};

use stockdeck_core::{FieldName, FieldValue, ProductId, StockStatus};

/// Catalog entry kind.
///
/// `Variation` rows carry a `parent_id`; `Variable` parents have no
/// directly-settable stock or price of their own, only the rollup over their
/// variations. `Other` covers grouped/external entries the engine lists but
/// never aggregates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Simple,
    Variable,
    Variation,
    Other,
}

/// Mutable snapshot of one catalog entry.
///
/// `stock_quantity` is `None` when the store tracks no quantity for the
/// entry; rollups and classification read that as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub kind: ProductKind,
    pub parent_id: Option<ProductId>,
    pub name: String,
    pub stock_quantity: Option<i64>,
    pub stock_status: StockStatus,
    pub manage_stock: bool,
    pub regular_price: f64,
    pub sale_price: f64,
    pub total_sales: i64,
}

impl ProductRecord {
    pub fn new(id: ProductId, kind: ProductKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            parent_id: None,
            name: name.into(),
            stock_quantity: None,
            stock_status: StockStatus::InStock,
            manage_stock: false,
            regular_price: 0.0,
            sale_price: 0.0,
            total_sales: 0,
        }
    }

    /// Variation child of a variable parent.
    pub fn variation(id: ProductId, parent_id: ProductId, name: impl Into<String>) -> Self {
        let mut record = Self::new(id, ProductKind::Variation, name);
        record.parent_id = Some(parent_id);
        record
    }

    pub fn is_variation(&self) -> bool {
        self.kind == ProductKind::Variation
    }

    /// Quantity as displayed: unknown stock reads as zero.
    pub fn display_quantity(&self) -> i64 {
        self.stock_quantity.unwrap_or(0)
    }

    /// Typed view of one mutable field (feeds the audit trail's old/new
    /// values).
    pub fn field_value(&self, field: FieldName) -> FieldValue {
        match field {
            FieldName::StockQuantity => self
                .stock_quantity
                .map(FieldValue::Int)
                .unwrap_or(FieldValue::Unset),
            FieldName::StockStatus => FieldValue::Status(self.stock_status),
            FieldName::ManageStock => FieldValue::Flag(self.manage_stock),
            FieldName::RegularPrice => FieldValue::Decimal(self.regular_price),
            FieldName::SalePrice => FieldValue::Decimal(self.sale_price),
            FieldName::Name => FieldValue::Text(self.name.clone()),
        }
    }
}
