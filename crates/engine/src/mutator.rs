//! Single-field mutation: coercion, validation, persistence.

use stockdeck_catalog::{ProductRecord, ProductStore};
use stockdeck_core::{CatalogError, CatalogResult, FieldName, FieldValue, ProductId, StockStatus};

/// Outcome of one applied field mutation: the saved record plus the typed
/// old/new values (feeds the change journal).
#[derive(Debug, Clone, PartialEq)]
pub struct MutatedSnapshot {
    pub record: ProductRecord,
    pub field: FieldName,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
}

/// Validates and applies a single field change to one product or variation.
///
/// Classification and parent rollups are the caller's concern; the mutator
/// only coerces, mutates and saves.
#[derive(Debug)]
pub struct FieldMutator<S> {
    store: S,
}

impl<S: ProductStore> FieldMutator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Coerce `raw_value` per field, mutate the record and persist it.
    ///
    /// A store failure surfaces as `Persistence` and leaves nothing written;
    /// the caller must not count the change.
    pub fn apply(
        &self,
        id: ProductId,
        field: FieldName,
        raw_value: &str,
    ) -> CatalogResult<MutatedSnapshot> {
        let mut record = self.store.get(id).ok_or(CatalogError::NotFound(id))?;
        let old_value = record.field_value(field);

        match field {
            FieldName::StockQuantity => {
                // Lenient coercion and no zero floor, matching the upstream
                // dashboard: negative stock is accepted as-is.
                record.stock_quantity = Some(coerce_int(raw_value));
            }
            FieldName::StockStatus => {
                record.stock_status = raw_value.parse::<StockStatus>()?;
            }
            FieldName::ManageStock => {
                record.manage_stock = raw_value == "yes";
            }
            FieldName::RegularPrice => {
                record.regular_price = coerce_float(raw_value);
            }
            FieldName::SalePrice => {
                record.sale_price = coerce_float(raw_value);
            }
            FieldName::Name => {
                record.name = raw_value.to_string();
            }
        }

        self.store
            .save(&record)
            .map_err(|e| CatalogError::persistence(e.to_string()))?;

        let new_value = record.field_value(field);
        Ok(MutatedSnapshot {
            record,
            field,
            old_value,
            new_value,
        })
    }
}

/// Integer coercion with C-style leading-digits semantics: an optional sign
/// and the longest digit prefix parse, anything else is 0. Kept lenient for
/// compatibility with the upstream dashboard's input handling.
fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };

    let prefix: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if prefix.is_empty() {
        return 0;
    }

    match prefix.parse::<i64>() {
        Ok(v) => sign * v,
        // Prefix longer than i64: saturate instead of wrapping.
        Err(_) => {
            if sign < 0 {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    }
}

/// Float coercion: the longest numeric prefix parses, anything else is 0.0.
/// Non-numeric price input silently becoming zero is a known upstream quirk,
/// preserved rather than silently fixed.
fn coerce_float(raw: &str) -> f64 {
    let s = raw.trim();
    let mut value = 0.0;
    for (idx, c) in s.char_indices() {
        let end = idx + c.len_utf8();
        if let Ok(parsed) = s[..end].parse::<f64>()
            && parsed.is_finite()
        {
            value = parsed;
        }
    }
    value
}
