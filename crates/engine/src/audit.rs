//! Change journal seam.
//!
//! Every applied single mutation appends one entry: which product, which
//! field, old and new values, who, when. Journal failures never fail the
//! mutation that produced the entry; callers log and continue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use stockdeck_core::{ActorId, FieldName, FieldValue, ProductId};

/// The journal could not take the entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("change journal append failed: {0}")]
    Append(String),
}

impl AuditError {
    pub fn append(msg: impl Into<String>) -> Self {
        Self::Append(msg.into())
    }
}

/// One journaled field change. Values are journaled as strings, the way the
/// dashboard displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub id: Uuid,
    pub product_id: ProductId,
    pub field: FieldName,
    pub old_value: String,
    pub new_value: String,
    pub actor: Option<ActorId>,
    pub changed_at: DateTime<Utc>,
}

impl ChangeEntry {
    pub fn record(
        product_id: ProductId,
        field: FieldName,
        old_value: &FieldValue,
        new_value: &FieldValue,
        actor: Option<ActorId>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            product_id,
            field,
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            actor,
            changed_at: Utc::now(),
        }
    }
}

/// Append-only audit sink.
pub trait ChangeLog {
    fn append(&self, entry: ChangeEntry) -> Result<(), AuditError>;
}

impl<L: ChangeLog + ?Sized> ChangeLog for &L {
    fn append(&self, entry: ChangeEntry) -> Result<(), AuditError> {
        (**self).append(entry)
    }
}

impl<L: ChangeLog + ?Sized> ChangeLog for std::sync::Arc<L> {
    fn append(&self, entry: ChangeEntry) -> Result<(), AuditError> {
        (**self).append(entry)
    }
}

/// Journal that drops every entry. For callers that do not keep history.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChangeLog;

impl ChangeLog for NoopChangeLog {
    fn append(&self, _entry: ChangeEntry) -> Result<(), AuditError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_capture_values_as_strings() {
        let entry = ChangeEntry::record(
            ProductId::new(7),
            FieldName::StockQuantity,
            &FieldValue::Unset,
            &FieldValue::Int(12),
            None,
        );
        assert_eq!(entry.product_id, ProductId::new(7));
        assert_eq!(entry.old_value, "");
        assert_eq!(entry.new_value, "12");
    }
}
