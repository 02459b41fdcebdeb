//! Product store seam.

use std::sync::Arc;

use thiserror::Error;

use stockdeck_core::ProductId;

use crate::product::ProductRecord;

/// A write the external catalog could not persist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Read/write access to the externally-owned catalog.
///
/// The engine never creates or deletes products through this seam; it reads
/// records and saves field-level mutations back. Implementations decide what
/// "live" means for children (drafts, trashed variations, etc.).
pub trait ProductStore {
    /// Resolve an id to its current record, if any.
    fn get(&self, id: ProductId) -> Option<ProductRecord>;

    /// Persist a mutated record.
    fn save(&self, record: &ProductRecord) -> Result<(), StoreError>;

    /// Live variation children of a variable parent, in id order.
    fn children_of(&self, parent_id: ProductId) -> Vec<ProductRecord>;
}

impl<S: ProductStore + ?Sized> ProductStore for &S {
    fn get(&self, id: ProductId) -> Option<ProductRecord> {
        (**self).get(id)
    }

    fn save(&self, record: &ProductRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn children_of(&self, parent_id: ProductId) -> Vec<ProductRecord> {
        (**self).children_of(parent_id)
    }
}

impl<S: ProductStore + ?Sized> ProductStore for Arc<S> {
    fn get(&self, id: ProductId) -> Option<ProductRecord> {
        (**self).get(id)
    }

    fn save(&self, record: &ProductRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn children_of(&self, parent_id: ProductId) -> Vec<ProductRecord> {
        (**self).children_of(parent_id)
    }
}
