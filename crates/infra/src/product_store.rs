//! In-memory product store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use stockdeck_catalog::{ProductRecord, ProductStore, StoreError};
use stockdeck_core::ProductId;

#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, ProductRecord>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing catalog entries.
    pub fn seed(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    /// Insert or replace one record directly (test fixtures).
    pub fn upsert(&self, record: ProductRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.id, record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Option<ProductRecord> {
        self.records.read().ok()?.get(&id).cloned()
    }

    fn save(&self, record: &ProductRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn children_of(&self, parent_id: ProductId) -> Vec<ProductRecord> {
        let Ok(records) = self.records.read() else {
            return Vec::new();
        };
        let mut children: Vec<_> = records
            .values()
            .filter(|r| r.is_variation() && r.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|r| r.id);
        children
    }
}
