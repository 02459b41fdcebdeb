//! In-memory change journal.
//!
//! Intended for tests/dev; real deployments append to durable storage.

use std::sync::RwLock;

use stockdeck_engine::{AuditError, ChangeEntry, ChangeLog};

#[derive(Debug, Default)]
pub struct InMemoryChangeLog {
    entries: RwLock<Vec<ChangeEntry>>,
}

impl InMemoryChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the journal so far, oldest first.
    pub fn entries(&self) -> Vec<ChangeEntry> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChangeLog for InMemoryChangeLog {
    fn append(&self, entry: ChangeEntry) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditError::append("lock poisoned"))?;
        entries.push(entry);
        Ok(())
    }
}
