//! `stockdeck-engine` — the stock mutation and aggregation engine.
//!
//! Orchestrates single-field mutations, stock-tier classification, parent
//! rollups, batched operations and the usage gate over an injected product
//! store. Everything here is synchronous and request-scoped; the engines are
//! cheap to build per request from a settings snapshot.

pub mod audit;
pub mod bulk;
pub mod editor;
pub mod mutator;
pub mod rollup;

pub use audit::{AuditError, ChangeEntry, ChangeLog};
pub use bulk::{BulkOperation, BulkOperationEngine, BulkResult};
pub use editor::{StockEditor, UpdateOutcome};
pub use mutator::{FieldMutator, MutatedSnapshot};
pub use rollup::{AggregationEngine, ParentRollup};
