//! `stockdeck-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no infrastructure
//! concerns): identifiers, the error taxonomy, the closed field enums,
//! stock-level classification and the persisted dashboard settings.

pub mod classify;
pub mod error;
pub mod field;
pub mod id;
pub mod settings;

pub use classify::{ColorScheme, ColorToken, StockLevel, Thresholds, classify};
pub use error::{CatalogError, CatalogResult};
pub use field::{FieldName, FieldValue, StockStatus};
pub use id::{ActorId, ProductId};
pub use settings::{RawSettings, StockSettings};
