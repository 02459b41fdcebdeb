//! `stockdeck-catalog` — product value objects and the store seam.
//!
//! The catalog itself is owned by an external system; this crate defines the
//! record shape the engine mutates and the trait it reaches the store
//! through.

pub mod product;
pub mod store;

pub use product::{ProductKind, ProductRecord};
pub use store::{ProductStore, StoreError};
