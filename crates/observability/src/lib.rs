//! `stockdeck-observability` — tracing/logging initialization.

pub mod telemetry;

pub use telemetry::{init, init_json};
