//! `stockdeck-licensing` — usage counting and license verdict caching.
//!
//! The free tier allows a fixed number of catalog mutations; past that, every
//! write needs a license verdict from the vendor's validation endpoint. The
//! gate here owns the change counter and a per-key verdict cache so the
//! endpoint is hit at most once per key per TTL window.

pub mod gate;
pub mod validator;

pub use gate::{FREE_CHANGE_LIMIT, GateDecision, LicenseVerdict, UsageGate, verdict_ttl};
pub use validator::{
    LicenseStatus, LicenseValidator, StaticLicenseValidator, TransportError, ValidationOutcome,
};
