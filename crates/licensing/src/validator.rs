//! Remote license validation seam.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to reach or understand the license server.
///
/// Never surfaced to mutation callers: the gate logs it and downgrades the
/// verdict to invalid (fail closed).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("license server unreachable: {0}")]
    Unreachable(String),

    #[error("license server returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Verdict payload from the license server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Result of a settings-page license check, as relayed to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    pub valid: bool,
    pub message: String,
}

/// Remote verdict for a license key.
///
/// Implementations block (one bounded round trip, no retry); the gate caches
/// per key so a round trip happens at most once per TTL window.
pub trait LicenseValidator {
    fn validate(&self, key: &str) -> Result<ValidationOutcome, TransportError>;
}

/// Validator returning a fixed result. Tests/dev only; counts its calls so
/// cache behavior can be asserted.
#[derive(Debug)]
pub struct StaticLicenseValidator {
    result: Result<ValidationOutcome, TransportError>,
    calls: AtomicU64,
}

impl StaticLicenseValidator {
    pub fn new(result: Result<ValidationOutcome, TransportError>) -> Self {
        Self {
            result,
            calls: AtomicU64::new(0),
        }
    }

    pub fn always_valid() -> Self {
        Self::new(Ok(ValidationOutcome::valid("license validated successfully")))
    }

    pub fn always_invalid() -> Self {
        Self::new(Ok(ValidationOutcome::invalid("invalid license key")))
    }

    pub fn unreachable() -> Self {
        Self::new(Err(TransportError::Unreachable(
            "connection refused".to_string(),
        )))
    }

    /// Round trips performed so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LicenseValidator for StaticLicenseValidator {
    fn validate(&self, _key: &str) -> Result<ValidationOutcome, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
