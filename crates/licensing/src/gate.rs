//! The usage gate: free-tier change counting + cached license verdicts.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::validator::{LicenseStatus, LicenseValidator, ValidationOutcome};

/// Mutations permitted before a valid license becomes mandatory.
pub const FREE_CHANGE_LIMIT: u64 = 20;

/// How long a cached verdict stays fresh.
pub fn verdict_ttl() -> Duration {
    Duration::hours(1)
}

/// Cached remote verdict for one license key.
///
/// Stale entries are recomputed in place on the next lookup, never evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseVerdict {
    pub key: String,
    pub valid: bool,
    pub message: String,
    pub cached_at: DateTime<Utc>,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Denied(String),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Usage gate service.
///
/// Holds the process-wide change counter and the per-key verdict cache as an
/// explicit instance injected into callers. The counter increment is an
/// atomic fetch-add and cache writes go through a lock: concurrent mutation
/// requests must not lose counts.
#[derive(Debug)]
pub struct UsageGate<V> {
    validator: V,
    changes: AtomicU64,
    verdicts: RwLock<HashMap<String, LicenseVerdict>>,
}

impl<V> UsageGate<V> {
    pub fn new(validator: V) -> Self {
        Self::with_change_count(validator, 0)
    }

    /// Resume from a persisted counter value.
    pub fn with_change_count(validator: V, changes: u64) -> Self {
        Self {
            validator,
            changes: AtomicU64::new(changes),
            verdicts: RwLock::new(HashMap::new()),
        }
    }

    pub fn change_count(&self) -> u64 {
        self.changes.load(Ordering::SeqCst)
    }

    /// Record one successfully applied mutation and return the new count.
    ///
    /// Called once per applied change; bulk items count individually. The
    /// counter is never decremented.
    pub fn record_change(&self) -> u64 {
        self.changes.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl<V: LicenseValidator> UsageGate<V> {
    /// Decide whether a mutation is permitted right now.
    pub fn check_allowed(&self, license_key: &str) -> GateDecision {
        self.check_allowed_at(license_key, Utc::now())
    }

    /// Deterministic variant of [`check_allowed`](Self::check_allowed) for
    /// tests.
    pub fn check_allowed_at(&self, license_key: &str, now: DateTime<Utc>) -> GateDecision {
        let key = license_key.trim();

        // An empty key skips the remote check entirely; a valid verdict
        // unlocks regardless of the counter.
        if !key.is_empty() && self.verdict_at(key, now).valid {
            return GateDecision::Allowed;
        }

        let count = self.change_count();
        if count >= FREE_CHANGE_LIMIT {
            debug!(count, "usage gate denied: free change limit exhausted");
            return GateDecision::Denied(format!(
                "license required after {FREE_CHANGE_LIMIT} changes; enter a valid license key"
            ));
        }

        GateDecision::Allowed
    }

    /// License check surface for the settings page (cached per key for the
    /// verdict TTL).
    pub fn check_license(&self, license_key: &str) -> LicenseStatus {
        self.check_license_at(license_key, Utc::now())
    }

    /// Deterministic variant of [`check_license`](Self::check_license) for
    /// tests.
    pub fn check_license_at(&self, license_key: &str, now: DateTime<Utc>) -> LicenseStatus {
        let key = license_key.trim();
        if key.is_empty() {
            return LicenseStatus {
                valid: false,
                message: "no license key provided".to_string(),
            };
        }

        let verdict = self.verdict_at(key, now);
        LicenseStatus {
            valid: verdict.valid,
            message: verdict.message,
        }
    }

    /// Cached verdict for a key, refreshed through the validator once stale.
    ///
    /// A transport failure maps to an invalid verdict: failing open would let
    /// the gate be bypassed by blocking network access.
    fn verdict_at(&self, key: &str, now: DateTime<Utc>) -> LicenseVerdict {
        if let Ok(verdicts) = self.verdicts.read()
            && let Some(cached) = verdicts.get(key)
            && now - cached.cached_at < verdict_ttl()
        {
            return cached.clone();
        }

        let outcome = match self.validator.validate(key) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "license validation failed, treating key as invalid");
                ValidationOutcome::invalid("could not connect to license server")
            }
        };

        let verdict = LicenseVerdict {
            key: key.to_string(),
            valid: outcome.valid,
            message: outcome.message,
            cached_at: now,
        };

        if let Ok(mut verdicts) = self.verdicts.write() {
            verdicts.insert(key.to_string(), verdict.clone());
        }

        verdict
    }
}
