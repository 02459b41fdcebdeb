//! Stock-level classification: quantity + thresholds → tier → color token.

use serde::{Deserialize, Serialize};

/// Opaque display color.
///
/// Identity-only semantics: the engine never interprets a token beyond
/// equality, it just hands it back to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// Accept only `#rrggbb` so malformed operator input can fall back to the
    /// scheme defaults instead of leaking into the dashboard.
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let rest = s.strip_prefix('#')?;
        if rest.len() == 6 && rest.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stock tier boundaries. Implicitly `low <= medium`; the settings layer does
/// not enforce the ordering, so classification must stay total either way.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: i64,
    pub medium: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 3, medium: 7 }
    }
}

/// Stock tier of a quantity relative to the configured thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

impl StockLevel {
    /// Canonical rule: `quantity < low` is low, `low <= quantity <= medium`
    /// is medium (non-strict upper bound), everything above is high.
    pub fn classify(quantity: i64, thresholds: &Thresholds) -> Self {
        if quantity < thresholds.low {
            StockLevel::Low
        } else if quantity <= thresholds.medium {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }
}

/// One color token per stock tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub low: ColorToken,
    pub medium: ColorToken,
    pub high: ColorToken,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            low: ColorToken("#f56565".to_string()),
            medium: ColorToken("#ed8936".to_string()),
            high: ColorToken("#48bb78".to_string()),
        }
    }
}

impl ColorScheme {
    pub fn color_for(&self, level: StockLevel) -> &ColorToken {
        match level {
            StockLevel::Low => &self.low,
            StockLevel::Medium => &self.medium,
            StockLevel::High => &self.high,
        }
    }
}

/// Classify a quantity straight to its display color.
pub fn classify(quantity: i64, thresholds: &Thresholds, scheme: &ColorScheme) -> ColorToken {
    scheme
        .color_for(StockLevel::classify(quantity, thresholds))
        .clone()
}
