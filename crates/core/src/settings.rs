//! Persisted dashboard configuration, consumed read-only by the engine.

use serde::{Deserialize, Serialize};

use crate::classify::{ColorScheme, ColorToken, Thresholds};

/// Settings the engine reads: tier thresholds, tier colors, license key.
///
/// Owned and persisted by the settings layer; the engine receives a snapshot
/// per request and never writes it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSettings {
    pub thresholds: Thresholds,
    pub colors: ColorScheme,
    pub license_key: String,
}

impl Default for StockSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            colors: ColorScheme::default(),
            license_key: String::new(),
        }
    }
}

/// Unvalidated settings as posted by the settings form. Absent entries leave
/// the persisted value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSettings {
    pub low_stock_threshold: Option<i64>,
    pub medium_stock_threshold: Option<i64>,
    pub low_stock_color: Option<String>,
    pub medium_stock_color: Option<String>,
    pub high_stock_color: Option<String>,
    pub license_key: Option<String>,
}

impl StockSettings {
    /// Merge raw form input over the current settings, sanitized: thresholds
    /// take their absolute value, colors must be `#rrggbb` (anything else
    /// keeps the current token), the license key is trimmed.
    pub fn sanitize(&self, raw: &RawSettings) -> Self {
        let mut next = self.clone();

        if let Some(low) = raw.low_stock_threshold {
            next.thresholds.low = low.checked_abs().unwrap_or(i64::MAX);
        }
        if let Some(medium) = raw.medium_stock_threshold {
            next.thresholds.medium = medium.checked_abs().unwrap_or(i64::MAX);
        }

        if let Some(color) = raw.low_stock_color.as_deref().and_then(ColorToken::parse_hex) {
            next.colors.low = color;
        }
        if let Some(color) = raw
            .medium_stock_color
            .as_deref()
            .and_then(ColorToken::parse_hex)
        {
            next.colors.medium = color;
        }
        if let Some(color) = raw.high_stock_color.as_deref().and_then(ColorToken::parse_hex) {
            next.colors.high = color;
        }

        if let Some(key) = raw.license_key.as_deref() {
            next.license_key = key.trim().to_string();
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_persisted_configuration() {
        let s = StockSettings::default();
        assert_eq!(s.thresholds.low, 3);
        assert_eq!(s.thresholds.medium, 7);
        assert_eq!(s.colors.low.as_str(), "#f56565");
        assert_eq!(s.colors.medium.as_str(), "#ed8936");
        assert_eq!(s.colors.high.as_str(), "#48bb78");
        assert!(s.license_key.is_empty());
    }

    #[test]
    fn sanitize_keeps_current_values_for_absent_entries() {
        let current = StockSettings::default();
        let next = current.sanitize(&RawSettings::default());
        assert_eq!(next, current);
    }

    #[test]
    fn sanitize_takes_absolute_value_of_thresholds() {
        let next = StockSettings::default().sanitize(&RawSettings {
            low_stock_threshold: Some(-5),
            medium_stock_threshold: Some(12),
            ..RawSettings::default()
        });
        assert_eq!(next.thresholds.low, 5);
        assert_eq!(next.thresholds.medium, 12);
    }

    #[test]
    fn sanitize_rejects_malformed_colors() {
        let next = StockSettings::default().sanitize(&RawSettings {
            low_stock_color: Some("tomato".into()),
            high_stock_color: Some("#123ABC".into()),
            ..RawSettings::default()
        });
        // Malformed input keeps the persisted token; valid hex replaces it.
        assert_eq!(next.colors.low.as_str(), "#f56565");
        assert_eq!(next.colors.high.as_str(), "#123abc");
    }

    #[test]
    fn sanitize_trims_the_license_key() {
        let next = StockSettings::default().sanitize(&RawSettings {
            license_key: Some("  ABC-123  ".into()),
            ..RawSettings::default()
        });
        assert_eq!(next.license_key, "ABC-123");
    }
}
