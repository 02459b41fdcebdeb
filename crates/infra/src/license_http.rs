//! Blocking HTTP client for the vendor's license validation endpoint.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use stockdeck_licensing::{LicenseValidator, TransportError, ValidationOutcome};

/// Round-trip budget. No retry: a slow or dead license server must not stall
/// the dashboard longer than this, and the gate fails closed on timeout.
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(15);

/// License validator backed by the vendor's validation endpoint.
///
/// One bounded POST per call; caching is the gate's job, not this client's.
#[derive(Debug)]
pub struct HttpLicenseValidator {
    endpoint: String,
    product_id: String,
    client: reqwest::blocking::Client,
}

impl HttpLicenseValidator {
    pub fn new(
        endpoint: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(VALIDATE_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            product_id: product_id.into(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
    message: Option<String>,
}

impl LicenseValidator for HttpLicenseValidator {
    fn validate(&self, key: &str) -> Result<ValidationOutcome, TransportError> {
        debug!(endpoint = %self.endpoint, "validating license key remotely");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("license_key", key), ("product_id", self.product_id.as_str())])
            .send()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let body: ValidateResponse = response
            .json()
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        let message = body.message.unwrap_or_else(|| {
            if body.valid {
                "license validated successfully".to_string()
            } else {
                "invalid license key".to_string()
            }
        });

        Ok(ValidationOutcome {
            valid: body.valid,
            message,
        })
    }
}
