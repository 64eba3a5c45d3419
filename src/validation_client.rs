use crate::config::ValidationConfig;
use crate::errors::AppError;
use crate::models::{ValidationResult, UNKNOWN_COUNTRY};
use reqwest::Client;
use serde::Deserialize;

/// Payload returned by the validation provider.
///
/// Every field is optional so that a malformed body is reported as a
/// validation service error instead of a deserialization panic.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    error: Option<ProviderError>,
    valid: Option<serde_json::Value>,
    country_code: Option<String>,
    carrier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    info: Option<String>,
}

/// Client for the third-party phone validation provider.
///
/// Issues a single GET per call with no retries. Validation is skipped
/// entirely when disabled or when no API key is configured.
#[derive(Clone)]
pub struct PhoneValidationClient {
    client: Client,
    settings: ValidationConfig,
}

impl PhoneValidationClient {
    pub fn new(settings: ValidationConfig) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    /// Whether calls will actually reach the provider.
    pub fn is_active(&self) -> bool {
        self.settings.enabled
            && self
                .settings
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }

    /// Validates a phone number against the provider.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidPhoneNumber` when the provider reports `valid: false`.
    /// * `AppError::ValidationServiceError` when the provider returns an `error`
    ///   object, an unusable body, or cannot be reached.
    pub async fn validate(&self, phone_number: &str) -> Result<ValidationResult, AppError> {
        if !self.settings.enabled {
            tracing::warn!("Phone validation is disabled. Skipping validation.");
            return Ok(ValidationResult::bypassed(phone_number, "Validation disabled"));
        }

        let api_key = match self.settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!("API key not configured. Skipping validation.");
                return Ok(ValidationResult::bypassed(
                    phone_number,
                    "No API key configured",
                ));
            }
        };

        // Build URL with proper parameter encoding to prevent injection attacks
        let url = reqwest::Url::parse_with_params(
            &self.settings.api_base_url,
            &[
                ("access_key", api_key),
                ("number", phone_number),
                ("format", "1"),
            ],
        )
        .map_err(|e| {
            AppError::ValidationServiceError(format!(
                "Invalid phone validation service URL: {}",
                e
            ))
        })?;

        tracing::info!("Validating phone number: {}", phone_number);
        // Redact key from logs to prevent credential exposure
        tracing::debug!(
            "Validation URL: {}?access_key=[REDACTED]&number={}&format=1",
            self.settings.api_base_url,
            phone_number
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ProviderResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unexpected validation response ({}): {}", status, e);
            AppError::ValidationServiceError(format!(
                "Error validating phone number: unreadable response: {}",
                e
            ))
        })?;

        interpret(phone_number, status, parsed)
    }
}

/// Turns a decoded provider payload into a result or a typed failure.
fn interpret(
    phone_number: &str,
    status: reqwest::StatusCode,
    parsed: ProviderResponse,
) -> Result<ValidationResult, AppError> {
    if let Some(error) = parsed.error {
        let info = error
            .info
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        tracing::error!("API error during validation: {}", info);
        return Err(AppError::ValidationServiceError(format!(
            "Phone validation service error: {}",
            info
        )));
    }

    if !status.is_success() {
        tracing::error!("Validation provider returned status {}", status);
        return Err(AppError::ValidationServiceError(format!(
            "Phone validation service returned status {}",
            status
        )));
    }

    let valid = parsed
        .valid
        .as_ref()
        .and_then(|v| v.as_bool())
        .ok_or_else(|| {
            AppError::ValidationServiceError(
                "Error validating phone number: response missing 'valid' field".to_string(),
            )
        })?;

    if !valid {
        return Err(AppError::InvalidPhoneNumber {
            phone_number: phone_number.to_string(),
            reason: "validation failed".to_string(),
        });
    }

    let country_code = non_blank_or_unknown(parsed.country_code);
    let carrier = non_blank_or_unknown(parsed.carrier);

    tracing::info!(
        "Phone number {} is valid. Country: {}",
        phone_number,
        country_code
    );

    Ok(ValidationResult {
        valid,
        phone_number: phone_number.to_string(),
        country_code,
        carrier,
    })
}

fn non_blank_or_unknown(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn decode(body: serde_json::Value) -> ProviderResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_valid_response_with_country() {
        let parsed = decode(serde_json::json!({
            "valid": true,
            "number": "14155550100",
            "country_code": "US",
            "carrier": "AT&T Mobility LLC"
        }));

        let result = interpret("+14155550100", StatusCode::OK, parsed).unwrap();
        assert!(result.valid);
        assert_eq!(result.country_code, "US");
        assert_eq!(result.carrier, "AT&T Mobility LLC");
        assert_eq!(result.phone_number, "+14155550100");
    }

    #[test]
    fn test_blank_country_defaults_to_unknown() {
        let parsed = decode(serde_json::json!({ "valid": true, "country_code": "" }));
        let result = interpret("+999", StatusCode::OK, parsed).unwrap();
        assert_eq!(result.country_code, UNKNOWN_COUNTRY);
        assert_eq!(result.carrier, UNKNOWN_COUNTRY);
    }

    #[test]
    fn test_invalid_number() {
        let parsed = decode(serde_json::json!({ "valid": false, "country_code": "" }));
        let err = interpret("123", StatusCode::OK, parsed).unwrap_err();
        match err {
            AppError::InvalidPhoneNumber {
                phone_number,
                reason,
            } => {
                assert_eq!(phone_number, "123");
                assert_eq!(reason, "validation failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_provider_error_object_wins_over_status() {
        let parsed = decode(serde_json::json!({
            "success": false,
            "error": { "code": 101, "type": "invalid_access_key", "info": "You have not supplied a valid API Access Key." }
        }));
        let err = interpret("+14155550100", StatusCode::OK, parsed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Phone validation service error: You have not supplied a valid API Access Key."
        );
    }

    #[test]
    fn test_missing_valid_field() {
        let parsed = decode(serde_json::json!({ "country_code": "US" }));
        let err = interpret("+14155550100", StatusCode::OK, parsed).unwrap_err();
        assert!(matches!(err, AppError::ValidationServiceError(_)));
    }

    #[test]
    fn test_non_success_status_without_error_object() {
        let parsed = decode(serde_json::json!({ "valid": true }));
        let err = interpret("+14155550100", StatusCode::SERVICE_UNAVAILABLE, parsed).unwrap_err();
        assert!(matches!(err, AppError::ValidationServiceError(_)));
    }

    #[test]
    fn test_is_active_requires_key_and_flag() {
        let mut settings = ValidationConfig::default();
        assert!(!PhoneValidationClient::new(settings.clone()).is_active());

        settings.api_key = Some("key".to_string());
        assert!(PhoneValidationClient::new(settings.clone()).is_active());

        settings.enabled = false;
        assert!(!PhoneValidationClient::new(settings).is_active());
    }

    #[tokio::test]
    async fn test_blank_key_is_inactive_and_bypassed() {
        let settings = ValidationConfig {
            api_key: Some("   ".to_string()),
            ..ValidationConfig::default()
        };
        let client = PhoneValidationClient::new(settings);
        assert!(!client.is_active());

        let result = client.validate("+14155550100").await.unwrap();
        assert_eq!(result.carrier, "No API key configured");
    }
}
