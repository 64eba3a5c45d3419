/// Integration tests for the phone validation client against a mocked provider
/// Covers the bypass paths, provider payload interpretation and transport failures
use phone_records_api::config::ValidationConfig;
use phone_records_api::errors::AppError;
use phone_records_api::validation_client::PhoneValidationClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create validation settings pointing at the mock server
fn create_test_settings(base_url: &str) -> ValidationConfig {
    ValidationConfig {
        enabled: true,
        api_key: Some("test_key".to_string()),
        api_base_url: format!("{}/api/validate", base_url),
    }
}

#[tokio::test]
async fn test_valid_number_returns_country() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .and(query_param("access_key", "test_key"))
        .and(query_param("number", "+14155550100"))
        .and(query_param("format", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": true,
            "number": "14155550100",
            "country_code": "US",
            "carrier": "Verizon"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let result = client.validate("+14155550100").await.unwrap();

    assert!(result.valid);
    assert_eq!(result.phone_number, "+14155550100");
    assert_eq!(result.country_code, "US");
    assert_eq!(result.carrier, "Verizon");
}

#[tokio::test]
async fn test_missing_country_defaults_to_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "valid": true })))
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let result = client.validate("+442071838750").await.unwrap();

    assert_eq!(result.country_code, "Unknown");
    assert_eq!(result.carrier, "Unknown");
}

#[tokio::test]
async fn test_invalid_number_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .and(query_param("number", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "valid": false,
            "number": "123",
            "country_code": ""
        })))
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let err = client.validate("123").await.unwrap_err();

    match err {
        AppError::InvalidPhoneNumber {
            phone_number,
            reason,
        } => {
            assert_eq!(phone_number, "123");
            assert_eq!(reason, "validation failed");
        }
        other => panic!("expected InvalidPhoneNumber, got {:?}", other),
    }
}

#[tokio::test]
async fn test_provider_error_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": {
                "code": 104,
                "type": "usage_limit_reached",
                "info": "Your monthly usage limit has been reached."
            }
        })))
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let err = client.validate("+14155550100").await.unwrap_err();

    assert!(matches!(err, AppError::ValidationServiceError(_)));
    assert_eq!(
        err.to_string(),
        "Phone validation service error: Your monthly usage limit has been reached."
    );
}

#[tokio::test]
async fn test_non_json_body_is_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let err = client.validate("+14155550100").await.unwrap_err();

    assert!(matches!(err, AppError::ValidationServiceError(_)));
}

#[tokio::test]
async fn test_server_error_is_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = PhoneValidationClient::new(create_test_settings(&mock_server.uri()));
    let err = client.validate("+14155550100").await.unwrap_err();

    assert!(matches!(err, AppError::ValidationServiceError(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_service_error() {
    // Nothing listens on port 1
    let client = PhoneValidationClient::new(create_test_settings("http://127.0.0.1:1"));
    let err = client.validate("+14155550100").await.unwrap_err();

    match err {
        AppError::ValidationServiceError(msg) => {
            assert!(msg.starts_with("Unable to reach phone validation service"));
        }
        other => panic!("expected ValidationServiceError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disabled_validation_never_calls_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut settings = create_test_settings(&mock_server.uri());
    settings.enabled = false;

    let client = PhoneValidationClient::new(settings);
    let result = client.validate("not-a-number").await.unwrap();

    assert!(result.valid);
    assert_eq!(result.country_code, "Unknown");
    assert_eq!(result.carrier, "Validation disabled");
}

#[tokio::test]
async fn test_missing_api_key_never_calls_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut settings = create_test_settings(&mock_server.uri());
    settings.api_key = None;

    let client = PhoneValidationClient::new(settings);
    let result = client.validate("+14155550100").await.unwrap();

    assert!(result.valid);
    assert_eq!(result.country_code, "Unknown");
    assert_eq!(result.carrier, "No API key configured");
}
