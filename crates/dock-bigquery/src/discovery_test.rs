use super::*;
use crate::testing::MockApi;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

#[tokio::test]
async fn test_discover_success_with_metadata() {
    let api = MockApi::new("p1")
        .with_dataset("raw_events", Some("Raw events"))
        .with_dataset("billing", None);

    let result = DiscoveryClient::new(api).discover("p1").await;

    let datasets = result.datasets().unwrap();
    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0].id, "raw_events");
    assert_eq!(datasets[0].friendly_name.as_deref(), Some("Raw events"));
    assert!(datasets[0].creation_time.is_some());
    assert_eq!(datasets[1].id, "billing");
}

#[tokio::test]
async fn test_discover_zero_datasets_is_success() {
    let api = MockApi::new("p1");
    let result = DiscoveryClient::new(api).discover("p1").await;
    assert!(result.is_success());
    assert!(result.datasets().unwrap().is_empty());
}

#[tokio::test]
async fn test_metadata_failure_degrades_to_id_only() {
    let api = MockApi::new("p1")
        .with_dataset("good", Some("Good"))
        .with_dataset("broken", Some("Broken"))
        .with_broken_dataset("broken");

    let result = DiscoveryClient::new(api).discover("p1").await;

    let datasets = result.datasets().unwrap();
    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0].friendly_name.as_deref(), Some("Good"));
    assert_eq!(datasets[1].id, "broken");
    assert!(datasets[1].friendly_name.is_none());
    assert!(datasets[1].creation_time.is_none());
}

#[tokio::test]
async fn test_permission_denied_maps_to_manual_input() {
    let api = MockApi::new("p1").with_list_status(403);
    let result = DiscoveryClient::new(api).discover("p1").await;

    let error = result.error().unwrap();
    assert_eq!(error.code, DiscoveryErrorCode::InsufficientPermissions);
    assert!(error.requires_manual_input);
}

#[tokio::test]
async fn test_unauthenticated_maps_to_auth_failed() {
    let api = MockApi::new("p1").with_list_status(401);
    let result = DiscoveryClient::new(api).discover("p1").await;

    let error = result.error().unwrap();
    assert_eq!(error.code, DiscoveryErrorCode::AuthenticationFailed);
    assert!(!error.requires_manual_input);
}

#[tokio::test]
async fn test_unknown_project_maps_to_not_found() {
    let api = MockApi::new("p1").with_list_status(404);
    let result = DiscoveryClient::new(api).discover("p1").await;
    assert_eq!(
        result.error().unwrap().code,
        DiscoveryErrorCode::ProjectNotFound
    );
}

#[tokio::test]
async fn test_server_error_maps_to_catch_all() {
    let api = MockApi::new("p1").with_list_status(500);
    let result = DiscoveryClient::new(api).discover("p1").await;

    let error = result.error().unwrap();
    assert_eq!(error.code, DiscoveryErrorCode::DiscoveryFailed);
    assert!(error.requires_manual_input);
}

#[tokio::test]
async fn test_base64_of_non_json_credentials() {
    let raw = BASE64.encode("not json");
    let result = discover(
        "p1",
        &raw,
        std::sync::Arc::new(crate::token::StaticTokenProvider::new("t")),
        &ClientOptions::default(),
    )
    .await;

    let error = result.error().unwrap();
    assert_eq!(error.code, DiscoveryErrorCode::InvalidCredentials);
    assert!(!error.requires_manual_input);
}

#[test]
fn test_map_api_error_table() {
    let status = |code| ApiError::Status {
        code,
        message: "x".to_string(),
    };
    assert_eq!(
        map_api_error(&status(403)).code,
        DiscoveryErrorCode::InsufficientPermissions
    );
    assert_eq!(
        map_api_error(&status(401)).code,
        DiscoveryErrorCode::AuthenticationFailed
    );
    assert_eq!(
        map_api_error(&status(404)).code,
        DiscoveryErrorCode::ProjectNotFound
    );
    assert_eq!(
        map_api_error(&status(429)).code,
        DiscoveryErrorCode::DiscoveryFailed
    );
    assert_eq!(
        map_api_error(&ApiError::Token("no token".to_string())).code,
        DiscoveryErrorCode::DiscoveryFailed
    );
}
