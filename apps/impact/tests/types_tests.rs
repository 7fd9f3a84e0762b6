//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use impact::api::{
    ConnectionRequest, HealthResponse, ImportResponse, MutationResponse, SearchResponse,
    SelectionRequest, SelectionResponse, StatusResponse,
};
use impact_core::{
    FeatureId, GraphMetrics, ImpactError, ScreenId, SearchOutcome, SearchResult,
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_from_metrics() {
    let metrics = GraphMetrics {
        screen_count: 3,
        feature_count: 7,
        empty_screen_count: 1,
        connection_count: 4,
        dangling_count: 2,
    };

    let status = StatusResponse::new(metrics, 9);
    let json = serde_json::to_string(&status).unwrap();

    assert!(json.contains("\"screen_count\":3"));
    assert!(json.contains("\"feature_count\":7"));
    assert!(json.contains("\"empty_screen_count\":1"));
    assert!(json.contains("\"dangling_count\":2"));
    assert!(json.contains("\"version\":9"));
}

// =============================================================================
// MUTATION RESPONSE TESTS
// =============================================================================

#[test]
fn test_mutation_response_applied() {
    let response = MutationResponse::applied(false);
    assert!(response.success);
    assert!(!response.applied);
    assert!(response.id.is_none());
    assert!(response.error.is_none());
}

#[test]
fn test_mutation_response_created() {
    let id = ScreenId::generate();
    let response = MutationResponse::created(id);

    assert!(response.success);
    assert!(response.applied);
    assert_eq!(response.id, Some(id.to_string()));
}

#[test]
fn test_mutation_response_error() {
    let response = MutationResponse::error("A screen name is required");
    let json = serde_json::to_string(&response).unwrap();

    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"error\":\"A screen name is required\""));
}

// =============================================================================
// CONNECTION REQUEST TESTS
// =============================================================================

#[test]
fn test_connection_request_parses_ids() {
    let (a, b) = (FeatureId::generate(), FeatureId::generate());
    let json = format!(r#"{{"feature_id":"{}","target_feature_id":"{}"}}"#, a, b);
    let request: ConnectionRequest = serde_json::from_str(&json).unwrap();

    assert_eq!(request.to_ids().unwrap(), (a, b));
}

#[test]
fn test_connection_request_rejects_bad_id() {
    let request = ConnectionRequest {
        feature_id: "nope".to_string(),
        target_feature_id: FeatureId::generate().to_string(),
    };
    assert!(matches!(request.to_ids(), Err(ImpactError::InvalidId(_))));
}

// =============================================================================
// SELECTION TESTS
// =============================================================================

#[test]
fn test_selection_request_missing_fields_clear() {
    let request: SelectionRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.to_ids().unwrap(), (None, None));
}

#[test]
fn test_selection_request_partial() {
    let screen = ScreenId::generate();
    let json = format!(r#"{{"screen_id":"{}"}}"#, screen);
    let request: SelectionRequest = serde_json::from_str(&json).unwrap();

    assert_eq!(request.to_ids().unwrap(), (Some(screen), None));
}

#[test]
fn test_selection_response_error() {
    let response = SelectionResponse::error("bad id");
    assert!(!response.success);
    assert!(response.form.is_none());
}

// =============================================================================
// SEARCH RESPONSE TESTS
// =============================================================================

#[test]
fn test_search_response_is_flat() {
    let screen_id = ScreenId::generate();
    let response = SearchResponse {
        outcome: SearchOutcome {
            matched_term: "login".to_string(),
            results: vec![SearchResult {
                screen_id,
                feature_ids: vec![FeatureId::generate()],
            }],
        },
        offer_creation: false,
    };

    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["matched_term"], "login");
    assert_eq!(value["offer_creation"], false);
    assert_eq!(value["results"][0]["screen_id"], screen_id.to_string());
}

// =============================================================================
// IMPORT RESPONSE TESTS
// =============================================================================

#[test]
fn test_import_response_roundtrip() {
    let ids = vec![ScreenId::generate(), ScreenId::generate()];
    let response = ImportResponse::success(ids.clone());

    let json = serde_json::to_string(&response).unwrap();
    let back: ImportResponse = serde_json::from_str(&json).unwrap();

    assert!(back.success);
    assert_eq!(back.screen_ids, ids);
}

#[test]
fn test_import_response_error() {
    let response = ImportResponse::error("Malformed import: empty");
    assert!(!response.success);
    assert!(response.screen_ids.is_empty());
}
