//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Ids travel as strings and are parsed at this boundary, so a malformed
//! id is a 400 with an error envelope rather than an extractor rejection.

use impact_core::{
    FeatureId, FormState, GraphMetrics, ImpactError, Label, Screen, ScreenId, SearchOutcome,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Model status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub screen_count: usize,
    pub feature_count: usize,
    pub empty_screen_count: usize,
    pub connection_count: usize,
    pub dangling_count: usize,
    /// Snapshot version, bumped by every applied mutation.
    pub version: u64,
}

impl StatusResponse {
    pub fn new(metrics: GraphMetrics, version: u64) -> Self {
        Self {
            screen_count: metrics.screen_count,
            feature_count: metrics.feature_count,
            empty_screen_count: metrics.empty_screen_count,
            connection_count: metrics.connection_count,
            dangling_count: metrics.dangling_count,
            version,
        }
    }
}

// =============================================================================
// SCREENS
// =============================================================================

/// Every screen with its features, plus the selection pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreensResponse {
    pub screens: Vec<Screen>,
    pub selected_screen: Option<ScreenId>,
    pub selected_feature: Option<FeatureId>,
}

/// Rename request for `PUT /screens/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameScreenRequest {
    pub name: String,
}

/// Quick-create request: a screen and one feature named after `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickCreateRequest {
    pub text: String,
}

// =============================================================================
// MUTATION RESPONSE
// =============================================================================

/// Outcome of a store mutation.
///
/// `applied` is false when the target id is unknown; that is still a
/// successful, idempotent no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub applied: bool,
    /// Id of the created or edited entity, when there is one.
    pub id: Option<String>,
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn applied(applied: bool) -> Self {
        Self {
            success: true,
            applied,
            id: None,
            error: None,
        }
    }

    pub fn created(id: impl ToString) -> Self {
        Self {
            success: true,
            applied: true,
            id: Some(id.to_string()),
            error: None,
        }
    }

    pub fn updated(id: impl ToString) -> Self {
        Self::created(id)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            applied: false,
            id: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// CONNECTIONS AND SELECTION
// =============================================================================

/// Connection request for `POST /connections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub feature_id: String,
    pub target_feature_id: String,
}

impl ConnectionRequest {
    /// Parse both ids. The target is not checked for existence.
    pub fn to_ids(&self) -> Result<(FeatureId, FeatureId), ImpactError> {
        let source: FeatureId = self.feature_id.parse()?;
        let target: FeatureId = self.target_feature_id.parse()?;
        Ok((source, target))
    }
}

/// Selection request for `PUT /selection`; absent fields clear the pointer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub screen_id: Option<String>,
    #[serde(default)]
    pub feature_id: Option<String>,
}

impl SelectionRequest {
    pub fn to_ids(&self) -> Result<(Option<ScreenId>, Option<FeatureId>), ImpactError> {
        let screen: Option<ScreenId> = self.screen_id.as_deref().map(str::parse).transpose()?;
        let feature: Option<FeatureId> = self.feature_id.as_deref().map(str::parse).transpose()?;
        Ok((screen, feature))
    }
}

/// Form state synced to the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub success: bool,
    pub form: Option<FormState>,
    pub error: Option<String>,
}

impl SelectionResponse {
    pub fn success(form: FormState) -> Self {
        Self {
            success: true,
            form: Some(form),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            form: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Search request for `PUT /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub term: String,
}

/// Search outcome plus the create-offer decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    /// The term is non-empty and names no known screen or feature.
    pub offer_creation: bool,
}

/// Label set for `GET /labels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<Label>,
}

// =============================================================================
// IMPORT
// =============================================================================

/// Outcome of `POST /import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub screen_ids: Vec<ScreenId>,
    pub error: Option<String>,
}

impl ImportResponse {
    pub fn success(screen_ids: Vec<ScreenId>) -> Self {
        Self {
            success: true,
            screen_ids,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            screen_ids: vec![],
            error: Some(msg.into()),
        }
    }
}
