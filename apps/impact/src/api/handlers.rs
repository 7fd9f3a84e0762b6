//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler takes the single session lock, so the store keeps one
//! writer at a time. Mutations naming unknown ids answer 200 with
//! `applied: false`.

use super::{
    AppState,
    types::{
        ConnectionRequest, HealthResponse, ImportResponse, LabelsResponse, MutationResponse,
        QuickCreateRequest, RenameScreenRequest, ScreensResponse, SearchRequest, SearchResponse,
        SelectionRequest, SelectionResponse, StatusResponse,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use impact_core::{
    FeatureDraft, FeatureFormState, FeatureId, ImpactError, ScreenDraft, ScreenFormState,
    ScreenId, Sheet, Submission, export_dot, export_file_stem,
};
use std::fmt::Display;

/// HTTP status for a core error.
fn error_status(error: &ImpactError) -> StatusCode {
    match error {
        ImpactError::NoScreenSelected => StatusCode::CONFLICT,
        ImpactError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ImpactError::ImportMalformed(_)
        | ImpactError::InvalidName(_)
        | ImpactError::InvalidId(_)
        | ImpactError::SerializationError(_) => StatusCode::BAD_REQUEST,
    }
}

fn parse_feature_path(
    screen_id: &str,
    feature_id: &str,
) -> Result<(ScreenId, FeatureId), ImpactError> {
    Ok((
        screen_id.parse::<ScreenId>()?,
        feature_id.parse::<FeatureId>()?,
    ))
}

fn mutation_error(error: &ImpactError) -> (StatusCode, Json<MutationResponse>) {
    (
        error_status(error),
        Json(MutationResponse::error(error.to_string())),
    )
}

/// 201 for a create, 200 for an edit, 200 with `applied: false` for a miss.
fn submission_response<Id: Display>(
    submission: Submission<Id>,
) -> (StatusCode, Json<MutationResponse>) {
    match submission {
        Submission::Created(id) => (StatusCode::CREATED, Json(MutationResponse::created(id))),
        Submission::Updated(id) => (StatusCode::OK, Json(MutationResponse::updated(id))),
        Submission::Missing(_) => (StatusCode::OK, Json(MutationResponse::applied(false))),
    }
}

// =============================================================================
// HEALTH AND STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Get model status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let response = StatusResponse::new(session.metrics(), session.current().version());
    (StatusCode::OK, Json(response))
}

// =============================================================================
// SCREEN HANDLERS
// =============================================================================

/// List every screen with its features.
pub async fn list_screens_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let snapshot = session.current();
    Json(ScreensResponse {
        screens: snapshot.to_screens(),
        selected_screen: snapshot.selected_screen(),
        selected_feature: snapshot.selected_feature(),
    })
}

/// Create a screen from a draft.
pub async fn create_screen_handler(
    State(state): State<AppState>,
    Json(draft): Json<ScreenDraft>,
) -> impl IntoResponse {
    let form = ScreenFormState {
        editing: None,
        draft,
    };
    let mut session = state.session.write().await;
    match session.submit_screen_form(form) {
        Ok(submission) => submission_response(submission),
        Err(e) => mutation_error(&e),
    }
}

/// Rename a screen.
pub async fn rename_screen_handler(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
    Json(request): Json<RenameScreenRequest>,
) -> impl IntoResponse {
    let id: ScreenId = match screen_id.parse() {
        Ok(id) => id,
        Err(e) => return mutation_error(&e),
    };
    if request.name.trim().is_empty() {
        return mutation_error(&ImpactError::InvalidName("screen"));
    }

    let mut session = state.session.write().await;
    let applied = session.update_screen(id, &request.name);
    (StatusCode::OK, Json(MutationResponse::applied(applied)))
}

/// Delete a screen and its features.
pub async fn delete_screen_handler(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
) -> impl IntoResponse {
    let id: ScreenId = match screen_id.parse() {
        Ok(id) => id,
        Err(e) => return mutation_error(&e),
    };

    let mut session = state.session.write().await;
    let applied = session.remove_screen(id);
    (StatusCode::OK, Json(MutationResponse::applied(applied)))
}

/// Create a screen and one feature both named after the query text.
pub async fn quick_create_handler(
    State(state): State<AppState>,
    Json(request): Json<QuickCreateRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.quick_create(&request.text) {
        Ok(id) => (StatusCode::CREATED, Json(MutationResponse::created(id))),
        Err(e) => mutation_error(&e),
    }
}

// =============================================================================
// FEATURE HANDLERS
// =============================================================================

/// Append a feature to a screen.
pub async fn add_feature_handler(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
    Json(draft): Json<FeatureDraft>,
) -> impl IntoResponse {
    let id: ScreenId = match screen_id.parse() {
        Ok(id) => id,
        Err(e) => return mutation_error(&e),
    };
    let feature = match draft.into_feature() {
        Ok(f) => f,
        Err(e) => return mutation_error(&e),
    };

    let feature_id = feature.id;
    let mut session = state.session.write().await;
    if session.add_feature(id, feature) {
        (StatusCode::CREATED, Json(MutationResponse::created(feature_id)))
    } else {
        (StatusCode::OK, Json(MutationResponse::applied(false)))
    }
}

/// Replace a feature's name and description.
pub async fn update_feature_handler(
    State(state): State<AppState>,
    Path((screen_id, feature_id)): Path<(String, String)>,
    Json(draft): Json<FeatureDraft>,
) -> impl IntoResponse {
    let (screen, feature) = match parse_feature_path(&screen_id, &feature_id) {
        Ok(ids) => ids,
        Err(e) => return mutation_error(&e),
    };
    if draft.is_blank() {
        return mutation_error(&ImpactError::InvalidName("feature"));
    }

    let mut session = state.session.write().await;
    let applied = session.update_feature(screen, feature, &draft.name, &draft.description);
    (StatusCode::OK, Json(MutationResponse::applied(applied)))
}

/// Remove a feature from its screen.
pub async fn delete_feature_handler(
    State(state): State<AppState>,
    Path((screen_id, feature_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let (screen, feature) = match parse_feature_path(&screen_id, &feature_id) {
        Ok(ids) => ids,
        Err(e) => return mutation_error(&e),
    };

    let mut session = state.session.write().await;
    let applied = session.remove_feature(screen, feature);
    (StatusCode::OK, Json(MutationResponse::applied(applied)))
}

/// Record an impact connection between two features.
pub async fn connection_handler(
    State(state): State<AppState>,
    Json(request): Json<ConnectionRequest>,
) -> impl IntoResponse {
    let (source, target) = match request.to_ids() {
        Ok(ids) => ids,
        Err(e) => return mutation_error(&e),
    };

    let mut session = state.session.write().await;
    let applied = session.add_connection(source, target);
    (StatusCode::OK, Json(MutationResponse::applied(applied)))
}

// =============================================================================
// SELECTION AND FORMS
// =============================================================================

/// Move both selection pointers and return the synced form state.
pub async fn selection_handler(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> impl IntoResponse {
    let (screen, feature) = match request.to_ids() {
        Ok(ids) => ids,
        Err(e) => {
            return (
                error_status(&e),
                Json(SelectionResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    let form = session.select(screen, feature);
    (StatusCode::OK, Json(SelectionResponse::success(form)))
}

/// Current form state for the selection.
pub async fn forms_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(SelectionResponse::success(session.form_state()))
}

/// Submit the screen form (create, or rename in edit mode).
pub async fn submit_screen_form_handler(
    State(state): State<AppState>,
    Json(form): Json<ScreenFormState>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.submit_screen_form(form) {
        Ok(submission) => submission_response(submission),
        Err(e) => mutation_error(&e),
    }
}

/// Submit the feature form against the selected screen.
pub async fn submit_feature_form_handler(
    State(state): State<AppState>,
    Json(form): Json<FeatureFormState>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.submit_feature_form(form) {
        Ok(submission) => submission_response(submission),
        Err(e) => mutation_error(&e),
    }
}

// =============================================================================
// SEARCH HANDLERS
// =============================================================================

/// Set the search term and return the outcome.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    let outcome = session.set_search_term(&request.term).clone();
    Json(SearchResponse {
        outcome,
        offer_creation: session.offers_creation(),
    })
}

/// Screen and feature labels.
pub async fn labels_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(LabelsResponse {
        labels: session.labels(),
    })
}

// =============================================================================
// GRAPH HANDLERS
// =============================================================================

/// Projection as JSON.
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.projection())
}

/// Projection as Graphviz DOT, named after the active search term.
pub async fn graph_dot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let dot = export_dot(&session.projection());
    let disposition = format!(
        "attachment; filename=\"{}.dot\"",
        export_file_stem(session.search_term())
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/vnd.graphviz".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        dot,
    )
}

// =============================================================================
// IMPORT HANDLER
// =============================================================================

/// Import a JSON grid atomically.
pub async fn import_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let sheet = match Sheet::from_json(&body) {
        Ok(s) => s,
        Err(e) => {
            return (
                error_status(&e),
                Json(ImportResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.import_sheet(&sheet) {
        Ok(ids) => (StatusCode::OK, Json(ImportResponse::success(ids))),
        Err(e) => (
            error_status(&e),
            Json(ImportResponse::error(e.to_string())),
        ),
    }
}
