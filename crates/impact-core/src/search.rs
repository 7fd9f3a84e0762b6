//! # Search Engine
//!
//! Maps a free-text query to the features it matches.
//!
//! - Case-insensitive substring match on feature name and description
//! - Screens are reported only through their matching features
//! - An empty query matches nothing
//!
//! The module also exposes the label set (screen and feature names) that a
//! caller needs to decide whether a query names anything known at all.

use crate::store::Snapshot;
use crate::{FeatureId, ScreenId, SearchResult};
use serde::{Deserialize, Serialize};

// =============================================================================
// SEARCH
// =============================================================================

/// The output of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The query exactly as it was given.
    pub matched_term: String,
    /// One entry per screen with at least one matching feature, in screen order.
    pub results: Vec<SearchResult>,
}

impl SearchOutcome {
    /// Check whether the search produced any result.
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Total number of matching features across all screens.
    #[must_use]
    pub fn feature_hits(&self) -> usize {
        self.results.iter().map(|r| r.feature_ids.len()).sum()
    }
}

/// Search the snapshot for features matching `query`.
#[must_use]
pub fn search(query: &str, snapshot: &Snapshot) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::default();
    }
    let needle = query.to_lowercase();

    let results = snapshot
        .screens()
        .map(|screen| SearchResult {
            screen_id: screen.id(),
            feature_ids: screen
                .features()
                .filter(|f| {
                    contains_folded(&f.name, &needle)
                        || (!f.description.is_empty() && contains_folded(&f.description, &needle))
                })
                .map(|f| f.id)
                .collect(),
        })
        .filter(|r| !r.feature_ids.is_empty())
        .collect();

    SearchOutcome {
        matched_term: query.to_string(),
        results,
    }
}

/// `needle` must already be lowercased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// =============================================================================
// LABELS
// =============================================================================

/// The entity a label stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LabelTarget {
    Screen(ScreenId),
    Feature(FeatureId),
}

/// One selectable entry of the query box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub target: LabelTarget,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// Every screen label followed by the labels of its features.
#[must_use]
pub fn labels(snapshot: &Snapshot) -> Vec<Label> {
    let mut out = Vec::with_capacity(snapshot.screen_count() + snapshot.feature_count());
    for screen in snapshot.screens() {
        out.push(Label {
            target: LabelTarget::Screen(screen.id()),
            label: screen.name().to_string(),
            description: None,
        });
        out.extend(screen.features().map(|f| Label {
            target: LabelTarget::Feature(f.id),
            label: f.name.clone(),
            description: Some(f.description.clone()),
        }));
    }
    out
}

/// Check whether any label contains `query`, case-insensitively.
///
/// An empty query is contained in every label, so it matches as soon as
/// one label exists.
#[must_use]
pub fn matches_any_label(query: &str, labels: &[Label]) -> bool {
    let needle = query.to_lowercase();
    labels.iter().any(|l| contains_folded(&l.label, &needle))
}

// =============================================================================
// TESTS
// =============================================================================
