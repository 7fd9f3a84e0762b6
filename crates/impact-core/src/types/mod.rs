//! # Core Type Definitions
//!
//! This module contains the entity model shared by every component:
//! - Entity identifiers (`ScreenId`, `FeatureId`)
//! - Entities (`Screen`, `Feature`)
//! - Transient search output (`SearchResult`)
//! - Error types (`ImpactError`)
//!
//! ## Identity Guarantees
//!
//! - Identifiers are opaque UUIDs generated at submission time
//! - Feature ids are unique across ALL screens, so a connection resolves
//!   without knowing which screen owns its target
//! - Identifiers implement `Ord` so derived views can use `BTreeMap`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// ENTITY IDENTIFIERS
// =============================================================================

/// Unique identifier for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(pub Uuid);

/// Unique identifier for a feature, global across all screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub Uuid);

macro_rules! impl_entity_id {
    ($ty:ident, $what:literal) => {
        impl $ty {
            /// Generate a fresh, collision-resistant identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $ty {
            type Err = ImpactError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| ImpactError::InvalidId(format!("{} id '{}': {}", $what, s, e)))
            }
        }
    };
}

impl_entity_id!(ScreenId, "screen");
impl_entity_id!(FeatureId, "feature");

// =============================================================================
// FEATURE
// =============================================================================

/// A named, described unit of functionality belonging to one screen.
///
/// `connections` are outgoing, weak references to other features. They
/// are never validated: a target may live in any screen, may be the
/// feature itself, may repeat, or may no longer exist at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub connections: Vec<FeatureId>,
}

impl Feature {
    /// Create a feature with a freshly generated id and no connections.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(FeatureId::generate(), name, description)
    }

    /// Create a feature with a caller-supplied id and no connections.
    #[must_use]
    pub fn with_id(id: FeatureId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            connections: Vec::new(),
        }
    }
}

// =============================================================================
// SCREEN
// =============================================================================

/// A named container of features, representing one UI surface.
///
/// A screen owns its features exclusively. Deleting the screen deletes
/// them, which leaves any connection pointing at them dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Screen {
    /// Create a screen with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            id: ScreenId::generate(),
            name: name.into(),
            features,
        }
    }
}

// =============================================================================
// SEARCH RESULT
// =============================================================================

/// One screen's share of a search: the ids of its matching features.
///
/// Transient; recomputed from a snapshot, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub screen_id: ScreenId,
    pub feature_ids: Vec<FeatureId>,
}

impl SearchResult {
    /// Check whether a feature of this screen matched.
    #[must_use]
    pub fn contains(&self, feature: &FeatureId) -> bool {
        self.feature_ids.contains(feature)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Impact system.
///
/// Store mutations never produce these: an unknown screen or feature is
/// a silent no-op, and a dangling connection is an expected state. Only
/// the import path, form validation and I/O boundaries can fail.
#[derive(Debug, Error)]
pub enum ImpactError {
    /// The import sheet cannot be turned into screens.
    #[error("Malformed import: {0}")]
    ImportMalformed(String),

    /// A form submission carried a blank name.
    #[error("A {0} name is required")]
    InvalidName(&'static str),

    /// A feature form was submitted with no screen to add to.
    #[error("No screen selected")]
    NoScreenSelected,

    /// An identifier could not be parsed.
    #[error("Invalid {0}")]
    InvalidId(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for ImpactError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
