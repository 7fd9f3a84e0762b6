//! # Form State
//!
//! Drafts submitted by the screen and feature forms, and the explicit
//! selection → form synchronization.
//!
//! The store stores whatever it is given; name non-emptiness is enforced
//! here, before any store call.

use crate::store::{EntityStore, Snapshot};
use crate::{Feature, FeatureId, ImpactError, Screen, ScreenId};
use serde::{Deserialize, Serialize};

// =============================================================================
// DRAFTS
// =============================================================================

/// One feature row of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl FeatureDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Turn the draft into a feature with a fresh id.
    pub fn into_feature(self) -> Result<Feature, ImpactError> {
        if self.is_blank() {
            return Err(ImpactError::InvalidName("feature"));
        }
        Ok(Feature::new(self.name, self.description))
    }
}

/// A new screen with its initial feature rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDraft {
    pub name: String,
    #[serde(default)]
    pub features: Vec<FeatureDraft>,
}

impl Default for ScreenDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            features: vec![FeatureDraft::default()],
        }
    }
}

impl ScreenDraft {
    /// Seed a screen and one feature with the same text.
    ///
    /// Used when a query matches nothing and the user opts to create it.
    #[must_use]
    pub fn seeded(text: &str) -> Self {
        Self {
            name: text.to_string(),
            features: vec![FeatureDraft::new(text, "")],
        }
    }

    /// Turn the draft into a screen with fresh ids.
    ///
    /// Rows with a blank feature name are dropped.
    pub fn into_screen(self) -> Result<Screen, ImpactError> {
        if self.name.trim().is_empty() {
            return Err(ImpactError::InvalidName("screen"));
        }
        let features = self
            .features
            .into_iter()
            .filter(|f| !f.is_blank())
            .map(|f| Feature::new(f.name, f.description))
            .collect();
        Ok(Screen::new(self.name, features))
    }
}

// =============================================================================
// SELECTION SYNC
// =============================================================================

/// What the screen form shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenFormState {
    /// The screen being edited, or `None` when creating.
    pub editing: Option<ScreenId>,
    pub draft: ScreenDraft,
}

/// What the feature form shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFormState {
    /// The feature form needs a screen to add to.
    pub enabled: bool,
    /// The feature being edited, or `None` when adding.
    pub editing: Option<FeatureId>,
    pub draft: FeatureDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub screen: ScreenFormState,
    pub feature: FeatureFormState,
}

/// Derive both forms from the snapshot's current selection.
///
/// Selection pointers that no longer resolve are treated as empty.
#[must_use]
pub fn on_selection_change(snapshot: &Snapshot) -> FormState {
    let selected_screen = snapshot
        .selected_screen()
        .and_then(|id| snapshot.screen(id));

    let screen = match selected_screen {
        Some(view) => ScreenFormState {
            editing: Some(view.id()),
            draft: ScreenDraft {
                name: view.name().to_string(),
                features: view
                    .features()
                    .map(|f| FeatureDraft::new(f.name.clone(), f.description.clone()))
                    .collect(),
            },
        },
        None => ScreenFormState {
            editing: None,
            draft: ScreenDraft::default(),
        },
    };

    let selected_feature = snapshot
        .selected_feature()
        .and_then(|id| snapshot.feature(id));
    let feature = FeatureFormState {
        enabled: selected_screen.is_some(),
        editing: selected_feature.map(|f| f.id),
        draft: selected_feature
            .map(|f| FeatureDraft::new(f.name.clone(), f.description.clone()))
            .unwrap_or_default(),
    };

    FormState { screen, feature }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// What a form submission did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission<Id> {
    /// A new entity was added.
    Created(Id),
    /// The entity being edited was changed.
    Updated(Id),
    /// The target named by the form does not exist; nothing changed.
    Missing(Id),
}

impl<Id: Copy> Submission<Id> {
    /// Id of the created, edited or missing entity.
    #[must_use]
    pub fn id(&self) -> Id {
        match *self {
            Self::Created(id) | Self::Updated(id) | Self::Missing(id) => id,
        }
    }

    /// Check whether the store changed.
    #[must_use]
    pub fn applied(&self) -> bool {
        !matches!(self, Self::Missing(_))
    }
}

/// Submit the screen form: rename in edit mode, create otherwise.
pub fn submit_screen_form(
    store: &mut EntityStore,
    form: ScreenFormState,
) -> Result<Submission<ScreenId>, ImpactError> {
    match form.editing {
        Some(id) => {
            if form.draft.name.trim().is_empty() {
                return Err(ImpactError::InvalidName("screen"));
            }
            if store.update_screen(id, &form.draft.name) {
                Ok(Submission::Updated(id))
            } else {
                Ok(Submission::Missing(id))
            }
        }
        None => {
            let screen = form.draft.into_screen()?;
            let id = screen.id;
            store.add_screen(screen);
            Ok(Submission::Created(id))
        }
    }
}

/// Submit the feature form against the selected screen.
///
/// In edit mode the feature's name and description are replaced; otherwise
/// a new feature is appended to `screen_id`. A screen or feature that no
/// longer exists yields `Submission::Missing`.
pub fn submit_feature_form(
    store: &mut EntityStore,
    screen_id: ScreenId,
    form: FeatureFormState,
) -> Result<Submission<FeatureId>, ImpactError> {
    if form.draft.is_blank() {
        return Err(ImpactError::InvalidName("feature"));
    }
    match form.editing {
        Some(id) => {
            if store.update_feature(screen_id, id, &form.draft.name, &form.draft.description) {
                Ok(Submission::Updated(id))
            } else {
                Ok(Submission::Missing(id))
            }
        }
        None => {
            let feature = form.draft.into_feature()?;
            let id = feature.id;
            if store.add_feature(screen_id, feature) {
                Ok(Submission::Created(id))
            } else {
                Ok(Submission::Missing(id))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_screen_name_rejected() {
        let draft = ScreenDraft {
            name: "   ".to_string(),
            features: vec![],
        };
        assert!(matches!(draft.into_screen(), Err(ImpactError::InvalidName("screen"))));
    }

    #[test]
    fn blank_feature_rows_dropped() {
        let draft = ScreenDraft {
            name: "Checkout".to_string(),
            features: vec![
                FeatureDraft::new("Pay button", "Submits the order"),
                FeatureDraft::new("  ", "orphan description"),
            ],
        };

        let screen = draft.into_screen().expect("screen");

        assert_eq!(screen.features.len(), 1);
        assert_eq!(screen.features[0].description, "Submits the order");
        assert!(screen.features[0].connections.is_empty());
    }

    #[test]
    fn seeded_draft_uses_query_twice() {
        let screen = ScreenDraft::seeded("Wishlist").into_screen().expect("screen");
        assert_eq!(screen.name, "Wishlist");
        assert_eq!(screen.features[0].name, "Wishlist");
    }

    #[test]
    fn empty_selection_gives_create_forms() {
        let store = EntityStore::new();
        let state = on_selection_change(store.current());

        assert_eq!(state.screen.editing, None);
        assert_eq!(state.screen.draft, ScreenDraft::default());
        assert!(!state.feature.enabled);
        assert_eq!(state.feature.editing, None);
    }

    #[test]
    fn selection_populates_forms() {
        let screen = Screen::new("Login", vec![Feature::new("Username", "Email or handle")]);
        let (screen_id, feature_id) = (screen.id, screen.features[0].id);
        let mut store = EntityStore::from_screens([screen]);
        store.set_selected_screen(Some(screen_id));
        store.set_selected_feature(Some(feature_id));

        let state = on_selection_change(store.current());

        assert_eq!(state.screen.editing, Some(screen_id));
        assert_eq!(state.screen.draft.name, "Login");
        assert_eq!(state.screen.draft.features.len(), 1);
        assert!(state.feature.enabled);
        assert_eq!(state.feature.editing, Some(feature_id));
        assert_eq!(state.feature.draft.description, "Email or handle");
    }

    #[test]
    fn submit_screen_form_creates_then_renames() {
        let mut store = EntityStore::new();
        let create = ScreenFormState {
            editing: None,
            draft: ScreenDraft::seeded("Home"),
        };
        let created = submit_screen_form(&mut store, create).expect("create");
        assert!(matches!(created, Submission::Created(_)));
        let id = created.id();

        let rename = ScreenFormState {
            editing: Some(id),
            draft: ScreenDraft {
                name: "Dashboard".to_string(),
                features: vec![],
            },
        };
        let renamed = submit_screen_form(&mut store, rename).expect("rename");
        assert_eq!(renamed, Submission::Updated(id));

        let view = store.current().screen(id).expect("screen");
        assert_eq!(view.name(), "Dashboard");
        // Renaming leaves features alone.
        assert_eq!(view.feature_count(), 1);
    }

    #[test]
    fn submit_feature_form_adds_and_updates() {
        let screen = Screen::new("Home", vec![]);
        let screen_id = screen.id;
        let mut store = EntityStore::from_screens([screen]);

        let add = FeatureFormState {
            enabled: true,
            editing: None,
            draft: FeatureDraft::new("Banner", ""),
        };
        let feature_id = submit_feature_form(&mut store, screen_id, add)
            .expect("add")
            .id();

        let edit = FeatureFormState {
            enabled: true,
            editing: Some(feature_id),
            draft: FeatureDraft::new("Hero banner", "Top of page"),
        };
        let edited = submit_feature_form(&mut store, screen_id, edit).expect("edit");
        assert_eq!(edited, Submission::Updated(feature_id));

        let feature = store.current().feature(feature_id).expect("feature");
        assert_eq!(feature.name, "Hero banner");
        assert_eq!(feature.description, "Top of page");
    }

    #[test]
    fn submit_feature_form_rejects_blank() {
        let mut store = EntityStore::new();
        let form = FeatureFormState {
            enabled: true,
            editing: None,
            draft: FeatureDraft::default(),
        };
        let result = submit_feature_form(&mut store, ScreenId::generate(), form);
        assert!(matches!(result, Err(ImpactError::InvalidName("feature"))));
    }

    #[test]
    fn edit_forms_for_unknown_ids_change_nothing() {
        let screen = Screen::new("Home", vec![Feature::new("Banner", "")]);
        let screen_id = screen.id;
        let mut store = EntityStore::from_screens([screen]);
        let version = store.current().version();

        let ghost_screen = ScreenId::generate();
        let rename = ScreenFormState {
            editing: Some(ghost_screen),
            draft: ScreenDraft::seeded("Renamed"),
        };
        let result = submit_screen_form(&mut store, rename).expect("submit");
        assert_eq!(result, Submission::Missing(ghost_screen));
        assert!(!result.applied());

        let ghost_feature = FeatureId::generate();
        let edit = FeatureFormState {
            enabled: true,
            editing: Some(ghost_feature),
            draft: FeatureDraft::new("Hero", ""),
        };
        let result = submit_feature_form(&mut store, screen_id, edit).expect("submit");
        assert_eq!(result, Submission::Missing(ghost_feature));

        let add = FeatureFormState {
            enabled: true,
            editing: None,
            draft: FeatureDraft::new("Hero", ""),
        };
        let result = submit_feature_form(&mut store, ghost_screen, add).expect("submit");
        assert!(!result.applied());

        assert_eq!(store.current().version(), version);
    }
}
