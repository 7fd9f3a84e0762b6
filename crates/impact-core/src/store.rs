//! # Entity Store
//!
//! The authoritative, in-memory collection of screens and features.
//!
//! ## Storage Layout
//!
//! Features live in one flat arena keyed by `FeatureId`, regardless of the
//! screen that owns them. A screen record only keeps the ordered ids of its
//! features. Connections are plain ids resolved against the arena at read
//! time; a miss means the connection is dangling and is skipped.
//!
//! ## Copy-on-Write
//!
//! The store hands out `Arc<Snapshot>` values. A mutation clones the
//! current snapshot only if a reader still holds it, so a snapshot that has
//! been handed out never changes. Every applied mutation bumps the
//! snapshot version, which consumers use as a change notification.
//!
//! ## Totality
//!
//! Mutations never fail. An unknown screen or feature id turns the
//! operation into a no-op, reported only as a `debug` trace event and a
//! `false` return value.

use crate::{Feature, FeatureId, Screen, ScreenId};
use std::collections::BTreeMap;
use std::sync::Arc;

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScreenRecord {
    id: ScreenId,
    name: String,
    /// Feature ids in insertion order.
    features: Vec<FeatureId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FeatureRecord {
    owner: ScreenId,
    feature: Feature,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// An immutable view of the store at one version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    screens: Vec<ScreenRecord>,
    features: BTreeMap<FeatureId, FeatureRecord>,
    selected_screen: Option<ScreenId>,
    selected_feature: Option<FeatureId>,
    version: u64,
}

/// A borrowed screen with its features resolved from the arena.
#[derive(Debug, Clone, Copy)]
pub struct ScreenView<'a> {
    record: &'a ScreenRecord,
    arena: &'a BTreeMap<FeatureId, FeatureRecord>,
}

impl<'a> ScreenView<'a> {
    #[must_use]
    pub fn id(&self) -> ScreenId {
        self.record.id
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    /// Features of this screen in insertion order.
    pub fn features(&self) -> impl Iterator<Item = &'a Feature> + use<'a> {
        let (record, arena) = (self.record, self.arena);
        record
            .features
            .iter()
            .filter_map(move |id| arena.get(id).map(|r| &r.feature))
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features().count()
    }

    /// Materialize an owned `Screen`.
    #[must_use]
    pub fn to_screen(&self) -> Screen {
        Screen {
            id: self.record.id,
            name: self.record.name.clone(),
            features: self.features().cloned().collect(),
        }
    }
}

impl Snapshot {
    /// All screens in display order.
    pub fn screens(&self) -> impl Iterator<Item = ScreenView<'_>> + '_ {
        self.screens.iter().map(|record| ScreenView {
            record,
            arena: &self.features,
        })
    }

    /// The first screen carrying `id`.
    #[must_use]
    pub fn screen(&self, id: ScreenId) -> Option<ScreenView<'_>> {
        self.screens().find(|s| s.id() == id)
    }

    /// Look up a feature anywhere in the store.
    #[must_use]
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id).map(|r| &r.feature)
    }

    /// The screen owning a feature.
    #[must_use]
    pub fn owner_of(&self, id: FeatureId) -> Option<ScreenId> {
        self.features.get(&id).map(|r| r.owner)
    }

    #[must_use]
    pub fn contains_feature(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    #[must_use]
    pub fn selected_screen(&self) -> Option<ScreenId> {
        self.selected_screen
    }

    #[must_use]
    pub fn selected_feature(&self) -> Option<FeatureId> {
        self.selected_feature
    }

    /// Monotonic version, bumped by every applied mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Materialize the nested screen/feature model.
    #[must_use]
    pub fn to_screens(&self) -> Vec<Screen> {
        self.screens().map(|s| s.to_screen()).collect()
    }
}

// =============================================================================
// ENTITY STORE
// =============================================================================

/// The single writer of the screen/feature collection.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    current: Arc<Snapshot>,
}

impl EntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated through `add_screen`.
    #[must_use]
    pub fn from_screens(screens: impl IntoIterator<Item = Screen>) -> Self {
        let mut store = Self::new();
        for screen in screens {
            store.add_screen(screen);
        }
        store
    }

    /// Take a shared handle on the current snapshot.
    ///
    /// The returned snapshot is frozen: later mutations are not visible
    /// through it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Borrow the current snapshot.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    fn write(&mut self) -> &mut Snapshot {
        let next = Arc::make_mut(&mut self.current);
        next.version = next.version.saturating_add(1);
        next
    }

    // =========================================================================
    // SCREENS
    // =========================================================================

    /// Append a screen with its features.
    ///
    /// No duplicate-id check is performed; callers generate fresh ids. A
    /// feature whose id is already present replaces the earlier record in
    /// the arena.
    pub fn add_screen(&mut self, screen: Screen) {
        let Screen { id, name, features } = screen;
        let next = self.write();
        let mut ids = Vec::with_capacity(features.len());
        for feature in features {
            ids.push(feature.id);
            next.features
                .insert(feature.id, FeatureRecord { owner: id, feature });
        }
        next.screens.push(ScreenRecord {
            id,
            name,
            features: ids,
        });
    }

    /// Rename every screen carrying `id`.
    pub fn update_screen(&mut self, id: ScreenId, name: &str) -> bool {
        if !self.current.screens.iter().any(|s| s.id == id) {
            tracing::debug!(screen_id = %id, "update_screen: no matching screen");
            return false;
        }
        let next = self.write();
        for record in next.screens.iter_mut().filter(|s| s.id == id) {
            record.name = name.to_string();
        }
        true
    }

    /// Remove a screen and all its features.
    ///
    /// Connections elsewhere that point at the removed features are left in
    /// place and become dangling. A selection pointing into the removed
    /// screen is cleared.
    pub fn remove_screen(&mut self, id: ScreenId) -> bool {
        if !self.current.screens.iter().any(|s| s.id == id) {
            tracing::debug!(screen_id = %id, "remove_screen: no matching screen");
            return false;
        }
        let next = self.write();
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut next.screens)
                .into_iter()
                .partition(|s| s.id == id);
        next.screens = kept;

        for feature_id in removed.iter().flat_map(|s| s.features.iter()) {
            if next.features.get(feature_id).is_some_and(|r| r.owner == id) {
                next.features.remove(feature_id);
            }
            if next.selected_feature == Some(*feature_id) {
                next.selected_feature = None;
            }
        }
        if next.selected_screen == Some(id) {
            next.selected_screen = None;
        }
        true
    }

    // =========================================================================
    // FEATURES
    // =========================================================================

    /// Append a feature to the first screen carrying `screen_id`.
    pub fn add_feature(&mut self, screen_id: ScreenId, feature: Feature) -> bool {
        let Some(index) = self.current.screens.iter().position(|s| s.id == screen_id) else {
            tracing::debug!(screen_id = %screen_id, "add_feature: no matching screen");
            return false;
        };
        let next = self.write();
        next.screens[index].features.push(feature.id);
        next.features.insert(
            feature.id,
            FeatureRecord {
                owner: screen_id,
                feature,
            },
        );
        true
    }

    /// Replace a feature's name and description, keeping its id and
    /// connections.
    pub fn update_feature(
        &mut self,
        screen_id: ScreenId,
        feature_id: FeatureId,
        name: &str,
        description: &str,
    ) -> bool {
        if !self.owns(screen_id, feature_id) {
            tracing::debug!(
                screen_id = %screen_id,
                feature_id = %feature_id,
                "update_feature: no matching feature"
            );
            return false;
        }
        let next = self.write();
        if let Some(record) = next.features.get_mut(&feature_id) {
            record.feature.name = name.to_string();
            record.feature.description = description.to_string();
        }
        true
    }

    /// Remove a feature from its screen.
    ///
    /// Other features' connections to it are not touched.
    pub fn remove_feature(&mut self, screen_id: ScreenId, feature_id: FeatureId) -> bool {
        if !self.owns(screen_id, feature_id) {
            tracing::debug!(
                screen_id = %screen_id,
                feature_id = %feature_id,
                "remove_feature: no matching feature"
            );
            return false;
        }
        let next = self.write();
        for record in next.screens.iter_mut().filter(|s| s.id == screen_id) {
            record.features.retain(|id| *id != feature_id);
        }
        if next
            .features
            .get(&feature_id)
            .is_some_and(|r| r.owner == screen_id)
        {
            next.features.remove(&feature_id);
        }
        if next.selected_feature == Some(feature_id) {
            next.selected_feature = None;
        }
        true
    }

    fn owns(&self, screen_id: ScreenId, feature_id: FeatureId) -> bool {
        self.current.features.contains_key(&feature_id)
            && self
                .current
                .screens
                .iter()
                .any(|s| s.id == screen_id && s.features.contains(&feature_id))
    }

    // =========================================================================
    // CONNECTIONS
    // =========================================================================

    /// Append `target` to the connections of `feature_id`.
    ///
    /// No cycle, duplicate or existence check on the target.
    pub fn add_connection(&mut self, feature_id: FeatureId, target: FeatureId) -> bool {
        if !self.current.features.contains_key(&feature_id) {
            tracing::debug!(feature_id = %feature_id, "add_connection: no matching feature");
            return false;
        }
        let next = self.write();
        if let Some(record) = next.features.get_mut(&feature_id) {
            record.feature.connections.push(target);
        }
        true
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Point the screen selection at `screen`, or clear it.
    pub fn set_selected_screen(&mut self, screen: Option<ScreenId>) {
        self.write().selected_screen = screen;
    }

    /// Point the feature selection at `feature`, or clear it.
    pub fn set_selected_feature(&mut self, feature: Option<FeatureId>) {
        self.write().selected_feature = feature;
    }
}

// =============================================================================
// TESTS
// =============================================================================
