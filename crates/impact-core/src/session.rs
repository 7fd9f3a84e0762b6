//! # Session Module
//!
//! The application context: one entity store plus the active search.
//!
//! Every store mutation made through a `Session` is followed by a refresh
//! of the derived search outcome, so `search_outcome()` always describes
//! the current snapshot. The projection is computed on demand from the
//! snapshot, the selected feature and the search outcome.
//!
//! A Session is an explicit value passed by reference; there is no global
//! instance.

use crate::forms::{
    FeatureFormState, FormState, ScreenDraft, ScreenFormState, Submission, on_selection_change,
    submit_feature_form, submit_screen_form,
};
use crate::ingestor::{Ingestor, Sheet};
use crate::projector::{Projection, project};
use crate::search::{Label, SearchOutcome, labels, matches_any_label, search};
use crate::store::{EntityStore, Snapshot};
use crate::system::GraphMetrics;
use crate::{Feature, FeatureId, ImpactError, Screen, ScreenId};
use std::sync::Arc;

/// A store with its active search state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: EntityStore,
    search_term: String,
    outcome: SearchOutcome,
    /// Snapshot version the outcome was computed from.
    searched_version: u64,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing store.
    #[must_use]
    pub fn with_store(store: EntityStore) -> Self {
        let searched_version = store.current().version();
        Self {
            store,
            searched_version,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Borrow the current snapshot.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        self.store.current()
    }

    /// Take a frozen handle on the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    fn refresh(&mut self) {
        let version = self.store.current().version();
        if version == self.searched_version {
            return;
        }
        self.searched_version = version;
        if !self.search_term.is_empty() {
            self.outcome = search(&self.search_term, self.store.current());
        }
    }

    // =========================================================================
    // STORE OPERATIONS
    // =========================================================================

    pub fn add_screen(&mut self, screen: Screen) {
        self.store.add_screen(screen);
        self.refresh();
    }

    pub fn update_screen(&mut self, id: ScreenId, name: &str) -> bool {
        let applied = self.store.update_screen(id, name);
        self.refresh();
        applied
    }

    pub fn remove_screen(&mut self, id: ScreenId) -> bool {
        let applied = self.store.remove_screen(id);
        self.refresh();
        applied
    }

    pub fn add_feature(&mut self, screen_id: ScreenId, feature: Feature) -> bool {
        let applied = self.store.add_feature(screen_id, feature);
        self.refresh();
        applied
    }

    pub fn update_feature(
        &mut self,
        screen_id: ScreenId,
        feature_id: FeatureId,
        name: &str,
        description: &str,
    ) -> bool {
        let applied = self
            .store
            .update_feature(screen_id, feature_id, name, description);
        self.refresh();
        applied
    }

    pub fn remove_feature(&mut self, screen_id: ScreenId, feature_id: FeatureId) -> bool {
        let applied = self.store.remove_feature(screen_id, feature_id);
        self.refresh();
        applied
    }

    pub fn add_connection(&mut self, feature_id: FeatureId, target: FeatureId) -> bool {
        let applied = self.store.add_connection(feature_id, target);
        self.refresh();
        applied
    }

    /// Update both selection pointers and return the synced form state.
    pub fn select(&mut self, screen: Option<ScreenId>, feature: Option<FeatureId>) -> FormState {
        self.store.set_selected_screen(screen);
        self.store.set_selected_feature(feature);
        self.refresh();
        self.form_state()
    }

    pub fn set_selected_screen(&mut self, screen: Option<ScreenId>) {
        self.store.set_selected_screen(screen);
        self.refresh();
    }

    pub fn set_selected_feature(&mut self, feature: Option<FeatureId>) {
        self.store.set_selected_feature(feature);
        self.refresh();
    }

    /// Import a sheet atomically.
    pub fn import_sheet(&mut self, sheet: &Sheet) -> Result<Vec<ScreenId>, ImpactError> {
        let ids = Ingestor::import_sheet(&mut self.store, sheet)?;
        self.refresh();
        Ok(ids)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Change the query and recompute the search outcome.
    pub fn set_search_term(&mut self, term: &str) -> &SearchOutcome {
        self.search_term = term.to_string();
        self.outcome = search(term, self.store.current());
        self.searched_version = self.store.current().version();
        &self.outcome
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn search_outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    /// Screen and feature labels of the current snapshot.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        labels(self.store.current())
    }

    /// Check whether the active query names nothing known, so the caller
    /// may offer to create a screen and feature seeded with it.
    #[must_use]
    pub fn offers_creation(&self) -> bool {
        !self.search_term.is_empty() && !matches_any_label(&self.search_term, &self.labels())
    }

    // =========================================================================
    // FORMS
    // =========================================================================

    /// Form state for the current selection.
    #[must_use]
    pub fn form_state(&self) -> FormState {
        on_selection_change(self.store.current())
    }

    pub fn submit_screen_form(
        &mut self,
        form: ScreenFormState,
    ) -> Result<Submission<ScreenId>, ImpactError> {
        let submission = submit_screen_form(&mut self.store, form)?;
        self.refresh();
        Ok(submission)
    }

    /// Submit the feature form against the selected screen.
    pub fn submit_feature_form(
        &mut self,
        form: FeatureFormState,
    ) -> Result<Submission<FeatureId>, ImpactError> {
        let screen_id = self
            .store
            .current()
            .selected_screen()
            .ok_or(ImpactError::NoScreenSelected)?;
        let submission = submit_feature_form(&mut self.store, screen_id, form)?;
        self.refresh();
        Ok(submission)
    }

    /// Create a screen and one feature both named after `text`.
    pub fn quick_create(&mut self, text: &str) -> Result<ScreenId, ImpactError> {
        let screen = ScreenDraft::seeded(text).into_screen()?;
        let id = screen.id;
        self.add_screen(screen);
        Ok(id)
    }

    // =========================================================================
    // DERIVED VIEWS
    // =========================================================================

    /// Project the current state into a renderable graph.
    #[must_use]
    pub fn projection(&self) -> Projection {
        let snapshot = self.store.current();
        project(
            snapshot,
            snapshot.selected_feature(),
            &self.outcome.results,
            &self.search_term,
        )
    }

    #[must_use]
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics::from_snapshot(self.store.current())
    }
}

// =============================================================================
// TESTS
// =============================================================================
