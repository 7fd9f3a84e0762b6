//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests ensure ordering, isolation and determinism invariants.

use impact_core::{
    EntityStore, Feature, FeatureId, Screen, ScreenId, export_dot, export_json, project, search,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Build screens from generated feature-name lists.
fn build_screens(shape: &[Vec<String>]) -> Vec<Screen> {
    shape
        .iter()
        .enumerate()
        .map(|(i, names)| {
            Screen::new(
                format!("Screen {i}"),
                names.iter().map(|n| Feature::new(n.clone(), "")).collect(),
            )
        })
        .collect()
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,12}"
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Removing screens keeps survivors in their original relative order.
    #[test]
    fn removal_preserves_survivor_order(
        count in 1usize..20,
        removed in vec(any::<bool>(), 20)
    ) {
        let screens: Vec<Screen> = (0..count).map(|i| Screen::new(format!("S{i}"), vec![])).collect();
        let ids: Vec<ScreenId> = screens.iter().map(|s| s.id).collect();
        let mut store = EntityStore::from_screens(screens);

        for (id, remove) in ids.iter().zip(&removed) {
            if *remove {
                store.remove_screen(*id);
            }
        }

        let expected: Vec<ScreenId> = ids
            .iter()
            .zip(&removed)
            .filter(|(_, remove)| !**remove)
            .map(|(id, _)| *id)
            .collect();
        let actual: Vec<ScreenId> = store.current().screens().map(|s| s.id()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// add_feature then remove_feature restores the feature list.
    #[test]
    fn add_then_remove_feature_restores(names in vec(name_strategy(), 0..8), extra in name_strategy()) {
        let screen = Screen::new("S", names.iter().map(|n| Feature::new(n.clone(), "")).collect());
        let screen_id = screen.id;
        let mut store = EntityStore::from_screens([screen]);
        let before = store.current().to_screens();

        let feature = Feature::new(extra, "");
        let feature_id = feature.id;
        store.add_feature(screen_id, feature);
        store.remove_feature(screen_id, feature_id);

        prop_assert_eq!(store.current().to_screens(), before);
    }

    /// update_feature keeps id and connections.
    #[test]
    fn update_feature_keeps_identity(name in name_strategy(), description in name_strategy(), links in 0usize..5) {
        let feature = Feature::new("Original", "");
        let feature_id = feature.id;
        let screen = Screen::new("S", vec![feature]);
        let screen_id = screen.id;
        let mut store = EntityStore::from_screens([screen]);
        for _ in 0..links {
            store.add_connection(feature_id, FeatureId::generate());
        }
        let connections = store.current().feature(feature_id).map(|f| f.connections.clone());

        store.update_feature(screen_id, feature_id, &name, &description);

        let updated = store.current().feature(feature_id).cloned();
        prop_assert!(updated.is_some());
        let updated = updated.unwrap_or_else(|| Feature::new("", ""));
        prop_assert_eq!(updated.id, feature_id);
        prop_assert_eq!(Some(updated.connections), connections);
        prop_assert_eq!(updated.name, name);
        prop_assert_eq!(updated.description, description);
    }

    /// add_connection never touches any feature but its source.
    #[test]
    fn add_connection_only_mutates_source(shape in vec(vec(name_strategy(), 1..4), 2..5), pick in any::<prop::sample::Index>()) {
        let screens = build_screens(&shape);
        let all: Vec<FeatureId> = screens.iter().flat_map(|s| s.features.iter().map(|f| f.id)).collect();
        let mut store = EntityStore::from_screens(screens);
        let source = all[pick.index(all.len())];
        let before = store.current().to_screens();

        store.add_connection(source, FeatureId::generate());

        let after = store.current().to_screens();
        for (old, new) in before.iter().flat_map(|s| &s.features).zip(after.iter().flat_map(|s| &s.features)) {
            if old.id == source {
                prop_assert_eq!(new.connections.len(), old.connections.len() + 1);
            } else {
                prop_assert_eq!(old, new);
            }
        }
    }

    /// The empty query never matches.
    #[test]
    fn empty_query_matches_nothing(shape in vec(vec(name_strategy(), 0..4), 0..5)) {
        let store = EntityStore::from_screens(build_screens(&shape));
        prop_assert!(!search("", store.current()).has_results());
    }

    /// Search reports exactly the matching features, in order, and no empty screens.
    #[test]
    fn search_reports_only_matches(shape in vec(vec(name_strategy(), 0..4), 0..5), query in "[a-zA-Z]{1,3}") {
        let store = EntityStore::from_screens(build_screens(&shape));
        let outcome = search(&query, store.current());
        let needle = query.to_lowercase();

        for result in &outcome.results {
            prop_assert!(!result.feature_ids.is_empty());
            let view = store.current().screen(result.screen_id);
            prop_assert!(view.is_some());
            if let Some(view) = view {
                let expected: Vec<FeatureId> = view
                    .features()
                    .filter(|f| f.name.to_lowercase().contains(&needle))
                    .map(|f| f.id)
                    .collect();
                prop_assert_eq!(&result.feature_ids, &expected);
            }
        }
        let reported = outcome.results.len();
        let matching = store
            .current()
            .screens()
            .filter(|s| s.features().any(|f| f.name.to_lowercase().contains(&needle)))
            .count();
        prop_assert_eq!(reported, matching);
    }

    /// Projection and its exports are deterministic.
    #[test]
    fn projection_is_deterministic(shape in vec(vec(name_strategy(), 0..4), 0..5), query in "[a-z]{0,2}") {
        let screens = build_screens(&shape);
        let selected = screens.iter().flat_map(|s| s.features.first()).map(|f| f.id).next();
        let mut store = EntityStore::from_screens(screens);
        if let Some(id) = selected {
            store.add_connection(id, id);
            store.add_connection(id, FeatureId::generate());
        }
        let outcome = search(&query, store.current());

        let first = project(store.current(), selected, &outcome.results, &query);
        let second = project(store.current(), selected, &outcome.results, &query);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(export_dot(&first), export_dot(&second));
        prop_assert_eq!(export_json(&first).ok(), export_json(&second).ok());
    }

    /// Screen blocks never overlap.
    #[test]
    fn screen_blocks_are_stacked(shape in vec(vec(name_strategy(), 0..6), 1..6)) {
        let store = EntityStore::from_screens(build_screens(&shape));
        let projection = project(store.current(), None, &[], "");

        let mut expected_y = 0i64;
        for (screen, names) in store.current().screens().zip(&shape) {
            let node = projection.node(&impact_core::screen_node_id(screen.id()));
            prop_assert_eq!(node.map(|n| n.position.y), Some(expected_y));
            expected_y += ((names.len() as i64) * 80).max(160);
        }
    }
}
