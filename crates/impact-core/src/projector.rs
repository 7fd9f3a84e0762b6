//! # Graph Projector
//!
//! Converts a snapshot plus selection and search state into a positioned
//! node/edge set for an external renderer.
//!
//! - Output is a pure function of the inputs: no randomness, no clocks
//! - Layout uses integer pixels from `primitives`
//! - The whole projection is recomputed on every change; cost is linear in
//!   the number of features plus the selected feature's connections
//!
//! Impact edges of the selected feature are emitted for every connection,
//! including dangling ones. Dropping edges whose target node does not
//! exist is the renderer's job.

use crate::primitives::{
    FEATURE_COLUMN_X, FEATURE_NODE_PREFIX, FEATURE_ROW_HEIGHT, SCREEN_COLUMN_X,
    SCREEN_LABEL_PREFIX, SCREEN_NODE_PREFIX, screen_block_height,
};
use crate::store::Snapshot;
use crate::{FeatureId, ScreenId, SearchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// PROJECTION TYPES
// =============================================================================

/// Integer pixel position of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Screen,
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Screen → feature containment.
    Structural,
    /// Selected feature → connection target.
    Impact,
}

/// Visual state requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// No search results are active.
    #[default]
    Plain,
    /// Part of the active search results.
    Accent,
    /// Search results are active and this element is not part of them.
    Dimmed,
    /// An impact edge of the selected feature.
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    pub highlighted: bool,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub emphasis: Emphasis,
}

/// A renderable graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Projection {
    /// Ids of every node in the projection.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Edges whose endpoints both exist as nodes.
    pub fn drawable_edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        let ids = self.node_ids();
        self.edges
            .iter()
            .filter(move |e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Node id of a screen.
#[must_use]
pub fn screen_node_id(id: ScreenId) -> String {
    format!("{}{}", SCREEN_NODE_PREFIX, id)
}

/// Node id of a feature.
#[must_use]
pub fn feature_node_id(id: FeatureId) -> String {
    format!("{}{}", FEATURE_NODE_PREFIX, id)
}

// =============================================================================
// PROJECTION
// =============================================================================

fn emphasis_for(has_results: bool, highlighted: bool) -> Emphasis {
    match (has_results, highlighted) {
        (false, _) => Emphasis::Plain,
        (true, true) => Emphasis::Accent,
        (true, false) => Emphasis::Dimmed,
    }
}

/// Project the snapshot into a positioned graph.
///
/// A node is highlighted iff `search_term` is non-empty and the node
/// appears in `search_results`. Dimming and accenting only apply while
/// `search_results` is non-empty.
#[must_use]
pub fn project(
    snapshot: &Snapshot,
    selected_feature: Option<FeatureId>,
    search_results: &[SearchResult],
    search_term: &str,
) -> Projection {
    let has_results = !search_results.is_empty();
    let searching = !search_term.is_empty();
    let mut projection = Projection::default();
    let mut block_start: i64 = 0;

    for screen in snapshot.screens() {
        let screen_id = screen.id();
        let screen_node = screen_node_id(screen_id);
        let result = search_results.iter().find(|r| r.screen_id == screen_id);
        let screen_highlighted = searching && result.is_some();

        projection.nodes.push(GraphNode {
            id: screen_node.clone(),
            kind: NodeKind::Screen,
            label: format!("{}{}", SCREEN_LABEL_PREFIX, screen.name()),
            position: Position {
                x: SCREEN_COLUMN_X,
                y: block_start,
            },
            highlighted: screen_highlighted,
            emphasis: emphasis_for(has_results, screen_highlighted),
        });

        let mut feature_count = 0usize;
        for (index, feature) in screen.features().enumerate() {
            feature_count += 1;
            let feature_node = feature_node_id(feature.id);
            let highlighted = searching
                && search_results
                    .iter()
                    .any(|r| r.screen_id == screen_id && r.contains(&feature.id));
            let emphasis = emphasis_for(has_results, highlighted);

            projection.nodes.push(GraphNode {
                id: feature_node.clone(),
                kind: NodeKind::Feature,
                label: feature.name.clone(),
                position: Position {
                    x: FEATURE_COLUMN_X,
                    y: block_start + (index as i64) * FEATURE_ROW_HEIGHT,
                },
                highlighted,
                emphasis,
            });

            projection.edges.push(GraphEdge {
                id: format!("{}-{}", screen_id, feature.id),
                source: screen_node.clone(),
                target: feature_node.clone(),
                kind: EdgeKind::Structural,
                emphasis,
            });

            if selected_feature == Some(feature.id) {
                projection
                    .edges
                    .extend(feature.connections.iter().map(|target| GraphEdge {
                        id: format!("{}-{}", feature.id, target),
                        source: feature_node.clone(),
                        target: feature_node_id(*target),
                        kind: EdgeKind::Impact,
                        emphasis: Emphasis::Selected,
                    }));
            }
        }

        block_start += screen_block_height(feature_count);
    }

    projection
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::search;
    use crate::store::EntityStore;
    use crate::{Feature, Screen};

    fn screen(name: &str, features: &[&str]) -> Screen {
        Screen::new(
            name,
            features.iter().map(|f| Feature::new(*f, "")).collect(),
        )
    }

    #[test]
    fn empty_store_projects_empty_graph() {
        let store = EntityStore::new();
        let projection = project(store.current(), None, &[], "");
        assert!(projection.nodes.is_empty());
        assert!(projection.edges.is_empty());
    }

    #[test]
    fn layout_stacks_screen_blocks() {
        let a = screen("A", &["F1", "F2", "F3"]);
        let b = screen("B", &["G1"]);
        let c = screen("C", &[]);
        let ids = (a.id, b.id, c.id);
        let store = EntityStore::from_screens([a.clone(), b, c]);

        let projection = project(store.current(), None, &[], "");

        let a_node = projection.node(&screen_node_id(ids.0)).expect("a");
        let b_node = projection.node(&screen_node_id(ids.1)).expect("b");
        let c_node = projection.node(&screen_node_id(ids.2)).expect("c");
        assert_eq!(a_node.position, Position { x: 250, y: 0 });
        assert_eq!(b_node.position, Position { x: 250, y: 240 });
        assert_eq!(c_node.position, Position { x: 250, y: 400 });

        let third = projection
            .node(&feature_node_id(a.features[2].id))
            .expect("feature");
        assert_eq!(third.position, Position { x: 500, y: 160 });
        assert_eq!(third.label, "F3");
        assert_eq!(a_node.label, "Screen: A");
    }

    #[test]
    fn structural_edges_always_present() {
        let a = screen("A", &["F1", "F2"]);
        let store = EntityStore::from_screens([a.clone()]);

        let projection = project(store.current(), None, &[], "");

        assert_eq!(projection.edges.len(), 2);
        assert!(projection.edges.iter().all(|e| e.kind == EdgeKind::Structural));
        assert_eq!(projection.edges[0].source, screen_node_id(a.id));
        assert_eq!(projection.edges[0].target, feature_node_id(a.features[0].id));
        assert_eq!(projection.edges[0].id, format!("{}-{}", a.id, a.features[0].id));
    }

    #[test]
    fn impact_edges_include_dangling_targets() {
        let a = screen("A", &["F1"]);
        let f1 = a.features[0].id;
        let ghost = FeatureId::generate();
        let mut store = EntityStore::from_screens([a]);
        store.add_connection(f1, ghost);

        let projection = project(store.current(), Some(f1), &[], "");

        let impact: Vec<_> = projection
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Impact)
            .collect();
        assert_eq!(impact.len(), 1);
        assert_eq!(impact[0].target, feature_node_id(ghost));
        assert_eq!(projection.drawable_edges().count(), 1);
    }

    #[test]
    fn no_emphasis_without_results() {
        let store = EntityStore::from_screens([screen("A", &["F1"])]);

        let projection = project(store.current(), None, &[], "nothing");

        assert!(projection.nodes.iter().all(|n| n.emphasis == Emphasis::Plain));
        assert!(projection.nodes.iter().all(|n| !n.highlighted));
    }

    #[test]
    fn search_accents_hits_and_dims_the_rest() {
        let a = screen("A", &["Login button", "Logo"]);
        let b = screen("B", &["Cart"]);
        let store = EntityStore::from_screens([a.clone(), b.clone()]);
        let outcome = search("button", store.current());

        let projection = project(store.current(), None, &outcome.results, &outcome.matched_term);

        let emphasis = |id: String| projection.node(&id).map(|n| n.emphasis);
        assert_eq!(emphasis(screen_node_id(a.id)), Some(Emphasis::Accent));
        assert_eq!(emphasis(feature_node_id(a.features[0].id)), Some(Emphasis::Accent));
        assert_eq!(emphasis(feature_node_id(a.features[1].id)), Some(Emphasis::Dimmed));
        assert_eq!(emphasis(screen_node_id(b.id)), Some(Emphasis::Dimmed));
        assert_eq!(projection.edges[0].emphasis, Emphasis::Accent);
        assert_eq!(projection.edges[1].emphasis, Emphasis::Dimmed);
    }

    #[test]
    fn results_without_term_dim_everything() {
        let a = screen("A", &["F1"]);
        let store = EntityStore::from_screens([a.clone()]);
        let results = vec![SearchResult {
            screen_id: a.id,
            feature_ids: vec![a.features[0].id],
        }];

        let projection = project(store.current(), None, &results, "");

        assert!(projection.nodes.iter().all(|n| !n.highlighted));
        assert!(projection.nodes.iter().all(|n| n.emphasis == Emphasis::Dimmed));
    }
}
