//! # impact-core
//!
//! The deterministic engine behind Impact - THE LOGIC.
//!
//! This crate models an application as screens holding features, records
//! directed "impact" connections between features, and projects that state
//! into a positioned node/edge graph with search and selection emphasis.
//!
//! ## Components
//!
//! - `store` → copy-on-write entity store with selection pointers
//! - `search` → substring search and the label set
//! - `projector` → layout and emphasis of the renderable graph
//! - `ingestor` → bulk import from a tabular sheet
//! - `forms` → selection-driven form state and submissions
//! - `session` → the application context tying them together
//!
//! ## Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Store mutations never fail: unknown ids are no-ops
//! - Every derived view is a pure function of one snapshot

// =============================================================================
// MODULES
// =============================================================================

pub mod export;
pub mod forms;
pub mod ingestor;
pub mod primitives;
pub mod projector;
pub mod search;
pub mod session;
pub mod store;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Feature, FeatureId, ImpactError, Screen, ScreenId, SearchResult};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use export::{export_dot, export_file_stem, export_json};
pub use forms::{
    FeatureDraft, FeatureFormState, FormState, ScreenDraft, ScreenFormState, Submission,
    on_selection_change, submit_feature_form, submit_screen_form,
};
pub use ingestor::{Ingestor, Sheet};
pub use projector::{
    EdgeKind, Emphasis, GraphEdge, GraphNode, NodeKind, Position, Projection, feature_node_id,
    project, screen_node_id,
};
pub use search::{Label, LabelTarget, SearchOutcome, labels, matches_any_label, search};
pub use session::Session;
pub use store::{EntityStore, ScreenView, Snapshot};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::GraphMetrics;
