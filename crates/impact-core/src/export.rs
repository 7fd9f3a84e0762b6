//! # Export Module
//!
//! Serializations of a projection for external renderers.
//!
//! - JSON: the projection as-is, for a web canvas
//! - DOT: Graphviz text with pinned positions, for rasterizing to an image
//!   or document
//!
//! Both are deterministic: the same projection always produces the same
//! bytes.

use crate::ImpactError;
use crate::primitives::DEFAULT_EXPORT_STEM;
use crate::projector::{EdgeKind, Emphasis, NodeKind, Projection};

// =============================================================================
// JSON
// =============================================================================

/// Pretty-printed JSON of the projection.
pub fn export_json(projection: &Projection) -> Result<String, ImpactError> {
    Ok(serde_json::to_string_pretty(projection)?)
}

// =============================================================================
// DOT
// =============================================================================

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn emphasis_attrs(emphasis: Emphasis) -> &'static str {
    match emphasis {
        Emphasis::Plain => "",
        Emphasis::Accent => ", color=\"#22c55e\", penwidth=2",
        Emphasis::Dimmed => ", color=\"#d1d5db\", fontcolor=\"#9ca3af\"",
        Emphasis::Selected => ", color=\"#6366f1\", penwidth=2",
    }
}

/// Graphviz DOT text of the projection.
///
/// Node positions are pinned (`pos="x,y!"`, for `neato -n`), with the y axis
/// flipped so screens still stack downwards. Edges whose target node is not
/// part of the projection (dangling connections) are omitted.
#[must_use]
pub fn export_dot(projection: &Projection) -> String {
    let mut out = String::from("digraph impact {\n");
    out.push_str("  node [fontname=\"Helvetica\"];\n");
    out.push_str("  edge [arrowsize=0.7];\n");

    for node in &projection.nodes {
        let shape = match node.kind {
            NodeKind::Screen => "box, style=bold",
            NodeKind::Feature => "box, style=rounded",
        };
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", shape={}, pos=\"{},{}!\"{}];\n",
            escape(&node.id),
            escape(&node.label),
            shape,
            node.position.x,
            -node.position.y,
            emphasis_attrs(node.emphasis)
        ));
    }

    for edge in projection.drawable_edges() {
        let style = match edge.kind {
            EdgeKind::Structural => "",
            EdgeKind::Impact => ", style=dashed",
        };
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [id=\"{}\"{}{}];\n",
            escape(&edge.source),
            escape(&edge.target),
            escape(&edge.id),
            style,
            emphasis_attrs(edge.emphasis)
        ));
    }

    out.push_str("}\n");
    out
}

/// File stem for an export: `<term>-analysis`, or `impact-analysis` when no
/// term is active.
///
/// Control characters, quotes, path separators and the characters Windows
/// rejects in file names become `_`, so the stem is usable both as a file
/// name and inside a `Content-Disposition` header.
#[must_use]
pub fn export_file_stem(search_term: &str) -> String {
    let base = if search_term.is_empty() {
        DEFAULT_EXPORT_STEM
    } else {
        search_term
    };
    let safe: String = base
        .chars()
        .map(|c| if is_unsafe_in_file_name(c) { '_' } else { c })
        .collect();
    format!("{}-analysis", safe)
}

fn is_unsafe_in_file_name(c: char) -> bool {
    c.is_control() || matches!(c, '"' | '/' | '\\' | ':' | '*' | '?' | '<' | '>' | '|')
}

// =============================================================================
// TESTS
// =============================================================================
