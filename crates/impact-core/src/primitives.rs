//! # Fixed Primitives
//!
//! Hardcoded layout and ingestion constants for the Impact core.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! The projector is only deterministic because every coordinate it emits is
//! derived from these integers and the entity order.

/// Horizontal position of every screen node.
pub const SCREEN_COLUMN_X: i64 = 250;

/// Horizontal position of every feature node.
pub const FEATURE_COLUMN_X: i64 = 500;

/// Vertical spacing between consecutive features of one screen.
pub const FEATURE_ROW_HEIGHT: i64 = 80;

/// Minimum height of a screen's block, reached by screens with 0–2 features.
pub const MIN_SCREEN_BLOCK_HEIGHT: i64 = 160;

/// Prefix of screen node ids in a projection.
pub const SCREEN_NODE_PREFIX: &str = "screen-";

/// Prefix of feature node ids in a projection.
pub const FEATURE_NODE_PREFIX: &str = "feature-";

/// Prefix of screen node labels.
pub const SCREEN_LABEL_PREFIX: &str = "Screen: ";

// =============================================================================
// INPUT LIMITS
// =============================================================================

/// Minimum number of rows in an import sheet: one header row plus one data row.
pub const MIN_SHEET_ROWS: usize = 2;

/// Maximum number of rows accepted in a single import sheet.
///
/// Sheets longer than this are rejected as a whole.
pub const MAX_SHEET_ROWS: usize = 100_000;

/// Maximum number of columns accepted in a single import sheet.
pub const MAX_SHEET_COLUMNS: usize = 1024;

/// Stem used for export files when no search term is active.
pub const DEFAULT_EXPORT_STEM: &str = "impact";

/// Compute the height of a screen block holding `feature_count` features.
#[must_use]
pub const fn screen_block_height(feature_count: usize) -> i64 {
    let stacked = (feature_count as i64).saturating_mul(FEATURE_ROW_HEIGHT);
    if stacked > MIN_SCREEN_BLOCK_HEIGHT {
        stacked
    } else {
        MIN_SCREEN_BLOCK_HEIGHT
    }
}
