//! # Ingestor Module
//!
//! Bulk import of screens from a tabular sheet.
//!
//! - Row 0 holds screen names; blank or whitespace-only headers are ignored
//! - Row r, column c holds an optional feature name for the screen of header c
//! - Every header becomes exactly one new screen, even with no features
//! - Import is all-or-nothing: the whole sheet is parsed before the first
//!   `add_screen` call, so a malformed sheet leaves the store untouched
//!
//! Reading the spreadsheet file itself is the caller's concern; this module
//! consumes the resulting grid of optional strings.

use crate::primitives::{MAX_SHEET_COLUMNS, MAX_SHEET_ROWS, MIN_SHEET_ROWS};
use crate::store::EntityStore;
use crate::{Feature, ImpactError, Screen, ScreenId};
use serde::{Deserialize, Serialize};

/// A grid of optional cell strings, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    #[must_use]
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Parse a JSON array of rows.
    ///
    /// String cells are kept; `null`, numbers, booleans and nested values
    /// are treated as blank cells.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ImpactError> {
        let raw: Vec<Vec<serde_json::Value>> = serde_json::from_slice(bytes).map_err(|e| {
            ImpactError::ImportMalformed(format!("expected a JSON array of rows: {}", e))
        })?;
        let rows = raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        serde_json::Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        Ok(Self { rows })
    }

    fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|s| !s.is_empty())
}

/// The Ingestor turns sheets into screens through the store's own contract.
pub struct Ingestor;

impl Ingestor {
    /// Validate sheet dimensions.
    pub fn validate(sheet: &Sheet) -> Result<(), ImpactError> {
        if sheet.rows.len() < MIN_SHEET_ROWS {
            return Err(ImpactError::ImportMalformed(
                "sheet must contain at least headers and one row of data".to_string(),
            ));
        }
        if sheet.rows.len() > MAX_SHEET_ROWS {
            return Err(ImpactError::ImportMalformed(format!(
                "sheet has {} rows, maximum is {}",
                sheet.rows.len(),
                MAX_SHEET_ROWS
            )));
        }
        if let Some(wide) = sheet.rows.iter().map(Vec::len).max()
            && wide > MAX_SHEET_COLUMNS
        {
            return Err(ImpactError::ImportMalformed(format!(
                "sheet has {} columns, maximum is {}",
                wide, MAX_SHEET_COLUMNS
            )));
        }
        Ok(())
    }

    /// Parse a sheet into new screens with freshly generated ids.
    ///
    /// Screen and feature names are trimmed. Features get an empty
    /// description and no connections.
    pub fn parse_sheet(sheet: &Sheet) -> Result<Vec<Screen>, ImpactError> {
        Self::validate(sheet)?;

        let header_width = sheet.rows[0].len();
        let screens = (0..header_width)
            .filter_map(|column| {
                let name = non_blank(sheet.cell(0, column))?;
                let features = (1..sheet.rows.len())
                    .filter_map(|row| non_blank(sheet.cell(row, column)))
                    .map(|feature| Feature::new(feature, ""))
                    .collect();
                Some(Screen::new(name, features))
            })
            .collect();

        Ok(screens)
    }

    /// Import a sheet into the store.
    ///
    /// Returns the ids of the created screens in header order. On error the
    /// store is not modified.
    pub fn import_sheet(
        store: &mut EntityStore,
        sheet: &Sheet,
    ) -> Result<Vec<ScreenId>, ImpactError> {
        let screens = Self::parse_sheet(sheet)?;
        let feature_count: usize = screens.iter().map(|s| s.features.len()).sum();

        let ids: Vec<ScreenId> = screens.iter().map(|s| s.id).collect();
        for screen in screens {
            store.add_screen(screen);
        }

        tracing::info!(
            imported_screens = ids.len(),
            imported_features = feature_count,
            total_screens = store.current().screen_count(),
            "Imported sheet"
        );
        Ok(ids)
    }
}

// =============================================================================
// TESTS
// =============================================================================
