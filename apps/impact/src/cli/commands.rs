//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::GraphFormat;
use crate::api;
use crate::config::Config;
use impact_core::{
    FeatureId, ImpactError, ScreenId, Session, Sheet, export_dot, export_file_stem, export_json,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ImpactError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ImpactError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ImpactError::ImportMalformed(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ImpactError> {
    let canonical = path.canonicalize().map_err(|e| {
        ImpactError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ImpactError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: its parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, ImpactError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ImpactError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ImpactError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ImpactError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), ImpactError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// SESSION LOADING
// =============================================================================

/// Build a fresh session from a sheet file.
pub fn load_session(file: &Path, max_size: u64) -> Result<Session, ImpactError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, max_size)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| ImpactError::IoError(format!("Read file: {}", e)))?;
    let sheet = Sheet::from_json(&contents)?;

    let mut session = Session::new();
    session.import_sheet(&sheet)?;
    Ok(session)
}

/// Select the first feature named `name` (trimmed, case-insensitive) and
/// the screen that owns it.
pub fn select_feature_by_name(
    session: &mut Session,
    name: &str,
) -> Result<(ScreenId, FeatureId), ImpactError> {
    let wanted = name.trim().to_lowercase();
    let found = session.current().screens().find_map(|screen| {
        screen
            .features()
            .find(|f| f.name.trim().to_lowercase() == wanted)
            .map(|f| (screen.id(), f.id))
    });

    let (screen, feature) =
        found.ok_or_else(|| ImpactError::InvalidId(format!("feature name '{}'", name)))?;
    session.select(Some(screen), Some(feature));
    Ok((screen, feature))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server, optionally preloaded from a sheet file.
pub async fn cmd_server(config: &Config, file: Option<&Path>) -> Result<(), ImpactError> {
    let session = match file {
        Some(path) => load_session(path, config.import.max_file_size)?,
        None => Session::new(),
    };

    println!("Impact Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Rate limit: {} req/s", config.server.rate_limit);
    println!("  Screens:    {}", session.current().screen_count());
    println!();
    println!("Endpoints:");
    println!("  GET  /screens  - List screens");
    println!("  POST /import   - Import a JSON grid");
    println!("  PUT  /search   - Set the search term");
    println!("  GET  /graph    - Projection (JSON)");
    println!("  GET  /graph.dot - Projection (Graphviz)");
    println!("  GET  /health   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server, session).await
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Parse a sheet file and print the screens it produces.
pub fn cmd_import(file: &Path, max_size: u64, json_mode: bool) -> Result<(), ImpactError> {
    tracing::info!("Importing from {:?}", file);
    let session = load_session(file, max_size)?;
    let screens = session.current().to_screens();

    if json_mode {
        return print_json(&screens);
    }

    println!("Imported {} screens", screens.len());
    for screen in &screens {
        println!();
        println!("{} ({})", screen.name, screen.id);
        for feature in &screen.features {
            println!("  - {}", feature.name);
        }
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Search the features of a sheet file.
pub fn cmd_search(
    file: &Path,
    max_size: u64,
    json_mode: bool,
    query: &str,
) -> Result<(), ImpactError> {
    let mut session = load_session(file, max_size)?;
    let outcome = session.set_search_term(query).clone();

    if json_mode {
        let output = serde_json::json!({
            "matched_term": outcome.matched_term,
            "results": outcome.results,
            "offer_creation": session.offers_creation(),
        });
        return print_json(&output);
    }

    if !outcome.has_results() {
        println!("No features match '{}'", query);
        if session.offers_creation() {
            println!("Nothing named '{}' exists yet", query);
        }
        return Ok(());
    }

    println!(
        "{} features on {} screens match '{}':",
        outcome.feature_hits(),
        outcome.results.len(),
        query
    );
    let snapshot = session.current();
    for result in &outcome.results {
        let Some(screen) = snapshot.screen(result.screen_id) else {
            continue;
        };
        println!();
        println!("{}", screen.name());
        for feature in result.feature_ids.iter().filter_map(|id| snapshot.feature(*id)) {
            println!("  - {}", feature.name);
        }
    }
    Ok(())
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

/// Options for `impact graph`.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub query: String,
    pub select: Option<String>,
    pub format: GraphFormat,
    pub output: Option<PathBuf>,
}

/// Render the session's projection in `format`.
pub fn render_graph(session: &Session, format: GraphFormat) -> Result<String, ImpactError> {
    let projection = session.projection();
    match format {
        GraphFormat::Json => export_json(&projection),
        GraphFormat::Dot => Ok(export_dot(&projection)),
    }
}

/// Project a sheet file and export it.
///
/// When `output` is a directory the file is named `<term>-analysis.<ext>`.
pub fn cmd_graph(file: &Path, max_size: u64, options: &GraphOptions) -> Result<(), ImpactError> {
    let mut session = load_session(file, max_size)?;
    if !options.query.is_empty() {
        session.set_search_term(&options.query);
    }
    if let Some(name) = &options.select {
        select_feature_by_name(&mut session, name)?;
    }

    let rendered = render_graph(&session, options.format)?;

    let Some(output) = &options.output else {
        println!("{}", rendered);
        return Ok(());
    };

    let target = if output.is_dir() {
        output.join(format!(
            "{}.{}",
            export_file_stem(session.search_term()),
            options.format.extension()
        ))
    } else {
        validate_output_path(output)?
    };

    std::fs::write(&target, rendered.as_bytes())
        .map_err(|e| ImpactError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", rendered.len(), target);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show counts for a sheet file.
pub fn cmd_status(
    file: &Path,
    max_size: u64,
    json_mode: bool,
    verbose: bool,
) -> Result<(), ImpactError> {
    let session = load_session(file, max_size)?;
    let metrics = session.metrics();

    if json_mode {
        return print_json(&metrics);
    }

    println!("Impact Model Status");
    println!("===================");
    println!("File: {:?}", file);
    println!();
    println!("Screens:       {}", metrics.screen_count);
    println!("Empty Screens: {}", metrics.empty_screen_count);
    println!("Features:      {}", metrics.feature_count);
    println!("Connections:   {}", metrics.connection_count);
    println!("Dangling:      {}", metrics.dangling_count);

    if verbose {
        println!();
        for screen in session.current().screens() {
            println!("  {:<24} {} features", screen.name(), screen.feature_count());
        }
    }

    Ok(())
}
