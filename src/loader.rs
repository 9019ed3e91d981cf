//! CSV loading for the three dashboard tables.
//!
//! Nothing is loaded at module scope; each table is read by an explicit
//! `load_*` call per render request. A missing file is a hard
//! [`BiblioflowError::FileNotFound`], and the author table's column contract
//! is checked against the header before any row is parsed, so contract
//! violations surface here rather than inside the graph builder.

use crate::error::{BiblioflowError, Result};
use crate::flow::AuthorRecord;
use crate::terms::TermCount;
use crate::worldmap::ArticleRecord;
use std::path::Path;
use tracing::{debug, info};

/// Columns the author table must provide (external contract).
pub const AUTHOR_COLUMNS: &[&str] = &["author", "n_artigos_pub", "affiliation", "country"];

/// Load the author table (`df_authors.csv`).
///
/// # Errors
///
/// * [`BiblioflowError::FileNotFound`] - the path does not exist
/// * [`BiblioflowError::InvalidInput`] - a required column is missing
/// * [`BiblioflowError::Csv`] - a row fails to parse
pub fn load_authors(path: &Path) -> Result<Vec<AuthorRecord>> {
    let mut reader = open(path)?;
    require_columns(&mut reader, AUTHOR_COLUMNS, path)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: AuthorRecord = row?;
        records.push(record);
    }
    info!("Loaded {} author records from {:?}", records.len(), path);
    Ok(records)
}

/// Load the title term frequency table (`termos_titulos.csv`).
pub fn load_terms(path: &Path) -> Result<Vec<TermCount>> {
    let mut reader = open(path)?;
    require_columns(&mut reader, &["Term", "Count"], path)?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let term: TermCount = row?;
        rows.push(term);
    }
    info!("Loaded {} term rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Load the per-article table (`df_combined.csv`).
///
/// Rows with an empty country are skipped rather than rejected; the upstream
/// export leaves the country blank where affiliation parsing failed.
pub fn load_articles(path: &Path) -> Result<Vec<ArticleRecord>> {
    let mut reader = open(path)?;
    require_columns(&mut reader, &["ano", "affiliation-country"], path)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize() {
        let record: ArticleRecord = row?;
        if record.country.trim().is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }
    if skipped > 0 {
        debug!("Skipped {} article rows without a country", skipped);
    }
    info!("Loaded {} article records from {:?}", records.len(), path);
    Ok(records)
}

/// Open a CSV reader, failing fast when the file does not exist.
fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(BiblioflowError::FileNotFound(path.to_path_buf()));
    }
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?)
}

/// Check that every required column appears in the header.
fn require_columns(
    reader: &mut csv::Reader<std::fs::File>,
    required: &[&str],
    path: &Path,
) -> Result<()> {
    let headers = reader.headers()?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(BiblioflowError::InvalidInput(format!(
                "{:?} is missing required column {:?} (has: {})",
                path,
                column,
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }
    }
    Ok(())
}
