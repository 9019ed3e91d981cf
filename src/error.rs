//! Custom error types for bibliflow.
//!
//! This module defines all error types used throughout the crate.
//! All functions return `Result<T, BiblioflowError>` instead of using `unwrap()`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bibliflow operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum BiblioflowError {
    /// Malformed or missing required fields in an input table
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// More distinct countries than available palette colors
    #[error("Palette exhausted: {countries} distinct countries but only {palette} colors")]
    PaletteExhausted {
        /// Number of distinct countries among the selected records
        countries: usize,
        /// Number of colors the palette supplies
        palette: usize,
    },

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed color specification
    #[error("Color error: {0}")]
    Color(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using `BiblioflowError`
pub type Result<T> = std::result::Result<T, BiblioflowError>;
