//! # bibliflow
//!
//! Bibliometric dashboard data core
//!
//! Turns pre-computed bibliometric CSV tables into the data structures a
//! dashboard renderer consumes: a three-tier Country → Institution → Author
//! flow graph for a Sankey diagram, a top-N title term ranking for a bar
//! chart, and per-country article counts by year for an animated world map.
//!
//! ## Modules
//!
//! - [`flow`] - Flow graph construction for the Sankey diagram
//! - [`color`] - Palette handling and edge color derivation
//! - [`terms`] - Top-N title term frequencies
//! - [`worldmap`] - Per-country article counts by year
//! - [`loader`] - Fail-fast CSV loading with column contract checks
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bibliflow::{color::Palette, flow, loader};
//! use std::path::Path;
//!
//! fn main() -> bibliflow::Result<()> {
//!     let records = loader::load_authors(Path::new("dados_streamlit/df_authors.csv"))?;
//!     let graph = flow::build(&records, 10, &Palette::dashboard())?;
//!     println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod error;
pub mod flow;
pub mod loader;
pub mod terms;
pub mod worldmap;

pub use error::{BiblioflowError, Result};
