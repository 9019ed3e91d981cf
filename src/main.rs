//! bibliflow - Bibliometric dashboard data core
//!
//! Loads the three pre-computed dashboard tables and writes the renderer
//! payloads as JSON files.
//!
//! ## Usage
//!
//! ```bash
//! bibliflow build --data-dir dados_streamlit --output ./output --top-n 10
//! ```

use anyhow::{Context, Result};
use bibliflow::{color::Palette, flow, loader, terms, worldmap};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Bibliometric dashboard data core
#[derive(Parser)]
#[command(name = "bibliflow")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all renderer payloads from the CSV tables
    Build {
        /// Directory holding df_authors.csv, termos_titulos.csv and df_combined.csv
        #[arg(long, default_value = "dados_streamlit")]
        data_dir: PathBuf,

        /// Output directory for the JSON payloads
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Number of top authors in the flow graph and top terms in the bar chart
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Override palette colors (hex, e.g. "#003f5b,#2b4b7d")
        #[arg(long, value_delimiter = ',')]
        palette: Option<Vec<String>>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Build {
            data_dir,
            output,
            top_n,
            palette,
        } => run_build(data_dir, output, top_n, palette),
    }
}

// ============================================================================
// Build Pipeline
// ============================================================================

fn run_build(
    data_dir: PathBuf,
    output_dir: PathBuf,
    top_n: usize,
    palette_override: Option<Vec<String>>,
) -> Result<()> {
    let palette = match palette_override {
        Some(hex) => {
            let refs: Vec<&str> = hex.iter().map(String::as_str).collect();
            Palette::from_hex(&refs).context("Invalid --palette colors")?
        }
        None => Palette::dashboard(),
    };

    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;
    println!("Output folder: {}", output_dir.display());

    // ===========================================
    // STAGE 1: Author Flow Graph (Sankey)
    // ===========================================
    println!("\n--- Stage 1: Author Flow Graph ---");

    let authors = loader::load_authors(&data_dir.join("df_authors.csv"))
        .context("Failed to load author table")?;
    let graph = flow::build(&authors, top_n, &palette).context("Failed to build flow graph")?;
    info!(
        "Flow graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    save_json(&output_dir.join("sankey.json"), &graph.to_sankey())?;

    // ===========================================
    // STAGE 2: Top Title Terms (Bar Chart)
    // ===========================================
    println!("\n--- Stage 2: Top Title Terms ---");

    let term_rows = loader::load_terms(&data_dir.join("termos_titulos.csv"))
        .context("Failed to load term table")?;
    let top = terms::top_terms(&term_rows, top_n);
    println!("Selected {} terms.", top.len());

    save_json(&output_dir.join("top_terms.json"), &top)?;

    // ===========================================
    // STAGE 3: Country Counts by Year (World Map)
    // ===========================================
    println!("\n--- Stage 3: Country Counts by Year ---");

    let articles = loader::load_articles(&data_dir.join("df_combined.csv"))
        .context("Failed to load article table")?;
    let counts = worldmap::aggregate(&articles);
    println!(
        "Aggregated {} (year, country) groups, max count {}.",
        counts.rows.len(),
        counts.max_count
    );

    save_json(&output_dir.join("country_years.json"), &counts)?;

    println!("\nDone.");
    Ok(())
}

/// Write a payload as pretty-printed JSON.
fn save_json<T: Serialize>(path: &std::path::Path, payload: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(payload).context("Failed to serialize payload")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}
