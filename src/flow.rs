//! Three-tier flow graph construction (Country → Institution → Author).
//!
//! Takes author records with affiliation, country and publication count and
//! produces the labeled node/edge lists a Sankey-style renderer consumes.
//! The graph is derived once per render from the current table snapshot and
//! is immutable after construction.

use crate::color::{Palette, Rgb};
use crate::error::{BiblioflowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blend factor applied to institution→author ribbon colors.
const AUTHOR_EDGE_LIGHTEN: f64 = 0.5;

/// One input row of the author table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Author name
    pub author: String,
    /// Number of published articles
    #[serde(rename(deserialize = "n_artigos_pub"))]
    pub publication_count: u64,
    /// Full institution name (free text)
    pub affiliation: String,
    /// Country of the institution
    pub country: String,
}

/// Which of the three tiers a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Country,
    Institution,
    Author,
}

/// A node in the flow graph.
///
/// `index` is the node's position in [`FlowGraph::nodes`]; edges reference
/// nodes purely by that integer, and index ranges are contiguous per tier in
/// the order Country, Institution, Author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    /// Short label shown on the diagram
    pub label: String,
    /// Tier this node belongs to
    pub tier: Tier,
    /// Hover text with the aggregated publication count
    pub display_text: String,
    /// Stable integer index referenced by edges
    pub index: usize,
}

/// A weighted, colored edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub source_index: usize,
    pub target_index: usize,
    /// Publication count carried by this ribbon
    pub weight: u64,
    /// CSS-style color string
    pub color: String,
}

/// The complete flow graph handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// Renderer contract: ordered labels, hover text aligned 1:1 with labels, and
/// parallel source/target/value/color lists for the links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SankeyPayload {
    pub labels: Vec<String>,
    pub customdata: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<u64>,
    pub link_colors: Vec<String>,
}

/// Compute the short institution label: the uppercase first letter of every
/// whitespace-separated word of the affiliation.
///
/// `"City University"` yields `"CU"`.
pub fn institution_code(affiliation: &str) -> String {
    affiliation
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Build the flow graph for the `top_n` authors by publication count.
///
/// `top_n` is clamped to the number of available records. Ranking is a stable
/// descending sort, so ties keep their input order. Each distinct country
/// among the selected records is assigned a palette color by first-seen
/// position; each selected record contributes one country→institution edge
/// and one institution→author edge, both weighted by its publication count.
///
/// Institutions are identified by the full affiliation string, so two records
/// sharing an affiliation merge into one node. The short initials code is
/// only the node label; when two distinct affiliations collide on the same
/// code, later ones get a numeric suffix.
///
/// # Errors
///
/// * [`BiblioflowError::InvalidInput`] - `records` is empty, `top_n` is zero,
///   or a selected record has an empty `affiliation` or `country`
/// * [`BiblioflowError::PaletteExhausted`] - more distinct countries than
///   palette colors
pub fn build(records: &[AuthorRecord], top_n: usize, palette: &Palette) -> Result<FlowGraph> {
    if records.is_empty() {
        return Err(BiblioflowError::InvalidInput(
            "author table is empty".to_string(),
        ));
    }
    if top_n == 0 {
        return Err(BiblioflowError::InvalidInput(
            "top_n must be positive".to_string(),
        ));
    }

    let selected = select_top(records, top_n);

    for record in &selected {
        if record.affiliation.trim().is_empty() {
            return Err(BiblioflowError::InvalidInput(format!(
                "record for author {:?} has an empty affiliation",
                record.author
            )));
        }
        if record.country.trim().is_empty() {
            return Err(BiblioflowError::InvalidInput(format!(
                "record for author {:?} has an empty country",
                record.author
            )));
        }
    }

    // Distinct countries in first-seen order, colored by palette position.
    let mut countries: Vec<&str> = Vec::new();
    for record in &selected {
        if !countries.contains(&record.country.as_str()) {
            countries.push(&record.country);
        }
    }
    if countries.len() > palette.len() {
        return Err(BiblioflowError::PaletteExhausted {
            countries: countries.len(),
            palette: palette.len(),
        });
    }
    let country_colors: HashMap<&str, Rgb> = countries
        .iter()
        .enumerate()
        .filter_map(|(i, c)| palette.color_at(i).map(|color| (*c, color)))
        .collect();

    // Institutions keyed by full affiliation, first-seen order. Labels are
    // the initials codes, disambiguated with a numeric suffix on collision.
    let mut affiliations: Vec<&str> = Vec::new();
    for record in &selected {
        if !affiliations.contains(&record.affiliation.as_str()) {
            affiliations.push(&record.affiliation);
        }
    }
    let mut code_uses: HashMap<String, usize> = HashMap::new();
    let institution_labels: Vec<String> = affiliations
        .iter()
        .map(|affiliation| {
            let code = institution_code(affiliation);
            let uses = code_uses.entry(code.clone()).or_insert(0);
            *uses += 1;
            if *uses == 1 {
                code
            } else {
                format!("{}{}", code, uses)
            }
        })
        .collect();

    // Publication totals per country and per institution over the selection.
    let mut country_totals: HashMap<&str, u64> = HashMap::new();
    let mut affiliation_totals: HashMap<&str, u64> = HashMap::new();
    for record in &selected {
        *country_totals.entry(record.country.as_str()).or_insert(0) += record.publication_count;
        *affiliation_totals
            .entry(record.affiliation.as_str())
            .or_insert(0) += record.publication_count;
    }

    // Node tiers in the fixed order Country, Institution, Author with
    // contiguous indices. Edges reference nodes by these integers, so the
    // ordering here is part of the renderer contract.
    let mut nodes: Vec<FlowNode> = Vec::with_capacity(
        countries.len() + affiliations.len() + selected.len(),
    );
    let country_indices: HashMap<&str, usize> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i))
        .collect();
    for (i, country) in countries.iter().enumerate() {
        nodes.push(FlowNode {
            label: country.to_string(),
            tier: Tier::Country,
            display_text: hover_text(country, country_totals.get(country).copied().unwrap_or(0)),
            index: i,
        });
    }
    let institution_base = countries.len();
    let affiliation_indices: HashMap<&str, usize> = affiliations
        .iter()
        .enumerate()
        .map(|(i, a)| (*a, institution_base + i))
        .collect();
    for (i, affiliation) in affiliations.iter().enumerate() {
        nodes.push(FlowNode {
            label: institution_labels[i].clone(),
            tier: Tier::Institution,
            display_text: hover_text(
                affiliation,
                affiliation_totals.get(affiliation).copied().unwrap_or(0),
            ),
            index: institution_base + i,
        });
    }
    let author_base = institution_base + affiliations.len();
    for (i, record) in selected.iter().enumerate() {
        nodes.push(FlowNode {
            label: record.author.clone(),
            tier: Tier::Author,
            display_text: hover_text(&record.author, record.publication_count),
            index: author_base + i,
        });
    }

    // One country→institution edge per record, then one institution→author
    // edge per record. Author ribbons reuse the country color lightened
    // halfway toward white.
    let mut edges: Vec<FlowEdge> = Vec::with_capacity(2 * selected.len());
    for record in &selected {
        let color = country_colors[record.country.as_str()];
        edges.push(FlowEdge {
            source_index: country_indices[record.country.as_str()],
            target_index: affiliation_indices[record.affiliation.as_str()],
            weight: record.publication_count,
            color: color.to_rgb_string(),
        });
    }
    for (i, record) in selected.iter().enumerate() {
        let color = country_colors[record.country.as_str()].lighten(AUTHOR_EDGE_LIGHTEN);
        edges.push(FlowEdge {
            source_index: affiliation_indices[record.affiliation.as_str()],
            target_index: author_base + i,
            weight: record.publication_count,
            color: color.to_rgb_string(),
        });
    }

    Ok(FlowGraph { nodes, edges })
}

/// Stable top-N selection by publication count descending, clamped to the
/// number of records. Ties keep their input order.
fn select_top(records: &[AuthorRecord], top_n: usize) -> Vec<&AuthorRecord> {
    let mut ranked: Vec<&AuthorRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.publication_count.cmp(&a.publication_count));
    ranked.truncate(top_n.min(records.len()));
    ranked
}

/// Hover text in the format the renderer's hovertemplate expects.
fn hover_text(name: &str, count: u64) -> String {
    format!("{}<br>Number of articles: {}", name, count)
}

impl FlowGraph {
    /// Flatten the graph into the parallel-list shape the Sankey renderer
    /// consumes. Position in every per-node list equals the node index.
    pub fn to_sankey(&self) -> SankeyPayload {
        SankeyPayload {
            labels: self.nodes.iter().map(|n| n.label.clone()).collect(),
            customdata: self.nodes.iter().map(|n| n.display_text.clone()).collect(),
            sources: self.edges.iter().map(|e| e.source_index).collect(),
            targets: self.edges.iter().map(|e| e.target_index).collect(),
            values: self.edges.iter().map(|e| e.weight).collect(),
            link_colors: self.edges.iter().map(|e| e.color.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, count: u64, affiliation: &str, country: &str) -> AuthorRecord {
        AuthorRecord {
            author: author.to_string(),
            publication_count: count,
            affiliation: affiliation.to_string(),
            country: country.to_string(),
        }
    }

    fn sample_records() -> Vec<AuthorRecord> {
        vec![
            record("Silva", 12, "City University", "Portugal"),
            record("Costa", 9, "Central Technical Institute", "Spain"),
            record("Pereira", 7, "City University", "Portugal"),
        ]
    }

    #[test]
    fn test_institution_code_initials() {
        assert_eq!(institution_code("City University"), "CU");
        assert_eq!(institution_code("central technical institute"), "CTI");
        assert_eq!(institution_code("  Universidade   de Lisboa "), "UDL");
    }

    #[test]
    fn test_tiers_are_contiguous_and_ordered() -> crate::Result<()> {
        let graph = build(&sample_records(), 10, &Palette::dashboard())?;
        // 2 countries, 2 institutions, 3 authors
        assert_eq!(graph.nodes.len(), 7);
        let tiers: Vec<Tier> = graph.nodes.iter().map(|n| n.tier).collect();
        assert_eq!(
            tiers,
            vec![
                Tier::Country,
                Tier::Country,
                Tier::Institution,
                Tier::Institution,
                Tier::Author,
                Tier::Author,
                Tier::Author,
            ]
        );
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.index, i);
        }
        Ok(())
    }

    #[test]
    fn test_edge_indices_are_valid() -> crate::Result<()> {
        let graph = build(&sample_records(), 10, &Palette::dashboard())?;
        assert_eq!(graph.edges.len(), 6);
        for edge in &graph.edges {
            assert!(edge.source_index < graph.nodes.len());
            assert!(edge.target_index < graph.nodes.len());
        }
        Ok(())
    }

    #[test]
    fn test_author_edge_weights_conserve_counts() -> crate::Result<()> {
        let records = sample_records();
        let graph = build(&records, 10, &Palette::dashboard())?;
        let author_edge_total: u64 = graph
            .edges
            .iter()
            .filter(|e| graph.nodes[e.target_index].tier == Tier::Author)
            .map(|e| e.weight)
            .sum();
        let record_total: u64 = records.iter().map(|r| r.publication_count).sum();
        assert_eq!(author_edge_total, record_total);
        Ok(())
    }

    #[test]
    fn test_top_n_selection_descending() -> crate::Result<()> {
        let records: Vec<AuthorRecord> = (0..15)
            .map(|i| record(&format!("author{}", i), 50 - i, "City University", "Portugal"))
            .collect();
        let graph = build(&records, 10, &Palette::dashboard())?;
        let author_counts: Vec<u64> = graph
            .nodes
            .iter()
            .filter(|n| n.tier == Tier::Author)
            .map(|n| {
                let label = &n.label;
                records
                    .iter()
                    .find(|r| &r.author == label)
                    .map(|r| r.publication_count)
                    .unwrap_or(0)
            })
            .collect();
        assert_eq!(author_counts, (41..=50).rev().collect::<Vec<u64>>());
        Ok(())
    }

    #[test]
    fn test_ties_keep_input_order() -> crate::Result<()> {
        let records = vec![
            record("First", 5, "City University", "Portugal"),
            record("Second", 5, "City University", "Portugal"),
            record("Third", 5, "City University", "Portugal"),
        ];
        let graph = build(&records, 2, &Palette::dashboard())?;
        let authors: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|n| n.tier == Tier::Author)
            .map(|n| n.label.as_str())
            .collect();
        assert_eq!(authors, vec!["First", "Second"]);
        Ok(())
    }

    #[test]
    fn test_shared_affiliation_merges() -> crate::Result<()> {
        let graph = build(&sample_records(), 10, &Palette::dashboard())?;
        let cu_nodes: Vec<&FlowNode> = graph
            .nodes
            .iter()
            .filter(|n| n.tier == Tier::Institution && n.label == "CU")
            .collect();
        assert_eq!(cu_nodes.len(), 1);
        let cu_index = cu_nodes[0].index;
        // Two country→institution edges into the shared node, two out of it.
        let incoming = graph.edges.iter().filter(|e| e.target_index == cu_index).count();
        let outgoing = graph.edges.iter().filter(|e| e.source_index == cu_index).count();
        assert_eq!(incoming, 2);
        assert_eq!(outgoing, 2);
        // Aggregated hover text covers both records (12 + 7).
        assert_eq!(
            cu_nodes[0].display_text,
            "City University<br>Number of articles: 19"
        );
        Ok(())
    }

    #[test]
    fn test_colliding_codes_get_suffix() -> crate::Result<()> {
        let records = vec![
            record("Silva", 10, "City University", "Portugal"),
            record("Costa", 8, "Coimbra University", "Portugal"),
        ];
        let graph = build(&records, 10, &Palette::dashboard())?;
        let labels: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|n| n.tier == Tier::Institution)
            .map(|n| n.label.as_str())
            .collect();
        assert_eq!(labels, vec!["CU", "CU2"]);
        Ok(())
    }

    #[test]
    fn test_top_n_clamped_to_record_count() -> crate::Result<()> {
        let records = sample_records();
        let graph = build(&records, 25, &Palette::dashboard())?;
        let authors = graph.nodes.iter().filter(|n| n.tier == Tier::Author).count();
        assert_eq!(authors, records.len());
        assert_eq!(graph.edges.len(), 2 * records.len());
        Ok(())
    }

    #[test]
    fn test_deterministic_output() -> crate::Result<()> {
        let records = sample_records();
        let palette = Palette::dashboard();
        let first = build(&records, 10, &palette)?;
        let second = build(&records, 10, &palette)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_empty_records_rejected() {
        let result = build(&[], 10, &Palette::dashboard());
        assert!(matches!(result, Err(BiblioflowError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_affiliation_rejected() {
        let records = vec![record("Silva", 10, "  ", "Portugal")];
        let result = build(&records, 10, &Palette::dashboard());
        assert!(matches!(result, Err(BiblioflowError::InvalidInput(_))));
    }

    #[test]
    fn test_palette_exhausted() -> crate::Result<()> {
        let palette = Palette::from_hex(&["#003f5b"])?;
        let records = vec![
            record("Silva", 10, "City University", "Portugal"),
            record("Costa", 8, "Central Technical Institute", "Spain"),
        ];
        let result = build(&records, 10, &palette);
        assert!(matches!(
            result,
            Err(BiblioflowError::PaletteExhausted { countries: 2, palette: 1 })
        ));
        Ok(())
    }

    #[test]
    fn test_author_edges_are_lightened() -> crate::Result<()> {
        let palette = Palette::from_hex(&["#5f5195"])?;
        let records = vec![record("Silva", 10, "City University", "Portugal")];
        let graph = build(&records, 10, &palette)?;
        assert_eq!(graph.edges[0].color, "rgb(95, 81, 149)");
        assert_eq!(graph.edges[1].color, "rgb(175, 168, 202)");
        Ok(())
    }

    #[test]
    fn test_sankey_payload_alignment() -> crate::Result<()> {
        let graph = build(&sample_records(), 10, &Palette::dashboard())?;
        let payload = graph.to_sankey();
        assert_eq!(payload.labels.len(), graph.nodes.len());
        assert_eq!(payload.customdata.len(), payload.labels.len());
        assert_eq!(payload.sources.len(), graph.edges.len());
        assert_eq!(payload.targets.len(), payload.sources.len());
        assert_eq!(payload.values.len(), payload.sources.len());
        assert_eq!(payload.link_colors.len(), payload.sources.len());
        Ok(())
    }
}
