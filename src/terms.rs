//! Top-N title term frequencies for the bar chart.

use serde::{Deserialize, Serialize};

/// One term with its frequency across article titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    /// The term as it appears in titles
    #[serde(rename(deserialize = "Term"))]
    pub term: String,
    /// Number of titles containing the term
    #[serde(rename(deserialize = "Count"))]
    pub count: u64,
}

/// Select the `n` most frequent terms, most frequent first.
///
/// The input file usually arrives pre-ranked; the sort is stable so a ranked
/// file passes through unchanged while an unsorted one still yields the true
/// top N.
pub fn top_terms(rows: &[TermCount], n: usize) -> Vec<TermCount> {
    let mut ranked: Vec<TermCount> = rows.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}
