//! Per-country article counts by year for the animated world map.
//!
//! Each input row is one article; aggregation is a group-by-sum over
//! (year, country). The global maximum count is carried alongside so the
//! renderer can fix its color scale across animation frames.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One article occurrence: publication year and affiliation country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Publication year
    #[serde(rename(deserialize = "ano"))]
    pub year: i32,
    /// Affiliation country of the article
    #[serde(rename(deserialize = "affiliation-country"))]
    pub country: String,
}

/// Aggregated article count for one (year, country) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryYearCount {
    pub year: i32,
    pub country: String,
    pub count: u64,
}

/// The world map payload: grouped counts plus the fixed color-scale maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryYearCounts {
    pub rows: Vec<CountryYearCount>,
    /// Highest count of any (year, country) group, for the color range
    pub max_count: u64,
}

/// Group article records by (year, country) and count them.
///
/// Rows come out sorted by year then country, so repeated runs over the same
/// snapshot produce identical payloads.
pub fn aggregate(records: &[ArticleRecord]) -> CountryYearCounts {
    let mut groups: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for record in records {
        *groups.entry((record.year, record.country.as_str())).or_insert(0) += 1;
    }

    let max_count = groups.values().copied().max().unwrap_or(0);
    let rows = groups
        .into_iter()
        .map(|((year, country), count)| CountryYearCount {
            year,
            country: country.to_string(),
            count,
        })
        .collect();

    CountryYearCounts { rows, max_count }
}
