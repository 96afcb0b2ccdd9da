//! Query results as returned by a `count` query.
//!
//! {"meta": {...}, "results": [{"term": "NAUSEA", "count": 12345}, ...]}
//!
//! Date fields come back keyed by `time` instead of `term`, and terms may be
//! numbers; both are normalised to strings. An API error document
//! ({"error": {"code": ..., "message": ...}}) becomes an error.

use crate::Result;

use anyhow::{Context, bail};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermCount {
    #[serde(alias = "time", deserialize_with = "term_as_string")]
    pub term: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    pub results: Vec<TermCount>,
}

/// Categories and values, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    results: Option<Vec<TermCount>>,

    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

fn term_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Parse a query-result document.
pub fn parse_query_results(text: &str) -> Result<QueryResults> {
    let raw: RawResponse = serde_json::from_str(text).context("parse query results")?;

    if let Some(err) = raw.error {
        bail!("query failed: {}: {}", err.code, err.message);
    }
    let Some(results) = raw.results else {
        bail!("query results document has no 'results' array");
    };
    Ok(QueryResults { results })
}

impl QueryResults {
    pub fn to_bar_series(&self) -> BarSeries {
        BarSeries {
            categories: self.results.iter().map(|r| r.term.clone()).collect(),
            values: self.results.iter().map(|r| r.count).collect(),
        }
    }
}
