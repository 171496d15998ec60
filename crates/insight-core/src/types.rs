use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One analysis run's raw output for a single source, as written by an
/// upstream fetcher. The shape varies per source (finance quotes nest a rate
/// under a currency-pair key, social records nest counts under metric
/// groups, trend records carry a score list), so records stay as JSON.
pub type RawSourceRecord = Value;

/// Ordered numeric series. The index is the rank position (0..n), which
/// stands in for time when the raw records carry no usable timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSeries {
    values: Vec<f64>,
}

impl NumericSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = f64>) {
        self.values.extend(values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl From<Vec<f64>> for NumericSeries {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Scalar statistics describing one source's data within a batch, keyed by
/// section name (e.g. `exchange_rate_analysis`, or a platform name for the
/// social source). An absent or empty source yields an empty map rather
/// than a missing document key, so downstream consumers can treat every
/// declared source uniformly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceSummary {
    sections: Map<String, Value>,
}

impl SourceSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: impl Into<String>, stats: Value) {
        self.sections.insert(section.into(), stats);
    }

    pub fn get(&self, section: &str) -> Option<&Value> {
        self.sections.get(section)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.sections.iter()
    }
}

/// Fixed-length forecast: `values.len()` always equals the requested
/// horizon, and `model` names the chain tier that produced the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: String,
    pub values: Vec<f64>,
}

/// Provenance and shape of the aggregated batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightMetadata {
    pub analysis_timestamp: DateTime<Utc>,
    /// `YYYYMMDD_HHMMSS` stamp shared by every file in the selected batch.
    pub batch_timestamp: String,
    pub data_sources: Vec<String>,
    pub number_of_samples: BTreeMap<String, usize>,
}

/// The core's sole externally visible artifact: per-source summaries plus
/// cross-source correlations for one run batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedInsight {
    pub finance: SourceSummary,
    pub social: SourceSummary,
    pub trends: SourceSummary,
    pub cross_platform_analysis: Map<String, Value>,
    pub metadata: InsightMetadata,
}
