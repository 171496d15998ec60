//! Descriptive statistics over the finance source's exchange-rate records.

use insight_core::{series, RawSourceRecord, SourceSummary, SourceSummarizer};
use serde_json::json;
use statrs::statistics::Statistics;

pub const DEFAULT_PAIR_KEY: &str = "exchange_USD_JPY";

pub struct FinanceAnalysisEngine {
    pair_key: String,
}

impl FinanceAnalysisEngine {
    pub fn new() -> Self {
        Self::with_pair(DEFAULT_PAIR_KEY)
    }

    /// Analyze a different currency pair (key as it appears in the raw
    /// records, e.g. `exchange_EUR_USD`).
    pub fn with_pair(pair_key: impl Into<String>) -> Self {
        Self {
            pair_key: pair_key.into(),
        }
    }
}

impl Default for FinanceAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceSummarizer for FinanceAnalysisEngine {
    /// Mean, population standard deviation, two-point trend label, and
    /// volatility ratio of the extracted rate series. An empty series
    /// yields an empty summary; a zero mean omits the volatility ratio
    /// instead of dividing by zero.
    fn summarize(&self, records: &[RawSourceRecord]) -> SourceSummary {
        let rates = series::exchange_rate_series(records, &self.pair_key);
        let mut summary = SourceSummary::new();
        if rates.is_empty() {
            return summary;
        }

        let values = rates.values();
        let mean_rate = values.mean();
        let std_rate = values.population_std_dev();

        // Two-point comparison by design: equality classifies as
        // "decreasing". The guards above make first/last infallible.
        let trend = if rates.last() > rates.first() {
            "increasing"
        } else {
            "decreasing"
        };

        let mut analysis = json!({
            "mean_rate": mean_rate,
            "std_rate": std_rate,
            "trend": trend,
        });
        if mean_rate != 0.0 {
            analysis["volatility"] = json!(std_rate / mean_rate);
        }

        summary.insert("exchange_rate_analysis", analysis);
        summary
    }
}
