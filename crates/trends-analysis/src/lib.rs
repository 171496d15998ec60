//! Statistics over search-trend interest scores.

use forecast_engine::ForecastEngine;
use insight_core::{series, stats, RawSourceRecord, SourceSummary, SourceSummarizer};
use serde_json::json;
use statrs::statistics::Statistics;

/// Steps of interest forecast attached to the trend analysis.
pub const INTEREST_FORECAST_HORIZON: usize = 12;

pub struct TrendsAnalysisEngine {
    forecaster: ForecastEngine,
    horizon: usize,
}

impl TrendsAnalysisEngine {
    pub fn new() -> Self {
        Self::with_forecaster(ForecastEngine::new(), INTEREST_FORECAST_HORIZON)
    }

    pub fn with_forecaster(forecaster: ForecastEngine, horizon: usize) -> Self {
        Self { forecaster, horizon }
    }
}

impl Default for TrendsAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceSummarizer for TrendsAnalysisEngine {
    /// Mean interest, population-std volatility, and a linear-fit trend
    /// direction over the flattened interest series. Empty input yields an
    /// empty summary.
    fn summarize(&self, records: &[RawSourceRecord]) -> SourceSummary {
        let interest = series::interest_series(records);
        let mut summary = SourceSummary::new();
        if interest.is_empty() {
            return summary;
        }

        let values = interest.values();
        let trend_direction = if stats::ols_slope(values) > 0.0 {
            "increasing"
        } else {
            "decreasing"
        };
        let forecast = self.forecaster.forecast(&interest, self.horizon);

        summary.insert(
            "trend_analysis",
            json!({
                "mean_interest": values.mean(),
                "interest_volatility": values.population_std_dev(),
                "trend_direction": trend_direction,
                "interest_forecast": forecast,
            }),
        );
        summary
    }
}
