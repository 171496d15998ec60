//! Engagement and sentiment statistics for one social platform's records.

use forecast_engine::ForecastEngine;
use insight_core::{series, stats, RawSourceRecord};
use serde_json::{json, Value};
use statrs::statistics::Statistics;

/// Steps of engagement forecast attached to each platform analysis.
pub const ENGAGEMENT_FORECAST_HORIZON: usize = 12;

pub struct SocialAnalysisEngine {
    forecaster: ForecastEngine,
    horizon: usize,
}

impl SocialAnalysisEngine {
    pub fn new() -> Self {
        Self::with_forecaster(ForecastEngine::new(), ENGAGEMENT_FORECAST_HORIZON)
    }

    pub fn with_forecaster(forecaster: ForecastEngine, horizon: usize) -> Self {
        Self { forecaster, horizon }
    }

    /// Statistics for one platform's accumulated records, or `None` when
    /// either the engagement or the sentiment series is empty (the two are
    /// extracted independently and may differ in length).
    pub fn analyze_platform(&self, records: &[RawSourceRecord]) -> Option<Value> {
        let engagement = series::engagement_series(records);
        let sentiment = series::sentiment_series(records);
        if engagement.is_empty() || sentiment.is_empty() {
            return None;
        }

        let sentiment_values = sentiment.values();
        let avg_sentiment = sentiment_values.mean();

        // Consistency is undefined when every sentiment value is equal
        // (zero spread); that case reads as perfectly consistent.
        let spread = sentiment_values.max() - sentiment_values.min();
        let sentiment_consistency = if spread == 0.0 {
            1.0
        } else {
            1.0 - sentiment_values.population_std_dev() / spread
        };

        let forecast = self.forecaster.forecast(&engagement, self.horizon);

        Some(json!({
            "avg_engagement": engagement.values().mean(),
            "engagement_trend": stats::ols_slope(engagement.values()),
            "avg_sentiment": avg_sentiment,
            "sentiment_consistency": sentiment_consistency,
            "engagement_forecast": forecast,
        }))
    }
}

impl Default for SocialAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
