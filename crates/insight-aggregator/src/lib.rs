//! Batch aggregation: discover the latest run's result files, summarize
//! each source, correlate across sources, and assemble one combined
//! insight document for the downstream recommendation synthesizer.

pub mod batch;
pub mod correlate;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use finance_analysis::FinanceAnalysisEngine;
use insight_core::{
    CombinedInsight, InsightError, InsightMetadata, SourceSummary, SourceSummarizer,
};
use social_analysis::SocialAnalysisEngine;
use trends_analysis::TrendsAnalysisEngine;

pub use batch::RunBatch;

/// Source names as they appear as top-level keys in the raw result files.
pub const FINANCE_SOURCE: &str = "finance";
pub const SOCIAL_PLATFORMS: &[&str] = &["meta", "tiktok"];
pub const TRENDS_SOURCE: &str = "google_trends";

/// Default filename pattern written by the upstream fetch layer.
pub const DEFAULT_PATTERN: &str = "combined_api_results_*.json";

pub struct InsightAggregator {
    finance: FinanceAnalysisEngine,
    social: SocialAnalysisEngine,
    trends: TrendsAnalysisEngine,
}

impl InsightAggregator {
    pub fn new() -> Self {
        Self::with_engines(
            FinanceAnalysisEngine::new(),
            SocialAnalysisEngine::new(),
            TrendsAnalysisEngine::new(),
        )
    }

    /// Explicit engine injection, e.g. for a different currency pair or a
    /// custom forecast chain.
    pub fn with_engines(
        finance: FinanceAnalysisEngine,
        social: SocialAnalysisEngine,
        trends: TrendsAnalysisEngine,
    ) -> Self {
        Self {
            finance,
            social,
            trends,
        }
    }

    /// Aggregate the most recent run batch found in `dir`.
    ///
    /// The only failure is the absence of any usable input file. Every
    /// other problem — unreadable files, malformed records, sources with
    /// nothing extractable — degrades to an empty section of the result.
    pub fn aggregate(&self, dir: &Path, pattern: &str) -> Result<CombinedInsight, InsightError> {
        let batch = batch::load_batch(dir, pattern)?;
        tracing::info!(
            timestamp = %batch.timestamp,
            sources = batch.records.len(),
            "aggregating run batch"
        );

        let finance = batch
            .records
            .get(FINANCE_SOURCE)
            .map(|records| self.finance.summarize(records))
            .unwrap_or_default();

        let mut social = SourceSummary::new();
        for &platform in SOCIAL_PLATFORMS {
            let Some(records) = batch.records.get(platform) else {
                continue;
            };
            if let Some(analysis) = self.social.analyze_platform(records) {
                social.insert(platform, analysis);
            }
        }

        let trends = batch
            .records
            .get(TRENDS_SOURCE)
            .map(|records| self.trends.summarize(records))
            .unwrap_or_default();

        let cross_platform_analysis = correlate::cross_platform_correlations(&social, &trends);

        let metadata = InsightMetadata {
            analysis_timestamp: Utc::now(),
            batch_timestamp: batch.timestamp.clone(),
            data_sources: batch.records.keys().cloned().collect(),
            number_of_samples: batch
                .records
                .iter()
                .map(|(source, records)| (source.clone(), records.len()))
                .collect(),
        };

        Ok(CombinedInsight {
            finance,
            social,
            trends,
            cross_platform_analysis,
            metadata,
        })
    }
}

impl Default for InsightAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the document to `statistical_insights_{YYYYMMDD_HHMMSS}.json` in
/// `dir`, returning the written path.
pub fn save_insights(insight: &CombinedInsight, dir: &Path) -> Result<PathBuf, InsightError> {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("statistical_insights_{stamp}.json"));
    let body = serde_json::to_string_pretty(insight)?;
    fs::write(&path, body)?;
    Ok(path)
}
