//! Cross-source correlation between per-source summary metrics.

use insight_core::{stats, SourceSummary};
use serde_json::{json, Map, Value};

const TREND_ANALYSIS_SECTION: &str = "trend_analysis";
const MEAN_INTEREST_KEY: &str = "mean_interest";
const AVG_ENGAGEMENT_KEY: &str = "avg_engagement";

/// Pairwise correlations between each social platform's mean engagement and
/// the trends mean interest.
///
/// An entry `{platform}_trends_correlation` is emitted iff both prerequisite
/// summaries carry the needed metric; otherwise it is omitted entirely.
/// With one scalar per source per batch the sample is degenerate, so the
/// coefficient is NaN (serialized as JSON null) — a known limitation of the
/// per-batch design, preserved as-is.
pub fn cross_platform_correlations(
    social: &SourceSummary,
    trends: &SourceSummary,
) -> Map<String, Value> {
    let mut correlations = Map::new();

    let Some(mean_interest) = trends
        .get(TREND_ANALYSIS_SECTION)
        .and_then(|analysis| analysis.get(MEAN_INTEREST_KEY))
        .and_then(Value::as_f64)
    else {
        return correlations;
    };

    for (platform, analysis) in social.sections() {
        let Some(engagement) = analysis.get(AVG_ENGAGEMENT_KEY).and_then(Value::as_f64) else {
            continue;
        };
        let coefficient = stats::pearson(&[engagement], &[mean_interest]);
        correlations.insert(
            format!("{platform}_trends_correlation"),
            json!(coefficient),
        );
    }

    correlations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn social_with_engagement() -> SourceSummary {
        let mut social = SourceSummary::new();
        social.insert("meta", json!({ "avg_engagement": 60.0 }));
        social
    }

    fn trends_with_interest() -> SourceSummary {
        let mut trends = SourceSummary::new();
        trends.insert("trend_analysis", json!({ "mean_interest": 18.75 }));
        trends
    }

    #[test]
    fn entry_present_when_both_sides_exist() {
        let correlations =
            cross_platform_correlations(&social_with_engagement(), &trends_with_interest());
        assert!(correlations.contains_key("meta_trends_correlation"));
        // Single-pair sample: degenerate correlation serializes as null.
        assert_eq!(correlations["meta_trends_correlation"], Value::Null);
    }

    #[test]
    fn entry_omitted_when_either_side_is_missing() {
        let empty = SourceSummary::new();
        assert!(cross_platform_correlations(&empty, &trends_with_interest()).is_empty());
        assert!(cross_platform_correlations(&social_with_engagement(), &empty).is_empty());
    }

    #[test]
    fn one_entry_per_platform() {
        let mut social = social_with_engagement();
        social.insert("tiktok", json!({ "avg_engagement": 42.0 }));

        let correlations = cross_platform_correlations(&social, &trends_with_interest());
        assert_eq!(correlations.len(), 2);
        assert!(correlations.contains_key("tiktok_trends_correlation"));
    }
}
