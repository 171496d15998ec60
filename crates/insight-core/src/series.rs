//! Series normalization: converts a source's raw record list into uniform
//! numeric series, one per requested metric.
//!
//! All extractors are pure and total. A record missing the requested metric
//! is skipped, never zero-filled, so series lengths may differ per metric
//! within the same source. A source with zero extractable values yields an
//! empty series, not an error.

use serde_json::Value;

use crate::{NumericSeries, RawSourceRecord};

const EXCHANGE_RATE_KEY: &str = "exchange_rate";
const OVERALL_METRICS_KEY: &str = "overall_metrics";
const AVERAGE_LIKES_KEY: &str = "average_likes";
const AVERAGE_COMMENTS_KEY: &str = "average_comments";
const SENTIMENT_METRICS_KEY: &str = "sentiment_metrics";
const AVERAGE_SENTIMENT_KEY: &str = "average_sentiment";
const INTEREST_OVER_TIME_KEY: &str = "interest_over_time";

/// Exchange-rate series for one currency pair (e.g. `exchange_USD_JPY`).
/// Records without the pair key contribute nothing.
pub fn exchange_rate_series(records: &[RawSourceRecord], pair_key: &str) -> NumericSeries {
    let mut series = NumericSeries::new();
    for record in records {
        let rate = record
            .get(pair_key)
            .and_then(|pair| pair.get(EXCHANGE_RATE_KEY))
            .and_then(Value::as_f64);
        if let Some(rate) = rate {
            series.push(rate);
        }
    }
    series
}

/// Per-record engagement: the arithmetic mean of the average-likes and
/// average-comments counts. Records without a populated `overall_metrics`
/// mapping are skipped; a count field missing inside a present mapping
/// counts as zero.
pub fn engagement_series(records: &[RawSourceRecord]) -> NumericSeries {
    let mut series = NumericSeries::new();
    for record in records {
        let metrics = record.get(OVERALL_METRICS_KEY).and_then(Value::as_object);
        if let Some(metrics) = metrics.filter(|m| !m.is_empty()) {
            let likes = metrics
                .get(AVERAGE_LIKES_KEY)
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let comments = metrics
                .get(AVERAGE_COMMENTS_KEY)
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            series.push((likes + comments) / 2.0);
        }
    }
    series
}

/// Average sentiment per record, pulled from the `sentiment_metrics`
/// mapping. Records without a populated mapping are skipped.
pub fn sentiment_series(records: &[RawSourceRecord]) -> NumericSeries {
    let mut series = NumericSeries::new();
    for record in records {
        let sentiment = record.get(SENTIMENT_METRICS_KEY).and_then(Value::as_object);
        if let Some(sentiment) = sentiment.filter(|s| !s.is_empty()) {
            let score = sentiment
                .get(AVERAGE_SENTIMENT_KEY)
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            series.push(score);
        }
    }
    series
}

/// Interest-over-time scores flattened across records in record order.
/// Record order is batch discovery order, not chronological order, so the
/// concatenation may interleave runs; preserved as-is.
pub fn interest_series(records: &[RawSourceRecord]) -> NumericSeries {
    let mut series = NumericSeries::new();
    for record in records {
        if let Some(scores) = record.get(INTEREST_OVER_TIME_KEY).and_then(Value::as_array) {
            series.extend(scores.iter().filter_map(Value::as_f64));
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_exchange_rates_and_skips_missing_pairs() {
        let records = vec![
            json!({ "exchange_USD_JPY": { "exchange_rate": 110.0 } }),
            json!({ "exchange_EUR_USD": { "exchange_rate": 1.08 } }),
            json!({ "exchange_USD_JPY": { "exchange_rate": 112.0 } }),
        ];

        let series = exchange_rate_series(&records, "exchange_USD_JPY");
        assert_eq!(series.values(), &[110.0, 112.0]);
    }

    #[test]
    fn missing_pair_key_yields_empty_series() {
        let records = vec![json!({ "exchange_EUR_USD": { "exchange_rate": 1.08 } })];
        assert!(exchange_rate_series(&records, "exchange_USD_JPY").is_empty());
    }

    #[test]
    fn engagement_is_mean_of_likes_and_comments() {
        let records = vec![json!({
            "overall_metrics": { "average_likes": 100.0, "average_comments": 20.0 }
        })];

        let series = engagement_series(&records);
        assert_eq!(series.values(), &[60.0]);
    }

    #[test]
    fn engagement_skips_records_without_metrics_but_defaults_missing_counts() {
        let records = vec![
            json!({ "sentiment_metrics": { "average_sentiment": 0.4 } }),
            json!({ "overall_metrics": { "average_likes": 10.0 } }),
            json!({ "overall_metrics": {} }),
        ];

        // First record has no metrics group (skipped), second defaults the
        // comments count to zero, third has an empty group (skipped).
        let series = engagement_series(&records);
        assert_eq!(series.values(), &[5.0]);
    }

    #[test]
    fn sentiment_and_engagement_lengths_may_differ() {
        let records = vec![
            json!({
                "overall_metrics": { "average_likes": 8.0, "average_comments": 2.0 },
                "sentiment_metrics": { "average_sentiment": 0.5 }
            }),
            json!({ "sentiment_metrics": { "average_sentiment": 0.1 } }),
        ];

        assert_eq!(engagement_series(&records).len(), 1);
        assert_eq!(sentiment_series(&records).values(), &[0.5, 0.1]);
    }

    #[test]
    fn interest_flattens_across_records_in_order() {
        let records = vec![
            json!({ "interest_over_time": [10, 20] }),
            json!({ "keyword": "sneakers" }),
            json!({ "interest_over_time": [15, 30] }),
        ];

        let series = interest_series(&records);
        assert_eq!(series.values(), &[10.0, 20.0, 15.0, 30.0]);
    }

    #[test]
    fn non_numeric_interest_entries_are_skipped() {
        let records = vec![json!({ "interest_over_time": [10, "n/a", 30] })];
        assert_eq!(interest_series(&records).values(), &[10.0, 30.0]);
    }
}
