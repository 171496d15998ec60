use std::path::PathBuf;

use anyhow::Result;
use insight_aggregator::{save_insights, InsightAggregator, DEFAULT_PATTERN};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let pattern = args.next().unwrap_or_else(|| DEFAULT_PATTERN.to_string());

    let aggregator = InsightAggregator::new();
    let insight = aggregator.aggregate(&dir, &pattern)?;
    let path = save_insights(&insight, &dir)?;
    tracing::info!(path = %path.display(), "combined insights written");
    Ok(())
}
