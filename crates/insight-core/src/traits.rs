use crate::{RawSourceRecord, SourceSummary};

/// A per-source statistics engine. Implementations must tolerate absent or
/// malformed fields by degrading to an empty summary; they never fail.
pub trait SourceSummarizer: Send + Sync {
    fn summarize(&self, records: &[RawSourceRecord]) -> SourceSummary;
}
