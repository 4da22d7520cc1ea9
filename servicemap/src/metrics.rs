//! Submission and cache metrics
//!
//! Recorded through the `metrics` facade; installing an exporter is left to
//! the host process.

use std::time::Duration;

/// Record a create/update/delete submission outcome
pub fn record_submission(operation: &str, status: &str) {
    metrics::counter!(
        "servicemap_submissions_total",
        "operation" => operation.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
}

/// Record how long a submission took end to end
pub fn record_submission_duration(operation: &str, duration: Duration) {
    metrics::histogram!(
        "servicemap_submission_duration_seconds",
        "operation" => operation.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a cache read served fresh (hit) or needing a rebuild (miss)
pub fn record_cache_lookup(cache: &str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!(
        "servicemap_cache_lookups_total",
        "cache" => cache.to_string(),
        "result" => result,
    )
    .increment(1);
}

/// Record a cache rebuild
pub fn record_cache_refresh(cache: &str, success: bool) {
    let status = if success { "ok" } else { "error" };
    metrics::counter!(
        "servicemap_cache_refresh_total",
        "cache" => cache.to_string(),
        "status" => status,
    )
    .increment(1);
}

/// Record the number of tokens in a synthesized search string
pub fn record_search_terms(token_count: usize) {
    metrics::histogram!("servicemap_search_terms_tokens").record(token_count as f64);
}

/// Record fields defaulted into a record because the schema gained them
pub fn record_schema_defaults(count: usize) {
    if count > 0 {
        metrics::counter!("servicemap_schema_defaulted_fields_total").increment(count as u64);
    }
}
