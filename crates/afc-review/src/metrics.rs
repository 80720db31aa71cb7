//! Review metrics.
//!
//! Only the `metrics` facade is used here; nothing is recorded unless the
//! embedding process installs a recorder.

use afc_srs::Rating;
use metrics::{counter, histogram};

/// Record a rating applied to a card
pub fn record_rating(rating: Rating) {
    counter!("reviews_rated_total", "rating" => rating.as_str()).increment(1);
}

/// Record review states restored to their defaults
pub fn record_reset(states: u64) {
    counter!("review_resets_total").increment(states);
}

/// Record review states created on demand or by a bootstrap
pub fn record_states_created(states: u64) {
    counter!("review_states_created_total").increment(states);
}

/// Record database operation metrics
pub fn record_db_query(query_name: &'static str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        "db_queries_total",
        "query" => query_name,
        "status" => status
    )
    .increment(1);

    histogram!(
        "db_query_duration_seconds",
        "query" => query_name
    )
    .record(duration_secs);
}
