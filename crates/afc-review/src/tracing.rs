//! Log output for the review tools.
//!
//! Everything goes to stderr; stdout carries the JSON a command prints.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global subscriber.
///
/// Development prints multi-line records with source locations at DEBUG, so a
/// `review rate` run shows the interval and due date it computed. Production
/// emits one JSON object per event at INFO, with the `#[instrument]` fields of
/// the service call (user, card, deck) flattened in. `RUST_LOG` replaces the
/// default filter in both, e.g. `RUST_LOG=afc_review=trace,sqlx=info`.
pub fn init_tracing(env: &Environment) {
    if env.is_development() {
        init_development_tracing();
    } else {
        init_production_tracing();
    }
}

fn init_development_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .pretty()
                .with_filter(env_filter),
        )
        .init();

    tracing::debug!("Tracing initialized in development mode");
}

fn init_production_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .with_filter(env_filter),
        )
        .init();

    tracing::debug!("Tracing initialized in production mode");
}
