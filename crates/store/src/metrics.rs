use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static CONSTRUCTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "shared_store_constructions_total",
        "Total store instances constructed"
    )
    .expect("register constructions_total")
});

pub static SAVES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "shared_store_saves_total",
        "Total save operations"
    )
    .expect("register saves_total")
});

pub static LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "shared_store_lookups_total",
        "Total get operations by result",
        &["result"]
    )
    .expect("register lookups_total")
});

pub fn record_lookup(found: bool) {
    let result = if found { "found" } else { "not_found" };
    LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
