use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    /// Duration of HTTP requests by method and response status.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "diary_http_request_duration_seconds",
        "HTTP request duration segmented by method and status",
        &["method", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("failed to register diary_http_request_duration_seconds");

    /// Edge writes (subscribe/unsubscribe/like/dislike) by outcome.
    pub static ref EDGE_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "diary_edge_events_total",
        "Edge write attempts segmented by edge kind and outcome",
        &["edge", "outcome"]
    )
    .expect("failed to register diary_edge_events_total");
}

pub fn observe_http_request(method: &str, status: u16, elapsed_secs: f64) {
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, &status.to_string()])
        .observe(elapsed_secs);
}

pub fn record_edge_event(edge: &str, outcome: &str) {
    EDGE_EVENTS_TOTAL.with_label_values(&[edge, outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_counter_increments_per_label_pair() {
        let before = EDGE_EVENTS_TOTAL
            .with_label_values(&["like", "duplicate"])
            .get();
        record_edge_event("like", "duplicate");
        record_edge_event("like", "duplicate");
        let after = EDGE_EVENTS_TOTAL
            .with_label_values(&["like", "duplicate"])
            .get();
        assert_eq!(after - before, 2);
    }
}
