//! Prometheus metrics setup and metric definitions

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Queue labels of the cascading-delete subsystem
pub const CASCADE_QUEUES: [&str; 3] = ["content", "stats", "comments"];

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    // Latency buckets (seconds) for HTTP requests, including slow backend fan-outs.
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)?
        .install_recorder()
}

/// Register metric descriptions and emit initial zero values so the exposition
/// carries HELP/TYPE lines from startup.
pub fn describe_metrics() {
    // HTTP
    describe_counter!("gateway_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "gateway_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "gateway_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Cascading delete
    describe_counter!(
        "gateway_cascade_items_total",
        "Cascade work items by queue and outcome (enqueued/done/retried/dropped)"
    );
    describe_gauge!(
        "gateway_cascade_queue_depth",
        "Cascade work items currently held per queue"
    );

    // Backends
    describe_counter!(
        "gateway_credential_refresh_total",
        "Service credential issuances by outcome"
    );
    describe_counter!(
        "gateway_stats_degraded_total",
        "Reads served with sentinel statistics"
    );

    for queue in CASCADE_QUEUES {
        for outcome in ["enqueued", "done", "retried", "dropped"] {
            counter!("gateway_cascade_items_total", "queue" => queue, "outcome" => outcome)
                .absolute(0);
        }
        gauge!("gateway_cascade_queue_depth", "queue" => queue).set(0.0);
    }
    counter!("gateway_stats_degraded_total").absolute(0);
}
