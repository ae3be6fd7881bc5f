//! Prometheus metrics for taskboard observability.
//!
//! Served as text exposition on `GET /metrics`.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;

/// Global metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Task Counters
// ============================================================================

/// Total number of tasks created
pub static TASKS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new("tasks_created_total", "Total number of tasks created")
        .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Total number of tasks deleted
pub static TASKS_DELETED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new("tasks_deleted_total", "Total number of tasks deleted")
        .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Total number of tasks by status transition
pub static TASK_STATUS_TRANSITIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "task_status_transitions_total",
            "Number of task status transitions",
        ),
        &["from_status", "to_status"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

// ============================================================================
// Store Metrics
// ============================================================================

/// Store failures surfaced to clients as 500s, by operation
pub static STORE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("store_errors_total", "Total number of failed store operations"),
        &["operation"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Store operation duration
pub static STORE_OPERATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "store_operation_duration_seconds",
            "Duration of store operations in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["operation"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(histogram.clone())).unwrap();
    histogram
});

/// Total number of slow store operations
pub static SLOW_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "slow_store_operations_total",
            "Total number of store operations exceeding the slow threshold",
        ),
        &["operation"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

// ============================================================================
// Helpers
// ============================================================================

/// Record task creation
pub fn record_task_created() {
    TASKS_CREATED_TOTAL.inc();
}

/// Record task deletion
pub fn record_task_deleted() {
    TASKS_DELETED_TOTAL.inc();
}

/// Record status transition
pub fn record_status_transition(from: &str, to: &str) {
    TASK_STATUS_TRANSITIONS.with_label_values(&[from, to]).inc();
}

/// Record a store failure that was reported to the client as an internal error
pub fn record_store_error(operation: &str) {
    STORE_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

/// Record store operation duration with slow operation warning.
///
/// If the duration exceeds the threshold, a warning is logged.
pub fn record_store_operation(operation: &str, duration_secs: f64, threshold_ms: u64) {
    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration_secs);

    let duration_ms = (duration_secs * 1000.0) as u64;
    if duration_ms > threshold_ms {
        log::warn!(
            "Slow store operation: {} took {}ms (threshold: {}ms)",
            operation,
            duration_ms,
            threshold_ms
        );
        SLOW_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
    }
}

/// Initialize all metrics (call at startup to register them)
pub fn init_metrics() {
    // Force lazy initialization of all metrics
    let _ = &*TASKS_CREATED_TOTAL;
    let _ = &*TASKS_DELETED_TOTAL;
    let _ = &*TASK_STATUS_TRANSITIONS;
    let _ = &*STORE_ERRORS_TOTAL;
    let _ = &*STORE_OPERATION_DURATION_SECONDS;
    let _ = &*SLOW_OPERATIONS_TOTAL;
}

/// Render the registry in the Prometheus text format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
