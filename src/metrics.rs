//! Orchestration metrics.

use metrics::Counter;
use metrics_derive::Metrics;

/// Metrics for an [`ExecutionContext`](crate::execution::ExecutionContext).
#[derive(Metrics)]
#[metrics(scope = "proxykit")]
pub struct OrchestrationMetrics {
    /// Number of batches submitted directly through the proxy.
    pub submitted: Counter,
    /// Number of batches handed to the relay service.
    pub relayed: Counter,
    /// Number of orchestration calls that failed.
    pub failed: Counter,
}
