//! Client metrics.
//!
//! # Metrics
//! - `pxe_rpc_requests_total` (counter): RPC calls by method and outcome
//! - `pxe_rpc_duration_seconds` (histogram): RPC latency by method
//! - `pxe_node_ready` (gauge): 1 once the node answered, 0 if it never did
//! - `wallet_auth_witnesses_total` (counter): witnesses produced by source

use std::time::Duration;

/// Record the outcome of one JSON-RPC call.
pub fn record_rpc(method: &'static str, success: bool, elapsed: Duration) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("pxe_rpc_requests_total", "method" => method, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("pxe_rpc_duration_seconds", "method" => method)
        .record(elapsed.as_secs_f64());
}

/// Record PXE readiness after `wait_for_pxe`.
pub fn record_node_ready(ready: bool) {
    metrics::gauge!("pxe_node_ready").set(if ready { 1.0 } else { 0.0 });
}

/// Record a produced authorization witness.
///
/// `source` is `"local"` for witnesses signed in-process and `"node"` for
/// witnesses the PXE produced for a node-managed account.
pub fn record_auth_witness(source: &'static str) {
    metrics::counter!("wallet_auth_witnesses_total", "source" => source).increment(1);
}
