//! Capture / dispatch / directory counters
//!
//! Thin wrappers over the `metrics` facade so label names stay consistent.

use contracts::Direction;
use metrics::counter;

/// Record points produced by flattening one captured message
pub fn record_points_captured(scope: &str, direction: Direction, count: usize) {
    counter!(
        "h2pcontrol_points_captured_total",
        "scope" => scope.to_string(),
        "direction" => direction.as_str()
    )
    .increment(count as u64);
}

/// Record a captured value that exposed no structured view
pub fn record_capture_degraded(scope: &str, direction: Direction) {
    counter!(
        "h2pcontrol_capture_degraded_total",
        "scope" => scope.to_string(),
        "direction" => direction.as_str()
    )
    .increment(1);
}

/// Record a batch write against a sink
pub fn record_sink_write(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "h2pcontrol_sink_writes_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record points a sink could not store
pub fn record_points_skipped(sink_name: &str, count: usize) {
    if count == 0 {
        return;
    }
    counter!(
        "h2pcontrol_points_skipped_total",
        "sink" => sink_name.to_string()
    )
    .increment(count as u64);
}

/// Record a batch rerouted to the console
pub fn record_sink_fallback(sink_name: &str) {
    counter!(
        "h2pcontrol_sink_fallbacks_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// Record a directory `FetchServers` round trip
pub fn record_directory_fetch(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("h2pcontrol_directory_fetches_total", "status" => status).increment(1);
}
