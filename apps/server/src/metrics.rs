//! Metrics collection for the clinic server
//!
//! Prometheus metrics covering the HTTP surface, exposed at `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "clinic_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "clinic_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "clinic_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");
}

/// Sanitize a path for metrics labels: replace UUID segments with `{id}` to
/// keep label cardinality bounded.
pub fn sanitize_path(path: &str) -> String {
    let path = path.strip_prefix("/api").unwrap_or(path);
    let sanitized: Vec<String> = path
        .split('/')
        .map(|segment| {
            if uuid::Uuid::parse_str(segment).is_ok() {
                "{id}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();

    let joined = sanitized.join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_uuid_segments() {
        let path = "/api/patients/6f9619ff-8b86-4d01-b42d-00cf4fc964ff/appointments";
        assert_eq!(sanitize_path(path), "/patients/{id}/appointments");
    }

    #[test]
    fn sanitize_keeps_static_segments() {
        assert_eq!(sanitize_path("/api/admin/dashboard"), "/admin/dashboard");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
