use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_requests_total",
        "Total requests handled by the catalog service"
    )
    .expect("register requests_total")
});

pub static REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "catalog_request_duration_seconds",
        "Request duration in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register request_duration")
});

pub static IMPORT_RECORDS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_import_records_added_total",
        "Total records persisted via bulk import"
    )
    .expect("register import_records_added_total")
});

pub static IMPORT_RECORDS_SKIPPED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_import_records_skipped_total",
        "Total bulk-import records skipped by validation"
    )
    .expect("register import_records_skipped_total")
});

/// Count and time every request passing through the router.
pub async fn track_http(req: Request, next: Next) -> Response {
    REQUESTS_TOTAL.inc();
    let timer = REQUEST_DURATION.start_timer();
    let res = next.run(req).await;
    timer.observe_duration();
    res
}

/// Text-format metrics endpoint for Prometheus scrapes.
pub async fn metrics() -> Response {
    let families = prometheus::gather();
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }
    ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buf).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_register_and_increment() {
        let before = REQUESTS_TOTAL.get();
        REQUESTS_TOTAL.inc();
        assert_eq!(REQUESTS_TOTAL.get(), before + 1);
    }
}
