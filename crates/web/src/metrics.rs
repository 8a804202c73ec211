use anyhow::Result;
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

pub fn describe() {
    describe_counter!(
        "reader_debates_scanned_total",
        "Debates fully scanned by batch read operations."
    );
    describe_counter!(
        "reader_arguments_scanned_total",
        "Argument rows read across all batch operations."
    );
    describe_counter!(
        "reader_log_error_events",
        "ERROR-level tracing events emitted by the service."
    );
    describe_gauge!(
        "reader_web_build_info",
        "Build info for the reader web API (value is always 1)."
    );
}

/// Install the global Prometheus recorder with its own HTTP listener on
/// `port`, so scraping does not depend on the query API being healthy.
pub fn install_prometheus(port: u16) -> Result<PrometheusHandle> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let handle = PrometheusBuilder::new()
        .with_http_listener(addr)
        .install_recorder()?;

    describe();
    ::metrics::gauge!(
        "reader_web_build_info",
        "version" => env!("CARGO_PKG_VERSION"),
    )
    .set(1.0);

    Ok(handle)
}
