use metrics_exporter_prometheus::PrometheusBuilder;

// Integration test: exercises the public `common::observability` surface
// rather than private internals.

#[test]
fn error_events_feed_the_prometheus_counter() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let (dispatch, _otel_guard) = common::observability::build_dispatch("test-reader", "info");

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::error!(debate = "0xd1", "upstream read failed");
        });
    });

    let rendered = handle.render();
    assert!(
        rendered.contains("reader_log_error_events"),
        "expected reader_log_error_events in rendered metrics, got:\n{rendered}"
    );
}

#[test]
fn info_events_do_not_touch_the_error_counter() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let (dispatch, _otel_guard) = common::observability::build_dispatch("test-reader", "info");

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("routine scan");
        });
    });

    let rendered = handle.render();
    assert!(!rendered.contains("reader_log_error_events 1"));
}
