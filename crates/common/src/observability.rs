use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::Resource;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Flushes the global tracer provider on drop. Hold it for the lifetime of
/// the process when OTLP export is active.
pub struct OtelGuard {
    _private: (),
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        opentelemetry::global::shutdown_tracer_provider();
    }
}

/// Counts ERROR-level events into `reader_log_error_events` so alerting can
/// key off logs without scraping them.
struct ErrorEventCounter;

impl<S> Layer<S> for ErrorEventCounter
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            metrics::counter!("reader_log_error_events").increment(1);
        }
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    // RUST_LOG wins; the config level is the fallback.
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// OTLP span export is opt-in via `OTEL_EXPORTER_OTLP_ENDPOINT`. Returns
/// `None` (logs + metrics only) when unset or when the exporter cannot be
/// built, keeping local dev and tests quiet.
fn try_otel_tracer(service_name: &str) -> Option<(Tracer, OtelGuard)> {
    use opentelemetry_otlp::WithExportConfig;

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .ok()?;

    let provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.to_string(),
        )]))
        .build();

    let tracer = provider.tracer(service_name.to_string());
    let _ = opentelemetry::global::set_tracer_provider(provider);

    Some((tracer, OtelGuard { _private: () }))
}

fn base_subscriber(
    default_level: &str,
) -> impl Subscriber + for<'a> LookupSpan<'a> + Send + Sync {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .json(),
        )
        .with(ErrorEventCounter)
}

/// Build a `tracing` dispatcher: JSON logs to stdout, `RUST_LOG`-aware
/// filtering, ERROR-event counter, and optional OTLP trace export.
///
/// Batch span export needs a Tokio runtime; both binaries are
/// `#[tokio::main]`.
pub fn build_dispatch(
    service_name: &str,
    default_level: &str,
) -> (tracing::Dispatch, Option<OtelGuard>) {
    match try_otel_tracer(service_name) {
        Some((tracer, guard)) => {
            let subscriber = base_subscriber(default_level)
                .with(tracing_opentelemetry::layer().with_tracer(tracer));
            (tracing::Dispatch::new(subscriber), Some(guard))
        }
        None => (
            tracing::Dispatch::new(base_subscriber(default_level)),
            None,
        ),
    }
}

/// Install the dispatcher globally. Call once at startup, keep the guard.
pub fn init(service_name: &str, default_level: &str) -> anyhow::Result<Option<OtelGuard>> {
    let (dispatch, guard) = build_dispatch(service_name, default_level);
    tracing::dispatcher::set_global_default(dispatch).map_err(anyhow::Error::msg)?;
    Ok(guard)
}
