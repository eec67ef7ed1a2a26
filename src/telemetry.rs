use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize telemetry with optional OpenTelemetry export.
/// If OTEL_EXPORTER_OTLP_ENDPOINT is set and reachable, traces are sent to the collector.
/// Otherwise, only console logging is used.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

    if let Some(endpoint) = otel_endpoint {
        let host_port = endpoint
            .trim_start_matches("http://")
            .trim_start_matches("https://");

        // Quick TCP check to see if the collector is up (resolve hostname first)
        let is_reachable = host_port
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
            .unwrap_or(false);

        if is_reachable {
            let service_name =
                env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "ladle-server".to_string());

            let resource = opentelemetry_sdk::Resource::builder()
                .with_service_name(service_name.clone())
                .build();

            let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(&endpoint)
                .build()
                .expect("Failed to create OTLP trace exporter");

            let trace_provider = SdkTracerProvider::builder()
                .with_batch_exporter(trace_exporter)
                .with_resource(resource)
                .build();

            let tracer = trace_provider.tracer("ladle-server");
            opentelemetry::global::set_tracer_provider(trace_provider);

            let otel_trace_layer = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(otel_trace_layer)
                .init();

            tracing::info!(
                "OpenTelemetry enabled, exporting traces to {} as {}",
                endpoint,
                service_name
            );
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();

            tracing::info!(
                "OpenTelemetry endpoint {} not reachable, using console logging only",
                endpoint
            );
        }
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();

        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
    }
}
