use anyhow::{Context, Result};
use opentelemetry::{KeyValue, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, SdkTracerProvider},
};
use opentelemetry_semantic_conventions::{SCHEMA_URL, resource::SERVICE_VERSION};
use tracing_log::LogTracer;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const NO_TELEMETRY_VAR: &str = "RMT_NO_TELEMETRY";
pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Keeps the OTLP pipeline alive; flushes pending spans on drop.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down tracer provider: {e}");
            }
        }
    }
}

fn resource(service_name: &str, service_version: &str) -> Resource {
    Resource::builder()
        .with_service_name(service_name.to_string())
        .with_schema_url(
            [KeyValue::new(SERVICE_VERSION, service_version.to_string())],
            SCHEMA_URL,
        )
        .build()
}

fn init_tracer_provider(
    service_name: &str,
    service_version: &str,
    endpoint: &str,
) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("OTLP exporter init failed")?;

    Ok(SdkTracerProvider::builder()
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource(service_name, service_version))
        .with_batch_exporter(exporter)
        .build())
}

/// OTLP endpoint to export to, if any. Export is opt-in: it needs a
/// non-empty endpoint and no opt-out variable.
pub fn otlp_endpoint(no_telemetry: Option<String>, endpoint: Option<String>) -> Option<String> {
    if no_telemetry.is_some() {
        return None;
    }
    endpoint
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

/// Install the global subscriber: `EnvFilter` from `RUST_LOG`, a fmt layer,
/// the `log` bridge, and OTLP export when [`otlp_endpoint`] yields one.
///
/// # Environment Variables
/// - `RMT_NO_TELEMETRY`: if set (any value), disables OTLP export
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector to export spans to
/// - `RUST_LOG`: log filtering
pub fn setup_telemetry(service_name: &str, service_version: &str) -> Result<TelemetryGuard> {
    LogTracer::init().context("Failed to set LogTracer")?;

    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let filter = EnvFilter::from_default_env();

    let endpoint = otlp_endpoint(
        std::env::var(NO_TELEMETRY_VAR).ok(),
        std::env::var(OTLP_ENDPOINT_VAR).ok(),
    );

    let Some(endpoint) = endpoint else {
        let subscriber = Registry::default().with(filter).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to set tracing subscriber")?;
        return Ok(TelemetryGuard { provider: None });
    };

    let provider = init_tracer_provider(service_name, service_version, &endpoint)?;
    let tracer = provider.tracer("rmt-tracer");

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt_layer)
        .with(OpenTelemetryLayer::new(tracer));
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(TelemetryGuard {
        provider: Some(provider),
    })
}
