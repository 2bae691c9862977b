//! Log output for the `soma-analytics` binary
//!
//! One subscriber: an `EnvFilter`, a compact console layer on stderr (stdout
//! belongs to `report`), and with the `telemetry` feature an optional OTLP
//! span exporter.
//!
//! `RUST_LOG` wins over `--debug`. With `--otel`, spans go to
//! `OTEL_EXPORTER_OTLP_ENDPOINT` (default `http://localhost:4317`) under
//! `OTEL_SERVICE_NAME` (default `soma-analytics`).

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if self.debug { "debug" } else { "info" }))
    }
}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact();

    #[cfg(feature = "telemetry")]
    let export = if config.otel {
        Some(otlp::layer()?)
    } else {
        None
    };
    #[cfg(not(feature = "telemetry"))]
    let export: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(config.filter())
        .with(console)
        .with(export)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    #[cfg(not(feature = "telemetry"))]
    if config.otel {
        tracing::warn!("--otel ignored: built without the telemetry feature");
    }

    Ok(())
}

/// Flush pending spans before exit.
pub fn shutdown_otel() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "telemetry")]
mod otlp {
    use anyhow::{Context, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::{runtime, Resource};
    use tracing::Subscriber;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    const DEFAULT_ENDPOINT: &str = "http://localhost:4317";
    const DEFAULT_SERVICE: &str = "soma-analytics";

    /// Span export layer. The provider is registered globally so
    /// [`super::shutdown_otel`] can flush it.
    pub(super) fn layer<S>() -> Result<OpenTelemetryLayer<S, Tracer>>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_owned());
        let service =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE.to_owned());

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoint)
            .build()
            .with_context(|| format!("building OTLP exporter for {endpoint}"))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(Resource::new([KeyValue::new("service.name", service)]))
            .build();
        let tracer = provider.tracer(DEFAULT_SERVICE);
        let _ = opentelemetry::global::set_tracer_provider(provider);

        Ok(tracing_opentelemetry::layer().with_tracer(tracer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_installs_once() {
        let config = TracingConfig {
            debug: true,
            otel: false,
        };
        assert!(init(&config).is_ok());
        assert!(init(&config).is_err());
    }
}
