use crate::config::DEFAULT_EXPORT_INTERVAL;
use crate::config::MetricsConfig;
use crate::config::MetricsExporter;
use crate::config::OtlpExporterConfig;
use crate::config::OtlpHttpProtocol;
use crate::error::MetricsError;
use crate::error::Result;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry_otlp::Protocol;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_otlp::WithHttpConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::PeriodicReader;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::metrics::Temporality;
use opentelemetry_semantic_conventions as semconv;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use tracing::error;

const ENV_ATTRIBUTE: &str = "env";

static INSTALLED: OnceLock<()> = OnceLock::new();

pub(crate) fn provider_installed() -> bool {
    INSTALLED.get().is_some()
}

/// Owning handle for an installed meter provider.
///
/// Returned by [`install`] and required by [`MeterProviderHandle::shutdown`];
/// nothing re-reads the global registry at shutdown time.
#[derive(Clone, Debug)]
pub struct MeterProviderHandle {
    provider: SdkMeterProvider,
}

/// Build a meter provider from configuration and install it as the
/// process-wide default.
///
/// Installing is last-write-wins at the global registry; call this once per
/// process. Endpoint strings are not validated here: a malformed endpoint
/// surfaces as a transport error during the shutdown flush.
pub fn install(config: MetricsConfig) -> Result<MeterProviderHandle> {
    let MetricsConfig {
        environment,
        service_name,
        service_version,
        exporter,
        export_interval,
    } = config;

    let resource = Resource::builder()
        .with_service_name(service_name)
        .with_attributes(vec![
            KeyValue::new(semconv::attribute::SERVICE_VERSION, service_version),
            KeyValue::new(ENV_ATTRIBUTE, environment),
        ])
        .build();

    let interval = export_interval.unwrap_or(DEFAULT_EXPORT_INTERVAL);
    let provider = match exporter {
        MetricsExporter::InMemory(exporter) => build_provider(resource, exporter, interval),
        MetricsExporter::Otlp(exporter) => {
            let exporter = build_otlp_metric_exporter(exporter, Temporality::Delta)?;
            build_provider(resource, exporter, interval)
        }
    };

    global::set_meter_provider(provider.clone());
    let _ = INSTALLED.set(());

    Ok(MeterProviderHandle { provider })
}

impl MeterProviderHandle {
    /// Force an immediate collection and export of all registered gauges.
    pub fn force_flush(&self) -> Result<()> {
        self.provider
            .force_flush()
            .map_err(|source| MetricsError::Flush { source })
    }

    /// Flush all pending metric data, then release provider resources.
    ///
    /// The flush always runs first; teardown is attempted even when the
    /// flush fails, and the flush error takes precedence in the returned
    /// result.
    pub fn shutdown(self) -> Result<()> {
        debug!("flushing metrics before provider teardown");
        let flushed = self
            .provider
            .force_flush()
            .map_err(|source| MetricsError::Flush { source });
        let released = self
            .provider
            .shutdown()
            .map_err(|source| MetricsError::Teardown { source });
        flushed.and(released)
    }
}

/// Exit status for a shutdown outcome: 0 when flush and teardown both
/// succeeded, 1 otherwise.
pub fn exit_code_for(outcome: &Result<()>) -> i32 {
    match outcome {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Shut the provider down and terminate the process with the matching exit
/// status.
///
/// Never returns: a job step may still hold live export-reader threads, and
/// exiting here guarantees termination regardless of them. Callers that need
/// to keep running should use [`MeterProviderHandle::shutdown`] instead.
pub fn shutdown_and_exit(handle: MeterProviderHandle) -> ! {
    let outcome = handle.shutdown();
    if let Err(err) = &outcome {
        error!("failed to shut down meter provider: {err}");
    }
    std::process::exit(exit_code_for(&outcome));
}

fn build_provider<E>(resource: Resource, exporter: E, interval: Duration) -> SdkMeterProvider
where
    E: opentelemetry_sdk::metrics::exporter::PushMetricExporter + 'static,
{
    let reader = PeriodicReader::builder(exporter)
        .with_interval(interval)
        .build();
    SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build()
}

fn build_otlp_metric_exporter(
    config: OtlpExporterConfig,
    temporality: Temporality,
) -> Result<opentelemetry_otlp::MetricExporter> {
    let OtlpExporterConfig {
        endpoint,
        headers,
        protocol,
    } = config;
    debug!("using OTLP Http exporter for metrics: {endpoint}");

    let protocol = match protocol {
        OtlpHttpProtocol::Binary => Protocol::HttpBinary,
        OtlpHttpProtocol::Json => Protocol::HttpJson,
    };

    opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .with_temporality(temporality)
        .with_protocol(protocol)
        .with_headers(headers)
        .build()
        .map_err(|source| MetricsError::ExporterBuild { source })
}
