use opentelemetry_sdk::metrics::InMemoryMetricExporter;
use std::collections::HashMap;
use std::time::Duration;

/// Default collector endpoint: a local collector on the standard OTLP/HTTP
/// ingestion port.
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318/v1/metrics";

/// Default periodic-export interval. Deliberately long: export is always
/// forced through the shutdown flush, so the interval only has to be long
/// enough to never fire on its own during a job step.
pub const DEFAULT_EXPORT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Debug)]
pub enum OtlpHttpProtocol {
    /// HTTP protocol with binary protobuf
    Binary,
    /// HTTP protocol with JSON payload
    Json,
}

/// Transport configuration for the OTLP/HTTP metric exporter.
#[derive(Clone, Debug)]
pub struct OtlpExporterConfig {
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub protocol: OtlpHttpProtocol,
}

impl Default for OtlpExporterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            headers: HashMap::new(),
            protocol: OtlpHttpProtocol::Binary,
        }
    }
}

#[derive(Clone, Debug)]
pub enum MetricsExporter {
    Otlp(OtlpExporterConfig),
    InMemory(InMemoryMetricExporter),
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub(crate) environment: String,
    pub(crate) service_name: String,
    pub(crate) service_version: String,
    pub(crate) exporter: MetricsExporter,
    pub(crate) export_interval: Option<Duration>,
}

impl MetricsConfig {
    pub fn otlp(
        environment: impl Into<String>,
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        exporter: OtlpExporterConfig,
    ) -> Self {
        Self {
            environment: environment.into(),
            service_name: service_name.into(),
            service_version: service_version.into(),
            exporter: MetricsExporter::Otlp(exporter),
            export_interval: None,
        }
    }

    /// Create an in-memory config (used in tests).
    pub fn in_memory(
        environment: impl Into<String>,
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        exporter: InMemoryMetricExporter,
    ) -> Self {
        Self {
            environment: environment.into(),
            service_name: service_name.into(),
            service_version: service_version.into(),
            exporter: MetricsExporter::InMemory(exporter),
            export_interval: None,
        }
    }

    /// Override the interval between periodic metric exports.
    pub fn with_export_interval(mut self, interval: Duration) -> Self {
        self.export_interval = Some(interval);
        self
    }
}
