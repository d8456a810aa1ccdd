use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric name cannot be empty")]
    EmptyMetricName,
    #[error("metric name contains invalid characters: {name}")]
    InvalidMetricName { name: String },

    #[error("no meter provider installed; call install() before recording gauges")]
    InstrumentUnavailable,

    #[error("failed to build OTLP metrics exporter")]
    ExporterBuild {
        #[source]
        source: opentelemetry_otlp::ExporterBuildError,
    },

    #[error("failed to flush metrics to the exporter")]
    Flush {
        #[source]
        source: opentelemetry_sdk::error::OTelSdkError,
    },

    #[error("failed to release the metrics provider")]
    Teardown {
        #[source]
        source: opentelemetry_sdk::error::OTelSdkError,
    },
}
