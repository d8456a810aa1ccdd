pub mod config;
pub mod gauge;
pub mod provider;

mod error;

pub use crate::config::MetricsConfig;
pub use crate::config::MetricsExporter;
pub use crate::config::OtlpExporterConfig;
pub use crate::config::OtlpHttpProtocol;
pub use crate::error::MetricsError;
pub use crate::error::Result;
pub use crate::gauge::record_gauge;
pub use crate::provider::MeterProviderHandle;
pub use crate::provider::exit_code_for;
pub use crate::provider::install;
pub use crate::provider::shutdown_and_exit;
