use crate::error::MetricsError;
use crate::error::Result;
use crate::provider::provider_installed;
use opentelemetry::KeyValue;
use opentelemetry::Value;
use opentelemetry::global;
use tracing::info;

const METER_NAME: &str = "jobgauge";

/// Publish one observation for a named gauge metric through the installed
/// global provider.
///
/// The value and attributes are captured here; the gauge's collection
/// callback replays that snapshot whenever collection runs, so the next
/// forced flush yields exactly one data point per call. Repeated calls with
/// the same name register independent callbacks: the SDK keeps one data
/// point per distinct attribute set and collapses identical sets to the
/// last observation of a collection cycle.
pub fn record_gauge(name: &str, value: f64, attributes: &[KeyValue]) -> Result<()> {
    validate_metric_name(name)?;
    if !provider_installed() {
        return Err(MetricsError::InstrumentUnavailable);
    }

    let meter = global::meter(METER_NAME);
    let snapshot = attributes.to_vec();
    meter
        .f64_observable_gauge(name.to_string())
        .with_callback(move |observer| observer.observe(value, &snapshot))
        .build();

    let rendered = render_attributes(attributes);
    info!("gauge {name} {value} {rendered}");
    Ok(())
}

fn render_attributes(attributes: &[KeyValue]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for kv in attributes {
        let value = match &kv.value {
            Value::Bool(b) => serde_json::Value::from(*b),
            Value::I64(i) => serde_json::Value::from(*i),
            Value::F64(f) => serde_json::Value::from(*f),
            Value::String(s) => serde_json::Value::from(s.as_str()),
            other => serde_json::Value::from(other.as_str().into_owned()),
        };
        map.insert(kv.key.to_string(), value);
    }
    serde_json::Value::Object(map)
}

fn validate_metric_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MetricsError::EmptyMetricName);
    }
    if !name.chars().all(is_metric_char) {
        return Err(MetricsError::InvalidMetricName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn is_metric_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
