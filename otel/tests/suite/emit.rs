use crate::harness::gauge_points;
use crate::harness::install_in_memory;
use crate::harness::latest_metrics;
use jobgauge_otel::MetricsError;
use jobgauge_otel::Result;
use jobgauge_otel::record_gauge;
use opentelemetry::KeyValue;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::collections::BTreeMap;

// Ensures one record_gauge call yields exactly one data point on the next
// forced collection.
#[test]
#[serial]
fn record_gauge_produces_one_data_point() -> Result<()> {
    let (handle, exporter) = install_in_memory()?;

    record_gauge("jobs_run", 3.0, &[KeyValue::new("repo", "x")])?;
    handle.force_flush()?;

    let resource_metrics = latest_metrics(&exporter);
    let points = gauge_points(&resource_metrics, "jobs_run");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].0, 3.0);
    assert_eq!(
        points[0].1,
        BTreeMap::from([("repo".to_string(), "x".to_string())])
    );

    handle.shutdown()
}

#[test]
#[serial]
fn record_gauge_accepts_empty_attributes() -> Result<()> {
    let (handle, exporter) = install_in_memory()?;

    record_gauge("queue_depth", 0.0, &[])?;
    handle.force_flush()?;

    let resource_metrics = latest_metrics(&exporter);
    let points = gauge_points(&resource_metrics, "queue_depth");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].0, 0.0);
    assert!(points[0].1.is_empty());

    handle.shutdown()
}

// Duplicate-name gauges coexist: each call registers its own callback and
// distinct attribute sets survive as distinct data points.
#[test]
#[serial]
fn duplicate_name_gauges_coexist() -> Result<()> {
    let (handle, exporter) = install_in_memory()?;

    record_gauge("jobs_run", 1.0, &[KeyValue::new("repo", "a")])?;
    record_gauge("jobs_run", 2.0, &[KeyValue::new("repo", "b")])?;
    handle.force_flush()?;

    let resource_metrics = latest_metrics(&exporter);
    let mut points = gauge_points(&resource_metrics, "jobs_run");
    points.sort_by(|left, right| left.0.total_cmp(&right.0));
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].0, 1.0);
    assert_eq!(points[0].1.get("repo").map(String::as_str), Some("a"));
    assert_eq!(points[1].0, 2.0);
    assert_eq!(points[1].1.get("repo").map(String::as_str), Some("b"));

    handle.shutdown()
}

#[test]
#[serial]
fn non_string_attribute_values_are_kept() -> Result<()> {
    let (handle, exporter) = install_in_memory()?;

    record_gauge(
        "build_info",
        1.0,
        &[
            KeyValue::new("attempt", 2i64),
            KeyValue::new("parallel", true),
        ],
    )?;
    handle.force_flush()?;

    let resource_metrics = latest_metrics(&exporter);
    let points = gauge_points(&resource_metrics, "build_info");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].1.get("attempt").map(String::as_str), Some("2"));
    assert_eq!(points[0].1.get("parallel").map(String::as_str), Some("true"));

    handle.shutdown()
}

// Name validation runs before the provider lookup, so no install is needed.
#[test]
fn empty_metric_name_is_rejected() {
    let err = record_gauge("", 1.0, &[]).unwrap_err();
    assert!(matches!(err, MetricsError::EmptyMetricName));
}

#[test]
fn invalid_metric_name_is_rejected() {
    let err = record_gauge("bad name", 1.0, &[]).unwrap_err();
    assert!(matches!(
        err,
        MetricsError::InvalidMetricName { name } if name == "bad name"
    ));
}
