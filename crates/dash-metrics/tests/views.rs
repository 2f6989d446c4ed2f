use std::fs;

use chrono::NaiveDate;
use dash_metrics::builders::Provenance;
use dash_metrics::config::ViewLabels;
use dash_metrics::format::FormatterCache;
use dash_metrics::report::REPORT_SCHEMA_VERSION;
use dash_metrics::source::{FixtureSource, RequestGeneration, UnavailableSource};
use dash_metrics::synth::{range_params, Domain, TimeRange};
use dash_metrics::views::{default_row_count, run_view, ViewRequest};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).expect("valid date")
}

fn request(domain: Domain, range: TimeRange, count: Option<usize>) -> ViewRequest<'static> {
    ViewRequest {
        domain,
        range,
        count,
        as_of: as_of(),
        locale: "pl-PL",
        label: "views",
    }
}

#[test]
fn overview_row_count_follows_range_length() {
    assert_eq!(default_row_count(Domain::Overview, TimeRange::Week, as_of()), 7);
    assert_eq!(default_row_count(Domain::Overview, TimeRange::MonthToDate, as_of()), 14);
    assert_eq!(default_row_count(Domain::Ads, TimeRange::Quarter, as_of()), 6);
}

#[tokio::test]
async fn ads_view_is_sorted_by_revenue_descending() {
    let report = run_view(
        &UnavailableSource::new("offline"),
        &request(Domain::Ads, TimeRange::Quarter, None),
        &FormatterCache::default(),
        &ViewLabels::default().resolve(),
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    let revenues: Vec<f64> = report
        .records
        .as_array()
        .expect("records array")
        .iter()
        .map(|r| r["revenue"].as_f64().expect("revenue"))
        .collect();
    assert!(revenues.windows(2).all(|pair| pair[0] >= pair[1]));

    let params = range_params(TimeRange::Quarter, Domain::Ads);
    assert_eq!(report.context.seed, params.seed);
    assert_eq!(report.context.multiplier, params.multiplier);
    assert_eq!(report.context.schema_version, REPORT_SCHEMA_VERSION);
    assert_eq!(report.context.locale, "pl-PL");
}

#[tokio::test]
async fn guardian_view_lists_issues_first() {
    let report = run_view(
        &UnavailableSource::new("offline"),
        &request(Domain::Guardian, TimeRange::Month, Some(21)),
        &FormatterCache::default(),
        &ViewLabels::default().resolve(),
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    let rank = |severity: &str| -> u8 {
        match severity {
            "critical" => 0,
            "warning" => 1,
            _ => 2,
        }
    };
    let ranks: Vec<u8> = report
        .formatted
        .iter()
        .map(|row| rank(row["severity"].as_str()))
        .collect();
    assert_eq!(ranks.len(), 21);
    assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn successful_synthetic_view_shows_demo_badge() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("products");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(dir.join("7d.json"), r#"{"tables":{}}"#).expect("write fixture");

    let labels = ViewLabels {
        synthetic_badge: Some("Dane demonstracyjne".to_string()),
        ..ViewLabels::default()
    }
    .resolve();
    let report = run_view(
        &FixtureSource::new(temp.path()),
        &request(Domain::Products, TimeRange::Week, None),
        &FormatterCache::default(),
        &labels,
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    assert!(report.fetch_error.is_none());
    assert_eq!(report.notice.as_deref(), Some("Dane demonstracyjne"));
}

#[tokio::test]
async fn api_view_has_no_notice() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("products");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(
        dir.join("30d.json"),
        r#"{"tables":{"products":[{"dimensions":{"sku":"A-1","product":"Kettle"},"metrics":{"units":3,"revenue":600,"cost":240}}]}}"#,
    )
    .expect("write fixture");

    let report = run_view(
        &FixtureSource::new(temp.path()),
        &request(Domain::Products, TimeRange::Month, None),
        &FormatterCache::default(),
        &ViewLabels::default().resolve(),
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    assert_eq!(report.context.provenance, Provenance::Api);
    assert!(report.notice.is_none());
    assert_eq!(report.formatted[0]["margin"], "60%");
    assert_eq!(report.formatted[0]["profit"], "360\u{a0}zł");
}

#[tokio::test]
async fn empty_view_reports_no_data() {
    let labels = ViewLabels::default().resolve();
    let report = run_view(
        &UnavailableSource::new("offline"),
        &request(Domain::Customers, TimeRange::Month, Some(0)),
        &FormatterCache::default(),
        &labels,
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    assert_eq!(report.notice.as_deref(), Some(labels.no_data.as_str()));
    assert!(report.summary.is_none());
    assert!(report.formatted.is_empty());
}

#[tokio::test]
async fn fingerprint_is_stable_across_runs() {
    let source = UnavailableSource::new("offline");
    let cache = FormatterCache::default();
    let labels = ViewLabels::default().resolve();
    let req = request(Domain::Overview, TimeRange::Week, None);

    let first = run_view(&source, &req, &cache, &labels, &RequestGeneration::new())
        .await
        .expect("view builds")
        .expect("current request");
    let second = run_view(&source, &req, &cache, &labels, &RequestGeneration::new())
        .await
        .expect("view builds")
        .expect("current request");

    assert_eq!(first.context.fingerprint, second.context.fingerprint);
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn configured_placeholder_reaches_formatted_rows() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("customers");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(
        dir.join("30d.json"),
        r#"{"tables":{"cohorts":[{"dimensions":{"cohort":"2024-05"},"metrics":{"customers":120,"retention_m0":1.0,"revenue":2400}}]}}"#,
    )
    .expect("write fixture");

    let labels = ViewLabels {
        placeholder: Some("n/a".to_string()),
        ..ViewLabels::default()
    }
    .resolve();
    let cache = FormatterCache::new(16).with_placeholder(labels.placeholder.as_str());
    let report = run_view(
        &FixtureSource::new(temp.path()),
        &request(Domain::Customers, TimeRange::Month, None),
        &cache,
        &labels,
        &RequestGeneration::new(),
    )
    .await
    .expect("view builds")
    .expect("current request");

    assert_eq!(report.context.provenance, Provenance::Api);
    assert_eq!(report.formatted[0]["retention_m1"], "n/a");
    assert_ne!(report.formatted[0]["ltv"], "n/a");
}
