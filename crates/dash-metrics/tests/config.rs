use std::fs;

use dash_metrics::config::{
    load_config, DashboardConfig, ViewLabels, DEFAULT_FETCH_ERROR, DEFAULT_LOCALE,
    DEFAULT_SYNTHETIC_BADGE,
};
use dash_metrics::format::FALLBACK;
use dash_metrics::synth::TimeRange;

fn write_config(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("dash.yaml");
    fs::write(&path, body).expect("write config");
    (temp, path)
}

#[test]
fn defaults_are_polish_with_two_hundred_formatters() {
    let config = DashboardConfig::default();
    assert_eq!(config.locale, DEFAULT_LOCALE);
    assert_eq!(config.locale, "pl-PL");
    assert_eq!(config.formatter_cache_limit, 200);
    assert_eq!(config.default_range, TimeRange::Month);
    config.validate().expect("defaults are valid");
}

#[test]
fn yaml_overrides_and_partial_labels() {
    let (_temp, path) = write_config(
        "locale: en-US\nformatter_cache_limit: 50\ndefault_range: 7d\nlabels:\n  synthetic_badge: Sample data\n",
    );
    let config = load_config(&path).expect("config should load");
    assert_eq!(config.locale, "en-US");
    assert_eq!(config.formatter_cache_limit, 50);
    assert_eq!(config.default_range, TimeRange::Week);

    let labels = config.labels.resolve();
    assert_eq!(labels.synthetic_badge, "Sample data");
    assert_eq!(labels.fetch_error, DEFAULT_FETCH_ERROR);
    assert_eq!(labels.placeholder, FALLBACK);
}

#[test]
fn missing_fields_use_defaults() {
    let (_temp, path) = write_config("locale: de-DE\n");
    let config = load_config(&path).expect("config should load");
    assert_eq!(config.locale, "de-DE");
    assert_eq!(config.formatter_cache_limit, 200);
    assert_eq!(config.labels, ViewLabels::default());
}

#[test]
fn invalid_locale_is_rejected() {
    let (_temp, path) = write_config("locale: en_US\n");
    let err = load_config(&path).expect_err("bad locale should fail");
    assert!(err.to_string().contains("invalid locale"), "unexpected error: {err}");
}

#[test]
fn zero_cache_limit_is_rejected() {
    let (_temp, path) = write_config("formatter_cache_limit: 0\n");
    let err = load_config(&path).expect_err("zero limit should fail");
    assert!(
        err.to_string().contains("formatter_cache_limit"),
        "unexpected error: {err}"
    );
}

#[test]
fn unknown_range_is_a_parse_error() {
    let (_temp, path) = write_config("default_range: fortnight\n");
    let err = load_config(&path).expect_err("unknown range should fail");
    assert!(err.to_string().contains("invalid config"), "unexpected error: {err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = load_config(temp.path().join("absent.yaml")).expect_err("missing file");
    assert!(err.to_string().contains("io error"), "unexpected error: {err}");
}

#[test]
fn blank_labels_fall_back_to_defaults() {
    let labels = ViewLabels {
        synthetic_badge: Some("   ".to_string()),
        ..ViewLabels::default()
    }
    .resolve();
    assert_eq!(labels.synthetic_badge, DEFAULT_SYNTHETIC_BADGE);
}

#[test]
fn locale_override_replaces_configured_value() {
    let config = DashboardConfig::default().with_locale(Some("fr-FR".to_string()));
    assert_eq!(config.locale, "fr-FR");
    let unchanged = DashboardConfig::default().with_locale(None);
    assert_eq!(unchanged.locale, DEFAULT_LOCALE);
}
