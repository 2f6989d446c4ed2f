use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::builders::{MetricBuilder, Provenance};
use crate::config::ResolvedLabels;
use crate::error::MetricsResult;
use crate::format::FormatterCache;
use crate::source::LoadedView;
use crate::stats::{compute_stats, ColumnStats};
use crate::synth::{Domain, TimeRange};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize)]
pub struct ReportContext {
    pub schema_version: u32,
    pub label: String,
    pub domain: Domain,
    pub range: TimeRange,
    pub locale: String,
    pub as_of: NaiveDate,
    pub seed: u32,
    pub multiplier: f64,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
    /// `sha256:<hex>` over the serialized records.
    pub fingerprint: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ViewReport {
    pub context: ReportContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
    pub summary: Option<ColumnStats>,
    pub records: serde_json::Value,
    pub formatted: Vec<BTreeMap<String, String>>,
}

pub fn fingerprint<T: Serialize>(records: &[T]) -> MetricsResult<String> {
    let bytes = serde_json::to_vec(records)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("sha256:{digest:x}"))
}

#[derive(Clone, Copy, Debug)]
pub struct ReportMeta<'a> {
    pub label: &'a str,
    pub locale: &'a str,
    pub as_of: NaiveDate,
    pub labels: &'a ResolvedLabels,
}

pub fn build_report<B: MetricBuilder>(
    builder: &B,
    view: &LoadedView<B::Record>,
    cache: &FormatterCache,
    meta: ReportMeta<'_>,
) -> MetricsResult<ViewReport> {
    let records = &view.table.records;
    let headlines: Vec<f64> = records.iter().map(|r| builder.headline(r)).collect();

    let notice = if records.is_empty() {
        Some(meta.labels.no_data.clone())
    } else if view.fetch_error.is_some() {
        Some(meta.labels.fetch_error.clone())
    } else if view.table.provenance == Provenance::Synthetic {
        Some(meta.labels.synthetic_badge.clone())
    } else {
        None
    };

    let formatted = records
        .iter()
        .map(|record| {
            builder
                .render(record, cache, meta.locale)
                .into_iter()
                .map(|(field, text)| (field.to_string(), text))
                .collect()
        })
        .collect();

    Ok(ViewReport {
        context: ReportContext {
            schema_version: REPORT_SCHEMA_VERSION,
            label: meta.label.to_string(),
            domain: view.domain,
            range: view.range,
            locale: meta.locale.to_string(),
            as_of: meta.as_of,
            seed: view.params.seed,
            multiplier: view.params.multiplier,
            provenance: view.table.provenance,
            created_at: Utc::now(),
            fingerprint: fingerprint(records)?,
        },
        notice,
        fetch_error: view.fetch_error.clone(),
        summary: compute_stats(&headlines),
        records: serde_json::to_value(records)?,
        formatted,
    })
}
