//! Derived-metric builders: real rows when present, seeded synthetic rows otherwise.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::FormatterCache;
use crate::synth::{Domain, RangeParams};

pub mod channels;
pub mod cohorts;
pub mod health;
pub mod products;
pub mod series;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRow {
    #[serde(default)]
    pub dimensions: BTreeMap<String, Value>,
    #[serde(default)]
    pub metrics: BTreeMap<String, Value>,
}

impl DashboardRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, key: &str, value: &str) -> Self {
        self.dimensions
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn with_metric(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metrics.insert(key.to_string(), value.into());
        self
    }

    /// Numeric metric lookup. Missing, non-numeric or non-finite values yield `fallback`.
    pub fn metric(&self, key: &str, fallback: f64) -> f64 {
        let parsed = match self.metrics.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() => v,
            _ => fallback,
        }
    }

    pub fn dimension(&self, key: &str, fallback: &str) -> String {
        match self.dimensions.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Domain-shaped upstream payload: named tables of rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<DashboardRow>>,
}

impl DashboardResponse {
    pub fn table(&self, name: &str) -> &[DashboardRow] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Api,
    Synthetic,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuiltTable<R> {
    pub provenance: Provenance,
    pub records: Vec<R>,
}

/// Upper bound on synthesized rows per table; larger requests are clamped.
pub const MAX_SYNTHETIC_ROWS: usize = 10_000;

/// Division with the denominator floored to `1`; never returns a non-finite value.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator.is_finite() {
        denominator.max(1.0)
    } else {
        1.0
    };
    finite_or_zero(numerator / denominator)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub trait MetricBuilder {
    type Record: Clone + Serialize;

    const DOMAIN: Domain;
    const TABLE: &'static str;

    fn from_row(&self, index: usize, row: &DashboardRow) -> Self::Record;

    fn synthesize(&self, index: usize, params: RangeParams) -> Self::Record;

    /// Synthesizes `count` records; builders whose records depend on the table
    /// length override this.
    fn synthesize_table(&self, count: usize, params: RangeParams) -> Vec<Self::Record> {
        (0..count)
            .map(|index| self.synthesize(index, params))
            .collect()
    }

    /// Value used for the report's summary statistics.
    fn headline(&self, record: &Self::Record) -> f64;

    fn render(
        &self,
        record: &Self::Record,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)>;

    fn build(
        &self,
        rows: Option<&[DashboardRow]>,
        count: usize,
        params: RangeParams,
    ) -> BuiltTable<Self::Record> {
        match rows {
            Some(rows) if !rows.is_empty() => BuiltTable {
                provenance: Provenance::Api,
                records: rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| self.from_row(index, row))
                    .collect(),
            },
            _ => BuiltTable {
                provenance: Provenance::Synthetic,
                records: self.synthesize_table(count.min(MAX_SYNTHETIC_ROWS), params),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Stable sort on a numeric key; equal keys keep their relative order in both directions.
pub fn sort_by_metric<T, F>(records: &mut [T], direction: SortDirection, mut key: F)
where
    F: FnMut(&T) -> f64,
{
    records.sort_by(|a, b| direction.apply(key(a).total_cmp(&key(b))));
}

pub fn sort_by_label<T, F>(records: &mut [T], direction: SortDirection, mut key: F)
where
    F: FnMut(&T) -> &str,
{
    records.sort_by(|a, b| {
        let ordering = key(a).to_lowercase().cmp(&key(b).to_lowercase());
        direction.apply(ordering)
    });
}
