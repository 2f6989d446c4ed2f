use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{finite_or_zero, ratio, DashboardRow, MetricBuilder};
use crate::format::{format_currency, format_number, format_percent, FormatterCache};
use crate::synth::{jitter, seeded, Domain, RangeParams};

pub const DEFAULT_RETENTION_MONTHS: usize = 6;
pub const DEFAULT_ROWS: usize = 6;

const BASE_CUSTOMERS: f64 = 1_350.0;
const BASE_REVENUE_PER_CUSTOMER: f64 = 240.0;
const MIN_MONTHLY_DECAY: f64 = 0.55;
const DECAY_SPREAD: f64 = 0.35;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    pub cohort: String,
    pub customers: f64,
    /// Share of the cohort still purchasing, by month since acquisition. Month 0 is `1.0`.
    pub retention: Vec<f64>,
    pub revenue_per_customer: f64,
    pub ltv: f64,
}

impl CohortRow {
    pub fn from_base(
        cohort: String,
        customers: f64,
        retention: Vec<f64>,
        revenue_per_customer: f64,
    ) -> Self {
        let ltv = finite_or_zero(revenue_per_customer * retention.iter().sum::<f64>());
        Self {
            cohort,
            customers,
            retention,
            revenue_per_customer,
            ltv,
        }
    }
}

/// Monthly acquisition cohorts, newest first, counted back from the month of `as_of`.
#[derive(Clone, Copy, Debug)]
pub struct CohortBuilder {
    anchor: NaiveDate,
    months: usize,
}

impl CohortBuilder {
    pub fn new(as_of: NaiveDate, months: usize) -> Self {
        Self {
            anchor: as_of.with_day(1).unwrap_or(as_of),
            months: months.max(1),
        }
    }

    pub fn cohort_label(&self, index: usize) -> String {
        self.anchor
            .checked_sub_months(Months::new(index as u32))
            .unwrap_or(self.anchor)
            .format("%Y-%m")
            .to_string()
    }
}

impl MetricBuilder for CohortBuilder {
    type Record = CohortRow;

    const DOMAIN: Domain = Domain::Customers;
    const TABLE: &'static str = "cohorts";

    fn from_row(&self, index: usize, row: &DashboardRow) -> CohortRow {
        let customers = row.metric("customers", 0.0);
        let mut retention: Vec<f64> = (0..self.months)
            .map_while(|month| {
                let value = row.metric(&format!("retention_m{month}"), f64::NAN);
                value.is_finite().then(|| value.clamp(0.0, 1.0))
            })
            .collect();
        if retention.is_empty() {
            retention.push(1.0);
        }
        let revenue_per_customer = row.metric(
            "revenue_per_customer",
            ratio(row.metric("revenue", 0.0), customers),
        );

        CohortRow::from_base(
            row.dimension("cohort", &self.cohort_label(index)),
            customers,
            retention,
            revenue_per_customer,
        )
    }

    fn synthesize(&self, index: usize, params: RangeParams) -> CohortRow {
        let RangeParams { multiplier, seed } = params;
        let observed = self.months.min(index + 1);

        let mut retention = Vec::with_capacity(observed);
        let mut current = 1.0;
        retention.push(current);
        for month in 1..observed {
            let decay = MIN_MONTHLY_DECAY + DECAY_SPREAD * seeded(index * 11 + month, seed);
            current *= decay;
            retention.push(current);
        }

        let customers =
            (BASE_CUSTOMERS * multiplier * (1.0 + jitter(index, seed, 3, 0.3))).round();
        let revenue_per_customer = BASE_REVENUE_PER_CUSTOMER * (1.0 + jitter(index, seed, 9, 0.2));

        CohortRow::from_base(
            self.cohort_label(index),
            customers,
            retention,
            revenue_per_customer,
        )
    }

    fn headline(&self, record: &CohortRow) -> f64 {
        record.ltv
    }

    fn render(
        &self,
        record: &CohortRow,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)> {
        let month_one = record
            .retention
            .get(1)
            .map(|value| format_percent(cache, *value, locale))
            .unwrap_or_else(|| cache.placeholder().to_string());
        vec![
            ("cohort", record.cohort.clone()),
            ("customers", format_number(cache, record.customers, locale)),
            ("retention_m1", month_one),
            ("ltv", format_currency(cache, record.ltv, locale)),
        ]
    }
}
