use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{ratio, DashboardRow, MetricBuilder};
use crate::format::{format_currency, format_number, format_percent, FormatterCache};
use crate::synth::{jitter, Domain, RangeParams, TimeRange};

const BASE_SESSIONS: f64 = 4_800.0;
const BASE_CONVERSION_RATE: f64 = 0.021;
const BASE_AOV: f64 = 215.0;
const WEEKEND_UPLIFT: f64 = 1.12;
const DAILY_GROWTH: f64 = 0.004;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sessions: f64,
    pub orders: f64,
    pub revenue: f64,
    pub aov: f64,
    pub conversion_rate: f64,
}

impl DailyPoint {
    pub fn from_base(date: NaiveDate, sessions: f64, orders: f64, revenue: f64) -> Self {
        Self {
            date,
            sessions,
            orders,
            revenue,
            aov: ratio(revenue, orders),
            conversion_rate: ratio(orders, sessions),
        }
    }
}

/// Daily revenue series ending on `as_of`. Synthetic tables are re-anchored so
/// the last point always falls on `as_of`, whatever row count is requested.
#[derive(Clone, Copy, Debug)]
pub struct DailySeriesBuilder {
    start: NaiveDate,
    end: NaiveDate,
    days: usize,
}

impl DailySeriesBuilder {
    pub fn new(as_of: NaiveDate, range: TimeRange) -> Self {
        Self::ending_on(as_of, range.days(as_of))
    }

    pub fn ending_on(as_of: NaiveDate, days: usize) -> Self {
        let days = days.max(1);
        let start = as_of
            .checked_sub_days(Days::new(days as u64 - 1))
            .unwrap_or(as_of);
        Self {
            start,
            end: as_of,
            days,
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(index as u64))
            .unwrap_or(self.start)
    }
}

fn weekday_factor(date: NaiveDate) -> f64 {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_UPLIFT,
        _ => 1.0,
    }
}

impl MetricBuilder for DailySeriesBuilder {
    type Record = DailyPoint;

    const DOMAIN: Domain = Domain::Overview;
    const TABLE: &'static str = "daily";

    fn from_row(&self, index: usize, row: &DashboardRow) -> DailyPoint {
        let date = NaiveDate::parse_from_str(&row.dimension("date", ""), "%Y-%m-%d")
            .unwrap_or_else(|_| self.date_at(index));
        DailyPoint::from_base(
            date,
            row.metric("sessions", 0.0),
            row.metric("orders", 0.0),
            row.metric("revenue", 0.0),
        )
    }

    fn synthesize(&self, index: usize, params: RangeParams) -> DailyPoint {
        let RangeParams { multiplier, seed } = params;
        let date = self.date_at(index);
        let trend = 1.0 + DAILY_GROWTH * index as f64;

        let sessions = (BASE_SESSIONS
            * multiplier
            * trend
            * weekday_factor(date)
            * (1.0 + jitter(index, seed, 0, 0.2)))
        .round();
        let orders =
            (sessions * BASE_CONVERSION_RATE * (1.0 + jitter(index, seed, 7, 0.25))).round();
        let revenue = orders * BASE_AOV * (1.0 + jitter(index, seed, 13, 0.12));

        DailyPoint::from_base(date, sessions, orders, revenue)
    }

    fn synthesize_table(&self, count: usize, params: RangeParams) -> Vec<DailyPoint> {
        let anchored = Self::ending_on(self.end, count);
        (0..count)
            .map(|index| anchored.synthesize(index, params))
            .collect()
    }

    fn headline(&self, record: &DailyPoint) -> f64 {
        record.revenue
    }

    fn render(
        &self,
        record: &DailyPoint,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("date", record.date.format("%Y-%m-%d").to_string()),
            ("sessions", format_number(cache, record.sessions, locale)),
            ("orders", format_number(cache, record.orders, locale)),
            ("revenue", format_currency(cache, record.revenue, locale)),
            ("aov", format_currency(cache, record.aov, locale)),
            ("conversion_rate", format_percent(cache, record.conversion_rate, locale)),
        ]
    }
}
