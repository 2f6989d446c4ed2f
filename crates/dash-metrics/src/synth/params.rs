use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

pub const DAY_MULTIPLIER: f64 = 0.03;
pub const WEEK_MULTIPLIER: f64 = 0.22;
pub const LONG_WINDOW_MULTIPLIER: f64 = 1.0;

const DAY_SEED: u32 = 12;
const WEEK_SEED: u32 = 42;
const MONTH_SEED: u32 = 84;
const QUARTER_SEED: u32 = 96;
const MONTH_TO_DATE_SEED: u32 = 72;
const QUARTER_TO_DATE_SEED: u32 = 78;
const YEAR_TO_DATE_SEED: u32 = 66;
const CUSTOM_SEED: u32 = 60;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "mtd")]
    MonthToDate,
    #[serde(rename = "qtd")]
    QuarterToDate,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::MonthToDate,
        TimeRange::QuarterToDate,
        TimeRange::YearToDate,
        TimeRange::Custom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::MonthToDate => "mtd",
            Self::QuarterToDate => "qtd",
            Self::YearToDate => "ytd",
            Self::Custom => "custom",
        }
    }

    /// Number of daily buckets the range covers when it ends on `as_of`.
    pub fn days(self, as_of: NaiveDate) -> usize {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month | Self::Custom => 30,
            Self::Quarter => 90,
            Self::MonthToDate => as_of.day() as usize,
            Self::QuarterToDate => {
                let quarter_month = ((as_of.month0() / 3) * 3) + 1;
                NaiveDate::from_ymd_opt(as_of.year(), quarter_month, 1)
                    .map(|start| (as_of - start).num_days() as usize + 1)
                    .unwrap_or(1)
            }
            Self::YearToDate => as_of.ordinal() as usize,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = MetricsError;

    fn from_str(value: &str) -> MetricsResult<Self> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == value.trim())
            .ok_or_else(|| {
                MetricsError::InvalidArgument(format!(
                    "unknown time range '{value}' (expected one of: 1d, 7d, 30d, 90d, mtd, qtd, ytd, custom)"
                ))
            })
    }
}

/// Dashboard area whose synthetic series must look different from the others.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Ads,
    Customers,
    Guardian,
    Products,
    Overview,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Ads,
        Domain::Customers,
        Domain::Guardian,
        Domain::Products,
        Domain::Overview,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ads => "ads",
            Self::Customers => "customers",
            Self::Guardian => "guardian",
            Self::Products => "products",
            Self::Overview => "overview",
        }
    }

    // Base seeds are at least 6 apart, so any offset below 6 keeps ranges distinct.
    pub const fn seed_offset(self) -> u32 {
        match self {
            Self::Ads => 0,
            Self::Customers => 1,
            Self::Guardian => 2,
            Self::Products => 3,
            Self::Overview => 4,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = MetricsError;

    fn from_str(value: &str) -> MetricsResult<Self> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == value.trim())
            .ok_or_else(|| {
                MetricsError::InvalidArgument(format!(
                    "unknown domain '{value}' (expected one of: ads, customers, guardian, products, overview)"
                ))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeParams {
    pub multiplier: f64,
    pub seed: u32,
}

impl RangeParams {
    pub const fn new(multiplier: f64, seed: u32) -> Self {
        Self { multiplier, seed }
    }
}

pub fn range_params(range: TimeRange, domain: Domain) -> RangeParams {
    let (multiplier, base_seed) = match range {
        TimeRange::Day => (DAY_MULTIPLIER, DAY_SEED),
        TimeRange::Week => (WEEK_MULTIPLIER, WEEK_SEED),
        TimeRange::Month => (LONG_WINDOW_MULTIPLIER, MONTH_SEED),
        TimeRange::Quarter => (LONG_WINDOW_MULTIPLIER, QUARTER_SEED),
        TimeRange::MonthToDate => (LONG_WINDOW_MULTIPLIER, MONTH_TO_DATE_SEED),
        TimeRange::QuarterToDate => (LONG_WINDOW_MULTIPLIER, QUARTER_TO_DATE_SEED),
        TimeRange::YearToDate => (LONG_WINDOW_MULTIPLIER, YEAR_TO_DATE_SEED),
        TimeRange::Custom => (LONG_WINDOW_MULTIPLIER, CUSTOM_SEED),
    };
    RangeParams::new(multiplier, base_seed + domain.seed_offset())
}

/// Like [`range_params`] for a raw token; unknown tokens get the `30d` parameters.
pub fn range_params_lenient(value: &str, domain: Domain) -> RangeParams {
    let range = value.parse::<TimeRange>().unwrap_or(TimeRange::Month);
    range_params(range, domain)
}
