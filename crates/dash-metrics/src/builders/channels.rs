use serde::{Deserialize, Serialize};

use super::{ratio, sort_by_label, sort_by_metric, DashboardRow, MetricBuilder, SortDirection};
use crate::format::{format_currency, format_number, format_percent, format_ratio, FormatterCache};
use crate::synth::{jitter, Domain, RangeParams};

const CHANNELS: [(&str, f64); 6] = [
    ("Google Ads", 18_500.0),
    ("Meta Ads", 14_200.0),
    ("Allegro Ads", 9_800.0),
    ("TikTok Ads", 6_400.0),
    ("Microsoft Ads", 3_100.0),
    ("Criteo", 2_700.0),
];

pub const DEFAULT_ROWS: usize = CHANNELS.len();

const BASE_ROAS: f64 = 3.4;
const BASE_AOV: f64 = 210.0;
const BASE_CPC: f64 = 1.9;
const BASE_CTR: f64 = 0.018;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelPerformance {
    pub channel: String,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub conversions: f64,
    pub cpa: f64,
    pub clicks: f64,
    pub impressions: f64,
    pub ctr: f64,
}

impl ChannelPerformance {
    pub fn from_base(
        channel: String,
        spend: f64,
        revenue: f64,
        conversions: f64,
        clicks: f64,
        impressions: f64,
    ) -> Self {
        Self {
            channel,
            spend,
            revenue,
            roas: ratio(revenue, spend),
            conversions,
            cpa: ratio(spend, conversions),
            clicks,
            impressions,
            ctr: ratio(clicks, impressions),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelBuilder;

impl MetricBuilder for ChannelBuilder {
    type Record = ChannelPerformance;

    const DOMAIN: Domain = Domain::Ads;
    const TABLE: &'static str = "channels";

    fn from_row(&self, index: usize, row: &DashboardRow) -> ChannelPerformance {
        ChannelPerformance::from_base(
            row.dimension("channel", &format!("Channel {}", index + 1)),
            row.metric("spend", 0.0),
            row.metric("revenue", 0.0),
            row.metric("conversions", 0.0),
            row.metric("clicks", 0.0),
            row.metric("impressions", 0.0),
        )
    }

    fn synthesize(&self, index: usize, params: RangeParams) -> ChannelPerformance {
        let RangeParams { multiplier, seed } = params;
        let (name, base_spend) = CHANNELS[index % CHANNELS.len()];
        let channel = match index / CHANNELS.len() {
            0 => name.to_string(),
            round => format!("{name} #{}", round + 1),
        };

        let spend = base_spend * multiplier * (1.0 + jitter(index, seed, 0, 0.25));
        let revenue = spend * BASE_ROAS * (1.0 + jitter(index, seed, 5, 0.35));
        let clicks = (spend / (BASE_CPC * (1.0 + jitter(index, seed, 11, 0.2)))).round();
        let impressions = (clicks / (BASE_CTR * (1.0 + jitter(index, seed, 17, 0.3)))).round();
        let conversions = (revenue / (BASE_AOV * (1.0 + jitter(index, seed, 23, 0.15)))).round();

        ChannelPerformance::from_base(channel, spend, revenue, conversions, clicks, impressions)
    }

    fn headline(&self, record: &ChannelPerformance) -> f64 {
        record.revenue
    }

    fn render(
        &self,
        record: &ChannelPerformance,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("channel", record.channel.clone()),
            ("spend", format_currency(cache, record.spend, locale)),
            ("revenue", format_currency(cache, record.revenue, locale)),
            ("roas", format_ratio(cache, record.roas, locale)),
            ("conversions", format_number(cache, record.conversions, locale)),
            ("cpa", format_currency(cache, record.cpa, locale)),
            ("ctr", format_percent(cache, record.ctr, locale)),
        ]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelSort {
    Channel,
    Spend,
    Revenue,
    Roas,
    Conversions,
    Cpa,
}

pub fn sort_channels(records: &mut [ChannelPerformance], by: ChannelSort, direction: SortDirection) {
    match by {
        ChannelSort::Channel => sort_by_label(records, direction, |r| r.channel.as_str()),
        ChannelSort::Spend => sort_by_metric(records, direction, |r| r.spend),
        ChannelSort::Revenue => sort_by_metric(records, direction, |r| r.revenue),
        ChannelSort::Roas => sort_by_metric(records, direction, |r| r.roas),
        ChannelSort::Conversions => sort_by_metric(records, direction, |r| r.conversions),
        ChannelSort::Cpa => sort_by_metric(records, direction, |r| r.cpa),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChannelTotals {
    pub spend: f64,
    pub revenue: f64,
    pub conversions: f64,
    pub roas: f64,
    pub cpa: f64,
}

impl ChannelTotals {
    pub fn from_records(records: &[ChannelPerformance]) -> Self {
        let spend: f64 = records.iter().map(|r| r.spend).sum();
        let revenue: f64 = records.iter().map(|r| r.revenue).sum();
        let conversions: f64 = records.iter().map(|r| r.conversions).sum();
        Self {
            spend,
            revenue,
            conversions,
            roas: ratio(revenue, spend),
            cpa: ratio(spend, conversions),
        }
    }
}
