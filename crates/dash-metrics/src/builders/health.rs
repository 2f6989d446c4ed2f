//! Campaign health checks ("guardian" view): each campaign is classified by how far
//! its ROAS falls below target and whether spend is pacing over budget.

use serde::{Deserialize, Serialize};

use super::{ratio, sort_by_label, sort_by_metric, DashboardRow, MetricBuilder, SortDirection};
use crate::format::{format_currency, format_percent, format_ratio, FormatterCache};
use crate::synth::{seeded, Domain, RangeParams};

pub const DEFAULT_TARGET_ROAS: f64 = 3.0;

const CRITICAL_ROAS_SHARE: f64 = 0.5;
const WARNING_ROAS_SHARE: f64 = 0.85;
const OVERSPEND_PACING: f64 = 1.15;

// (campaign, daily budget, target ROAS)
const CAMPAIGNS: [(&str, f64, f64); 7] = [
    ("Brand Search", 4_200.0, 6.0),
    ("Generic Search", 7_800.0, 3.2),
    ("Shopping Feed", 9_500.0, 4.0),
    ("Prospecting Video", 5_100.0, 1.8),
    ("Retargeting", 3_300.0, 5.5),
    ("Performance Max", 11_000.0, 3.5),
    ("Marketplace Promoted", 2_600.0, 4.5),
];

pub const DEFAULT_ROWS: usize = CAMPAIGNS.len();

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Healthy,
}

impl Severity {
    pub fn classify(roas: f64, target_roas: f64, pacing: f64) -> Self {
        if roas < target_roas * CRITICAL_ROAS_SHARE {
            Self::Critical
        } else if roas < target_roas * WARNING_ROAS_SHARE || pacing > OVERSPEND_PACING {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Healthy => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Healthy => "healthy",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignHealth {
    pub campaign: String,
    pub budget: f64,
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub target_roas: f64,
    pub pacing: f64,
    pub severity: Severity,
}

impl CampaignHealth {
    pub fn from_base(
        campaign: String,
        budget: f64,
        spend: f64,
        revenue: f64,
        target_roas: f64,
    ) -> Self {
        let roas = ratio(revenue, spend);
        let pacing = ratio(spend, budget);
        Self {
            campaign,
            budget,
            spend,
            revenue,
            roas,
            target_roas,
            pacing,
            severity: Severity::classify(roas, target_roas, pacing),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HealthBuilder;

impl MetricBuilder for HealthBuilder {
    type Record = CampaignHealth;

    const DOMAIN: Domain = Domain::Guardian;
    const TABLE: &'static str = "campaigns";

    fn from_row(&self, index: usize, row: &DashboardRow) -> CampaignHealth {
        let spend = row.metric("spend", 0.0);
        CampaignHealth::from_base(
            row.dimension("campaign", &format!("Campaign {}", index + 1)),
            row.metric("budget", spend),
            spend,
            row.metric("revenue", 0.0),
            row.metric("target_roas", DEFAULT_TARGET_ROAS),
        )
    }

    fn synthesize(&self, index: usize, params: RangeParams) -> CampaignHealth {
        let RangeParams { multiplier, seed } = params;
        let (name, base_budget, target_roas) = CAMPAIGNS[index % CAMPAIGNS.len()];
        let campaign = match index / CAMPAIGNS.len() {
            0 => name.to_string(),
            round => format!("{name} #{}", round + 1),
        };

        let budget = base_budget * multiplier;
        let spend = budget * (0.6 + 0.7 * seeded(index, seed));
        let revenue = spend * target_roas * (0.35 + 0.9 * seeded(index + 5, seed));

        CampaignHealth::from_base(campaign, budget, spend, revenue, target_roas)
    }

    fn headline(&self, record: &CampaignHealth) -> f64 {
        record.spend
    }

    fn render(
        &self,
        record: &CampaignHealth,
        cache: &FormatterCache,
        locale: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("campaign", record.campaign.clone()),
            ("severity", record.severity.as_str().to_string()),
            ("spend", format_currency(cache, record.spend, locale)),
            ("roas", format_ratio(cache, record.roas, locale)),
            ("target_roas", format_ratio(cache, record.target_roas, locale)),
            ("pacing", format_percent(cache, record.pacing, locale)),
        ]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HealthSort {
    IssuesFirst,
    Campaign,
    Spend,
    Roas,
}

pub fn sort_campaigns(records: &mut [CampaignHealth], by: HealthSort, direction: SortDirection) {
    match by {
        HealthSort::IssuesFirst => records.sort_by(|a, b| {
            direction.apply(a.severity.rank().cmp(&b.severity.rank()))
        }),
        HealthSort::Campaign => sort_by_label(records, direction, |r| r.campaign.as_str()),
        HealthSort::Spend => sort_by_metric(records, direction, |r| r.spend),
        HealthSort::Roas => sort_by_metric(records, direction, |r| r.roas),
    }
}

/// Critical first, then warnings, then healthy; ties keep their input order.
pub fn sort_issues_first(records: &mut [CampaignHealth]) {
    sort_campaigns(records, HealthSort::IssuesFirst, SortDirection::Ascending);
}
