//! Per-domain view assembly: pick the builder, load data, order rows, render a report.

use chrono::NaiveDate;

use crate::builders::channels::{self, sort_channels, ChannelBuilder, ChannelSort};
use crate::builders::cohorts::{self, CohortBuilder, DEFAULT_RETENTION_MONTHS};
use crate::builders::health::{self, sort_issues_first, HealthBuilder};
use crate::builders::products::{self, sort_products, ProductBuilder, ProductSort};
use crate::builders::series::DailySeriesBuilder;
use crate::builders::{MetricBuilder, SortDirection};
use crate::config::ResolvedLabels;
use crate::error::MetricsResult;
use crate::format::FormatterCache;
use crate::report::{build_report, ReportMeta, ViewReport};
use crate::source::{load_view, DashboardSource, RequestGeneration};
use crate::synth::{Domain, TimeRange};

#[derive(Clone, Copy, Debug)]
pub struct ViewRequest<'a> {
    pub domain: Domain,
    pub range: TimeRange,
    pub count: Option<usize>,
    pub as_of: NaiveDate,
    pub locale: &'a str,
    pub label: &'a str,
}

pub fn default_row_count(domain: Domain, range: TimeRange, as_of: NaiveDate) -> usize {
    match domain {
        Domain::Ads => channels::DEFAULT_ROWS,
        Domain::Customers => cohorts::DEFAULT_ROWS,
        Domain::Guardian => health::DEFAULT_ROWS,
        Domain::Products => products::DEFAULT_ROWS,
        Domain::Overview => range.days(as_of),
    }
}

/// Builds the report for one domain. `None` means the request was superseded.
pub async fn run_view<S: DashboardSource>(
    source: &S,
    request: &ViewRequest<'_>,
    cache: &FormatterCache,
    labels: &ResolvedLabels,
    generation: &RequestGeneration,
) -> MetricsResult<Option<ViewReport>> {
    let ctx = ViewContext {
        request,
        cache,
        labels,
        generation,
    };
    match request.domain {
        Domain::Ads => {
            ctx.produce(source, &ChannelBuilder, |rows| {
                sort_channels(rows, ChannelSort::Revenue, SortDirection::Descending)
            })
            .await
        }
        Domain::Customers => {
            let builder = CohortBuilder::new(request.as_of, DEFAULT_RETENTION_MONTHS);
            ctx.produce(source, &builder, |_| {}).await
        }
        Domain::Guardian => ctx.produce(source, &HealthBuilder, sort_issues_first).await,
        Domain::Products => {
            ctx.produce(source, &ProductBuilder, |rows| {
                sort_products(rows, ProductSort::Profit, SortDirection::Descending)
            })
            .await
        }
        Domain::Overview => {
            let builder = DailySeriesBuilder::new(request.as_of, request.range);
            ctx.produce(source, &builder, |_| {}).await
        }
    }
}

struct ViewContext<'a> {
    request: &'a ViewRequest<'a>,
    cache: &'a FormatterCache,
    labels: &'a ResolvedLabels,
    generation: &'a RequestGeneration,
}

impl ViewContext<'_> {
    async fn produce<S, B, F>(
        &self,
        source: &S,
        builder: &B,
        arrange: F,
    ) -> MetricsResult<Option<ViewReport>>
    where
        S: DashboardSource,
        B: MetricBuilder,
        F: FnOnce(&mut [B::Record]),
    {
        let request = self.request;
        let count = request
            .count
            .unwrap_or_else(|| default_row_count(request.domain, request.range, request.as_of));

        let Some(mut view) =
            load_view(source, builder, request.range, count, self.generation).await
        else {
            return Ok(None);
        };
        arrange(view.table.records.as_mut_slice());

        let meta = ReportMeta {
            label: request.label,
            locale: request.locale,
            as_of: request.as_of,
            labels: self.labels,
        };
        build_report(builder, &view, self.cache, meta).map(Some)
    }
}
