use std::fs;

use clap::Parser;
use futures::future::join_all;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dash_metrics::cli::{
    parse_as_of, parse_domains, validate_count, validate_label, Args, Command, FormatKind,
};
use dash_metrics::config::{load_config, DashboardConfig, ResolvedLabels};
use dash_metrics::error::MetricsResult;
use dash_metrics::format::{
    format_compact_currency, format_currency, format_number, format_percent, format_ratio,
    format_signed_percent, FormatterCache, DISPLAY_CURRENCY,
};
use dash_metrics::report::ViewReport;
use dash_metrics::source::{DashboardSource, FixtureSource, RequestGeneration, UnavailableSource};
use dash_metrics::synth::{range_params, Domain, TimeRange};
use dash_metrics::views::{run_view, ViewRequest};

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> MetricsResult<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => DashboardConfig::default(),
    }
    .with_locale(args.locale.clone());
    config.validate()?;

    let labels = config.labels.resolve();
    let cache = FormatterCache::new(config.formatter_cache_limit)
        .with_placeholder(labels.placeholder.as_str());
    info!(
        locale = %config.locale,
        cache_limit = config.formatter_cache_limit,
        "configuration loaded"
    );

    match args.command {
        Command::Ranges { domain } => {
            let domain: Domain = domain.parse()?;
            println!("range\tmultiplier\tseed");
            for range in TimeRange::ALL {
                let params = range_params(range, domain);
                println!("{range}\t{}\t{}", params.multiplier, params.seed);
            }
        }
        Command::Generate {
            domain,
            range,
            count,
            as_of,
            label,
            out,
        } => {
            validate_label(&label)?;
            validate_count(count)?;
            let domains = parse_domains(&domain)?;
            let range = match range {
                Some(value) => value.parse::<TimeRange>()?,
                None => config.default_range,
            };
            let as_of = parse_as_of(as_of.as_deref())?;
            let requests: Vec<ViewRequest<'_>> = domains
                .iter()
                .map(|&domain| ViewRequest {
                    domain,
                    range,
                    count,
                    as_of,
                    locale: &config.locale,
                    label: &label,
                })
                .collect();

            let reports = match &args.fixtures_dir {
                Some(dir) => {
                    generate_all(&FixtureSource::new(dir), &requests, &cache, &labels).await?
                }
                None => {
                    let source = UnavailableSource::new("no fixtures directory configured");
                    generate_all(&source, &requests, &cache, &labels).await?
                }
            };

            let payload = match reports.as_slice() {
                [single] => serde_json::to_vec_pretty(single)?,
                many => serde_json::to_vec_pretty(many)?,
            };
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&path, payload)?;
                    println!("wrote report: {}", path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&payload)),
            }
        }
        Command::Format { kind, value } => {
            let locale = config.locale.as_str();
            let text = match kind {
                FormatKind::Percent => format_percent(&cache, value, locale),
                FormatKind::SignedPercent => format_signed_percent(&cache, value, locale),
                FormatKind::Ratio => format_ratio(&cache, value, locale),
                FormatKind::Currency => format_currency(&cache, value, locale),
                FormatKind::CompactCurrency => format_compact_currency(&cache, value, locale),
                FormatKind::Number => format_number(&cache, value, locale),
            };
            println!("{text}");
        }
        Command::Doctor => {
            println!("dash-metrics doctor");
            println!("locale={}", config.locale);
            println!("display_currency={DISPLAY_CURRENCY}");
            println!("formatter_cache_limit={}", config.formatter_cache_limit);
            println!("default_range={}", config.default_range);
            println!(
                "fixtures_dir={}",
                args.fixtures_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("label_placeholder={}", labels.placeholder);
            println!("label_synthetic_badge={}", labels.synthetic_badge);
            println!("label_no_data={}", labels.no_data);
            println!("label_fetch_error={}", labels.fetch_error);
        }
    }

    Ok(())
}

async fn generate_all<S: DashboardSource>(
    source: &S,
    requests: &[ViewRequest<'_>],
    cache: &FormatterCache,
    labels: &ResolvedLabels,
) -> MetricsResult<Vec<ViewReport>> {
    // Each view owns its request counter; sharing one would mark all but the last stale.
    let generations: Vec<RequestGeneration> =
        requests.iter().map(|_| RequestGeneration::new()).collect();
    let results = join_all(
        requests
            .iter()
            .zip(&generations)
            .map(|(request, generation)| run_view(source, request, cache, labels, generation)),
    )
    .await;

    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        if let Some(report) = result? {
            reports.push(report);
        }
    }
    Ok(reports)
}
