//! Boundary to the upstream dashboard API and the fetch-then-build flow.
//!
//! A failed fetch is treated as "no real data": the view is still built from the
//! synthetic generator and the error is handed back for display. Responses for
//! a superseded request are dropped before any builder sees them.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::builders::{BuiltTable, DashboardResponse, MetricBuilder};
use crate::error::{MetricsError, MetricsResult};
use crate::synth::{range_params, Domain, RangeParams, TimeRange};

pub trait DashboardSource {
    fn fetch(
        &self,
        domain: Domain,
        range: TimeRange,
    ) -> impl Future<Output = MetricsResult<DashboardResponse>> + Send;
}

/// Reads recorded API responses from `<root>/<domain>/<range>.json`.
#[derive(Clone, Debug)]
pub struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, domain: Domain, range: TimeRange) -> PathBuf {
        self.root
            .join(domain.as_str())
            .join(format!("{}.json", range.as_str()))
    }
}

impl DashboardSource for FixtureSource {
    fn fetch(
        &self,
        domain: Domain,
        range: TimeRange,
    ) -> impl Future<Output = MetricsResult<DashboardResponse>> + Send {
        let path = self.path_for(domain, range);
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|error| {
                if error.kind() == ErrorKind::NotFound {
                    MetricsError::SourceUnavailable(format!(
                        "no recorded response at {}",
                        path.display()
                    ))
                } else {
                    MetricsError::Io(error)
                }
            })?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}

/// Source that always fails; used when no upstream is configured.
#[derive(Clone, Debug)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl DashboardSource for UnavailableSource {
    fn fetch(
        &self,
        _domain: Domain,
        _range: TimeRange,
    ) -> impl Future<Output = MetricsResult<DashboardResponse>> + Send {
        let reason = self.reason.clone();
        async move { Err(MetricsError::SourceUnavailable(reason)) }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestToken(u64);

/// Monotonic request counter; only the most recently issued token is current.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }
}

#[derive(Clone, Debug)]
pub struct LoadedView<R> {
    pub domain: Domain,
    pub range: TimeRange,
    pub params: RangeParams,
    pub table: BuiltTable<R>,
    pub fetch_error: Option<String>,
}

/// Fetches rows for `builder`'s domain and builds the table. Returns `None` when a
/// newer request was issued on `generation` while this one was in flight.
pub async fn load_view<S, B>(
    source: &S,
    builder: &B,
    range: TimeRange,
    count: usize,
    generation: &RequestGeneration,
) -> Option<LoadedView<B::Record>>
where
    S: DashboardSource,
    B: MetricBuilder,
{
    let token = generation.begin();
    let params = range_params(range, B::DOMAIN);
    let fetched = source.fetch(B::DOMAIN, range).await;

    if !generation.is_current(token) {
        debug!(domain = %B::DOMAIN, range = %range, "discarding stale response");
        return None;
    }

    let (table, fetch_error) = match fetched {
        Ok(response) => (
            builder.build(Some(response.table(B::TABLE)), count, params),
            None,
        ),
        Err(error) => {
            warn!(domain = %B::DOMAIN, range = %range, %error, "fetch failed, using synthetic data");
            (builder.build(None, count, params), Some(error.to_string()))
        }
    };

    Some(LoadedView {
        domain: B::DOMAIN,
        range,
        params,
        table,
        fetch_error,
    })
}
