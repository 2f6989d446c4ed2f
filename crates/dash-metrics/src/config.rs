use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::format::{Locale, DEFAULT_CACHE_LIMIT, FALLBACK};
use crate::synth::TimeRange;

pub const DEFAULT_LOCALE: &str = "pl-PL";
pub const DEFAULT_SYNTHETIC_BADGE: &str = "Demo data";
pub const DEFAULT_NO_DATA: &str = "No data for the selected period";
pub const DEFAULT_FETCH_ERROR: &str = "Live data unavailable, showing demo data";

/// Translatable view strings. Every field is optional; see [`ViewLabels::resolve`]
/// for the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewLabels {
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub synthetic_badge: Option<String>,
    #[serde(default)]
    pub no_data: Option<String>,
    #[serde(default)]
    pub fetch_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLabels {
    pub placeholder: String,
    pub synthetic_badge: String,
    pub no_data: String,
    pub fetch_error: String,
}

impl ViewLabels {
    pub fn resolve(&self) -> ResolvedLabels {
        fn pick(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        ResolvedLabels {
            placeholder: pick(&self.placeholder, FALLBACK),
            synthetic_badge: pick(&self.synthetic_badge, DEFAULT_SYNTHETIC_BADGE),
            no_data: pick(&self.no_data, DEFAULT_NO_DATA),
            fetch_error: pick(&self.fetch_error, DEFAULT_FETCH_ERROR),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub locale: String,
    pub formatter_cache_limit: usize,
    pub default_range: TimeRange,
    pub labels: ViewLabels,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            formatter_cache_limit: DEFAULT_CACHE_LIMIT,
            default_range: TimeRange::default(),
            labels: ViewLabels::default(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> MetricsResult<()> {
        Locale::parse(&self.locale)?;
        if self.formatter_cache_limit == 0 {
            return Err(MetricsError::InvalidArgument(
                "formatter_cache_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        if let Some(locale) = locale {
            self.locale = locale;
        }
        self
    }
}

pub fn load_config(path: impl AsRef<Path>) -> MetricsResult<DashboardConfig> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let config = serde_yaml::from_slice::<DashboardConfig>(&bytes).map_err(|error| {
        MetricsError::InvalidArgument(format!("invalid config '{}': {error}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
