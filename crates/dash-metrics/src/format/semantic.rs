//! Dashboard-level formatting helpers. Each one pins the options for its meaning
//! and returns the cache's placeholder ([`FALLBACK`] unless configured) instead of
//! rendering `NaN` or infinities.

use tracing::warn;

use super::cache::FormatterCache;
use super::options::{NumberFormatOptions, SignDisplay};

pub const FALLBACK: &str = "—";

/// Amounts are always shown in this currency, whatever the UI language.
pub const DISPLAY_CURRENCY: &str = "PLN";

fn try_render(
    cache: &FormatterCache,
    value: f64,
    locale: &str,
    options: NumberFormatOptions,
) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    match cache.get(locale, &options) {
        Ok(formatter) => Some(formatter.format(value)),
        Err(error) => {
            warn!(locale, %error, "number formatter unavailable");
            None
        }
    }
}

fn render(cache: &FormatterCache, value: f64, locale: &str, options: NumberFormatOptions) -> String {
    try_render(cache, value, locale, options).unwrap_or_else(|| cache.placeholder().to_string())
}

/// `value` is a fraction: `0.125` renders as `12.5%`.
pub fn format_percent(cache: &FormatterCache, value: f64, locale: &str) -> String {
    render(
        cache,
        value,
        locale,
        NumberFormatOptions::percent().with_fraction_digits(0, 1),
    )
}

pub fn format_signed_percent(cache: &FormatterCache, value: f64, locale: &str) -> String {
    render(
        cache,
        value,
        locale,
        NumberFormatOptions::percent()
            .with_fraction_digits(0, 1)
            .with_sign_display(SignDisplay::ExceptZero),
    )
}

/// Multiplier-style ratios such as ROAS: `3.2` renders as `3.20x`.
pub fn format_ratio(cache: &FormatterCache, value: f64, locale: &str) -> String {
    try_render(
        cache,
        value,
        locale,
        NumberFormatOptions::decimal().with_fraction_digits(2, 2),
    )
    .map(|number| format!("{number}x"))
    .unwrap_or_else(|| cache.placeholder().to_string())
}

pub fn format_currency(cache: &FormatterCache, value: f64, locale: &str) -> String {
    render(
        cache,
        value,
        locale,
        NumberFormatOptions::currency(DISPLAY_CURRENCY).with_max_fraction_digits(0),
    )
}

pub fn format_compact_currency(cache: &FormatterCache, value: f64, locale: &str) -> String {
    render(
        cache,
        value,
        locale,
        NumberFormatOptions::currency(DISPLAY_CURRENCY).compact(),
    )
}

pub fn format_number(cache: &FormatterCache, value: f64, locale: &str) -> String {
    render(
        cache,
        value,
        locale,
        NumberFormatOptions::decimal().with_max_fraction_digits(0),
    )
}
