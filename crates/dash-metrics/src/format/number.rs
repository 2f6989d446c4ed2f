use serde::Serialize;

use super::locale::{currency_digits, validate_currency_code, CurrencyPosition, Locale, LocaleSymbols};
use super::options::{CurrencyDisplay, Notation, NumberFormatOptions, NumberStyle, SignDisplay};
use crate::error::{MetricsError, MetricsResult};

pub const MAX_FRACTION_DIGITS: u8 = 20;

const COMPACT_THRESHOLDS: [f64; 4] = [1e3, 1e6, 1e9, 1e12];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub locale: String,
    pub style: NumberStyle,
    pub currency: Option<String>,
    pub currency_display: CurrencyDisplay,
    pub minimum_fraction_digits: u8,
    pub maximum_fraction_digits: u8,
    pub notation: Notation,
    pub sign_display: SignDisplay,
    pub use_grouping: bool,
}

/// Immutable formatter bound to one locale and one option set.
#[derive(Debug)]
pub struct NumberFormatter {
    symbols: LocaleSymbols,
    resolved: ResolvedOptions,
    currency_symbol: Option<String>,
    compact_auto_digits: bool,
}

impl NumberFormatter {
    pub fn new(locale: &str, options: &NumberFormatOptions) -> MetricsResult<Self> {
        let locale = Locale::parse(locale)?;
        let style = options.style.unwrap_or_default();
        let notation = options.notation.unwrap_or_default();

        let currency = match (style, options.currency.as_deref()) {
            (NumberStyle::Currency, None) => {
                return Err(MetricsError::InvalidFormatOptions(
                    "currency code is required with currency style".to_string(),
                ))
            }
            (_, Some(code)) => Some(validate_currency_code(code)?),
            (_, None) => None,
        };

        let (default_min, default_max) = match (style, currency.as_deref()) {
            (NumberStyle::Currency, Some(code)) => {
                let digits = currency_digits(code);
                (digits, digits)
            }
            (NumberStyle::Percent, _) => (0, 0),
            _ => (0, 3),
        };
        let (min, max) = match (
            options.minimum_fraction_digits,
            options.maximum_fraction_digits,
        ) {
            (None, None) => (default_min, default_max),
            (Some(min), None) => (min, default_max.max(min)),
            (None, Some(max)) => (default_min.min(max), max),
            (Some(min), Some(max)) if min > max => {
                return Err(MetricsError::InvalidFormatOptions(format!(
                    "minimumFractionDigits {min} exceeds maximumFractionDigits {max}"
                )))
            }
            (Some(min), Some(max)) => (min, max),
        };
        if max > MAX_FRACTION_DIGITS {
            return Err(MetricsError::InvalidFormatOptions(format!(
                "fraction digits must be at most {MAX_FRACTION_DIGITS}, got {max}"
            )));
        }

        let currency_display = options.currency_display.unwrap_or_default();
        let currency_symbol = match (style, currency.as_deref()) {
            (NumberStyle::Currency, Some(code)) => Some(match currency_display {
                CurrencyDisplay::Code => code.to_string(),
                CurrencyDisplay::Symbol => locale.currency_symbol(code, false),
                CurrencyDisplay::NarrowSymbol => locale.currency_symbol(code, true),
            }),
            _ => None,
        };

        let compact_auto_digits = notation == Notation::Compact
            && options.minimum_fraction_digits.is_none()
            && options.maximum_fraction_digits.is_none();

        Ok(Self {
            symbols: locale.symbols(),
            resolved: ResolvedOptions {
                locale: locale.tag().to_string(),
                style,
                currency,
                currency_display,
                minimum_fraction_digits: min,
                maximum_fraction_digits: max,
                notation,
                sign_display: options.sign_display.unwrap_or_default(),
                use_grouping: options.use_grouping.unwrap_or(true),
            },
            currency_symbol,
            compact_auto_digits,
        })
    }

    pub fn resolved_options(&self) -> &ResolvedOptions {
        &self.resolved
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }

        let negative = value < 0.0;
        let magnitude = match self.resolved.style {
            NumberStyle::Percent => value.abs() * 100.0,
            _ => value.abs(),
        };

        let (body, is_zero) = if magnitude.is_infinite() {
            ("∞".to_string(), false)
        } else {
            match self.resolved.notation {
                Notation::Standard => {
                    let (min, max) = (
                        self.resolved.minimum_fraction_digits,
                        self.resolved.maximum_fraction_digits,
                    );
                    self.digits(magnitude, min, max)
                }
                Notation::Compact => self.compact(magnitude),
            }
        };

        let sign = match self.resolved.sign_display {
            SignDisplay::Auto if negative && !is_zero => "-",
            SignDisplay::Always if negative => "-",
            SignDisplay::Always => "+",
            SignDisplay::ExceptZero if is_zero => "",
            SignDisplay::ExceptZero if negative => "-",
            SignDisplay::ExceptZero => "+",
            _ => "",
        };

        match (self.resolved.style, self.currency_symbol.as_deref()) {
            (NumberStyle::Percent, _) => format!("{sign}{body}{}", self.symbols.percent_suffix),
            (NumberStyle::Currency, Some(symbol)) => match self.symbols.currency_position {
                CurrencyPosition::Prefix if symbol.chars().all(char::is_alphabetic) => {
                    format!("{sign}{symbol}\u{a0}{body}")
                }
                CurrencyPosition::Prefix => format!("{sign}{symbol}{body}"),
                CurrencyPosition::Suffix => format!("{sign}{body}\u{a0}{symbol}"),
            },
            _ => format!("{sign}{body}"),
        }
    }

    fn compact(&self, magnitude: f64) -> (String, bool) {
        let mut unit = COMPACT_THRESHOLDS
            .iter()
            .rposition(|threshold| magnitude >= *threshold);

        loop {
            let scaled = unit.map_or(magnitude, |i| magnitude / COMPACT_THRESHOLDS[i]);
            let (min, max) = if self.compact_auto_digits {
                (0, compact_fraction_digits(scaled))
            } else {
                (
                    self.resolved.minimum_fraction_digits,
                    self.resolved.maximum_fraction_digits,
                )
            };

            // 999_950 rounds to "1000K"; promote it to "1M".
            let rounded = format!("{:.*}", usize::from(max), scaled)
                .parse::<f64>()
                .unwrap_or(scaled);
            let next = unit.map_or(0, |i| i + 1);
            if rounded >= 1000.0 && next < COMPACT_THRESHOLDS.len() {
                unit = Some(next);
                continue;
            }

            let (body, is_zero) = self.digits(scaled, min, max);
            let suffix = unit.map_or("", |i| self.symbols.compact_suffixes[i]);
            return (format!("{body}{suffix}"), is_zero);
        }
    }

    fn digits(&self, magnitude: f64, min: u8, max: u8) -> (String, bool) {
        let fixed = format!("{:.*}", usize::from(max), magnitude);
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > usize::from(min) && fraction.ends_with('0') {
            fraction.pop();
        }
        let is_zero = integer.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');

        let mut out = self.group(integer);
        if !fraction.is_empty() {
            out.push_str(self.symbols.decimal);
            out.push_str(&fraction);
        }
        (out, is_zero)
    }

    fn group(&self, integer: &str) -> String {
        if !self.resolved.use_grouping || integer.len() < 3 + self.symbols.min_grouping_digits {
            return integer.to_string();
        }
        let mut out = String::with_capacity(integer.len() + integer.len() / 3 * 3);
        let lead = integer.len() % 3;
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push_str(self.symbols.group);
            }
            out.push(ch);
        }
        out
    }
}

// Roughly two significant digits, never dropping integer digits.
fn compact_fraction_digits(scaled: f64) -> u8 {
    if scaled >= 10.0 {
        0
    } else if scaled >= 1.0 {
        1
    } else {
        2
    }
}
