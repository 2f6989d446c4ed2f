//! Locale tag validation and the per-language number symbols used by the formatter.

use crate::error::{MetricsError, MetricsResult};

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrencyPosition {
    Prefix,
    Suffix,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LocaleSymbols {
    pub group: &'static str,
    pub decimal: &'static str,
    /// Integer digits required before grouping kicks in is `min_grouping_digits + 3`.
    pub min_grouping_digits: usize,
    pub percent_suffix: &'static str,
    pub currency_position: CurrencyPosition,
    /// Thousand, million, billion, trillion.
    pub compact_suffixes: [&'static str; 4],
}

const EN: LocaleSymbols = LocaleSymbols {
    group: ",",
    decimal: ".",
    min_grouping_digits: 1,
    percent_suffix: "%",
    currency_position: CurrencyPosition::Prefix,
    compact_suffixes: ["K", "M", "B", "T"],
};

const PL: LocaleSymbols = LocaleSymbols {
    group: NBSP,
    decimal: ",",
    min_grouping_digits: 2,
    percent_suffix: "%",
    currency_position: CurrencyPosition::Suffix,
    compact_suffixes: ["\u{a0}tys.", "\u{a0}mln", "\u{a0}mld", "\u{a0}bln"],
};

const DE: LocaleSymbols = LocaleSymbols {
    group: ".",
    decimal: ",",
    min_grouping_digits: 1,
    percent_suffix: "\u{a0}%",
    currency_position: CurrencyPosition::Suffix,
    compact_suffixes: ["\u{a0}Tsd.", "\u{a0}Mio.", "\u{a0}Mrd.", "\u{a0}Bio."],
};

const FR: LocaleSymbols = LocaleSymbols {
    group: NARROW_NBSP,
    decimal: ",",
    min_grouping_digits: 1,
    percent_suffix: "\u{a0}%",
    currency_position: CurrencyPosition::Suffix,
    compact_suffixes: ["\u{a0}k", "\u{a0}M", "\u{a0}Md", "\u{a0}Bn"],
};

const ES: LocaleSymbols = LocaleSymbols {
    group: ".",
    decimal: ",",
    min_grouping_digits: 2,
    percent_suffix: "\u{a0}%",
    currency_position: CurrencyPosition::Suffix,
    compact_suffixes: ["\u{a0}mil", "\u{a0}M", "\u{a0}mil\u{a0}M", "\u{a0}B"],
};

/// A syntactically valid BCP-47 tag in canonical casing.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Locale {
    tag: String,
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn parse(tag: &str) -> MetricsResult<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(MetricsError::InvalidLocale(
                "locale must not be empty".to_string(),
            ));
        }

        let mut subtags = trimmed.split('-');
        let language = subtags.next().unwrap_or_default();
        let language_ok = matches!(language.len(), 2 | 3 | 5..=8)
            && language.bytes().all(|b| b.is_ascii_alphabetic());
        if !language_ok {
            return Err(MetricsError::InvalidLocale(format!(
                "'{tag}' has an invalid language subtag"
            )));
        }

        let mut parts = vec![language.to_ascii_lowercase()];
        let mut region = None;
        for (position, subtag) in subtags.enumerate() {
            if subtag.is_empty()
                || subtag.len() > 8
                || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(MetricsError::InvalidLocale(format!(
                    "'{tag}' has an invalid subtag '{subtag}'"
                )));
            }
            let is_alpha = subtag.bytes().all(|b| b.is_ascii_alphabetic());
            let is_digit = subtag.bytes().all(|b| b.is_ascii_digit());
            let canonical = if position == 0 && subtag.len() == 4 && is_alpha {
                let mut script = subtag.to_ascii_lowercase();
                script[..1].make_ascii_uppercase();
                script
            } else if region.is_none()
                && ((subtag.len() == 2 && is_alpha) || (subtag.len() == 3 && is_digit))
            {
                let upper = subtag.to_ascii_uppercase();
                region = Some(upper.clone());
                upper
            } else {
                subtag.to_ascii_lowercase()
            };
            parts.push(canonical);
        }

        Ok(Self {
            tag: parts.join("-"),
            language: parts[0].clone(),
            region,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Unknown languages use English symbols, as platform formatters fall back to
    /// their default locale.
    pub fn symbols(&self) -> LocaleSymbols {
        match self.language.as_str() {
            "pl" => PL,
            "de" => DE,
            "fr" => FR,
            "es" => ES,
            _ => EN,
        }
    }

    pub fn currency_symbol(&self, code: &str, narrow: bool) -> String {
        match code {
            "PLN" if self.language == "pl" || narrow => "zł".to_string(),
            "USD" if narrow || self.region.as_deref() == Some("US") => "$".to_string(),
            "USD" if self.language == "en" && self.region.is_none() => "$".to_string(),
            "USD" if self.language == "en" => "US$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" if narrow || self.language == "en" => "£".to_string(),
            "JPY" if narrow || self.language == "ja" || self.language == "en" => "¥".to_string(),
            other => other.to_string(),
        }
    }
}

pub fn validate_currency_code(code: &str) -> MetricsResult<String> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(MetricsError::InvalidFormatOptions(format!(
            "invalid currency code '{code}'"
        )))
    }
}

/// ISO 4217 minor-unit digits.
pub fn currency_digits(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "CLP" | "VND" | "ISK" | "UGX" => 0,
        "BHD" | "KWD" | "OMR" | "TND" | "JOD" => 3,
        _ => 2,
    }
}
