use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stable_key::OptionValue;
use crate::error::{MetricsError, MetricsResult};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    Currency,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    NarrowSymbol,
    Code,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Notation {
    #[default]
    Standard,
    Compact,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignDisplay {
    #[default]
    Auto,
    Always,
    ExceptZero,
    Never,
}

/// Option bag accepted by [`super::NumberFormatter`], named after `Intl.NumberFormat`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NumberStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_display: Option<CurrencyDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<Notation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_display: Option<SignDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_grouping: Option<bool>,
}

impl NumberFormatOptions {
    pub fn decimal() -> Self {
        Self {
            style: Some(NumberStyle::Decimal),
            ..Self::default()
        }
    }

    pub fn percent() -> Self {
        Self {
            style: Some(NumberStyle::Percent),
            ..Self::default()
        }
    }

    pub fn currency(code: &str) -> Self {
        Self {
            style: Some(NumberStyle::Currency),
            currency: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn with_fraction_digits(mut self, min: u8, max: u8) -> Self {
        self.minimum_fraction_digits = Some(min);
        self.maximum_fraction_digits = Some(max);
        self
    }

    pub fn with_max_fraction_digits(mut self, max: u8) -> Self {
        self.maximum_fraction_digits = Some(max);
        self
    }

    pub fn compact(mut self) -> Self {
        self.notation = Some(Notation::Compact);
        self
    }

    pub fn with_sign_display(mut self, sign_display: SignDisplay) -> Self {
        self.sign_display = Some(sign_display);
        self
    }

    pub fn with_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = Some(use_grouping);
        self
    }

    pub fn to_option_value(&self) -> OptionValue {
        serde_json::to_value(self)
            .map(OptionValue::from)
            .unwrap_or(OptionValue::Undefined)
    }

    /// Reads a loosely-typed option bag. Unknown keys are ignored; `undefined`
    /// means "no options".
    pub fn from_option_value(value: &OptionValue) -> MetricsResult<Self> {
        match value.to_json() {
            None => Ok(Self::default()),
            Some(json @ Value::Object(_)) => serde_json::from_value(json)
                .map_err(|e| MetricsError::InvalidFormatOptions(e.to_string())),
            Some(other) => Err(MetricsError::InvalidFormatOptions(format!(
                "options must be an object, got {other}"
            ))),
        }
    }
}
