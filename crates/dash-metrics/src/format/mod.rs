pub mod cache;
pub mod locale;
pub mod number;
pub mod options;
pub mod semantic;
pub mod stable_key;

pub use cache::{cache_key, CacheStats, FormatterCache, DEFAULT_CACHE_LIMIT};
pub use locale::Locale;
pub use number::{NumberFormatter, ResolvedOptions};
pub use options::{CurrencyDisplay, Notation, NumberFormatOptions, NumberStyle, SignDisplay};
pub use semantic::{
    format_compact_currency, format_currency, format_number, format_percent, format_ratio,
    format_signed_percent, DISPLAY_CURRENCY, FALLBACK,
};
pub use stable_key::{stable_stringify, OptionValue};
