//! Bounded least-recently-used cache of constructed number formatters.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use super::number::NumberFormatter;
use super::options::NumberFormatOptions;
use super::semantic::FALLBACK;
use super::stable_key::{stable_stringify, OptionValue};
use crate::error::MetricsResult;

pub const DEFAULT_CACHE_LIMIT: usize = 200;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct CachedFormatter {
    formatter: Arc<NumberFormatter>,
    last_used: u64,
}

/// `recency` mirrors `entries`: one tick per key, oldest tick first.
#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CachedFormatter>,
    recency: BTreeMap<u64, String>,
    clock: u64,
    stats: CacheStats,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, key: &str, now: u64) -> Option<Arc<NumberFormatter>> {
        let entry = self.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut entry.last_used, now);
        let formatter = Arc::clone(&entry.formatter);
        if let Some(key) = self.recency.remove(&previous) {
            self.recency.insert(now, key);
        }
        Some(formatter)
    }

    fn insert(&mut self, key: String, formatter: Arc<NumberFormatter>, now: u64) {
        self.recency.insert(now, key.clone());
        self.entries.insert(
            key,
            CachedFormatter {
                formatter,
                last_used: now,
            },
        );
    }

    fn evict_lru(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        self.stats.evictions += 1;
        Some(key)
    }
}

/// Formatter cache keyed by `locale + ":" + stable_stringify(options)`.
///
/// The whole check/construct/insert/evict sequence runs under one lock, so the
/// cache can be shared between threads.
#[derive(Debug)]
pub struct FormatterCache {
    limit: usize,
    placeholder: String,
    state: Mutex<CacheState>,
}

impl Default for FormatterCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_LIMIT)
    }
}

pub fn cache_key(locale: &str, options: &OptionValue) -> String {
    format!("{locale}:{}", stable_stringify(options))
}

impl FormatterCache {
    /// A limit of `0` is treated as `1`.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            placeholder: FALLBACK.to_string(),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Text the semantic helpers render instead of a non-finite or unformattable value.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn get(
        &self,
        locale: &str,
        options: &NumberFormatOptions,
    ) -> MetricsResult<Arc<NumberFormatter>> {
        self.get_with_limit(locale, &options.to_option_value(), self.limit)
    }

    pub fn get_value(
        &self,
        locale: &str,
        options: &OptionValue,
    ) -> MetricsResult<Arc<NumberFormatter>> {
        self.get_with_limit(locale, options, self.limit)
    }

    pub fn get_with_limit(
        &self,
        locale: &str,
        options: &OptionValue,
        cache_limit: usize,
    ) -> MetricsResult<Arc<NumberFormatter>> {
        let key = cache_key(locale, options);
        let mut state = self.lock();

        let now = state.tick();
        if let Some(formatter) = state.touch(&key, now) {
            state.stats.hits += 1;
            return Ok(formatter);
        }

        trace!(key = %key, "formatter cache miss");
        state.stats.misses += 1;
        let parsed = NumberFormatOptions::from_option_value(options)?;
        let formatter = Arc::new(NumberFormatter::new(locale, &parsed)?);
        state.insert(key, Arc::clone(&formatter), now);

        let cache_limit = cache_limit.max(1);
        while state.entries.len() > cache_limit {
            let Some(evicted) = state.evict_lru() else {
                break;
            };
            debug!(key = %evicted, limit = cache_limit, "evicted formatter");
        }
        Ok(formatter)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lock().recency.values().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.recency.clear();
    }

    // Entries are only inserted after construction succeeds; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
