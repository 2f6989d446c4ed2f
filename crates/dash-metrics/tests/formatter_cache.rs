use std::sync::Arc;
use std::thread;

use dash_metrics::format::{
    cache_key, FormatterCache, NumberFormatOptions, OptionValue, DEFAULT_CACHE_LIMIT,
};

fn digits_options(max: u8) -> NumberFormatOptions {
    NumberFormatOptions::decimal().with_fraction_digits(0, max)
}

#[test]
fn default_limit_is_two_hundred() {
    assert_eq!(DEFAULT_CACHE_LIMIT, 200);
    assert_eq!(FormatterCache::default().limit(), 200);
    assert_eq!(FormatterCache::new(0).limit(), 1);
}

#[test]
fn reordered_option_keys_share_one_formatter() {
    let cache = FormatterCache::default();
    let first = OptionValue::object([
        ("style", OptionValue::from("currency")),
        ("currency", OptionValue::from("PLN")),
    ]);
    let second = OptionValue::object([
        ("currency", OptionValue::from("PLN")),
        ("style", OptionValue::from("currency")),
    ]);

    let a = cache.get_value("pl-PL", &first).expect("first formatter");
    let b = cache.get_value("pl-PL", &second).expect("second formatter");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn locales_are_cached_separately() {
    let cache = FormatterCache::default();
    let options = NumberFormatOptions::percent();
    let pl = cache.get("pl-PL", &options).expect("pl formatter");
    let en = cache.get("en-US", &options).expect("en formatter");
    assert!(!Arc::ptr_eq(&pl, &en));
    assert_eq!(cache.len(), 2);
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let cache = FormatterCache::new(2);
    let a = digits_options(1);
    let b = digits_options(2);
    let c = digits_options(3);

    cache.get("en-US", &a).expect("a");
    cache.get("en-US", &b).expect("b");
    cache.get("en-US", &a).expect("touch a");
    cache.get("en-US", &c).expect("c");

    let key = |options: &NumberFormatOptions| cache_key("en-US", &options.to_option_value());
    assert!(cache.contains_key(&key(&a)));
    assert!(!cache.contains_key(&key(&b)));
    assert!(cache.contains_key(&key(&c)));
    assert_eq!(cache.keys_by_recency(), vec![key(&a), key(&c)]);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn size_never_exceeds_limit() {
    let cache = FormatterCache::new(5);
    for max in 0..=20u8 {
        cache.get("en-US", &digits_options(max)).expect("formatter");
        assert!(cache.len() <= 5);
    }
    assert_eq!(cache.len(), 5);
    assert_eq!(cache.stats().evictions, 16);
}

#[test]
fn per_call_limit_overrides_default() {
    let cache = FormatterCache::default();
    for max in 0..4u8 {
        cache
            .get_with_limit("en-US", &digits_options(max).to_option_value(), 2)
            .expect("formatter");
    }
    assert_eq!(cache.len(), 2);
}

#[test]
fn failed_construction_is_not_cached() {
    let cache = FormatterCache::default();
    let err = cache
        .get("not a locale", &NumberFormatOptions::decimal())
        .expect_err("invalid locale should fail");
    assert!(err.to_string().contains("invalid locale"), "unexpected error: {err}");

    let err = cache
        .get("en-US", &digits_options(1).with_fraction_digits(3, 1))
        .expect_err("min above max should fail");
    assert!(
        err.to_string().contains("minimumFractionDigits"),
        "unexpected error: {err}"
    );
    assert!(cache.is_empty());
}

#[test]
fn non_object_options_are_rejected() {
    let cache = FormatterCache::default();
    let err = cache
        .get_value("en-US", &OptionValue::from(5.0))
        .expect_err("number options should fail");
    assert!(err.to_string().contains("must be an object"), "unexpected error: {err}");
}

#[test]
fn undefined_options_mean_defaults() {
    let cache = FormatterCache::default();
    let formatter = cache
        .get_value("en-US", &OptionValue::Undefined)
        .expect("default formatter");
    assert_eq!(formatter.format(1234.5), "1,234.5");
}

#[test]
fn function_valued_options_are_ignored() {
    let cache = FormatterCache::default();
    let options = OptionValue::object([
        ("style", OptionValue::from("percent")),
        ("formatter", OptionValue::Function),
    ]);
    let formatter = cache.get_value("en-US", &options).expect("percent formatter");
    assert_eq!(formatter.format(0.5), "50%");
}

#[test]
fn concurrent_lookups_share_one_entry() {
    let cache = Arc::new(FormatterCache::default());
    let options = NumberFormatOptions::currency("PLN").with_max_fraction_digits(0);

    let formatters: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let options = options.clone();
                scope.spawn(move || cache.get("pl-PL", &options).expect("formatter"))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    assert_eq!(cache.len(), 1);
    assert!(formatters.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn clear_keeps_statistics() {
    let cache = FormatterCache::default();
    cache.get("en-US", &digits_options(1)).expect("formatter");
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn repeated_hits_keep_one_recency_slot_per_key() {
    let cache = FormatterCache::new(3);
    let options: Vec<NumberFormatOptions> = (0..3u8).map(digits_options).collect();
    for round in 0..50 {
        for (i, opts) in options.iter().enumerate() {
            if (round + i) % 2 == 0 {
                cache.get("en-US", opts).expect("formatter");
            }
        }
    }
    cache.get("en-US", &options[1]).expect("touch middle");
    cache.get("en-US", &options[0]).expect("touch first");

    let key = |options: &NumberFormatOptions| cache_key("en-US", &options.to_option_value());
    assert_eq!(
        cache.keys_by_recency(),
        vec![key(&options[2]), key(&options[1]), key(&options[0])]
    );
    assert_eq!(cache.len(), 3);

    cache.get("en-US", &digits_options(9)).expect("new entry");
    assert!(!cache.contains_key(&key(&options[2])));
    assert_eq!(cache.keys_by_recency().len(), 3);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn clear_empties_recency_order() {
    let cache = FormatterCache::new(2);
    cache.get("en-US", &digits_options(1)).expect("formatter");
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.keys_by_recency().is_empty());
}
