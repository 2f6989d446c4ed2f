pub mod params;
pub mod seeded;

pub use params::{
    range_params, range_params_lenient, Domain, RangeParams, TimeRange, DAY_MULTIPLIER,
    LONG_WINDOW_MULTIPLIER, WEEK_MULTIPLIER,
};
pub use seeded::{jitter, seeded, seeded_raw};
