//! Stateless pseudo-random source used for every synthetic dashboard number.
//!
//! The stream is a pure function of `(index, seed)`, so the same view renders the
//! same numbers on every machine and every reload.

const SCALE: f64 = 10_000.0;

/// Returns a value in `[0, 1)` derived from `sin((index + 1) * seed) * 10000`.
pub fn seeded(index: usize, seed: u32) -> f64 {
    seeded_raw(index as f64, f64::from(seed))
}

/// Float-domain variant of [`seeded`]. Non-finite inputs are treated as `0`.
pub fn seeded_raw(index: f64, seed: f64) -> f64 {
    let index = if index.is_finite() { index } else { 0.0 };
    let seed = if seed.is_finite() { seed } else { 0.0 };

    let x = ((index + 1.0) * seed).sin() * SCALE;
    if !x.is_finite() {
        return 0.0;
    }
    let value = x - x.floor();
    // Tiny negative x rounds up to exactly 1.0.
    if value >= 1.0 {
        0.0
    } else {
        value
    }
}

/// Symmetric variance in `[-amplitude, amplitude)`. `salt` shifts the index so
/// separate fields of one record draw from separate points of the stream.
pub fn jitter(index: usize, seed: u32, salt: usize, amplitude: f64) -> f64 {
    (seeded(index.saturating_add(salt), seed) - 0.5) * 2.0 * amplitude
}
