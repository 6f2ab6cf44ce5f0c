//! Full-jitter exponential backoff.

use std::time::Duration;

use rand::Rng;

/// Computes the delay before the retry following `attempt` (1-indexed).
///
/// The delay is drawn uniformly from `[0, min(cap, base * 2^attempt))`:
/// full jitter under an exponential ceiling, which desynchronizes
/// concurrent callers retrying the same upstream service instead of
/// guaranteeing a minimum wait. A zero ceiling yields a zero delay.
#[must_use]
pub fn full_jitter<R: Rng>(attempt: u32, base: Duration, cap: Duration, rng: &mut R) -> Duration {
    let ceiling = base.saturating_mul(2u32.saturating_pow(attempt)).min(cap);
    if ceiling.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.gen_range(0..ceiling.as_millis() as u64))
}
