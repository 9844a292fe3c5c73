use nix::time::{ClockId, clock_gettime};

use crate::errors::BenchError;

/// Prefer the raw monotonic clock where the platform has one: it is not
/// subject to NTP rate adjustment, so back-to-back reads measure elapsed
/// hardware time rather than a disciplined estimate of it.
#[cfg(any(target_os = "linux", target_os = "android"))]
const CLOCK: ClockId = ClockId::CLOCK_MONOTONIC_RAW;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const CLOCK: ClockId = ClockId::CLOCK_MONOTONIC;

/// Read the monotonic clock as nanoseconds since an arbitrary epoch.
///
/// A failed read is a distinct error, never a sentinel value, so a genuine
/// zero-nanosecond interval can't be mistaken for a failure. Any clock
/// error is fatal to the measurement in progress.
#[inline]
pub fn now_ns() -> Result<u64, BenchError> {
    let ts = clock_gettime(CLOCK).map_err(|source| BenchError::Clock { source })?;
    Ok(ts.tv_sec() as u64 * 1_000_000_000 + ts.tv_nsec() as u64)
}
