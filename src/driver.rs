//! Warm-up / measure / baseline loop driver.
//!
//! All three benchmarks share the same loop discipline: run the body a
//! warm-up count of times with results discarded, then time exactly
//! `iters` executions between two clock reads. The body's result is passed
//! through `black_box` so the optimizer must treat every iteration as
//! observable and cannot elide or hoist the timed work.

use std::hint::black_box;

use crate::clock::now_ns;
use crate::config::RunConfig;
use crate::errors::BenchError;

/// Time `cfg.iters` executions of `body` as a single aggregate interval,
/// after `cfg.warmup` discarded executions.
///
/// Returns total elapsed nanoseconds; divide by `cfg.iters` for a per-call
/// figure only after baseline subtraction (see [`net_per_call`]).
pub fn time_loop<T, F>(cfg: &RunConfig, mut body: F) -> Result<u64, BenchError>
where
    F: FnMut() -> T,
{
    for _ in 0..cfg.warmup {
        black_box(body());
    }

    let t0 = now_ns()?;
    for _ in 0..cfg.iters {
        black_box(body());
    }
    let t1 = now_ns()?;

    Ok(t1.saturating_sub(t0))
}

/// [`time_loop`] for fallible bodies: the warm-up and timed loops abort on
/// the first body error. Used where the body is channel I/O, which is
/// observable on its own and needs no `black_box`.
pub fn time_loop_try<F>(cfg: &RunConfig, mut body: F) -> Result<u64, BenchError>
where
    F: FnMut() -> Result<(), BenchError>,
{
    for _ in 0..cfg.warmup {
        body()?;
    }

    let t0 = now_ns()?;
    for _ in 0..cfg.iters {
        body()?;
    }
    let t1 = now_ns()?;

    Ok(t1.saturating_sub(t0))
}

/// Subtract a baseline loop's total from the timed loop's total and return
/// the net per-iteration cost.
///
/// A non-positive net means the measurement drowned in loop overhead and
/// noise; that is a failure, never a report of a negative cost.
pub fn net_per_call(with_ns: u64, base_ns: u64, iters: u64) -> Result<f64, BenchError> {
    if with_ns <= base_ns {
        return Err(BenchError::NonPositiveNet { with_ns, base_ns });
    }
    Ok((with_ns - base_ns) as f64 / iters as f64)
}

/// Raw per-iteration timings from back-to-back clock reads, plus the count
/// of backward readings (second read below the first).
#[derive(Debug)]
pub struct ClockSamples {
    /// One delta per iteration; backward readings recorded as exactly 0.
    pub samples: Vec<u64>,
    /// How many deltas were backward before being clamped to 0.
    pub backwards: usize,
}

/// Per-iteration sampling variant used by the timer-resolution benchmark:
/// every iteration records the delta between two adjacent clock reads.
///
/// A backward delta (possible only if the underlying sources disagree) is
/// recorded as exactly zero and counted, never dropped, so the sequence
/// keeps its fixed length `cfg.iters`.
pub fn collect_clock_samples(cfg: &RunConfig) -> Result<ClockSamples, BenchError> {
    for _ in 0..cfg.warmup {
        black_box(now_ns()?);
    }

    let mut samples = Vec::new();
    samples
        .try_reserve_exact(cfg.iters as usize)
        .map_err(|source| BenchError::Alloc {
            iters: cfg.iters,
            source,
        })?;

    let mut backwards = 0usize;
    for _ in 0..cfg.iters {
        let a = now_ns()?;
        let b = now_ns()?;
        match b.checked_sub(a) {
            Some(d) => samples.push(d),
            None => {
                samples.push(0);
                backwards += 1;
            }
        }
    }

    Ok(ClockSamples { samples, backwards })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(iters: u64, warmup: u64) -> RunConfig {
        RunConfig::new(iters, warmup, false)
    }

    #[test]
    fn time_loop_runs_warmup_plus_iters() {
        let mut calls = 0u64;
        let total = time_loop(&cfg(100, 25), || calls += 1).unwrap();
        assert_eq!(calls, 125);
        // Elapsed is whatever it is; it just must not be an error.
        let _ = total;
    }

    #[test]
    fn net_rejects_baseline_exceeding_timed() {
        let err = net_per_call(100, 150, 10).unwrap_err();
        assert!(matches!(
            err,
            BenchError::NonPositiveNet {
                with_ns: 100,
                base_ns: 150
            }
        ));
    }

    #[test]
    fn net_rejects_exactly_zero() {
        assert!(net_per_call(100, 100, 10).is_err());
    }

    #[test]
    fn net_divides_by_iters() {
        let per_call = net_per_call(150, 100, 10).unwrap();
        assert_eq!(per_call, 5.0);
    }

    #[test]
    fn collect_yields_fixed_length() {
        let out = collect_clock_samples(&cfg(200, 10)).unwrap();
        assert_eq!(out.samples.len(), 200);
        // A monotonic source should not run backward between two reads.
        assert_eq!(out.backwards, 0);
    }
}
