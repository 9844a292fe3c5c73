//! Statistical summarization of raw timing samples.
//!
//! Pure throughout: the same sample sequence always produces the same
//! summary, and nothing here performs I/O. The summarizer owns the one
//! in-place sort the sample sequence ever sees; everything downstream
//! (percentiles, mode) indexes the sorted data.

/// Percentile ranks reported by every benchmark.
pub const PERCENTILE_RANKS: [f64; 5] = [50.0, 90.0, 95.0, 99.0, 99.9];

/// Full statistics over one sample sequence.
#[derive(Debug, Clone)]
pub struct Summary {
    pub len: usize,
    pub min: u64,
    pub max: u64,
    /// Smallest strictly positive sample; `None` when every sample is zero.
    pub min_nonzero: Option<u64>,
    pub mean: f64,
    /// Samples that were exactly zero (timer did not tick, or a clamped
    /// backward reading).
    pub zeros: usize,
    /// Backward readings observed during collection, recorded as zero in
    /// the sequence and counted here.
    pub backwards: usize,
    pub distinct: usize,
    /// Most frequent value; ties broken by the first such run in ascending
    /// order.
    pub mode: u64,
    pub mode_count: usize,
    /// `(rank, value)` rows over the whole sequence.
    pub percentiles: Vec<(f64, u64)>,
    /// Percentiles restricted to strictly positive samples, separating
    /// "timer didn't tick" zero-noise from genuine resolution. `None` when
    /// there is no positive sample at all.
    pub nonzero_percentiles: Option<Vec<(f64, u64)>>,
}

/// Nearest-index percentile over an ascending-sorted slice; no
/// interpolation. `p <= 0` selects the minimum, `p >= 100` the maximum,
/// and anything between selects index `round(p/100 * (n-1))` with halves
/// rounding up.
///
/// Panics on an empty slice; callers guarantee `n >= 1`.
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    assert!(!sorted.is_empty(), "percentile of empty sequence");
    let n = sorted.len();
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 100.0 {
        return sorted[n - 1];
    }
    // f64::round() is round-half-away-from-zero, which for a non-negative
    // rank is exactly round-half-up.
    let idx = (p / 100.0 * (n - 1) as f64).round() as usize;
    sorted[idx.min(n - 1)]
}

/// All reported ranks over an ascending-sorted slice.
pub fn percentile_table(sorted: &[u64]) -> Vec<(f64, u64)> {
    PERCENTILE_RANKS
        .iter()
        .map(|&p| (p, percentile(sorted, p)))
        .collect()
}

/// Summarize a sample sequence in place.
///
/// Steps, in order: one linear scan for min/max/min-nonzero/zero-count and
/// a 128-bit running sum (wide enough for `u64::MAX` samples at the
/// largest supported iteration count), an ascending in-place sort, the
/// percentile tables, and one linear scan over the sorted data for the
/// distinct count and mode via run lengths.
///
/// `backwards` is carried in from collection; it is a property of how the
/// sequence was produced, not recoverable from the values themselves.
pub fn summarize(samples: &mut [u64], backwards: usize) -> Summary {
    assert!(!samples.is_empty(), "summarize of empty sequence");
    let n = samples.len();

    let mut min = u64::MAX;
    let mut max = 0u64;
    let mut min_nonzero: Option<u64> = None;
    let mut zeros = 0usize;
    let mut sum = 0u128;
    for &s in samples.iter() {
        sum += s as u128;
        if s < min {
            min = s;
        }
        if s > max {
            max = s;
        }
        if s == 0 {
            zeros += 1;
        } else if min_nonzero.is_none_or(|m| s < m) {
            min_nonzero = Some(s);
        }
    }
    let mean = sum as f64 / n as f64;

    samples.sort_unstable();

    let percentiles = percentile_table(samples);

    // Zeros sort to the front, so the strictly positive suffix starts at
    // index `zeros`.
    let positive = &samples[zeros..];
    let nonzero_percentiles = if positive.is_empty() {
        None
    } else {
        Some(percentile_table(positive))
    };

    let mut distinct = 1usize;
    let mut mode = samples[0];
    let mut mode_count = 0usize;
    let mut run_val = samples[0];
    let mut run_len = 0usize;
    for &s in samples.iter() {
        if s == run_val {
            run_len += 1;
        } else {
            if run_len > mode_count {
                mode = run_val;
                mode_count = run_len;
            }
            distinct += 1;
            run_val = s;
            run_len = 1;
        }
    }
    if run_len > mode_count {
        mode = run_val;
        mode_count = run_len;
    }

    Summary {
        len: n,
        min,
        max,
        min_nonzero,
        mean,
        zeros,
        backwards,
        distinct,
        mode,
        mode_count,
        percentiles,
        nonzero_percentiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_bounds_and_extremes() {
        let sorted = vec![3u64, 7, 7, 12, 19, 40, 41, 55];
        let min = sorted[0];
        let max = *sorted.last().unwrap();
        assert_eq!(percentile(&sorted, 0.0), min);
        assert_eq!(percentile(&sorted, -5.0), min);
        assert_eq!(percentile(&sorted, 100.0), max);
        assert_eq!(percentile(&sorted, 250.0), max);
        for p in [1.0, 25.0, 50.0, 90.0, 95.0, 99.0, 99.9] {
            let v = percentile(&sorted, p);
            assert!(min <= v && v <= max, "p{} = {} outside [{}, {}]", p, v, min, max);
        }
    }

    #[test]
    fn percentile_monotonic_in_p() {
        let sorted = vec![1u64, 1, 2, 5, 9, 9, 14, 30, 31, 90];
        let mut prev = percentile(&sorted, 0.0);
        for tenths in 1..=1000 {
            let p = tenths as f64 / 10.0;
            let v = percentile(&sorted, p);
            assert!(v >= prev, "percentile({}) = {} < previous {}", p, v, prev);
            prev = v;
        }
    }

    #[test]
    fn nearest_index_rounds_half_up() {
        // n=4, p=50: index round(0.5 * 3) = round(1.5) = 2, so 30 not 20.
        let sorted = vec![10u64, 20, 30, 40];
        assert_eq!(percentile(&sorted, 50.0), 30);
    }

    #[test]
    fn single_sample_is_every_percentile() {
        let sorted = vec![42u64];
        for p in [0.0, 50.0, 99.9, 100.0] {
            assert_eq!(percentile(&sorted, p), 42);
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut once = vec![9u64, 2, 5, 5, 1, 30];
        once.sort_unstable();
        let mut twice = once.clone();
        twice.sort_unstable();
        assert_eq!(once, twice);
    }

    #[test]
    fn summary_already_sorted_input_unchanged() {
        let sorted = vec![1u64, 2, 3, 4, 5];
        let mut buf = sorted.clone();
        summarize(&mut buf, 0);
        assert_eq!(buf, sorted);
    }

    #[test]
    fn distinct_and_mode() {
        let mut samples = vec![5u64, 5, 5, 7, 9, 9];
        let s = summarize(&mut samples, 0);
        assert_eq!(s.distinct, 3);
        assert_eq!(s.mode, 5);
        assert_eq!(s.mode_count, 3);
    }

    #[test]
    fn mode_tie_broken_by_first_ascending_run() {
        let mut samples = vec![9u64, 2, 9, 2, 4];
        let s = summarize(&mut samples, 0);
        // 2 and 9 both appear twice; 2 comes first in sorted order.
        assert_eq!(s.mode, 2);
        assert_eq!(s.mode_count, 2);
    }

    #[test]
    fn zero_count_and_min_nonzero() {
        let mut samples = vec![0u64, 14, 0, 3, 0, 27];
        let s = summarize(&mut samples, 0);
        assert_eq!(s.zeros, 3);
        assert_eq!(s.min, 0);
        assert_eq!(s.min_nonzero, Some(3));
        assert_eq!(s.max, 27);
    }

    #[test]
    fn all_zero_sequence_has_no_nonzero_table() {
        let mut samples = vec![0u64; 8];
        let s = summarize(&mut samples, 0);
        assert_eq!(s.zeros, 8);
        assert_eq!(s.min_nonzero, None);
        assert!(s.nonzero_percentiles.is_none());
        assert_eq!(s.mode, 0);
        assert_eq!(s.mode_count, 8);
        assert_eq!(s.distinct, 1);
    }

    #[test]
    fn nonzero_table_ignores_zero_noise() {
        let mut samples = vec![0u64, 0, 0, 0, 0, 0, 100, 100, 100, 100];
        let s = summarize(&mut samples, 0);
        // Full p50 lands in the zero block; the restricted table does not.
        assert_eq!(percentile_rank(&s.percentiles, 50.0), 0);
        let nz = s.nonzero_percentiles.unwrap();
        assert_eq!(percentile_rank(&nz, 50.0), 100);
    }

    #[test]
    fn mean_uses_wide_accumulator() {
        // Two samples near u64::MAX would overflow a u64 sum.
        let big = u64::MAX - 1;
        let mut samples = vec![big, big];
        let s = summarize(&mut samples, 0);
        assert_eq!(s.mean, big as f64);
    }

    #[test]
    fn summary_percentiles_within_min_max() {
        let mut samples: Vec<u64> = (0..1000).map(|i| (i * 7919) % 1000).collect();
        let s = summarize(&mut samples, 0);
        for &(p, v) in &s.percentiles {
            assert!(s.min <= v && v <= s.max, "p{} = {} out of range", p, v);
        }
    }

    #[test]
    fn backwards_carried_through() {
        let mut samples = vec![0u64, 1, 2];
        let s = summarize(&mut samples, 2);
        assert_eq!(s.backwards, 2);
    }

    fn percentile_rank(table: &[(f64, u64)], rank: f64) -> u64 {
        table
            .iter()
            .find(|(p, _)| *p == rank)
            .map(|&(_, v)| v)
            .unwrap()
    }
}
