/// Per-run measurement parameters, built once from the command line and a
/// benchmark's warm-up constant, read-only afterward.
///
/// The warm-up count lives here rather than as a constant inside the loop
/// driver so tests can drive the same code paths with tiny counts.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Timed iteration count. Always positive (the CLI rejects 0).
    pub iters: u64,
    /// Untimed repetitions run first to stabilize caches and branch
    /// predictors; results discarded.
    pub warmup: u64,
    /// Whether to attempt pinning to a single core before measuring.
    pub pin: bool,
}

impl RunConfig {
    pub fn new(iters: u64, warmup: u64, pin: bool) -> Self {
        Self { iters, warmup, pin }
    }
}
