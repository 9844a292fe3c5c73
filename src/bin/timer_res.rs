use std::process;

use anyhow::Result;
use clap::Parser;

use oscost::affinity;
use oscost::config::RunConfig;
use oscost::driver;
use oscost::report;
use oscost::stats;

const DEFAULT_ITERS: u64 = 1_000_000;
const WARMUP: u64 = 10_000;

#[derive(Parser)]
#[command(
    name = "timer_res",
    version,
    about = "Measure monotonic timer resolution from back-to-back clock reads"
)]
struct Cli {
    /// Measurement iterations; each records one clock-read delta
    #[arg(long, default_value_t = DEFAULT_ITERS, value_parser = clap::value_parser!(u64).range(1..))]
    iters: u64,

    /// Pin to a single core before measuring
    #[arg(long)]
    pin: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = RunConfig::new(cli.iters, WARMUP, cli.pin);

    if cfg.pin {
        affinity::pin_or_warn("timer benchmark");
    }

    let collected = driver::collect_clock_samples(&cfg)?;
    let mut samples = collected.samples;
    let summary = stats::summarize(&mut samples, collected.backwards);

    print!("{}", report::format_timer_report(cfg.iters, &summary));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
