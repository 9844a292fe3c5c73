use std::process;

use anyhow::Result;
use clap::Parser;

use oscost::affinity;
use oscost::config::RunConfig;
use oscost::driver;
use oscost::report;

const DEFAULT_ITERS: u64 = 20_000_000;
const WARMUP: u64 = 100_000;

#[derive(Parser)]
#[command(
    name = "syscall_cost",
    version,
    about = "Estimate the cost of a system call round trip via syscall(SYS_getpid)"
)]
struct Cli {
    /// Measurement iterations for both the timed and the baseline loop
    #[arg(long, default_value_t = DEFAULT_ITERS, value_parser = clap::value_parser!(u64).range(1..))]
    iters: u64,
}

/// A guaranteed kernel entry. The raw syscall bypasses both libc caching
/// and the vDSO, which can serve some "syscalls" entirely in userspace.
#[inline]
fn getpid_syscall() -> i64 {
    // SAFETY: SYS_getpid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_getpid) as i64 }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = RunConfig::new(cli.iters, WARMUP, true);

    affinity::pin_or_warn("syscall benchmark");

    // Timed loop: one kernel round trip per iteration. The driver passes
    // the returned sink through black_box so the call cannot be elided.
    let mut sink: i64 = 0;
    let with_ns = driver::time_loop(&cfg, || {
        sink ^= getpid_syscall();
        sink
    })?;

    // Baseline: identical loop shape with a cheap arithmetic substitute
    // for the syscall.
    let mut counter: i64 = 0;
    let base_ns = driver::time_loop(&cfg, || {
        counter = counter.wrapping_add(1);
        sink ^= counter;
        sink
    })?;

    let per_call_ns = driver::net_per_call(with_ns, base_ns, cfg.iters)?;

    print!(
        "{}",
        report::format_syscall_report(cfg.iters, with_ns, base_ns, per_call_ns)
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
