use std::io;
use std::process::{self, Child, Command, Stdio};

use anyhow::Result;
use clap::Parser;

use oscost::affinity;
use oscost::config::RunConfig;
use oscost::driver;
use oscost::errors::BenchError;
use oscost::pingpong::{Initiator, Responder};
use oscost::report;

const DEFAULT_ITERS: u64 = 2_000_000;
const WARMUP: u64 = 10_000;

#[derive(Parser)]
#[command(
    name = "ctx_switch",
    version,
    about = "Estimate the cost of a process context switch via two-process pipe ping-pong"
)]
struct Cli {
    /// Timed ping-pong round trips (each forces two context switches)
    #[arg(long, default_value_t = DEFAULT_ITERS, value_parser = clap::value_parser!(u64).range(1..))]
    iters: u64,

    /// Run as the responder end of the ping-pong (spawned internally)
    #[arg(long, hide = true)]
    responder: bool,

    /// Make the responder quit after this many rounds, forcing a desync
    #[arg(long, hide = true)]
    quit_after: Option<u64>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = RunConfig::new(cli.iters, WARMUP, true);

    if cli.responder {
        return run_responder(&cfg, cli.quit_after);
    }

    affinity::pin_or_warn("ping-pong initiator");

    // Baseline: the same round-trip protocol with both channel ends in
    // this process, wired back onto a single pipe. One write+read pair per
    // round, no context switch.
    let base_total = pipe_pair_total(&cfg)?;

    let mut child = spawn_responder(&cli)?;
    let request_tx = child
        .stdin
        .take()
        .ok_or(BenchError::ResponderChannelMissing)?;
    let response_rx = child
        .stdout
        .take()
        .ok_or(BenchError::ResponderChannelMissing)?;

    let mut initiator = Initiator::new(request_tx, response_rx);
    let ping_pong_total = driver::time_loop_try(&cfg, || initiator.round_trip())?;

    // Close our channel ends and reap the responder before computing
    // anything, so nothing leaks and the peer is known to have finished.
    drop(initiator);
    let status = child
        .wait()
        .map_err(|source| BenchError::ReapResponder { source })?;
    if !status.success() {
        return Err(BenchError::ResponderFailed { status }.into());
    }

    // Each round trip holds two context switches plus two pipe write+read
    // pairs, one in each process: subtract twice the baseline, halve the
    // rest.
    let per_switch_ns = driver::net_per_call(ping_pong_total, 2 * base_total, 2 * cfg.iters)?;

    let pipe_pair_ns = base_total as f64 / cfg.iters as f64;
    let ping_pong_ns = ping_pong_total as f64 / cfg.iters as f64;

    print!(
        "{}",
        report::format_ctx_report(cfg.iters, pipe_pair_ns, ping_pong_ns, per_switch_ns)
    );
    Ok(())
}

/// Time `warmup + iters` single-process round trips over one pipe.
fn pipe_pair_total(cfg: &RunConfig) -> Result<u64, BenchError> {
    let (rx, tx) = os_pipe::pipe().map_err(|source| BenchError::PipeCreate { source })?;
    let mut loopback = Initiator::new(tx, rx);
    driver::time_loop_try(cfg, || loopback.round_trip())
}

fn spawn_responder(cli: &Cli) -> Result<Child, BenchError> {
    let exe = std::env::current_exe().map_err(|source| BenchError::SpawnResponder { source })?;
    let mut cmd = Command::new(exe);
    cmd.arg("--responder")
        .arg("--iters")
        .arg(cli.iters.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        // The responder's pin warning, if any, should reach the terminal.
        .stderr(Stdio::inherit());
    if let Some(rounds) = cli.quit_after {
        cmd.arg("--quit-after").arg(rounds.to_string());
    }
    cmd.spawn()
        .map_err(|source| BenchError::SpawnResponder { source })
}

/// The responder role: pin (the parent pinned itself already; each process
/// pins independently after creation), then answer the mirrored warm-up
/// and measurement rounds. No timing duty.
fn run_responder(cfg: &RunConfig, quit_after: Option<u64>) -> Result<()> {
    affinity::pin_or_warn("ping-pong responder");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut responder = Responder::new(stdin, stdout);

    let full = cfg.warmup + cfg.iters;
    let rounds = quit_after.map_or(full, |q| q.min(full));
    for _ in 0..rounds {
        responder.serve_round()?;
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
