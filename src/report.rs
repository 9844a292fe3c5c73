//! Human-readable benchmark reports.
//!
//! Each formatter returns a `String` and performs no I/O; the binaries
//! print the result. Color is applied only when stdout supports it.

use owo_colors::{OwoColorize, Stream};

use crate::stats::Summary;

fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.bold()).to_string()
}

fn figure(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
}

fn note_block(lines: &[&str]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(
        &"Notes:"
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );
    out.push('\n');
    for line in lines {
        out.push_str("  - ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn percentile_lines(out: &mut String, table: &[(f64, u64)]) {
    for &(p, v) in table {
        out.push_str(&format!("    p{:<5} {} ns\n", p, figure(&v.to_string())));
    }
}

/// Report for the timer-resolution benchmark: the full summary over
/// per-iteration clock-read deltas.
pub fn format_timer_report(iters: u64, summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&heading("Timer back-to-back read deltas"));
    out.push_str(&format!(" over {} iterations\n\n", iters));

    out.push_str(&format!("  min:         {} ns\n", figure(&summary.min.to_string())));
    out.push_str(&format!("  max:         {} ns\n", figure(&summary.max.to_string())));
    match summary.min_nonzero {
        Some(m) => out.push_str(&format!("  min nonzero: {} ns\n", figure(&m.to_string()))),
        None => out.push_str("  min nonzero: (none; every delta was zero)\n"),
    }
    out.push_str(&format!("  mean:        {:.2} ns\n", summary.mean));
    out.push_str(&format!("  zeros:       {} (measured delta = 0)\n", summary.zeros));
    out.push_str(&format!("  backwards:   {} (clamped to 0)\n", summary.backwards));
    out.push_str(&format!("  distinct:    {} values\n", summary.distinct));
    out.push_str(&format!(
        "  mode:        {} ns (seen {} times)\n",
        figure(&summary.mode.to_string()),
        summary.mode_count
    ));

    out.push_str("\n  percentiles (all samples):\n");
    percentile_lines(&mut out, &summary.percentiles);

    out.push_str("\n  percentiles (nonzero samples only):\n");
    match &summary.nonzero_percentiles {
        Some(table) => percentile_lines(&mut out, table),
        None => out.push_str("    no data (every sample was zero)\n"),
    }

    out.push_str(&note_block(&[
        "The minimum nonzero delta is a practical lower bound on useful timer resolution.",
        "Many zeros mean the operation under test needs batching to outrun the timer.",
        "The nonzero-only percentiles separate \"timer didn't tick\" from genuine resolution.",
    ]));
    out
}

/// Report for the syscall-cost benchmark: aggregate totals with baseline
/// subtraction.
pub fn format_syscall_report(iters: u64, with_ns: u64, base_ns: u64, per_call_ns: f64) -> String {
    let mut out = String::new();
    out.push_str(&heading("System call cost estimate"));
    out.push_str(" using syscall(SYS_getpid)\n\n");

    out.push_str(&format!("  iters:              {}\n", iters));
    out.push_str(&format!("  total with syscall: {} ns\n", with_ns));
    out.push_str(&format!("  total base loop:    {} ns\n", base_ns));
    out.push_str(&format!("  net (with - base):  {} ns\n", with_ns - base_ns));
    out.push_str(&format!(
        "  estimated cost:     {} ns per syscall\n",
        figure(&format!("{:.2}", per_call_ns))
    ));
    out.push_str(&format!(
        "                    = {:.3} us per syscall\n",
        per_call_ns / 1000.0
    ));

    out.push_str(&note_block(&[
        "A baseline loop of the same shape is subtracted to remove loop overhead.",
        "Results vary run to run; run several times and report the minimum or median.",
        "Under virtualization (e.g. WSL 2), extra overhead and jitter inflate the figure.",
    ]));
    out
}

/// Report for the context-switch benchmark: ping-pong timing with the
/// single-process pipe baseline subtracted.
pub fn format_ctx_report(
    iters: u64,
    pipe_pair_ns: f64,
    ping_pong_ns: f64,
    ctx_switch_ns: f64,
) -> String {
    let mut out = String::new();
    out.push_str(&heading("Context switch cost estimate"));
    out.push_str(" (two-process pipe ping-pong)\n\n");

    out.push_str(&format!("  iters:          {}\n", iters));
    out.push_str(&format!(
        "  pipe baseline:  {:.2} ns per write+read pair (single process)\n",
        pipe_pair_ns
    ));
    out.push_str(&format!(
        "  ping-pong:      {:.2} ns per round trip (includes 2 context switches)\n",
        ping_pong_ns
    ));
    out.push_str(&format!(
        "  ctxsw estimate: {} ns per context switch (after baseline subtraction)\n",
        figure(&format!("{:.2}", ctx_switch_ns))
    ));
    out.push_str(&format!(
        "               ~= {:.3} us per context switch\n",
        ctx_switch_ns / 1000.0
    ));

    out.push_str(&note_block(&[
        "This is an estimate; the ping-pong path still includes scheduling and pipe overhead.",
        "A tiny or failing estimate means more iterations or a quieter system is needed.",
        "Pinning both processes to one core reduces noise; a pin warning above means \
         the run was unpinned.",
    ]));
    out
}
