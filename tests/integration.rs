use assert_cmd::Command;
use predicates::prelude::*;

/// Small enough to keep runs fast, big enough that baseline subtraction
/// has real signal on any machine the suite runs on.
const SMALL_ITERS: &str = "2000";

fn bench_cmd(bin: &str) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

// ---- Argument validation (exit code 2, no report text) ----

#[test]
fn zero_iters_is_rejected_before_measuring() {
    for bin in ["timer_res", "syscall_cost", "ctx_switch"] {
        bench_cmd(bin)
            .args(["--iters", "0"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty().not());
    }
}

#[test]
fn malformed_iters_is_rejected() {
    for bin in ["timer_res", "syscall_cost", "ctx_switch"] {
        bench_cmd(bin)
            .args(["--iters", "a-lot"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());
    }
}

#[test]
fn negative_iters_is_rejected() {
    bench_cmd("timer_res")
        .args(["--iters", "-5"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

// ---- Timer resolution benchmark ----

#[test]
fn timer_res_reports_summary() {
    bench_cmd("timer_res")
        .args(["--iters", SMALL_ITERS])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer back-to-back read deltas"))
        .stdout(predicate::str::contains("min:"))
        .stdout(predicate::str::contains("mode:"))
        .stdout(predicate::str::contains("percentiles (all samples)"))
        .stdout(predicate::str::contains("p99.9"));
}

#[test]
fn timer_res_pin_flag_does_not_fail_the_run() {
    // Pinning may warn on stderr (e.g. restricted cgroups) but must never
    // turn a valid measurement into a failure.
    bench_cmd("timer_res")
        .args(["--iters", SMALL_ITERS, "--pin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("percentiles (nonzero samples only)"));
}

// ---- Syscall cost benchmark ----

#[test]
fn syscall_cost_reports_net_estimate() {
    bench_cmd("syscall_cost")
        .args(["--iters", "50000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("System call cost estimate"))
        .stdout(predicate::str::contains("net (with - base):"))
        .stdout(predicate::str::contains("per syscall"));
}

// ---- Context switch benchmark ----

#[test]
fn ctx_switch_reports_estimate() {
    bench_cmd("ctx_switch")
        .args(["--iters", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Context switch cost estimate"))
        .stdout(predicate::str::contains("pipe baseline:"))
        .stdout(predicate::str::contains("per context switch"));
}

#[test]
fn ctx_switch_early_close_fails_with_desync_diagnostic() {
    // The responder quits after 20 rounds, closing its channel ends while
    // the initiator is still mid-protocol. That must be a clean exit 1
    // with the desync diagnostic, not a hang and not a partial report.
    bench_cmd("ctx_switch")
        .args(["--iters", "200", "--quit-after", "20"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("protocol desync"));
}
