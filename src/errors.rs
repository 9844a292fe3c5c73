use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("monotonic clock read failed: {source}")]
    Clock { source: nix::errno::Errno },

    #[error(
        "net cost is not positive (timed={with_ns} ns, baseline={base_ns} ns). \
         The timer is too coarse relative to the operation; increase --iters \
         or reduce system noise."
    )]
    NonPositiveNet { with_ns: u64, base_ns: u64 },

    #[error(
        "ping-pong protocol desync: unexpected end of data on the {channel} channel. \
         The peer process closed its end mid-protocol."
    )]
    ProtocolDesync { channel: &'static str },

    #[error("protocol violation: {op} while {state:?}")]
    ProtocolViolation {
        op: &'static str,
        state: crate::pingpong::ProtocolState,
    },

    #[error("channel I/O failed on the {channel} channel: {source}")]
    Channel {
        channel: &'static str,
        source: std::io::Error,
    },

    #[error("failed to allocate sample buffer for {iters} samples: {source}")]
    Alloc {
        iters: u64,
        source: std::collections::TryReserveError,
    },

    #[error("failed to create baseline pipe pair: {source}")]
    PipeCreate { source: std::io::Error },

    #[error("failed to spawn responder process: {source}")]
    SpawnResponder { source: std::io::Error },

    #[error("failed to reap responder process: {source}")]
    ReapResponder { source: std::io::Error },

    #[error("responder channel missing after spawn (stdio not piped)")]
    ResponderChannelMissing,

    #[error("responder process exited unsuccessfully: {status}")]
    ResponderFailed { status: ExitStatus },
}
