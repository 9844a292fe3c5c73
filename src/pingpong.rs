//! Strict ping-pong protocol between two processes over a pair of
//! unidirectional single-byte channels.
//!
//! At any instant at most one side is runnable doing useful work; the
//! other is blocked in a channel read. Each full round trip therefore
//! forces exactly two context switches, which is what the context-switch
//! benchmark counts on.
//!
//! Both ends carry an explicit [`ProtocolState`] so the alternation
//! invariant (never two writes without an intervening read) is checked as
//! a state transition rather than inferred from timing behavior. The ends
//! are generic over `Read`/`Write`, so tests can run both roles in one
//! process over local pipes.

use std::io::{ErrorKind, Read, Write};

use crate::errors::BenchError;

/// The byte exchanged in both directions. The value is arbitrary; one
/// byte is the smallest unit a pipe transfers.
pub const PROTOCOL_BYTE: u8 = 0xCD;

/// Position within one round trip. Both roles cycle back to `Idle` at
/// every round boundary; each role only ever occupies the states its
/// direction uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Round boundary; the only state a new round may start from.
    Idle,
    /// Responder blocked reading the request channel.
    WaitingForRequest,
    /// Responder holds the request and has not yet answered.
    Processing,
    /// Initiator blocked reading the response channel.
    WaitingForResponse,
}

/// The side that starts every round: writes a request byte, then blocks
/// on the response channel.
pub struct Initiator<W: Write, R: Read> {
    request_tx: W,
    response_rx: R,
    state: ProtocolState,
}

impl<W: Write, R: Read> Initiator<W, R> {
    pub fn new(request_tx: W, response_rx: R) -> Self {
        Self {
            request_tx,
            response_rx,
            state: ProtocolState::Idle,
        }
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Write one request byte. Only legal at a round boundary.
    pub fn send_request(&mut self) -> Result<(), BenchError> {
        if self.state != ProtocolState::Idle {
            return Err(BenchError::ProtocolViolation {
                op: "send_request",
                state: self.state,
            });
        }
        write_byte(&mut self.request_tx, "request")?;
        self.state = ProtocolState::WaitingForResponse;
        Ok(())
    }

    /// Block until the response byte arrives, completing the round.
    pub fn await_response(&mut self) -> Result<(), BenchError> {
        if self.state != ProtocolState::WaitingForResponse {
            return Err(BenchError::ProtocolViolation {
                op: "await_response",
                state: self.state,
            });
        }
        read_byte(&mut self.response_rx, "response")?;
        self.state = ProtocolState::Idle;
        Ok(())
    }

    /// One full round trip: request out, response in.
    pub fn round_trip(&mut self) -> Result<(), BenchError> {
        self.send_request()?;
        self.await_response()
    }
}

/// The side that perpetuates the protocol: blocks on the request channel,
/// then answers. It carries no timing duty.
pub struct Responder<R: Read, W: Write> {
    request_rx: R,
    response_tx: W,
    state: ProtocolState,
}

impl<R: Read, W: Write> Responder<R, W> {
    pub fn new(request_rx: R, response_tx: W) -> Self {
        Self {
            request_rx,
            response_tx,
            state: ProtocolState::Idle,
        }
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Block until a request byte arrives.
    pub fn await_request(&mut self) -> Result<(), BenchError> {
        if self.state != ProtocolState::Idle {
            return Err(BenchError::ProtocolViolation {
                op: "await_request",
                state: self.state,
            });
        }
        self.state = ProtocolState::WaitingForRequest;
        read_byte(&mut self.request_rx, "request")?;
        self.state = ProtocolState::Processing;
        Ok(())
    }

    /// Answer the held request, completing the round.
    pub fn send_response(&mut self) -> Result<(), BenchError> {
        if self.state != ProtocolState::Processing {
            return Err(BenchError::ProtocolViolation {
                op: "send_response",
                state: self.state,
            });
        }
        write_byte(&mut self.response_tx, "response")?;
        self.state = ProtocolState::Idle;
        Ok(())
    }

    /// One full served round: request in, response out.
    pub fn serve_round(&mut self) -> Result<(), BenchError> {
        self.await_request()?;
        self.send_response()
    }
}

/// `write_all` retries `ErrorKind::Interrupted` internally, so EINTR never
/// surfaces. A broken pipe means the peer closed its read end
/// mid-protocol, which is the same desync as end-of-data on a read.
fn write_byte<W: Write>(tx: &mut W, channel: &'static str) -> Result<(), BenchError> {
    match tx.write_all(&[PROTOCOL_BYTE]).and_then(|_| tx.flush()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(BenchError::ProtocolDesync { channel }),
        Err(source) => Err(BenchError::Channel { channel, source }),
    }
}

/// `read_exact` retries `ErrorKind::Interrupted` internally; end-of-data
/// surfaces as `UnexpectedEof` and is a protocol desync.
fn read_byte<R: Read>(rx: &mut R, channel: &'static str) -> Result<(), BenchError> {
    let mut buf = [0u8; 1];
    match rx.read_exact(&mut buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(BenchError::ProtocolDesync { channel }),
        Err(source) => Err(BenchError::Channel { channel, source }),
    }
}
