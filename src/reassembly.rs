//! In-order receive-side state machine.
//!
//! [`Reassembly`] implements the receiver side of Go-Back-N:
//!
//! - Only the **in-order** segment is accepted (`seq == expected`).
//! - Out-of-order and duplicate segments are discarded without buffering —
//!   the sender's timeout re-requests them implicitly.
//! - After every segment (accepted or not) the caller sends a **cumulative
//!   ACK** carrying [`Reassembly::ack`], the next expected sequence number.
//!
//! This module only manages state; socket I/O and writing to the output sink
//! are the receiver engine's responsibility.

use crate::packet::Ack;

/// Receive-side state for one transfer.
///
/// Invariant: the bytes the engine has written to its sink are exactly the
/// payloads of sequence numbers `0..expected`, in order, no gaps, no
/// duplicates.
#[derive(Debug, Default)]
pub struct Reassembly {
    /// Next sequence number accepted for delivery.
    expected: u32,
}

impl Reassembly {
    /// Fresh state, expecting segment 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an arriving segment is the in-order one.
    ///
    /// Returns `true` when `seq` is exactly the expected sequence number, in
    /// which case the caller must append the payload to its sink; `expected`
    /// advances by one. Returns `false` for duplicates (`seq < expected`)
    /// and premature arrivals (`seq > expected`) — state is unchanged and
    /// nothing may be written.
    pub fn on_segment(&mut self, seq: u32) -> bool {
        if seq == self.expected {
            self.expected += 1;
            true
        } else {
            false
        }
    }

    /// Cumulative ACK to answer the segment that just arrived.
    ///
    /// Carries the next expected sequence number, i.e. the count of segments
    /// delivered so far. Before anything has been delivered this is 0, which
    /// is distinct from the acknowledgement of segment 0 (value 1).
    pub fn ack(&self) -> Ack {
        Ack {
            next_expected: self.expected,
        }
    }

    /// Number of segments delivered in order so far.
    pub fn delivered(&self) -> u32 {
        self.expected
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
