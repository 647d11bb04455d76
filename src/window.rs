//! Go-Back-N send-side state machine.
//!
//! [`SendWindow`] owns every segment of the transfer for its whole lifetime,
//! indexed by absolute sequence number, plus a parallel record of when each
//! segment was last handed to the network.
//!
//! # Protocol contract
//!
//! - At most `window_size` segments may be in flight at once.
//! - ACKs are **cumulative**: `next_expected = K` means the receiver has
//!   delivered every segment with sequence number `< K`.
//! - On timeout, the caller rewinds and retransmits **all** outstanding
//!   segments from `base` onwards (go back to N).
//!
//! # Sequence-number layout
//!
//! ```text
//!       base            next_seq
//!        │                  │
//!  ──────┼──────────────────┼──────────────────▶ seq space
//!        │ ◀── in flight ──▶│ ◀── sendable ──▶ min(base + N, total)
//! ```
//!
//! Invariants: `base ≤ next_seq ≤ total` and `next_seq − base ≤ window_size`.
//!
//! This module only manages state; all socket I/O, impairment and timing
//! decisions are the sender engine's responsibility.

use std::time::{Duration, Instant};

use crate::packet::Segment;

/// Go-Back-N send-side state for one transfer.
#[derive(Debug)]
pub struct SendWindow {
    /// Sequence number of the oldest unacknowledged segment (left window edge).
    base: u32,

    /// Sequence number of the next segment to hand to the network.
    next_seq: u32,

    /// Maximum number of segments in flight simultaneously (N).
    window_size: u32,

    /// Every segment of the transfer, indexed by sequence number.
    segments: Vec<Segment>,

    /// Last-transmit timestamp per segment, parallel to `segments`.
    ///
    /// Recorded even when the impairment layer swallowed the datagram — a
    /// dropped segment still looks "sent" to the timer and is recovered by
    /// the retransmit timeout, not inline.
    last_sent: Vec<Option<Instant>>,
}

impl SendWindow {
    /// Create a window over a fully segmented transfer.
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty (an empty input must still produce one
    /// empty segment — see [`crate::sender::segment`]) or `window_size == 0`.
    pub fn new(segments: Vec<Segment>, window_size: u32) -> Self {
        assert!(!segments.is_empty(), "a transfer has at least one segment");
        assert!(window_size >= 1, "window_size must be at least 1");
        let total = segments.len();
        Self {
            base: 0,
            next_seq: 0,
            window_size,
            segments,
            last_sent: vec![None; total],
        }
    }

    /// Left edge of the window: oldest unacknowledged sequence number.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Total number of segments in the transfer.
    pub fn total(&self) -> u32 {
        self.segments.len() as u32
    }

    /// Number of segments handed to the network and not yet acknowledged.
    pub fn in_flight(&self) -> u32 {
        self.next_seq - self.base
    }

    /// `true` once every segment has been acknowledged.
    pub fn is_complete(&self) -> bool {
        self.base == self.total()
    }

    /// `true` when the window has room for another transmission.
    pub fn can_send(&self) -> bool {
        self.next_seq < self.base + self.window_size && self.next_seq < self.total()
    }

    /// Hand out the next segment to transmit and stamp it as sent at `now`.
    ///
    /// Returns `None` when the window is full or every segment has already
    /// been handed out. The timestamp is recorded unconditionally; whether
    /// the datagram actually reaches the wire is the caller's business.
    pub fn next_unsent(&mut self, now: Instant) -> Option<&Segment> {
        if !self.can_send() {
            return None;
        }
        let idx = self.next_seq as usize;
        self.last_sent[idx] = Some(now);
        self.next_seq += 1;
        debug_assert!(self.next_seq - self.base <= self.window_size);
        Some(&self.segments[idx])
    }

    /// Process a cumulative ACK carrying the receiver's next expected
    /// sequence number.
    ///
    /// Advances `base` and returns `true` when the window slid. Stale ACKs
    /// (`next_expected ≤ base`) and ACKs for segments never handed out
    /// (`next_expected > next_seq`) are ignored. In particular the value 0 —
    /// "nothing delivered yet" — can never advance the window, which is what
    /// disambiguates it from an acknowledgement of segment 0 (value 1).
    pub fn on_ack(&mut self, next_expected: u32) -> bool {
        if next_expected <= self.base || next_expected > self.next_seq {
            return false;
        }
        self.base = next_expected;
        true
    }

    /// `true` when the oldest outstanding segment has been unacknowledged
    /// for longer than `timeout`.
    ///
    /// Always `false` while nothing is in flight.
    pub fn timed_out(&self, now: Instant, timeout: Duration) -> bool {
        if self.base >= self.next_seq {
            return false;
        }
        match self.last_sent[self.base as usize] {
            Some(sent) => now.duration_since(sent) > timeout,
            None => false,
        }
    }

    /// Go-Back-N rewind: pull `next_seq` back to `base` so the fill loop
    /// retransmits every outstanding segment.
    ///
    /// Returns the number of segments that will be retransmitted, for the
    /// retransmission statistic.
    pub fn rewind(&mut self) -> u32 {
        let outstanding = self.next_seq - self.base;
        self.next_seq = self.base;
        outstanding
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: a window over `n` one-byte segments.
    fn window(n: u32, size: u32) -> SendWindow {
        let segments = (0..n).map(|i| Segment::new(i, vec![i as u8])).collect();
        SendWindow::new(segments, size)
    }

    #[test]
    fn initial_state() {
        let w = window(5, 4);
        assert_eq!(w.base(), 0);
        assert_eq!(w.total(), 5);
        assert_eq!(w.in_flight(), 0);
        assert!(w.can_send());
        assert!(!w.is_complete());
    }

    #[test]
    fn fill_stops_at_window_size() {
        let mut w = window(10, 4);
        let now = Instant::now();
        for expected in 0..4u32 {
            let seg = w.next_unsent(now).expect("window has room");
            assert_eq!(seg.seq, expected);
        }
        assert!(!w.can_send(), "window full at 4 in flight");
        assert!(w.next_unsent(now).is_none());
        assert_eq!(w.in_flight(), 4);
    }

    #[test]
    fn fill_stops_at_total() {
        let mut w = window(2, 8);
        let now = Instant::now();
        assert!(w.next_unsent(now).is_some());
        assert!(w.next_unsent(now).is_some());
        assert!(w.next_unsent(now).is_none(), "no segments beyond total");
    }

    #[test]
    fn ack_slides_window() {
        let mut w = window(10, 4);
        let now = Instant::now();
        for _ in 0..4 {
            let _ = w.next_unsent(now);
        }
        assert!(w.on_ack(2)); // segments 0 and 1 delivered
        assert_eq!(w.base(), 2);
        assert_eq!(w.in_flight(), 2);
        assert!(w.can_send(), "ack opened room for two more");
    }

    #[test]
    fn cumulative_ack_covers_whole_window() {
        let mut w = window(4, 4);
        let now = Instant::now();
        for _ in 0..4 {
            let _ = w.next_unsent(now);
        }
        assert!(w.on_ack(4));
        assert!(w.is_complete());
        assert_eq!(w.in_flight(), 0);
    }

    #[test]
    fn stale_ack_ignored() {
        let mut w = window(10, 4);
        let now = Instant::now();
        for _ in 0..4 {
            let _ = w.next_unsent(now);
        }
        w.on_ack(3);
        assert!(!w.on_ack(3), "duplicate ack must not slide");
        assert!(!w.on_ack(1), "older ack must not slide");
        assert_eq!(w.base(), 3);
    }

    #[test]
    fn ack_beyond_next_seq_ignored() {
        let mut w = window(10, 4);
        let _ = w.next_unsent(Instant::now());
        assert!(!w.on_ack(5), "ack for segments never handed out");
        assert_eq!(w.base(), 0);
    }

    #[test]
    fn nothing_delivered_ack_never_slides() {
        // The wire value 0 means "waiting for segment 0"; before this
        // representation was chosen, an ACK of 0 was conflated with an
        // acknowledgement of segment 0 and could desynchronise the window.
        let mut w = window(10, 4);
        let _ = w.next_unsent(Instant::now());
        assert!(!w.on_ack(0));
        assert_eq!(w.base(), 0);
    }

    #[test]
    fn timeout_only_with_outstanding_segments() {
        let mut w = window(3, 4);
        let timeout = Duration::from_millis(100);
        let start = Instant::now();
        assert!(!w.timed_out(start, timeout), "nothing in flight yet");

        let _ = w.next_unsent(start);
        let late = start + Duration::from_millis(250);
        assert!(w.timed_out(late, timeout));
        assert!(!w.timed_out(start + Duration::from_millis(50), timeout));

        w.on_ack(1);
        assert!(!w.timed_out(late, timeout), "acked base cannot time out");
    }

    #[test]
    fn rewind_resets_next_seq_and_counts_outstanding() {
        let mut w = window(10, 4);
        let now = Instant::now();
        for _ in 0..4 {
            let _ = w.next_unsent(now);
        }
        w.on_ack(1);
        assert_eq!(w.rewind(), 3, "three segments were outstanding");
        assert_eq!(w.in_flight(), 0);

        // The fill loop now re-hands-out from base.
        let seg = w.next_unsent(now).unwrap();
        assert_eq!(seg.seq, 1);
    }

    #[test]
    fn rewind_near_end_of_transfer() {
        // Last window is smaller than N; only the outstanding tail counts.
        let mut w = window(5, 4);
        let now = Instant::now();
        for _ in 0..4 {
            let _ = w.next_unsent(now);
        }
        w.on_ack(4);
        let _ = w.next_unsent(now); // segment 4, the only one left
        assert_eq!(w.rewind(), 1);
    }

    #[test]
    fn single_segment_transfer() {
        let mut w = window(1, 4);
        let _ = w.next_unsent(Instant::now());
        assert!(!w.can_send());
        assert!(w.on_ack(1));
        assert!(w.is_complete());
    }
}
