//! Sender engine: segmentation, transfer loop, statistics.
//!
//! [`Sender::transfer`] drives one complete file transfer:
//!
//! 1. Split the input into at most [`MAX_SEGMENT_SIZE`]-byte segments (an
//!    empty input still produces one empty segment, so at least one round
//!    trip always happens) and pre-build every [`Segment`] up front.
//! 2. Loop until the window reports completion:
//!    a. Fill the window — hand out segments through the impairment layer.
//!    b. Poll for an ACK with a short bound so window-filling and
//!       ack-draining interleave instead of blocking on one another.
//!    c. Slide the window on a fresh cumulative ACK; ignore stale ones.
//!    d. When the oldest outstanding segment times out, rewind the window
//!       (go back N) so the next fill pass retransmits all of it.
//! 3. Report [`TransferStats`].
//!
//! Mid-transfer socket errors are absorbed as loss — the ARQ machinery
//! already covers them. Only socket *creation* failures are fatal, and those
//! happen before a [`Sender`] exists.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::packet::{Segment, MAX_SEGMENT_SIZE};
use crate::simulator::Impairment;
use crate::socket::RdtSocket;
use crate::window::SendWindow;

// ---------------------------------------------------------------------------
// Configuration & statistics
// ---------------------------------------------------------------------------

/// Tunables for one transfer. `Default` carries the protocol's stock values.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Go-Back-N window size (N).
    pub window_size: u32,
    /// How long the oldest outstanding segment may go unacknowledged before
    /// the whole window is retransmitted.
    pub retransmit_timeout: Duration,
    /// Bound on each ACK poll, so the loop keeps interleaving sends and
    /// receives.
    pub ack_poll: Duration,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            window_size: 4,
            retransmit_timeout: Duration::from_millis(1000),
            ack_poll: Duration::from_millis(10),
        }
    }
}

/// What one completed transfer looked like.
#[derive(Debug, Clone)]
pub struct TransferStats {
    /// Number of segments the input was split into.
    pub total_packets: u32,
    /// Segments counted for retransmission by window rewinds.
    pub retransmissions: u64,
    /// Wall-clock duration of the transfer.
    pub elapsed: Duration,
    /// Payload throughput in KB/s (1 KB = 1024 bytes).
    pub throughput_kbps: f64,
}

impl TransferStats {
    /// Retransmissions as a percentage of the segment count.
    pub fn loss_rate(&self) -> f64 {
        if self.total_packets == 0 {
            0.0
        } else {
            self.retransmissions as f64 / self.total_packets as f64 * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Split `data` into consecutive segments of at most [`MAX_SEGMENT_SIZE`]
/// bytes, numbered from 0.
///
/// `ceil(len / 1024)` segments come out, except that an empty input yields
/// exactly one empty segment.
pub fn segment(data: &[u8]) -> Vec<Segment> {
    if data.is_empty() {
        return vec![Segment::new(0, Vec::new())];
    }
    data.chunks(MAX_SEGMENT_SIZE)
        .enumerate()
        .map(|(i, chunk)| Segment::new(i as u32, chunk.to_vec()))
        .collect()
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Sender engine for one destination.
pub struct Sender {
    socket: RdtSocket,
    dest: SocketAddr,
    config: SenderConfig,
    impairment: Box<dyn Impairment>,
}

impl Sender {
    /// Build a sender over an already-bound socket.
    pub fn new(
        socket: RdtSocket,
        dest: SocketAddr,
        config: SenderConfig,
        impairment: Box<dyn Impairment>,
    ) -> Self {
        Self {
            socket,
            dest,
            config,
            impairment,
        }
    }

    /// Transfer `data` to the destination, blocking until every segment has
    /// been cumulatively acknowledged.
    pub async fn transfer(&mut self, data: &[u8]) -> TransferStats {
        let mut window = SendWindow::new(segment(data), self.config.window_size);
        let total = window.total();
        let mut retransmissions: u64 = 0;
        let start = Instant::now();

        log::debug!(
            "[send] transfer start: {} byte(s), {} segment(s), window {}",
            data.len(),
            total,
            self.config.window_size
        );

        while !window.is_complete() {
            // ── Fill the window ──────────────────────────────────────────
            while let Some(seg) = window.next_unsent(Instant::now()) {
                if self.impairment.should_drop() {
                    log::debug!("[send] ✗ DATA seq={} dropped (simulated loss)", seg.seq);
                    continue;
                }
                if let Some(delay) = self.impairment.delay() {
                    log::debug!("[send] DATA seq={} delayed {:?}", seg.seq, delay);
                    tokio::time::sleep(delay).await;
                }
                match self.socket.send_segment(seg, self.dest).await {
                    Ok(()) => {
                        log::debug!("[send] → DATA seq={} len={}", seg.seq, seg.payload.len());
                    }
                    Err(e) => {
                        // Treated as loss; the retransmit timer recovers it.
                        log::debug!("[send] send failed for seq={}: {e}", seg.seq);
                    }
                }
            }

            // ── Drain one ACK with a short bound ─────────────────────────
            match tokio::time::timeout(self.config.ack_poll, self.socket.recv_ack()).await {
                Ok(Ok((ack, addr))) if addr == self.dest => {
                    if window.on_ack(ack.next_expected) {
                        log::debug!(
                            "[send] ← ACK next={} new base={}",
                            ack.next_expected,
                            window.base()
                        );
                    } else {
                        log::debug!("[send] ← ACK next={} (stale, ignored)", ack.next_expected);
                    }
                }
                Ok(Ok((_, addr))) => {
                    log::debug!("[send] datagram from unexpected peer {addr} ignored");
                }
                Ok(Err(e)) => {
                    log::debug!("[send] recv error: {e} (ignored)");
                }
                Err(_elapsed) => {} // poll bound expired; go fill / check timer
            }

            // ── Retransmit timeout on the window base ────────────────────
            if window.timed_out(Instant::now(), self.config.retransmit_timeout) {
                let resent = window.rewind();
                retransmissions += u64::from(resent);
                log::debug!(
                    "[send] timeout on seq={} — rewinding window, {} segment(s) to retransmit",
                    window.base(),
                    resent
                );
            }
        }

        let elapsed = start.elapsed();
        let secs = elapsed.as_secs_f64();
        let throughput_kbps = if secs > 0.0 {
            data.len() as f64 / secs / 1024.0
        } else {
            0.0
        };
        log::debug!(
            "[send] transfer complete: {} segment(s), {} retransmission(s), {:.3}s",
            total,
            retransmissions,
            secs
        );

        TransferStats {
            total_packets: total,
            retransmissions,
            elapsed,
            throughput_kbps,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segmentation_is_deterministic() {
        let data = vec![0xabu8; 2500];
        let segs = segment(&data);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].payload.len(), 1024);
        assert_eq!(segs[1].payload.len(), 1024);
        assert_eq!(segs[2].payload.len(), 452);
        for (i, s) in segs.iter().enumerate() {
            assert_eq!(s.seq, i as u32);
        }
    }

    #[test]
    fn empty_input_yields_one_empty_segment() {
        let segs = segment(&[]);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].seq, 0);
        assert!(segs[0].payload.is_empty());
    }

    #[test]
    fn exact_multiple_of_segment_size() {
        let segs = segment(&vec![1u8; MAX_SEGMENT_SIZE * 2]);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].payload.len(), MAX_SEGMENT_SIZE);
    }

    #[test]
    fn one_byte_over_a_boundary() {
        let segs = segment(&vec![1u8; MAX_SEGMENT_SIZE + 1]);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].payload.len(), 1);
    }

    #[test]
    fn segments_concatenate_back_to_input() {
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        let joined: Vec<u8> = segment(&data)
            .into_iter()
            .flat_map(|s| s.payload)
            .collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn loss_rate_is_percentage_of_total() {
        let stats = TransferStats {
            total_packets: 4,
            retransmissions: 2,
            elapsed: Duration::from_secs(1),
            throughput_kbps: 0.0,
        };
        assert!((stats.loss_rate() - 50.0).abs() < f64::EPSILON);
    }
}
