//! Receiver engine: delivery loop and ACK emission.
//!
//! [`Receiver::receive`] loops on the socket with a bounded wait:
//!
//! - An in-order segment is appended to the output sink and flushed
//!   immediately, so an interrupted transfer leaves a valid prefix of the
//!   original file behind.
//! - Duplicates and premature arrivals are discarded without touching state.
//! - Every received segment — accepted or not — is answered with exactly one
//!   cumulative ACK, sent through the impairment layer to the segment's
//!   source address (so ACKs, too, can be dropped or delayed).
//! - Malformed datagrams (shorter than the header) are ignored and not
//!   acknowledged.
//!
//! Silence for the inactivity timeout ends the session: success if any
//! segment was ever received, [`ReceiveError::NoData`] otherwise. This is a
//! heuristic, not an end-of-stream signal — the protocol has no FIN.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::reassembly::Reassembly;
use crate::simulator::Impairment;
use crate::socket::{RdtSocket, SocketError};

/// Tunables for one receive session.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// How long the socket may stay silent before the session ends.
    pub inactivity_timeout: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(5),
        }
    }
}

/// Errors that end a receive session abnormally.
#[derive(Debug, Error)]
pub enum ReceiveError {
    /// The inactivity timeout expired before any segment arrived.
    #[error("no data received within the inactivity timeout")]
    NoData,
    /// Writing or flushing the output sink failed.
    #[error("output sink error: {0}")]
    Sink(#[from] std::io::Error),
}

/// Receiver engine for one transfer.
pub struct Receiver {
    socket: RdtSocket,
    config: ReceiverConfig,
    impairment: Box<dyn Impairment>,
}

impl Receiver {
    /// Build a receiver over an already-bound socket.
    pub fn new(socket: RdtSocket, config: ReceiverConfig, impairment: Box<dyn Impairment>) -> Self {
        Self {
            socket,
            config,
            impairment,
        }
    }

    /// Run the delivery loop, writing the reassembled byte stream to `sink`.
    ///
    /// Returns the number of payload bytes delivered. The sink is flushed
    /// after every in-order delivery.
    pub async fn receive<W>(&mut self, sink: &mut W) -> Result<u64, ReceiveError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut state = Reassembly::new();
        let mut delivered_bytes: u64 = 0;
        let mut received_any = false;

        loop {
            let recv = tokio::time::timeout(
                self.config.inactivity_timeout,
                self.socket.recv_segment(),
            )
            .await;

            let (seg, from) = match recv {
                Err(_elapsed) => {
                    if received_any {
                        log::debug!("[recv] inactivity — assuming end of transmission");
                        return Ok(delivered_bytes);
                    }
                    return Err(ReceiveError::NoData);
                }
                Ok(Err(SocketError::Packet(e))) => {
                    // Shorter than the header: drop silently, no ACK.
                    log::debug!("[recv] malformed datagram ignored: {e}");
                    continue;
                }
                Ok(Err(SocketError::Io(e))) => {
                    // Transient receive failures are treated as loss.
                    log::debug!("[recv] recv error: {e} (ignored)");
                    continue;
                }
                Ok(Ok(pair)) => pair,
            };

            received_any = true;

            if state.on_segment(seg.seq) {
                sink.write_all(&seg.payload).await?;
                sink.flush().await?;
                delivered_bytes += seg.payload.len() as u64;
                log::debug!(
                    "[recv] ✓ DATA seq={} len={} delivered",
                    seg.seq,
                    seg.payload.len()
                );
            } else {
                log::debug!(
                    "[recv] DATA seq={} discarded (expecting {})",
                    seg.seq,
                    state.ack().next_expected
                );
            }

            // Exactly one (possibly impaired) ACK per received segment.
            let ack = state.ack();
            if self.impairment.should_drop() {
                log::debug!("[recv] ✗ ACK next={} dropped (simulated loss)", ack.next_expected);
                continue;
            }
            if let Some(delay) = self.impairment.delay() {
                log::debug!("[recv] ACK next={} delayed {:?}", ack.next_expected, delay);
                tokio::time::sleep(delay).await;
            }
            match self.socket.send_ack(ack, from).await {
                Ok(()) => log::debug!("[recv] → ACK next={}", ack.next_expected),
                Err(e) => log::debug!("[recv] ack send failed: {e} (treated as loss)"),
            }
        }
    }
}
