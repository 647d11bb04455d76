//! Async UDP socket abstraction.
//!
//! [`RdtSocket`] is a thin wrapper around `tokio::net::UdpSocket` that speaks
//! [`Segment`] and [`Ack`] instead of raw bytes. All protocol logic lives
//! elsewhere; this module owns only byte I/O.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::UdpSocket;

use crate::packet::{Ack, PacketError, Segment, MAX_DATAGRAM};

/// Errors that can arise from socket operations.
#[derive(Debug, Error)]
pub enum SocketError {
    /// Underlying I/O error from the OS.
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The received datagram could not be decoded.
    #[error("packet decode error: {0}")]
    Packet(#[from] PacketError),
}

/// An async, datagram-oriented UDP socket.
///
/// All methods are `&self` so the socket can be shared if needed.
#[derive(Debug)]
pub struct RdtSocket {
    /// Address this socket is bound to (filled in after OS assigns ephemeral port).
    pub local_addr: SocketAddr,
    inner: UdpSocket,
}

impl RdtSocket {
    /// Bind a new socket to `local_addr`.
    ///
    /// Passing port `0` lets the OS choose an ephemeral port.
    pub async fn bind(local_addr: SocketAddr) -> Result<Self, SocketError> {
        let inner = UdpSocket::bind(local_addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self { local_addr, inner })
    }

    /// Encode `segment` and send it as a single UDP datagram to `dest`.
    pub async fn send_segment(&self, segment: &Segment, dest: SocketAddr) -> Result<(), SocketError> {
        self.inner.send_to(&segment.encode(), dest).await?;
        Ok(())
    }

    /// Encode `ack` and send it as a single UDP datagram to `dest`.
    pub async fn send_ack(&self, ack: Ack, dest: SocketAddr) -> Result<(), SocketError> {
        self.inner.send_to(&ack.encode(), dest).await?;
        Ok(())
    }

    /// Receive the next datagram and decode it as a [`Segment`].
    ///
    /// Returns `(segment, sender_address)`. Datagrams that fail to decode are
    /// returned as `Err` — the caller decides whether to keep waiting.
    pub async fn recv_segment(&self) -> Result<(Segment, SocketAddr), SocketError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        let segment = Segment::decode(&buf[..n])?;
        Ok((segment, addr))
    }

    /// Receive the next datagram and decode it as an [`Ack`].
    pub async fn recv_ack(&self) -> Result<(Ack, SocketAddr), SocketError> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        let ack = Ack::decode(&buf[..n])?;
        Ok((ack, addr))
    }
}
