//! `rdt-over-udp` — reliable, in-order file transfer over a lossy UDP channel.
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────┐  DATA segments  ┌────────────┐
//!  │  Sender  │────────────────▶│  Receiver  │
//!  └────┬─────┘                 └─────┬──────┘
//!       │                             │
//!       │     cumulative ACKs         │
//!       │◀────────────────────────────┘
//!       │
//!  ┌────▼──────────────────────────────────┐
//!  │            Simulator                  │
//!  │ (probabilistic loss / delay, applied  │
//!  │  independently on both directions)    │
//!  └────┬──────────────────────────────────┘
//!       │ raw UDP datagrams
//!  ┌────▼──────┐
//!  │ RdtSocket │  (thin async wrapper around tokio UdpSocket)
//!  └───────────┘
//! ```
//!
//! The sender splits its input into fixed-size segments and drives a
//! Go-Back-N sliding window: up to `window_size` segments are in flight at
//! once, a single timer watches the oldest unacknowledged segment, and a
//! timeout rewinds the window so every outstanding segment is retransmitted.
//! The receiver delivers segments strictly in order, discards duplicates and
//! premature arrivals, and answers every received segment with a cumulative
//! acknowledgement. Both directions pass through an impairment simulator so
//! the retry machinery is actually exercised.
//!
//! Each module has a single responsibility:
//! - [`packet`]     — wire format (serialise / deserialise)
//! - [`simulator`]  — probabilistic loss / delay injection
//! - [`socket`]     — async UDP socket abstraction
//! - [`window`]     — Go-Back-N outbound window state machine
//! - [`reassembly`] — in-order inbound state machine
//! - [`sender`]     — sender engine (segmentation, transfer loop, statistics)
//! - [`receiver`]   — receiver engine (delivery loop, ACK emission)
//!
//! # Known limitations
//!
//! There is no payload integrity check anywhere in the pipeline: a datagram
//! corrupted in flight is delivered as-is. End of transfer is inferred from
//! an inactivity timeout on the receiver, not signalled explicitly — there is
//! no FIN/termination handshake.

pub mod packet;
pub mod reassembly;
pub mod receiver;
pub mod sender;
pub mod simulator;
pub mod socket;
pub mod window;

pub use packet::{HEADER_LEN, MAX_SEGMENT_SIZE};
