//! Wire-format definitions for protocol datagrams.
//!
//! Two datagram kinds travel between the peers:
//! - [`Segment`] — a data packet carrying one chunk of the file.
//! - [`Ack`] — a cumulative acknowledgement.
//!
//! No I/O happens here — this is pure data transformation.
//!
//! # Wire format
//!
//! All multi-byte integers are **big-endian**.
//!
//! ```text
//!  0               1               2               3
//!  0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                        Sequence Number                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Payload (0..=1024 bytes) ...             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! An ACK is exactly 4 bytes: the **next expected** sequence number. The
//! value 0 therefore unambiguously means "nothing delivered yet"; the
//! acknowledgement of segment 0 is the value 1. There is no checksum field
//! and no length prefix — the payload is whatever follows the header.

use thiserror::Error;

/// Byte length of the fixed-size header on the wire.
pub const HEADER_LEN: usize = 4;

/// Maximum payload bytes carried by a single [`Segment`].
pub const MAX_SEGMENT_SIZE: usize = 1024;

/// Largest datagram either peer will ever produce.
pub const MAX_DATAGRAM: usize = HEADER_LEN + MAX_SEGMENT_SIZE;

/// Errors that can arise when parsing a raw datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// Buffer shorter than the fixed header size.
    #[error("datagram too short to contain a {HEADER_LEN}-byte header")]
    Truncated,
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A data packet: sequence number + one chunk of the file.
///
/// Segments are immutable once constructed; identity is the sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Sequence number of this segment (`0..total_packets`).
    pub seq: u32,
    /// Payload bytes, `0..=MAX_SEGMENT_SIZE` of them.
    pub payload: Vec<u8>,
}

impl Segment {
    /// Build a segment.
    ///
    /// The caller is responsible for keeping `payload` within
    /// [`MAX_SEGMENT_SIZE`]; the codec never fragments — splitting the input
    /// into segments is the sender engine's job.
    pub fn new(seq: u32, payload: Vec<u8>) -> Self {
        debug_assert!(payload.len() <= MAX_SEGMENT_SIZE);
        Self { seq, payload }
    }

    /// Serialise this segment into a newly allocated byte vector of
    /// `HEADER_LEN + payload.len()` bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(&self.seq.to_be_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Parse a [`Segment`] from a raw byte slice.
    ///
    /// The payload is everything after the header (possibly empty). Returns
    /// [`PacketError::Truncated`] when fewer than [`HEADER_LEN`] bytes are
    /// supplied.
    pub fn decode(buf: &[u8]) -> Result<Self, PacketError> {
        if buf.len() < HEADER_LEN {
            return Err(PacketError::Truncated);
        }
        let seq = u32::from_be_bytes(buf[..HEADER_LEN].try_into().unwrap());
        Ok(Self {
            seq,
            payload: buf[HEADER_LEN..].to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Ack
// ---------------------------------------------------------------------------

/// A cumulative acknowledgement.
///
/// `next_expected = K` means "every segment with sequence number `< K` has
/// been delivered in order" — the receiver is now waiting for segment `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Next sequence number the receiver expects.
    pub next_expected: u32,
}

impl Ack {
    /// Serialise into exactly 4 bytes.
    pub fn encode(self) -> [u8; HEADER_LEN] {
        self.next_expected.to_be_bytes()
    }

    /// Parse an [`Ack`] from a raw byte slice.
    ///
    /// Returns [`PacketError::Truncated`] when fewer than 4 bytes are
    /// supplied; any trailing bytes are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, PacketError> {
        if buf.len() < HEADER_LEN {
            return Err(PacketError::Truncated);
        }
        Ok(Self {
            next_expected: u32::from_be_bytes(buf[..HEADER_LEN].try_into().unwrap()),
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_roundtrip() {
        let seg = Segment::new(42, b"hello".to_vec());
        let decoded = Segment::decode(&seg.encode()).unwrap();
        assert_eq!(decoded, seg);
    }

    #[test]
    fn segment_seq_big_endian_on_wire() {
        let bytes = Segment::new(0x0102_0304, vec![]).encode();
        assert_eq!(&bytes, &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn segment_encoded_length() {
        let bytes = Segment::new(7, vec![0u8; 452]).encode();
        assert_eq!(bytes.len(), HEADER_LEN + 452);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let seg = Segment::new(0, vec![]);
        let bytes = seg.encode();
        assert_eq!(bytes.len(), HEADER_LEN);
        let decoded = Segment::decode(&bytes).unwrap();
        assert!(decoded.payload.is_empty());
        assert_eq!(decoded.seq, 0);
    }

    #[test]
    fn segment_decode_short_buffer() {
        assert_eq!(Segment::decode(&[]), Err(PacketError::Truncated));
        assert_eq!(Segment::decode(&[1, 2, 3]), Err(PacketError::Truncated));
    }

    #[test]
    fn ack_roundtrip() {
        let ack = Ack { next_expected: 1000 };
        assert_eq!(Ack::decode(&ack.encode()).unwrap(), ack);
    }

    #[test]
    fn ack_is_exactly_four_bytes() {
        assert_eq!(Ack { next_expected: u32::MAX }.encode().len(), HEADER_LEN);
    }

    #[test]
    fn ack_decode_short_buffer() {
        assert_eq!(Ack::decode(&[0, 0, 0]), Err(PacketError::Truncated));
    }

    #[test]
    fn ack_decode_ignores_trailing_bytes() {
        let ack = Ack::decode(&[0, 0, 0, 5, 0xff, 0xff]).unwrap();
        assert_eq!(ack.next_expected, 5);
    }
}
