//! Frame model and wire header layout.
//!
//! A frame is the unit of data exchanged between the session multiplexer
//! and the codec. On the wire it is preceded by a fixed 14-byte header:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Stream ID (4) │ Seq (8) │ Closing (1) │ Extra Len (1)    │
//! ├──────────────────────────────────────────────────────────┤
//! │ Payload + AEAD tag or padding (variable)                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte fields are big-endian. The header only ever exists
//! inside the encode/decode buffer; it is written and consumed per frame.

use bytes::Bytes;

/// Stream identifier type.
pub type StreamId = u32;

/// Wire header size in bytes.
pub const HEADER_LEN: usize = 14;

/// `closing` values understood by the session layer.
///
/// The codec passes the byte through verbatim; these constants are the
/// vocabulary the multiplexer on each end agrees on.
pub mod closing {
    /// Frame carries data only
    pub const NOTHING: u8 = 0x00;
    /// Sender is closing this stream
    pub const STREAM: u8 = 0x01;
    /// Sender is closing the whole session
    pub const SESSION: u8 = 0x02;
}

/// A multiplexed-session frame.
///
/// The pair `(stream_id, seq)` is used directly as the AEAD nonce and must
/// never repeat for the lifetime of a session key. Enforcing that is the
/// caller's responsibility; a repeat under the same key breaks the
/// confidentiality and integrity of the affected frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Logical stream within the multiplexed session
    pub stream_id: StreamId,
    /// Strictly-increasing counter assigned by the multiplexer
    pub seq: u64,
    /// Stream-close signal, see [`closing`]
    pub closing: u8,
    /// Opaque payload bytes
    pub payload: Bytes,
}

impl Frame {
    /// Create a data frame.
    pub fn data(stream_id: StreamId, seq: u64, payload: impl Into<Bytes>) -> Self {
        Self {
            stream_id,
            seq,
            closing: closing::NOTHING,
            payload: payload.into(),
        }
    }

    /// Set the closing byte.
    pub fn with_closing(mut self, closing: u8) -> Self {
        self.closing = closing;
        self
    }
}

/// Write the 14-byte wire header for `frame` into `header`.
///
/// `header` must be exactly [`HEADER_LEN`] bytes.
pub(crate) fn write_header(header: &mut [u8], frame: &Frame, extra_len: u8) {
    header[0..4].copy_from_slice(&frame.stream_id.to_be_bytes());
    header[4..12].copy_from_slice(&frame.seq.to_be_bytes());
    header[12] = frame.closing;
    header[13] = extra_len;
}

/// Read the wire header fields back out of `header`.
///
/// Returns `(stream_id, seq, closing, extra_len)`.
pub(crate) fn read_header(header: &[u8]) -> (StreamId, u64, u8, u8) {
    let stream_id = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    let seq = u64::from_be_bytes([
        header[4], header[5], header[6], header[7], header[8], header[9], header[10], header[11],
    ]);
    (stream_id, seq, header[12], header[13])
}
