//! # Shroud
//!
//! A traffic-obfuscation codec for frames of a multiplexed session.
//! Frames are cryptographically protected and optionally disguised as
//! generic encrypted-transport records, so that the stream protocol
//! carrying them is indistinguishable from ordinary encrypted traffic
//! and its per-frame metadata (stream identity, sequence number, close
//! signal) can be neither read nor tampered with.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐  Frame   ┌─────────────────────────────┐  bytes  ┌───────────┐
//! │ Multiplexer├─────────►│ Obfuscator                  ├────────►│ Transport │
//! │ (external) │◄─────────┤  payload seal / tail pad    │◄────────┤ (external)│
//! └────────────┘  Frame   │  Salsa20 header mask        │  bytes  └───────────┘
//!                         │  fake TLS record prefix     │
//!                         └─────────────────────────────┘
//! ```
//!
//! The codec is pure and synchronous: no internal state beyond the
//! immutable keys captured at construction, no I/O, no background work.
//! Session-key establishment, stream multiplexing, and the transport
//! itself are external collaborators.
//!
//! ## Example
//!
//! ```
//! use shroud::{EncryptionMethod, Frame, Obfuscator};
//!
//! # fn main() -> shroud::Result<()> {
//! let session_key = [0x42u8; 32];
//! let obfs = Obfuscator::build(EncryptionMethod::ChaCha20Poly1305, &session_key, true)?;
//!
//! let frame = Frame::data(1, 0, &b"hello"[..]);
//! let mut buf = vec![0u8; obfs.encoded_len(frame.payload.len())];
//! let n = obfs.encode(&frame, &mut buf)?;
//!
//! let decoded = obfs.decode(&buf[..n])?;
//! assert_eq!(decoded, frame);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod crypto;
pub mod error;
pub mod obfs;

pub use crypto::{EncryptionMethod, SessionKey, SESSION_KEY_SIZE};
pub use error::{Error, Result};
pub use obfs::{closing, Frame, Obfuscator, StreamId, HEADER_LEN, RECORD_PREFIX_LEN};
