//! Frame obfuscation codec.
//!
//! This module turns multiplexed-session frames into wire messages that
//! an observer cannot parse or tamper with:
//!
//! 1. **Payload protection**: AEAD encryption (or plaintext with tail
//!    padding for the `plain` method), with `stream_id || seq` as the nonce
//!    so the header fields are bound into the authentication tag
//! 2. **Header masking**: the 14-byte header is XORed with a Salsa20
//!    keystream whose nonce is the last 8 bytes of the payload region
//! 3. **Record disguise**: an optional TLS application-data prefix makes
//!    each message look like an ordinary encrypted-transport record
//!
//! [`Obfuscator`] is the only entry point; it pairs a matched
//! encoder/decoder with the session key so callers cannot mix a masking
//! key with the wrong payload cipher.

mod codec;
mod frame;
mod record;

pub use frame::{closing, Frame, StreamId, HEADER_LEN};
pub use record::RECORD_PREFIX_LEN;

use std::fmt;

use tracing::debug;

use crate::crypto::{CipherSuite, EncryptionMethod, SessionKey, SESSION_KEY_SIZE};
use crate::error::Result;

/// A paired frame encoder/decoder for one session.
///
/// Immutable after construction: the cipher suite and keys never change,
/// so one instance can be shared freely across concurrent encode and
/// decode calls.
pub struct Obfuscator {
    suite: CipherSuite,
    session_key: SessionKey,
}

impl fmt::Debug for Obfuscator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Obfuscator")
            .field("method", &self.suite.method())
            .field("record_layer", &self.suite.record_layer())
            .finish_non_exhaustive()
    }
}

impl Obfuscator {
    /// Build an obfuscator from an encryption method, a 32-byte session
    /// key, and the record-disguise flag.
    ///
    /// Fails if the key is not exactly 32 bytes or the payload cipher
    /// rejects it.
    pub fn build(
        method: EncryptionMethod,
        session_key: &[u8],
        record_layer: bool,
    ) -> Result<Self> {
        let session_key = SessionKey::try_from_slice(session_key)?;
        let suite = CipherSuite::new(method, &session_key, record_layer)?;
        debug!(%method, record_layer, "built frame obfuscator");
        Ok(Self { suite, session_key })
    }

    /// Encode `frame` into `buf`, returning the number of bytes written.
    ///
    /// Writes only within `buf[..n]`; on [`crate::Error::BufferTooSmall`]
    /// nothing has been written and the caller can retry with a larger
    /// buffer (see [`encoded_len`](Self::encoded_len)).
    pub fn encode(&self, frame: &Frame, buf: &mut [u8]) -> Result<usize> {
        codec::encode_frame(&self.suite, frame, buf)
    }

    /// Decode one wire message back into a [`Frame`].
    ///
    /// Returns either a fully valid frame or an error, never a partial
    /// result. The input is not mutated.
    pub fn decode(&self, input: &[u8]) -> Result<Frame> {
        codec::decode_frame(&self.suite, input)
    }

    /// Exact number of bytes [`encode`](Self::encode) writes for a payload
    /// of the given length.
    ///
    /// Lets callers size a buffer once and reuse it across frames.
    pub fn encoded_len(&self, payload_len: usize) -> usize {
        let prefix_len = if self.suite.record_layer() {
            RECORD_PREFIX_LEN
        } else {
            0
        };
        prefix_len
            + HEADER_LEN
            + payload_len
            + self.suite.payload().extra_len(payload_len) as usize
    }

    /// The payload encryption method this session runs.
    pub fn method(&self) -> EncryptionMethod {
        self.suite.method()
    }

    /// Whether encoded messages carry the fake record prefix.
    pub fn record_layer(&self) -> bool {
        self.suite.record_layer()
    }

    /// The raw session key, for the caller's out-of-band bookkeeping
    /// (e.g. re-key scheduling).
    ///
    /// # Security
    ///
    /// Handle with care - this is secret key material.
    pub fn session_key(&self) -> &[u8; SESSION_KEY_SIZE] {
        self.session_key.as_bytes()
    }
}
