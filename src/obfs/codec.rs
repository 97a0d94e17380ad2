//! Frame encode/decode pipelines.
//!
//! Encoding runs as a strict two-phase pipeline: the payload region is
//! produced first (sealed ciphertext, or plaintext plus random padding),
//! then its last 8 bytes become the Salsa20 nonce that masks the 14-byte
//! header. Decoding reads the nonce from the still-masked tail before
//! recovering the header. The tail lies outside the header region, so it
//! is untouched by the masking itself; that data dependency is
//! load-bearing and the phases must not be reordered.
//!
//! Encode writes entirely within the caller's buffer and performs no
//! allocation; decode allocates one working copy of the input.

use bytes::BytesMut;
use chacha20poly1305::aead::AeadInPlace;
use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;

use crate::crypto::{
    open_detached, seal_detached, CipherSuite, PayloadCipher, SecureRandom, AEAD_NONCE_SIZE,
    AEAD_TAG_SIZE, MASK_NONCE_SIZE, SESSION_KEY_SIZE,
};
use crate::error::{Error, Result};
use crate::obfs::frame::{read_header, write_header, Frame, HEADER_LEN};
use crate::obfs::record::{write_record_prefix, RECORD_PREFIX_LEN};

/// Apply the Salsa20 keystream to the header bytes in place.
///
/// XOR masking: the same call both masks and unmasks.
fn mask_header(
    key: &[u8; SESSION_KEY_SIZE],
    nonce: &[u8; MASK_NONCE_SIZE],
    header: &mut [u8],
) {
    let mut cipher = Salsa20::new(key.into(), nonce.into());
    cipher.apply_keystream(header);
}

/// Encode `frame` into `buf`, returning the number of bytes written.
///
/// On [`Error::BufferTooSmall`] nothing has been written.
pub(crate) fn encode_frame(suite: &CipherSuite, frame: &Frame, buf: &mut [u8]) -> Result<usize> {
    let prefix_len = if suite.record_layer() {
        RECORD_PREFIX_LEN
    } else {
        0
    };
    let payload_len = frame.payload.len();
    let extra_len = suite.payload().extra_len(payload_len);
    let body_len = HEADER_LEN + payload_len + extra_len as usize;
    let useful_len = prefix_len + body_len;

    if buf.len() < useful_len {
        return Err(Error::BufferTooSmall {
            required: useful_len,
            available: buf.len(),
        });
    }

    let useful = &mut buf[..useful_len];
    let (prefix, rest) = useful.split_at_mut(prefix_len);
    let (header, body) = rest.split_at_mut(HEADER_LEN);

    write_header(header, frame, extra_len);

    // Phase one: produce the payload region. The AEAD nonce is the header's
    // first 12 bytes (stream_id || seq), binding both into the tag.
    match suite.payload() {
        PayloadCipher::Plain => {
            body[..payload_len].copy_from_slice(&frame.payload);
            if extra_len > 0 {
                // Random tail so the mask nonce below never runs short
                SecureRandom::fill(&mut body[payload_len..]);
            }
        }
        PayloadCipher::AesGcm(cipher) => {
            let (ciphertext, tag_region) = body.split_at_mut(payload_len);
            ciphertext.copy_from_slice(&frame.payload);
            let tag = seal_detached(cipher, &header[..AEAD_NONCE_SIZE], ciphertext)?;
            tag_region.copy_from_slice(tag.as_slice());
        }
        PayloadCipher::ChaCha(cipher) => {
            let (ciphertext, tag_region) = body.split_at_mut(payload_len);
            ciphertext.copy_from_slice(&frame.payload);
            let tag = seal_detached(cipher, &header[..AEAD_NONCE_SIZE], ciphertext)?;
            tag_region.copy_from_slice(tag.as_slice());
        }
    }

    // Phase two: mask the header, keyed on the tail of the region just
    // written.
    let mut nonce = [0u8; MASK_NONCE_SIZE];
    nonce.copy_from_slice(&body[body.len() - MASK_NONCE_SIZE..]);
    mask_header(suite.mask_key(), &nonce, header);

    if !prefix.is_empty() {
        write_record_prefix(prefix, body_len);
    }

    Ok(useful_len)
}

/// Decode one obfuscated message back into a [`Frame`].
///
/// The input is copied into a working buffer before the header is
/// de-masked in place, so the caller's bytes are never mutated.
pub(crate) fn decode_frame(suite: &CipherSuite, input: &[u8]) -> Result<Frame> {
    let prefix_len = if suite.record_layer() {
        RECORD_PREFIX_LEN
    } else {
        0
    };
    let min_len = prefix_len + HEADER_LEN + MASK_NONCE_SIZE;
    if input.len() < min_len {
        return Err(Error::InputTooShort {
            required: min_len,
            actual: input.len(),
        });
    }

    // The record length field is ignored here; record framing is the
    // transport's concern and only the prefix's presence is consumed.
    let mut working = BytesMut::from(&input[prefix_len..]);

    // Recover the mask nonce from the tail before touching the header.
    let mut nonce = [0u8; MASK_NONCE_SIZE];
    nonce.copy_from_slice(&working[working.len() - MASK_NONCE_SIZE..]);

    let mut body = working.split_off(HEADER_LEN);
    let header = &mut working[..];
    mask_header(suite.mask_key(), &nonce, header);

    let (stream_id, seq, closing, extra_len) = read_header(header);

    let payload_len = body
        .len()
        .checked_sub(extra_len as usize)
        .ok_or(Error::CorruptExtraLen {
            declared: extra_len as usize,
            available: body.len(),
        })?;

    let payload = match suite.payload() {
        PayloadCipher::Plain => {
            body.truncate(payload_len);
            body.freeze()
        }
        PayloadCipher::AesGcm(cipher) => {
            open_body(cipher, header, &mut body)?;
            body.truncate(payload_len);
            body.freeze()
        }
        PayloadCipher::ChaCha(cipher) => {
            open_body(cipher, header, &mut body)?;
            body.truncate(payload_len);
            body.freeze()
        }
    };

    Ok(Frame {
        stream_id,
        seq,
        closing,
        payload,
    })
}

/// Authenticate and decrypt the body in place.
///
/// The last 16 bytes of the body are the detached tag; the de-masked
/// header's first 12 bytes are the nonce the sender sealed with.
fn open_body<C: AeadInPlace>(cipher: &C, header: &[u8], body: &mut [u8]) -> Result<()> {
    if body.len() < AEAD_TAG_SIZE {
        return Err(Error::Authentication);
    }
    let (ciphertext, tag) = body.split_at_mut(body.len() - AEAD_TAG_SIZE);
    open_detached(cipher, &header[..AEAD_NONCE_SIZE], ciphertext, tag)
}
