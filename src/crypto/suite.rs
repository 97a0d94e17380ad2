//! Cipher suite selection and key handling.
//!
//! A suite is built once per session from an encryption method and a
//! 32-byte session key, and is shared read-only by every frame that
//! passes through the codec afterwards.

use std::fmt;
use std::str::FromStr;

use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit, Nonce, Tag},
    ChaCha20Poly1305,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{AEAD_TAG_SIZE, MASK_NONCE_SIZE, SESSION_KEY_SIZE};
use crate::error::{Error, Result};

/// Payload encryption method for a session.
///
/// The discriminants are the wire/config identifiers exchanged during
/// session setup; they must not be renumbered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// No payload encryption; payloads travel as plaintext with tail padding
    Plain = 0x00,
    /// AES-256-GCM authenticated encryption
    Aes256Gcm = 0x01,
    /// ChaCha20-Poly1305 authenticated encryption
    ChaCha20Poly1305 = 0x02,
}

impl EncryptionMethod {
    /// The raw method identifier byte.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The configuration-file spelling of this method.
    pub fn as_str(self) -> &'static str {
        match self {
            EncryptionMethod::Plain => "plain",
            EncryptionMethod::Aes256Gcm => "aes-gcm",
            EncryptionMethod::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }
}

impl TryFrom<u8> for EncryptionMethod {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(EncryptionMethod::Plain),
            0x01 => Ok(EncryptionMethod::Aes256Gcm),
            0x02 => Ok(EncryptionMethod::ChaCha20Poly1305),
            _ => Err(Error::UnsupportedMethod(format!("{:#04x}", value))),
        }
    }
}

impl FromStr for EncryptionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(EncryptionMethod::Plain),
            "aes-gcm" => Ok(EncryptionMethod::Aes256Gcm),
            "chacha20-poly1305" => Ok(EncryptionMethod::ChaCha20Poly1305),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte session key.
///
/// Automatically zeroized when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Create a session key from raw bytes.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a session key from a slice, validating its length.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SESSION_KEY_SIZE] =
            bytes.try_into().map_err(|_| Error::InvalidKeySize {
                expected: SESSION_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this is secret key material.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key bytes never reach Debug output
        f.write_str("SessionKey(..)")
    }
}

/// The payload encryption primitive selected for a session.
///
/// A closed set: exactly one variant per supported method, chosen once at
/// suite construction. Encode and decode each dispatch on it in a single
/// `match`.
pub(crate) enum PayloadCipher {
    /// Plaintext passthrough with random tail padding for short payloads
    Plain,
    /// AES-256-GCM
    AesGcm(Aes256Gcm),
    /// ChaCha20-Poly1305
    ChaCha(ChaCha20Poly1305),
}

impl PayloadCipher {
    fn new(method: EncryptionMethod, key: &SessionKey) -> Result<Self> {
        match method {
            EncryptionMethod::Plain => Ok(PayloadCipher::Plain),
            EncryptionMethod::Aes256Gcm => Aes256Gcm::new_from_slice(key.as_bytes())
                .map(PayloadCipher::AesGcm)
                .map_err(|_| Error::CipherInit),
            EncryptionMethod::ChaCha20Poly1305 => {
                ChaCha20Poly1305::new_from_slice(key.as_bytes())
                    .map(PayloadCipher::ChaCha)
                    .map_err(|_| Error::CipherInit)
            }
        }
    }

    /// Trailing overhead bytes appended after a payload of the given length.
    ///
    /// AEAD variants always append their 16-byte tag. Plain mode pads short
    /// payloads up to 8 bytes so the body tail can serve as the header-mask
    /// nonce.
    pub(crate) fn extra_len(&self, payload_len: usize) -> u8 {
        match self {
            PayloadCipher::Plain => MASK_NONCE_SIZE.saturating_sub(payload_len) as u8,
            _ => AEAD_TAG_SIZE as u8,
        }
    }
}

/// Seal `buf` in place with a detached tag.
///
/// `buf` holds the plaintext on entry and the ciphertext on return; the
/// returned tag goes into the frame's trailing overhead region.
pub(crate) fn seal_detached<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    buf: &mut [u8],
) -> Result<Tag<C>> {
    cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), b"", buf)
        .map_err(|_| Error::Seal)
}

/// Open `buf` in place, verifying the detached tag.
///
/// `buf` holds the ciphertext on entry and the plaintext on return. Fails
/// without revealing anything beyond the fact of the failure.
pub(crate) fn open_detached<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    buf: &mut [u8],
    tag: &[u8],
) -> Result<()> {
    cipher
        .decrypt_in_place_detached(
            Nonce::<C>::from_slice(nonce),
            b"",
            buf,
            Tag::<C>::from_slice(tag),
        )
        .map_err(|_| Error::Authentication)
}

/// The immutable cipher suite shared by all frames of a session.
///
/// Owns the header-masking key, the payload cipher, and the record-layer
/// flag. Never mutated after construction, so it is safe to share across
/// concurrent encode/decode calls.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CipherSuite {
    mask_key: [u8; SESSION_KEY_SIZE],
    #[zeroize(skip)]
    method: EncryptionMethod,
    #[zeroize(skip)]
    payload: PayloadCipher,
    #[zeroize(skip)]
    record_layer: bool,
}

impl CipherSuite {
    /// Build a suite from a method and session key.
    ///
    /// The header-masking key is the session key itself; the payload cipher
    /// (if any) is keyed with the same 32 bytes.
    pub fn new(
        method: EncryptionMethod,
        key: &SessionKey,
        record_layer: bool,
    ) -> Result<Self> {
        let payload = PayloadCipher::new(method, key)?;
        Ok(Self {
            mask_key: *key.as_bytes(),
            method,
            payload,
            record_layer,
        })
    }

    /// The method this suite was built with.
    pub fn method(&self) -> EncryptionMethod {
        self.method
    }

    /// Whether encoded messages carry the fake record prefix.
    pub fn record_layer(&self) -> bool {
        self.record_layer
    }

    pub(crate) fn mask_key(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.mask_key
    }

    pub(crate) fn payload(&self) -> &PayloadCipher {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_id_roundtrip() {
        for method in [
            EncryptionMethod::Plain,
            EncryptionMethod::Aes256Gcm,
            EncryptionMethod::ChaCha20Poly1305,
        ] {
            assert_eq!(EncryptionMethod::try_from(method.id()).unwrap(), method);
        }
    }

    #[test]
    fn test_method_unknown_id() {
        let err = EncryptionMethod::try_from(0x7f).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(_)));
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "plain".parse::<EncryptionMethod>().unwrap(),
            EncryptionMethod::Plain
        );
        assert_eq!(
            "aes-gcm".parse::<EncryptionMethod>().unwrap(),
            EncryptionMethod::Aes256Gcm
        );
        assert_eq!(
            "chacha20-poly1305".parse::<EncryptionMethod>().unwrap(),
            EncryptionMethod::ChaCha20Poly1305
        );
        assert!("aes-cbc".parse::<EncryptionMethod>().is_err());
    }

    #[test]
    fn test_session_key_length_validation() {
        assert!(SessionKey::try_from_slice(&[0u8; 32]).is_ok());

        let err = SessionKey::try_from_slice(&[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidKeySize {
                expected: 32,
                actual: 16
            }
        ));

        let err = SessionKey::try_from_slice(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, Error::InvalidKeySize { actual: 33, .. }));
    }

    #[test]
    fn test_session_key_debug_redacted() {
        let key = SessionKey::from_bytes([0xaa; 32]);
        assert_eq!(format!("{:?}", key), "SessionKey(..)");
    }

    #[test]
    fn test_extra_len_plain_pads_to_nonce_size() {
        let key = SessionKey::from_bytes([0u8; 32]);
        let suite = CipherSuite::new(EncryptionMethod::Plain, &key, false).unwrap();

        for payload_len in 0..8 {
            assert_eq!(
                suite.payload().extra_len(payload_len),
                (8 - payload_len) as u8
            );
        }
        assert_eq!(suite.payload().extra_len(8), 0);
        assert_eq!(suite.payload().extra_len(1500), 0);
    }

    #[test]
    fn test_extra_len_aead_is_tag_size() {
        let key = SessionKey::from_bytes([0u8; 32]);
        for method in [
            EncryptionMethod::Aes256Gcm,
            EncryptionMethod::ChaCha20Poly1305,
        ] {
            let suite = CipherSuite::new(method, &key, false).unwrap();
            assert_eq!(suite.payload().extra_len(0), 16);
            assert_eq!(suite.payload().extra_len(1500), 16);
        }
    }

    #[test]
    fn test_suite_records_method_and_flag() {
        let key = SessionKey::from_bytes([0u8; 32]);
        let suite = CipherSuite::new(EncryptionMethod::Aes256Gcm, &key, true).unwrap();
        assert_eq!(suite.method(), EncryptionMethod::Aes256Gcm);
        assert!(suite.record_layer());
    }
}
