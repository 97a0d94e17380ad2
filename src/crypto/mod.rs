//! Cryptographic primitives for the obfuscation codec.
//!
//! This module provides:
//! - Payload cipher selection (plain / AES-256-GCM / ChaCha20-Poly1305)
//! - The session key wrapper and the derived header-masking key
//! - Secure random number generation for tail padding
//!
//! All secret material is zeroized on drop to prevent memory leakage.

mod random;
mod suite;

pub use random::SecureRandom;
pub use suite::{CipherSuite, EncryptionMethod, SessionKey};

pub(crate) use suite::{open_detached, seal_detached, PayloadCipher};

/// Size of the session key in bytes (256 bits)
pub const SESSION_KEY_SIZE: usize = 32;

/// Size of the AEAD nonce in bytes (96 bits, shared by both supported AEADs)
pub const AEAD_NONCE_SIZE: usize = 12;

/// Size of the AEAD authentication tag in bytes (128 bits)
pub const AEAD_TAG_SIZE: usize = 16;

/// Size of the Salsa20 nonce used for header masking (64 bits)
pub const MASK_NONCE_SIZE: usize = 8;
