//! Curve key pairs and their Z85 text encoding.
//!
//! Key pair *generation* is delegated to `x25519-dalek`/`rand`, treated
//! as the "provided curve keypair primitive" the wire-level spec calls
//! out of scope; this module owns the value type, the private-key-only
//! derivation of a public key, and the Z85 text codec (hand-rolled here,
//! matching the original implementation's own base85 codec rather than
//! a transport-library call).

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};

/// Width, in bytes, of a curve public or private key.
pub const KEY_SIZE: usize = 32;
/// Width, in bytes, of the Z85 text encoding of one key.
pub const KEY_TEXT_SIZE: usize = 40;

const NULL_KEY: [u8; KEY_SIZE] = [0u8; KEY_SIZE];

/// Maximum regeneration attempts when a restricted (no `#`) alphabet is
/// requested, mirroring the original's retry ceiling.
const RESTRICTED_ALPHABET_ATTEMPTS: usize = 255;

const Z85_ALPHABET: &[u8; 85] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// A 32-byte curve public or private key.
pub type KeyBytes = [u8; KEY_SIZE];

/// A curve public/private key pair.
///
/// Initialised (per the data model) when both halves are non-zero.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Keypair {
    public: KeyBytes,
    private: KeyBytes,
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &z85_encode(&self.public))
            .field("private", &"<redacted>")
            .finish()
    }
}

impl Keypair {
    /// Generate a fresh key pair from the full key space.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut seed = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut seed);
        Self::from_private(seed)
    }

    /// Generate a key pair whose Z85 text encoding (of both keys) avoids
    /// the `#` character, regenerating up to an implementation ceiling.
    ///
    /// Returns `None` if no suitable pair was found within the ceiling
    /// (astronomically unlikely for a well-distributed RNG).
    #[must_use]
    pub fn generate_restricted() -> Option<Self> {
        for _ in 0..RESTRICTED_ALPHABET_ATTEMPTS {
            let pair = Self::generate();
            if ok_setting(&pair.public) && ok_setting(&pair.private) {
                return Some(pair);
            }
        }
        None
    }

    /// Derive a key pair from an existing private key.
    ///
    /// If `private` is the all-zero sentinel, a fresh pair is generated
    /// instead (matching the original certificate constructor's
    /// behaviour of generating whenever no private key is supplied).
    #[must_use]
    pub fn from_private(private: KeyBytes) -> Self {
        if private == NULL_KEY {
            return Self::generate();
        }
        let secret = StaticSecret::from(private);
        let public = PublicKey::from(&secret);
        Keypair {
            public: *public.as_bytes(),
            private,
        }
    }

    /// Construct directly from both halves without validation.
    #[must_use]
    pub fn from_parts(public: KeyBytes, private: KeyBytes) -> Self {
        Keypair { public, private }
    }

    /// The public half.
    #[must_use]
    pub fn public(&self) -> &KeyBytes {
        &self.public
    }

    /// The private half.
    #[must_use]
    pub fn private(&self) -> &KeyBytes {
        &self.private
    }

    /// True when both halves are non-zero.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.public != NULL_KEY && self.private != NULL_KEY
    }

    /// The public half as a 40-character Z85 string.
    #[must_use]
    pub fn public_text(&self) -> String {
        z85_encode(&self.public)
    }

    /// The private half as a 40-character Z85 string.
    #[must_use]
    pub fn private_text(&self) -> String {
        z85_encode(&self.private)
    }
}

fn ok_setting(key: &KeyBytes) -> bool {
    !z85_encode(key).contains('#')
}

/// Encode a 32-byte key as a 40-character Z85 string.
#[must_use]
pub fn z85_encode(data: &KeyBytes) -> String {
    let mut out = String::with_capacity(KEY_TEXT_SIZE);
    for chunk in data.chunks_exact(4) {
        let mut value: u32 = 0;
        for &byte in chunk {
            value = value * 256 + u32::from(byte);
        }
        let mut digits = [0u8; 5];
        for slot in digits.iter_mut().rev() {
            *slot = (value % 85) as u8;
            value /= 85;
        }
        for digit in digits {
            out.push(Z85_ALPHABET[digit as usize] as char);
        }
    }
    out
}

/// Decode a 40-character Z85 string into a 32-byte key.
///
/// Returns `None` if the input is not exactly 40 bytes of valid Z85
/// alphabet characters.
#[must_use]
pub fn z85_decode(text: &str) -> Option<KeyBytes> {
    if text.len() != KEY_TEXT_SIZE || !text.is_ascii() {
        return None;
    }
    let bytes = text.as_bytes();
    let mut out = [0u8; KEY_SIZE];
    for (chunk_idx, chunk) in bytes.chunks_exact(5).enumerate() {
        let mut value: u32 = 0;
        for &ch in chunk {
            let digit = Z85_ALPHABET.iter().position(|&c| c == ch)? as u32;
            value = value.checked_mul(85)?.checked_add(digit)?;
        }
        let base = chunk_idx * 4;
        out[base] = (value >> 24) as u8;
        out[base + 1] = (value >> 16) as u8;
        out[base + 2] = (value >> 8) as u8;
        out[base + 3] = value as u8;
    }
    Some(out)
}
