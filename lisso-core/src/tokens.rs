//! Framed tokens.
//!
//! A framed token is the string handed to the partner:
//!
//! ```text
//! ~2<16 char iv>~<payload>
//! ```
//!
//! The payload is the zlib compressed plaintext, encrypted with AES-CBC and
//! base64 encoded with the `-_.` alphabet. Parsing a [`FramedToken`] checks
//! this shape before any decryption is attempted.

use core::fmt;
use core::marker::PhantomData;

use rand_core::TryCryptoRng;

use crate::key::{Key, Role};
use crate::version::{IV_LEN, Version};
use crate::{FormatError, SsoError, base64, compress, entropy};

/// Separates the IV from the payload.
pub const FRAME_SEPARATOR: char = '~';

/// An encrypted, framed token.
pub struct FramedToken<V> {
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
    _version: PhantomData<V>,
}

impl<V> FramedToken<V> {
    /// The IV, made of ASCII alphanumerics.
    pub fn iv(&self) -> &str {
        // IVs are only ever built from ASCII
        core::str::from_utf8(&self.iv).unwrap_or_default()
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl<V: Version> FramedToken<V> {
    /// Compress and encrypt the plaintext under a fresh random IV.
    pub fn seal<R: Role>(
        plaintext: &str,
        key: &Key<R>,
        rng: &mut (impl TryCryptoRng + ?Sized),
    ) -> Result<Self, SsoError> {
        let compressed = compress::compress(plaintext.as_bytes())?;
        let iv = entropy::random_iv(rng)?;
        let ciphertext = V::encrypt(key.material(), &iv, &compressed);

        Ok(Self {
            iv,
            ciphertext,
            _version: PhantomData,
        })
    }

    /// Decrypt and decompress the plaintext.
    pub fn unseal<R: Role>(&self, key: &Key<R>) -> Result<String, SsoError> {
        let compressed = V::decrypt(key.material(), &self.iv, &self.ciphertext)?;
        let plaintext = compress::decompress(&compressed)?;
        String::from_utf8(plaintext).map_err(|_| FormatError::Utf8.into())
    }
}

/// Encode a plaintext into a framed token string.
pub fn encode<V: Version, R: Role>(
    plaintext: &str,
    key: &Key<R>,
    rng: &mut (impl TryCryptoRng + ?Sized),
) -> Result<String, SsoError> {
    FramedToken::<V>::seal(plaintext, key, rng).map(|t| t.to_string())
}

/// Decode a framed token string into its plaintext.
pub fn decode<V: Version, R: Role>(token: &str, key: &Key<R>) -> Result<String, SsoError> {
    token.parse::<FramedToken<V>>()?.unseal(key)
}

impl<V: Version> fmt::Display for FramedToken<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(V::HEADER)?;
        f.write_str(self.iv())?;
        fmt::Write::write_char(f, FRAME_SEPARATOR)?;
        base64::write_to(&self.ciphertext, f)
    }
}

impl<V: Version> fmt::Debug for FramedToken<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FramedToken").field(&self.to_string()).finish()
    }
}

impl<V: Version> core::str::FromStr for FramedToken<V> {
    type Err = SsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(V::HEADER).ok_or(FormatError::Grammar)?;
        let (iv, payload) = s
            .split_at_checked(IV_LEN)
            .ok_or(FormatError::Grammar)?;
        let payload = payload
            .strip_prefix(FRAME_SEPARATOR)
            .ok_or(FormatError::Grammar)?;

        let iv: [u8; IV_LEN] = iv
            .as_bytes()
            .try_into()
            .map_err(|_| FormatError::Grammar)?;
        if !iv.iter().all(|b| entropy::IV_CHARS.contains(b)) {
            return Err(FormatError::Grammar.into());
        }
        if !payload.bytes().all(base64::is_payload_char) {
            return Err(FormatError::Grammar.into());
        }

        let ciphertext = base64::decode_vec(payload)?;

        Ok(Self {
            iv,
            ciphertext,
            _version: PhantomData,
        })
    }
}
