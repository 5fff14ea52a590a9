use crate::SsoError;
use crate::key::KeyMaterial;

/// Length of the initialization vector, which is also the AES block size.
pub const IV_LEN: usize = 16;

/// An implementation of the token cryptographic scheme.
///
/// The framing, compression and record layout are fixed by the wire format.
/// Implementations only provide the block cipher: AES in CBC mode with PKCS#7
/// padding, keyed by a 128-bit or 256-bit key.
pub trait Version: 'static {
    /// Header that prefixes every framed token.
    const HEADER: &'static str;

    /// Encrypt and pad the plaintext.
    fn encrypt(key: &KeyMaterial, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8>;

    /// Decrypt the ciphertext and remove the padding.
    ///
    /// Must fail with [`FormatError::Padding`](crate::FormatError::Padding)
    /// if the ciphertext is not block aligned or the padding is invalid.
    fn decrypt(
        key: &KeyMaterial,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, SsoError>;
}
