//! Randomness for IVs and server ids.
//!
//! All randomness is drawn from a caller supplied [`TryCryptoRng`].

use rand_core::TryCryptoRng;

use crate::SsoError;
use crate::record::escape;
use crate::version::IV_LEN;

/// Characters an IV is drawn from.
pub const IV_CHARS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Tag used when no server id is configured.
pub const DEFAULT_SERVER_TAG: &str = "34";

/// Number of random bytes in a server id.
const SERVER_ID_ENTROPY: usize = 16;

// largest multiple of 62 that fits in a byte
const IV_REJECT_ABOVE: u8 = (256 / IV_CHARS.len() * IV_CHARS.len() - 1) as u8;

/// Generate an IV of uniformly random alphanumeric characters.
///
/// The IV is carried verbatim inside the frame, so it must avoid `~` and the
/// base64 characters.
pub fn random_iv<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<[u8; IV_LEN], SsoError> {
    let mut iv = [0; IV_LEN];
    let mut filled = 0;
    let mut buf = [0; IV_LEN];

    while filled < IV_LEN {
        rng.try_fill_bytes(&mut buf)
            .map_err(|_| SsoError::EntropyError)?;
        for b in buf {
            if filled == IV_LEN {
                break;
            }
            // rejection sampling keeps the distribution uniform
            if b <= IV_REJECT_ABOVE {
                iv[filled] = IV_CHARS[usize::from(b) % IV_CHARS.len()];
                filled += 1;
            }
        }
    }

    Ok(iv)
}

/// Generate the server id for a new client: `<tag>-<32 uppercase hex chars>`.
///
/// The tag is trimmed and escaped. An empty tag falls back to
/// [`DEFAULT_SERVER_TAG`].
pub fn server_id<R: TryCryptoRng + ?Sized>(tag: &str, rng: &mut R) -> Result<String, SsoError> {
    let tag = tag.trim();
    let tag = if tag.is_empty() {
        DEFAULT_SERVER_TAG.into()
    } else {
        escape(tag)
    };

    let mut bytes = [0; SERVER_ID_ENTROPY];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|_| SsoError::EntropyError)?;

    Ok(format!("{tag}-{}", hex::encode_upper(bytes)))
}
