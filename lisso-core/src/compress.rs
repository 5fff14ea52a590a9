//! zlib stage of the token pipeline.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::{FormatError, SsoError};

pub fn compress(data: &[u8]) -> Result<Vec<u8>, SsoError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).map_err(SsoError::PayloadError)?;
    encoder.finish().map_err(SsoError::PayloadError)
}

/// Largest plaintext a token may inflate to.
pub const MAX_PLAINTEXT_LEN: u64 = 1 << 20;

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, SsoError> {
    let mut out = Vec::with_capacity(data.len() * 2);
    ZlibDecoder::new(data)
        .take(MAX_PLAINTEXT_LEN + 1)
        .read_to_end(&mut out)
        .map_err(|_| FormatError::Decompress)?;
    if out.len() as u64 > MAX_PLAINTEXT_LEN {
        return Err(FormatError::Decompress.into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"Li|LiSSOv1.5|34-00000000000000000000000000000000|iL".repeat(4);
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn zlib_header() {
        // zlib framing, not raw deflate
        let compressed = compress(b"").unwrap();
        assert_eq!(compressed[0], 0x78);
    }

    #[test]
    fn garbage() {
        assert!(matches!(
            decompress(b"not a zlib stream"),
            Err(SsoError::InvalidFormat(FormatError::Decompress))
        ));
    }

    #[test]
    fn inflation_is_capped() {
        let at_limit = vec![b'a'; MAX_PLAINTEXT_LEN as usize];
        assert_eq!(decompress(&compress(&at_limit).unwrap()).unwrap().len(), at_limit.len());

        let bomb = compress(&vec![0u8; 8 * MAX_PLAINTEXT_LEN as usize]).unwrap();
        assert!(bomb.len() < 64 * 1024);
        assert!(matches!(
            decompress(&bomb),
            Err(SsoError::InvalidFormat(FormatError::Decompress))
        ));
    }
}
