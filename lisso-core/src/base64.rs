//! Constant-time base64 with the token alphabet.
//!
//! This is standard padded base64 with `+`, `/` and `=` replaced by `-`, `_`
//! and `.`, which keeps tokens safe for URLs and cookies.

// The 6-bit encoders and decoders are taken from base64ct.
// Licensed from the RustCrypto developers under Apache-2.0.
// <https://github.com/RustCrypto/formats/blob/master/base64ct/LICENSE-APACHE>
//
// Modified for the `-_.` alphabet.

use core::fmt;

use crate::FormatError;

/// Padding character.
pub const PAD: u8 = b'.';

/// Characters that can appear in an encoded payload.
pub fn is_payload_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | PAD)
}

pub fn write_to(bytes: &[u8], out: &mut impl fmt::Write) -> fmt::Result {
    let mut quad = [0; 4];

    let (chunks, rem) = bytes.as_chunks::<3>();
    for chunk in chunks {
        encode_3bytes(chunk, &mut quad);
        write_ascii(&quad, out)?;
    }

    if let [a, rest @ ..] = rem {
        let b = rest.first().copied().unwrap_or(0);
        encode_3bytes(&[*a, b, 0], &mut quad);
        // one remaining byte needs two characters, two need three
        quad[rem.len() + 1..].fill(PAD);
        write_ascii(&quad, out)?;
    }

    Ok(())
}

pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    // writing to a string cannot fail
    let _ = write_to(bytes, &mut out);
    out
}

fn write_ascii(chars: &[u8], out: &mut impl fmt::Write) -> fmt::Result {
    chars.iter().try_for_each(|&b| out.write_char(char::from(b)))
}

/// Decode a padded payload.
///
/// Rejects input that is not a multiple of four characters, padding anywhere
/// but the end, and trailing bits that a canonical encoder would not produce.
pub fn decode_vec(src: &str) -> Result<Vec<u8>, FormatError> {
    let src = src.as_bytes();
    let (quads, []) = src.as_chunks::<4>() else {
        return Err(FormatError::Base64);
    };
    let pad = match src {
        [.., PAD, PAD] => 2,
        [.., PAD] => 1,
        _ => 0,
    };

    let mut out = Vec::with_capacity(quads.len() * 3);
    let mut err = 0;
    let mut triple = [0; 3];
    for (i, quad) in quads.iter().enumerate() {
        let mut quad = *quad;
        if i + 1 == quads.len() {
            // padding decodes as zero bits
            quad[4 - pad..].fill(b'A');
        }
        err |= decode_3bytes(&quad, &mut triple);
        out.extend_from_slice(&triple);
    }

    // bits past the end of the data must be zero
    let dropped = out.len() - pad;
    err |= i16::from(out[dropped..].iter().fold(0, |acc, b| acc | b) != 0);
    out.truncate(dropped);

    if err == 0 {
        Ok(out)
    } else {
        Err(FormatError::Base64)
    }
}

/// Decode 3 bytes of a Base64 message.
#[inline(always)]
fn decode_3bytes(src: &[u8; 4], dst: &mut [u8; 3]) -> i16 {
    let c0 = decode_6bits(src[0]);
    let c1 = decode_6bits(src[1]);
    let c2 = decode_6bits(src[2]);
    let c3 = decode_6bits(src[3]);

    dst[0] = ((c0 << 2) | (c1 >> 4)) as u8;
    dst[1] = ((c1 << 4) | (c2 >> 2)) as u8;
    dst[2] = ((c2 << 6) | c3) as u8;

    ((c0 | c1 | c2 | c3) >> 8) & 1
}

/// Decode 6-bits of a Base64 message. `.` is not a valid digit.
fn decode_6bits(src: u8) -> i16 {
    let mut ret: i16 = -1;

    ret += ((((b'A' as i16 - 1) - src as i16) & (src as i16 - (b'Z' as i16 + 1))) >> 8)
        & (src as i16 + -64);

    ret += ((((b'a' as i16 - 1) - src as i16) & (src as i16 - (b'z' as i16 + 1))) >> 8)
        & (src as i16 + -70);

    ret += ((((b'0' as i16 - 1) - src as i16) & (src as i16 - (b'9' as i16 + 1))) >> 8)
        & (src as i16 + 5);

    ret += ((((b'-' as i16 - 1) - src as i16) & (src as i16 - (b'-' as i16 + 1))) >> 8) & 63;
    ret += ((((b'_' as i16 - 1) - src as i16) & (src as i16 - (b'_' as i16 + 1))) >> 8) & 64;

    ret
}

/// Encode 3-bytes of a Base64 message.
#[inline(always)]
fn encode_3bytes(src: &[u8; 3], dst: &mut [u8; 4]) {
    let b0 = src[0] as i16;
    let b1 = src[1] as i16;
    let b2 = src[2] as i16;

    dst[0] = encode_6bits(b0 >> 2);
    dst[1] = encode_6bits(((b0 << 4) | (b1 >> 4)) & 63);
    dst[2] = encode_6bits(((b1 << 2) | (b2 >> 6)) & 63);
    dst[3] = encode_6bits(b2 & 63);
}

/// Encode 6-bits of a Base64 message.
#[inline(always)]
fn encode_6bits(src: i16) -> u8 {
    let mut diff = src + b'A' as i16;

    diff += ((25 - src) >> 8) & 6;
    diff += ((51 - src) >> 8) & -75;
    diff += ((61 - src) >> 8) & -(b'-' as i16 - 0x20);
    diff += ((62 - src) >> 8) & (b'_' as i16 - b'-' as i16 - 1);

    diff as u8
}
