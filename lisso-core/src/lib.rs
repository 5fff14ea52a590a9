//! Core types and traits for Lithium SSO authentication tokens.
//!
//! A token binds a user identity and some request metadata into a record,
//! compresses it, encrypts it with a shared AES key and frames it as
//! `~2<iv>~<payload>`. The block cipher is provided by a [`version::Version`]
//! implementation, everything else lives here.

#![forbid(unsafe_code)]

pub mod base64;
pub mod client;
pub mod compress;
pub mod entropy;
pub mod key;
pub mod privacy_guard;
pub mod record;
pub mod tokens;
pub mod version;

pub use rand_core;

use core::fmt;

use crate::key::KeyError;
use crate::record::Field;

mod sealed {
    pub trait Sealed {}
}

#[derive(Debug)]
#[non_exhaustive]
/// Error returned for all SSO operations that can fail
pub enum SsoError {
    /// The client was constructed without a client id.
    MissingClientId,
    /// The client was constructed without a client domain.
    MissingClientDomain,
    /// Could not parse the SSO or PrivacyGuard hex key.
    InvalidKey {
        /// "SSO" or "PG"
        role: &'static str,
        reason: KeyError,
    },
    /// A mandatory identity field was empty.
    MissingField(Field),
    /// The token or its decrypted record was not of a valid form.
    InvalidFormat(FormatError),
    /// The random number generator failed.
    EntropyError,
    /// There was an error compressing the payload.
    PayloadError(std::io::Error),
}

/// The coarse category of an [`SsoError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing client id or domain, or a bad key.
    Configuration,
    /// Empty unique id, login or email.
    MissingField,
    /// The token could not be decoded.
    InvalidFormat,
    /// The random number generator failed.
    Entropy,
    /// The compressor failed.
    Payload,
}

/// Which stage of decoding rejected a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The token did not match `~2<iv>~<payload>`.
    Grammar,
    /// The payload was not valid base64.
    Base64,
    /// The decrypted block padding was invalid.
    Padding,
    /// The decrypted payload was not a zlib stream.
    Decompress,
    /// The decompressed payload was not UTF-8.
    Utf8,
    /// The record had the wrong markers or too few fields.
    Record,
    /// A numeric field could not be parsed.
    Number(Field),
}

impl SsoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SsoError::MissingClientId
            | SsoError::MissingClientDomain
            | SsoError::InvalidKey { .. } => ErrorKind::Configuration,
            SsoError::MissingField(_) => ErrorKind::MissingField,
            SsoError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            SsoError::EntropyError => ErrorKind::Entropy,
            SsoError::PayloadError(_) => ErrorKind::Payload,
        }
    }
}

impl From<FormatError> for SsoError {
    fn from(value: FormatError) -> Self {
        SsoError::InvalidFormat(value)
    }
}

impl std::error::Error for SsoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SsoError::InvalidKey {
                reason: KeyError::Hex(x),
                ..
            } => Some(x),
            SsoError::PayloadError(x) => Some(x),
            _ => None,
        }
    }
}

impl fmt::Display for SsoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsoError::MissingClientId => {
                f.write_str("Could not initialize SSO client: Client id required")
            }
            SsoError::MissingClientDomain => {
                f.write_str("Could not initialize SSO client: Client domain required")
            }
            SsoError::InvalidKey { role, reason } => match reason {
                KeyError::Missing => write!(f, "{role} Hex key required"),
                KeyError::Hex(x) => write!(f, "{role} key is not valid hex: {x}"),
                KeyError::Length(_) => {
                    write!(f, "{role} key must be 128-bit or 256-bit in length")
                }
            },
            SsoError::MissingField(field) => {
                write!(f, "Could not create SSO token: {} required", field.label())
            }
            SsoError::InvalidFormat(x) => {
                write!(f, "Could not decode SSO token: Invalid format ({x})")
            }
            SsoError::EntropyError => f.write_str("The random number generator failed"),
            SsoError::PayloadError(x) => {
                write!(f, "there was an error with the payload encoding: {x}")
            }
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Grammar => f.write_str("malformed token"),
            FormatError::Base64 => f.write_str("bad base64 payload"),
            FormatError::Padding => f.write_str("bad block padding"),
            FormatError::Decompress => f.write_str("bad compressed stream"),
            FormatError::Utf8 => f.write_str("payload is not utf-8"),
            FormatError::Record => f.write_str("bad record"),
            FormatError::Number(field) => write!(f, "{} is not a number", field.name()),
        }
    }
}
