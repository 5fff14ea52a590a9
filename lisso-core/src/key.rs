//! Typed AES keys.
//!
//! Both the SSO key and the PrivacyGuard key are raw AES keys supplied as hex.
//! They are tagged with their [`Role`] so that a field can never be encrypted
//! with the wrong one.

use core::fmt;
use core::marker::PhantomData;

use crate::SsoError;
use crate::sealed::Sealed;

/// Raw AES key bytes.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Aes128([u8; 16]),
    Aes256([u8; 32]),
}

impl KeyMaterial {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if let Ok(b) = <[u8; 16]>::try_from(bytes) {
            Ok(KeyMaterial::Aes128(b))
        } else if let Ok(b) = <[u8; 32]>::try_from(bytes) {
            Ok(KeyMaterial::Aes256(b))
        } else {
            Err(KeyError::Length(bytes.len()))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            KeyMaterial::Aes128(b) => b,
            KeyMaterial::Aes256(b) => b,
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Aes128(_) => f.write_str("Aes128(..)"),
            KeyMaterial::Aes256(_) => f.write_str("Aes256(..)"),
        }
    }
}

/// Why a hex key was rejected.
#[derive(Debug)]
pub enum KeyError {
    /// The hex string was empty.
    Missing,
    /// The string was not valid hex.
    Hex(hex::FromHexError),
    /// The key was not 16 or 32 bytes long. Holds the length in whole bytes,
    /// so odd length hex is rounded down.
    Length(usize),
}

/// The purpose a key is used for.
pub trait Role: Sealed + Send + Sync + 'static {
    /// Label used in error messages.
    const LABEL: &'static str;
}

/// Marks the key shared with the SSO partner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sso;
/// Marks the PrivacyGuard key, which is never shared with the partner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrivacyGuard;

impl Sealed for Sso {}
impl Sealed for PrivacyGuard {}

impl Role for Sso {
    const LABEL: &'static str = "SSO";
}

impl Role for PrivacyGuard {
    const LABEL: &'static str = "PG";
}

/// An AES key bound to a [`Role`].
pub struct Key<R: Role> {
    material: KeyMaterial,
    _role: PhantomData<R>,
}

/// Key used to encrypt authentication tokens.
pub type SsoKey = Key<Sso>;
/// Key used to encrypt individual PrivacyGuard fields.
pub type PrivacyGuardKey = Key<PrivacyGuard>;

impl<R: Role> Key<R> {
    /// Parse a key from its hex encoding.
    ///
    /// 32 hex characters give an AES-128 key, 64 give an AES-256 key.
    pub fn from_hex(hex_key: &str) -> Result<Self, SsoError> {
        let err = |reason| SsoError::InvalidKey {
            role: R::LABEL,
            reason,
        };

        if hex_key.is_empty() {
            return Err(err(KeyError::Missing));
        }
        if !matches!(hex_key.len(), 32 | 64) {
            return Err(err(KeyError::Length(hex_key.len() / 2)));
        }
        let bytes = hex::decode(hex_key).map_err(|x| err(KeyError::Hex(x)))?;
        KeyMaterial::from_bytes(&bytes).map(Self::from_material).map_err(err)
    }

    pub fn from_material(material: KeyMaterial) -> Self {
        Self {
            material,
            _role: PhantomData,
        }
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl<R: Role> Clone for Key<R> {
    fn clone(&self) -> Self {
        Self::from_material(self.material.clone())
    }
}

impl<R: Role> PartialEq for Key<R> {
    fn eq(&self, other: &Self) -> bool {
        self.material == other.material
    }
}

impl<R: Role> Eq for Key<R> {}

impl<R: Role> fmt::Debug for Key<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key")
            .field(&R::LABEL)
            .field(&self.material)
            .finish()
    }
}

impl<R: Role> core::str::FromStr for Key<R> {
    type Err = SsoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes128() {
        let key = SsoKey::from_hex("0123456789ABCDEF123456789ABCDEF0").unwrap();
        assert_eq!(
            key.material().as_bytes(),
            b"\x01\x23\x45\x67\x89\xab\xcd\xef\x12\x34\x56\x78\x9a\xbc\xde\xf0"
        );
    }

    #[test]
    fn aes256() {
        let key: PrivacyGuardKey =
            "456789ABCDEF012356789ABCDEF012346789ABCDEF012345789ABCDEF0123456"
                .parse()
                .unwrap();
        assert!(matches!(key.material(), KeyMaterial::Aes256(_)));
        assert_eq!(&key.material().as_bytes()[..4], b"\x45\x67\x89\xab");
    }

    #[test]
    fn rejects() {
        const LENGTH: &str = "SSO key must be 128-bit or 256-bit in length";
        let cases = [
            ("", "SSO Hex key required"),
            ("012345", LENGTH),
            ("0123456789ABCDEF123456789ABCDEF", LENGTH),
            ("0123456789ABCDEF123456789ABCDEF0A", LENGTH),
            ("0123456789ABCDEF123456789ABCDEZ", "SSO key is not valid hex"),
            (
                "0123456789ABCDEF123456789ABCDEF00123456789ABCDEF123456789ABCDEF0",
                "",
            ),
        ];
        for (hex, message) in cases {
            match SsoKey::from_hex(hex) {
                Ok(_) => assert!(message.is_empty(), "{hex} should be rejected"),
                Err(err) => assert!(err.to_string().contains(message), "{err}"),
            }
        }

        let err = PrivacyGuardKey::from_hex("12345678").unwrap_err();
        assert!(matches!(
            err,
            SsoError::InvalidKey {
                role: "PG",
                reason: KeyError::Length(4)
            }
        ));
    }

    #[test]
    fn odd_length_is_a_length_error() {
        for hex in [
            "0123456789ABCDEF123456789ABCDEF",
            "0123456789ABCDEF123456789ABCDEF0A",
        ] {
            assert!(matches!(
                SsoKey::from_hex(hex),
                Err(SsoError::InvalidKey {
                    role: "SSO",
                    reason: KeyError::Length(_)
                })
            ));
            assert!(matches!(
                PrivacyGuardKey::from_hex(hex),
                Err(SsoError::InvalidKey {
                    role: "PG",
                    reason: KeyError::Length(_)
                })
            ));
        }
    }

    #[test]
    fn debug_is_redacted() {
        let key = SsoKey::from_hex("00112233445566778899AABBCCDDEEFF").unwrap();
        assert_eq!(format!("{key:?}"), r#"Key("SSO", Aes128(..))"#);
    }
}
