//! PrivacyGuard field encryption.
//!
//! PrivacyGuard encrypts a single value, usually the email address, with a key
//! that is never shared with the partner. The result is then passed as a
//! regular field of the authentication token.

use core::fmt;
use core::marker::PhantomData;

use rand_core::TryCryptoRng;

use crate::SsoError;
use crate::key::PrivacyGuardKey;
use crate::tokens::{self, FramedToken};
use crate::version::Version;

/// A token codec keyed by the optional PrivacyGuard key.
pub struct PrivacyGuard<V> {
    key: Option<PrivacyGuardKey>,
    _version: PhantomData<V>,
}

impl<V> Default for PrivacyGuard<V> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<V> PrivacyGuard<V> {
    /// A PrivacyGuard without a key. Every field encodes to `""`.
    pub fn disabled() -> Self {
        Self {
            key: None,
            _version: PhantomData,
        }
    }

    pub fn new(key: PrivacyGuardKey) -> Self {
        Self {
            key: Some(key),
            _version: PhantomData,
        }
    }

    /// Parse and install the PrivacyGuard key, replacing any previous key.
    pub fn init(&mut self, pg_hex_key: &str) -> Result<(), SsoError> {
        self.key = Some(PrivacyGuardKey::from_hex(pg_hex_key)?);
        tracing::debug!("privacy guard enabled");
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn key(&self) -> Option<&PrivacyGuardKey> {
        self.key.as_ref()
    }
}

impl<V: Version> PrivacyGuard<V> {
    /// Encrypt a field value.
    ///
    /// Returns an empty string if no key has been installed.
    pub fn encode_field(
        &self,
        value: &str,
        rng: &mut (impl TryCryptoRng + ?Sized),
    ) -> Result<String, SsoError> {
        match &self.key {
            Some(key) => FramedToken::<V>::seal(value, key, rng).map(|t| t.to_string()),
            None => Ok(String::new()),
        }
    }

    /// Decrypt a field value produced by [`PrivacyGuard::encode_field`].
    ///
    /// Returns `None` if no key has been installed.
    pub fn decode_field(&self, value: &str) -> Result<Option<String>, SsoError> {
        self.key
            .as_ref()
            .map(|key| tokens::decode::<V, _>(value, key))
            .transpose()
    }
}

impl<V> fmt::Debug for PrivacyGuard<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivacyGuard")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::key::KeyError;
    use crate::version::testing::Xor;

    #[test]
    fn disabled_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(0);
        let pg = PrivacyGuard::<Xor>::disabled();
        assert!(!pg.is_enabled());
        assert_eq!(pg.encode_field("foo", &mut rng).unwrap(), "");
        assert_eq!(pg.decode_field("~2abcdefghijklmnop~").unwrap(), None);
    }

    #[test]
    fn enabled() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pg = PrivacyGuard::<Xor>::default();
        pg.init("123456789ABCDEF023456789ABCDEF01").unwrap();

        let field = pg.encode_field("myemail@example.com", &mut rng).unwrap();
        assert!(field.starts_with("~2"));
        assert!(field.parse::<FramedToken<Xor>>().is_ok());
        assert_eq!(
            pg.decode_field(&field).unwrap().as_deref(),
            Some("myemail@example.com")
        );
    }

    #[test]
    fn bad_key() {
        let mut pg = PrivacyGuard::<Xor>::disabled();
        for (hex, message) in [
            ("", "PG Hex key required"),
            ("12345678", "PG key must be 128-bit or 256-bit in length"),
        ] {
            let err = pg.init(hex).unwrap_err();
            assert!(err.to_string().contains(message), "{err}");
        }
        assert!(matches!(
            pg.init("xyz").unwrap_err(),
            SsoError::InvalidKey {
                role: "PG",
                reason: KeyError::Hex(_)
            }
        ));
        assert!(!pg.is_enabled());
    }
}
