//! Lithium SSO v2 tokens (RustCrypto)
//!
//! ```
//! use lisso_v2::{Client, RequestContext, Settings};
//!
//! // the SSO key is shared with the partner
//! let mut client = Client::new(
//!     "example",
//!     ".example.com",
//!     "0123456789ABCDEF123456789ABCDEF0",
//!     "",
//! )
//! .unwrap();
//!
//! // optional profile settings to pass along
//! let mut settings = Settings::new();
//! settings.insert("profile.url_homepage", "http://myhomepage.example.com");
//! settings.insert("roles.grant", "Moderator");
//!
//! let request = RequestContext {
//!     user_agent: "Mozilla/5.0".to_string(),
//!     referer: "example.com".to_string(),
//!     remote_addr: "10.11.12.13".to_string(),
//! };
//!
//! // mint the token, to be sent as a cookie or request parameter.
//! let token = client
//!     .auth_token("1000", "myscreenname", "myemail@example.com", &settings, &request)
//!     .unwrap();
//! // "~2..."
//!
//! // ...
//!
//! // decode the token
//! let record = client.decode_auth_token(&token).unwrap();
//! assert_eq!(record.login, "myscreenname");
//! assert_eq!(record.settings.get("roles.grant"), Some("Moderator"));
//!
//! // PrivacyGuard encrypts a field with a key the partner never sees.
//! client.init_privacy_guard("123456789ABCDEF023456789ABCDEF01").unwrap();
//! let email = client.privacy_guard_field("myemail@example.com").unwrap();
//! let token = client
//!     .auth_token("1000", "myscreenname", &email, &settings, &request)
//!     .unwrap();
//! ```
#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use lisso_core::key::{PrivacyGuardKey, SsoKey};
pub use lisso_core::record::{AuthToken, RequestContext, Settings};
pub use lisso_core::{ErrorKind, FormatError, SsoError};

/// Mints and decodes authentication tokens.
pub type Client<R = lisso_core::rand_core::OsRng> = lisso_core::client::Client<core::V2, R>;
/// Configuration for a [`Client`].
pub type ClientConfig = lisso_core::client::ClientConfig;
/// An encrypted `~2` token.
pub type FramedToken = lisso_core::tokens::FramedToken<core::V2>;
/// Field level encryption with the PrivacyGuard key.
pub type PrivacyGuard = lisso_core::privacy_guard::PrivacyGuard<core::V2>;

/// Encode a plaintext into a `~2` token.
pub fn encode<R: lisso_core::key::Role>(
    plaintext: &str,
    key: &lisso_core::key::Key<R>,
    rng: &mut (impl lisso_core::rand_core::TryCryptoRng + ?Sized),
) -> Result<String, SsoError> {
    lisso_core::tokens::encode::<core::V2, R>(plaintext, key, rng)
}

/// Decode a `~2` token into its plaintext.
pub fn decode<R: lisso_core::key::Role>(
    token: &str,
    key: &lisso_core::key::Key<R>,
) -> Result<String, SsoError> {
    lisso_core::tokens::decode::<core::V2, R>(token, key)
}
