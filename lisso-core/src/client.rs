//! The SSO client, which mints and decodes authentication tokens.

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand_core::{OsRng, TryCryptoRng};

use crate::key::SsoKey;
use crate::privacy_guard::PrivacyGuard;
use crate::record::{AuthToken, Field, PROTOCOL_VERSION, RequestContext, Settings};
use crate::tokens::{self, FramedToken};
use crate::version::Version;
use crate::{SsoError, entropy};

/// Settings needed to construct a [`Client`].
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ClientConfig {
    /// The client or community id to create tokens for.
    pub client_id: String,
    /// The cookie domain for tokens, such as `.example.com`.
    pub client_domain: String,
    /// Hex encoded 128-bit or 256-bit SSO key.
    pub sso_key: String,
    /// Tag for the server id. Defaults to `34`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub server_id: String,
    /// Hex encoded PrivacyGuard key.
    #[cfg_attr(feature = "serde", serde(default))]
    pub privacy_guard_key: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_domain", &self.client_domain)
            .field("server_id", &self.server_id)
            .field("privacy_guard", &self.privacy_guard_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Mints and decodes authentication tokens for one client.
///
/// Every minted token carries a sequence number (`tsid`) that is seeded from
/// the wall clock when the client is created and incremented for each token.
/// Minting takes `&mut self`, so a client shared between threads needs a lock.
/// Prefer one client per session.
pub struct Client<V, R = OsRng> {
    client_id: String,
    client_domain: String,
    server_id: String,
    sso_key: SsoKey,
    privacy_guard: PrivacyGuard<V>,
    tsid: u64,
    rng: R,
}

/// Wall clock time in milliseconds, truncated to whole seconds.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() * 1000)
}

impl<V: Version> Client<V> {
    /// Create a client that draws randomness from the operating system.
    pub fn new(
        client_id: &str,
        client_domain: &str,
        sso_hex_key: &str,
        server_id: &str,
    ) -> Result<Self, SsoError> {
        Self::with_rng(client_id, client_domain, sso_hex_key, server_id, OsRng)
    }
}

impl<V: Version, R: TryCryptoRng> Client<V, R> {
    pub fn with_rng(
        client_id: &str,
        client_domain: &str,
        sso_hex_key: &str,
        server_id: &str,
        mut rng: R,
    ) -> Result<Self, SsoError> {
        if client_id.is_empty() {
            return Err(SsoError::MissingClientId);
        }
        if client_domain.is_empty() {
            return Err(SsoError::MissingClientDomain);
        }

        let server_id = entropy::server_id(server_id, &mut rng)?;
        let sso_key = SsoKey::from_hex(sso_hex_key)?;

        tracing::debug!(client_id, server_id = %server_id, "initialized sso client");

        Ok(Self {
            client_id: client_id.to_owned(),
            client_domain: client_domain.to_owned(),
            server_id,
            sso_key,
            privacy_guard: PrivacyGuard::disabled(),
            tsid: now_millis(),
            rng,
        })
    }

    /// Create a client from its configuration, enabling PrivacyGuard if a key
    /// is configured.
    pub fn from_config(config: &ClientConfig, rng: R) -> Result<Self, SsoError> {
        let mut client = Self::with_rng(
            &config.client_id,
            &config.client_domain,
            &config.sso_key,
            &config.server_id,
            rng,
        )?;
        if let Some(pg_key) = &config.privacy_guard_key {
            client.init_privacy_guard(pg_key)?;
        }
        Ok(client)
    }

    /// Mint an authentication token for a user.
    ///
    /// * `unique_id` - a permanent id that uniquely identifies this user.
    /// * `login` - the publicly visible login or screen name.
    /// * `email` - the email address, possibly encrypted by
    ///   [`Client::privacy_guard_field`].
    ///
    /// Any `|` in a value is replaced with `-`.
    pub fn auth_token(
        &mut self,
        unique_id: &str,
        login: &str,
        email: &str,
        settings: &Settings,
        request: &RequestContext,
    ) -> Result<String, SsoError> {
        let record = self.next_record(unique_id, login, email, settings, request)?;
        let token = FramedToken::<V>::seal(&record.to_record(), &self.sso_key, &mut self.rng)?;

        tracing::trace!(tsid = record.tsid, "minted auth token");
        Ok(token.to_string())
    }

    fn next_record(
        &mut self,
        unique_id: &str,
        login: &str,
        email: &str,
        settings: &Settings,
        request: &RequestContext,
    ) -> Result<AuthToken, SsoError> {
        for (field, value) in [
            (Field::UniqueId, unique_id),
            (Field::Login, login),
            (Field::Email, email),
        ] {
            if value.is_empty() {
                return Err(SsoError::MissingField(field));
            }
        }

        self.tsid += 1;

        Ok(AuthToken {
            version: PROTOCOL_VERSION.to_owned(),
            server_id: self.server_id.clone(),
            tsid: self.tsid,
            timestamp: now_millis(),
            req_user_agent: request.user_agent.clone(),
            req_referer: request.referer.clone(),
            req_remote_addr: request.remote_addr.clone(),
            client_domain: self.client_domain.clone(),
            client_id: self.client_id.clone(),
            unique_id: unique_id.to_owned(),
            login: login.to_owned(),
            email: email.to_owned(),
            settings: settings.clone(),
        })
    }

    /// Install the PrivacyGuard key.
    pub fn init_privacy_guard(&mut self, pg_hex_key: &str) -> Result<(), SsoError> {
        self.privacy_guard.init(pg_hex_key)
    }

    /// Encrypt a value with the PrivacyGuard key, ready to pass to
    /// [`Client::auth_token`].
    ///
    /// Returns an empty string if PrivacyGuard is not enabled.
    pub fn privacy_guard_field(&mut self, value: &str) -> Result<String, SsoError> {
        self.privacy_guard.encode_field(value, &mut self.rng)
    }
}

impl<V: Version, R> Client<V, R> {
    /// Decode and parse an authentication token.
    pub fn decode_auth_token(&self, token: &str) -> Result<AuthToken, SsoError> {
        let record = tokens::decode::<V, _>(token, &self.sso_key)?;
        AuthToken::from_record(&record)
    }
}

impl<V, R> Client<V, R> {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_domain(&self) -> &str {
        &self.client_domain
    }

    /// `<tag>-<32 hex chars>`, fixed for the lifetime of the client.
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// The sequence number of the last minted token.
    pub fn tsid(&self) -> u64 {
        self.tsid
    }

    pub fn sso_key(&self) -> &SsoKey {
        &self.sso_key
    }

    pub fn privacy_guard(&self) -> &PrivacyGuard<V> {
        &self.privacy_guard
    }
}

impl<V, R> fmt::Debug for Client<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.client_id)
            .field("client_domain", &self.client_domain)
            .field("server_id", &self.server_id)
            .field("tsid", &self.tsid)
            .field("privacy_guard", &self.privacy_guard)
            .finish_non_exhaustive()
    }
}
