//! The plaintext record carried inside an authentication token.
//!
//! A record is a `|` separated list of fields:
//!
//! ```text
//! Li|<version>|<server_id>|<tsid>|<timestamp>|<user agent>|<referer>|<remote addr>|
//!     <client domain>|<client id>|<unique id>|<login>|<email>|<key=value>...|iL
//! ```
//!
//! The positional fields are described once by [`Field::ALL`], which both
//! [`AuthToken::to_record`] and [`AuthToken::from_record`] walk.

use core::fmt;
use std::collections::HashMap;

use crate::{FormatError, SsoError};

/// Separates fields in a record.
pub const SEPARATOR: char = '|';
/// Replaces [`SEPARATOR`] inside field values.
pub const SEPARATOR_REPLACE: char = '-';
/// First field of every record.
pub const START_MARKER: &str = "Li";
/// Last field of every record.
pub const END_MARKER: &str = "iL";
/// Protocol version written into every record.
pub const PROTOCOL_VERSION: &str = "LiSSOv1.5";
/// Stands in for an empty request context value.
pub const PLACEHOLDER: &str = " ";

/// Make a value safe to embed as a field.
///
/// Every `|` becomes `-`. This cannot be undone.
pub fn escape(value: &str) -> String {
    value
        .chars()
        .map(|c| if c == SEPARATOR { SEPARATOR_REPLACE } else { c })
        .collect()
}

/// The positional fields of a record, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Version,
    ServerId,
    Tsid,
    Timestamp,
    ReqUserAgent,
    ReqReferer,
    ReqRemoteAddr,
    ClientDomain,
    ClientId,
    UniqueId,
    Login,
    Email,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Version,
        Field::ServerId,
        Field::Tsid,
        Field::Timestamp,
        Field::ReqUserAgent,
        Field::ReqReferer,
        Field::ReqRemoteAddr,
        Field::ClientDomain,
        Field::ClientId,
        Field::UniqueId,
        Field::Login,
        Field::Email,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Field::Version => "version",
            Field::ServerId => "server_id",
            Field::Tsid => "tsid",
            Field::Timestamp => "timestamp",
            Field::ReqUserAgent => "req_user_agent",
            Field::ReqReferer => "req_referer",
            Field::ReqRemoteAddr => "req_remote_addr",
            Field::ClientDomain => "client_domain",
            Field::ClientId => "client_id",
            Field::UniqueId => "unique_id",
            Field::Login => "login",
            Field::Email => "email",
        }
    }

    /// Human readable name, used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Field::UniqueId => "Unique id",
            Field::Login => "Login name",
            Field::Email => "Email address",
            Field::ClientId => "Client id",
            Field::ClientDomain => "Client domain",
            _ => self.name(),
        }
    }

    /// Request context fields are written as [`PLACEHOLDER`] when empty.
    pub const fn is_request_context(self) -> bool {
        matches!(
            self,
            Field::ReqUserAgent | Field::ReqReferer | Field::ReqRemoteAddr
        )
    }
}

/// Profile settings passed to the partner, such as `roles.grant = Moderator`.
///
/// Settings keep insertion order. Inserting an existing key replaces its value
/// in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<(String, String)>,
    // key -> position in `entries`
    index: HashMap<String, usize>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parse_item(&mut self, item: &str) {
        let (key, value) = item.split_once('=').unwrap_or((item, ""));
        self.insert(key, value);
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Serializes as a list of `[key, value]` pairs, in order.
#[cfg(feature = "serde")]
impl serde::Serialize for Settings {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut settings = Settings::new();
        settings.extend(iter);
        settings
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Settings {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Metadata about the request the user is signing in from.
///
/// Used by the partner for security identification only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_agent: String,
    pub referer: String,
    pub remote_addr: String,
}

/// A decoded authentication token record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AuthToken {
    pub version: String,
    pub server_id: String,
    /// Per client sequence number.
    pub tsid: u64,
    /// Milliseconds since the unix epoch.
    pub timestamp: u64,
    pub req_user_agent: String,
    pub req_referer: String,
    pub req_remote_addr: String,
    pub client_domain: String,
    pub client_id: String,
    pub unique_id: String,
    pub login: String,
    pub email: String,
    pub settings: Settings,
}

impl AuthToken {
    fn field(&self, field: Field) -> String {
        let value = match field {
            Field::Version => return self.version.clone(),
            Field::Tsid => return self.tsid.to_string(),
            Field::Timestamp => return self.timestamp.to_string(),
            Field::ServerId => &self.server_id,
            Field::ReqUserAgent => &self.req_user_agent,
            Field::ReqReferer => &self.req_referer,
            Field::ReqRemoteAddr => &self.req_remote_addr,
            Field::ClientDomain => &self.client_domain,
            Field::ClientId => &self.client_id,
            Field::UniqueId => &self.unique_id,
            Field::Login => &self.login,
            Field::Email => &self.email,
        };
        if field.is_request_context() && value.is_empty() {
            PLACEHOLDER.to_owned()
        } else {
            value.clone()
        }
    }

    fn set_field(&mut self, field: Field, value: &str) -> Result<(), SsoError> {
        let number = || -> Result<u64, SsoError> {
            value
                .parse()
                .map_err(|_| SsoError::InvalidFormat(FormatError::Number(field)))
        };
        let value = if field.is_request_context() && value == PLACEHOLDER {
            ""
        } else {
            value
        };

        let slot = match field {
            Field::Tsid => {
                self.tsid = number()?;
                return Ok(());
            }
            Field::Timestamp => {
                self.timestamp = number()?;
                return Ok(());
            }
            Field::Version => &mut self.version,
            Field::ServerId => &mut self.server_id,
            Field::ReqUserAgent => &mut self.req_user_agent,
            Field::ReqReferer => &mut self.req_referer,
            Field::ReqRemoteAddr => &mut self.req_remote_addr,
            Field::ClientDomain => &mut self.client_domain,
            Field::ClientId => &mut self.client_id,
            Field::UniqueId => &mut self.unique_id,
            Field::Login => &mut self.login,
            Field::Email => &mut self.email,
        };
        value.clone_into(slot);
        Ok(())
    }

    /// Serialize this record, escaping every field.
    pub fn to_record(&self) -> String {
        let mut record = String::from(START_MARKER);
        for field in Field::ALL {
            record.push(SEPARATOR);
            record.push_str(&escape(&self.field(field)));
        }
        for (key, value) in self.settings.iter() {
            record.push(SEPARATOR);
            record.push_str(&escape(&format!("{key}={value}")));
        }
        record.push(SEPARATOR);
        record.push_str(END_MARKER);
        record
    }

    /// Parse a record produced by [`AuthToken::to_record`] or by the partner.
    pub fn from_record(record: &str) -> Result<Self, SsoError> {
        let items: Vec<&str> = record.split(SEPARATOR).collect();
        let [START_MARKER, items @ .., END_MARKER] = &items[..] else {
            return Err(FormatError::Record.into());
        };
        let Some((fields, settings)) = items.split_first_chunk::<{ Field::ALL.len() }>() else {
            return Err(FormatError::Record.into());
        };

        let mut token = AuthToken::empty();
        for (field, value) in Field::ALL.into_iter().zip(fields) {
            token.set_field(field, value)?;
        }
        for item in settings {
            token.settings.parse_item(item);
        }

        Ok(token)
    }

    fn empty() -> Self {
        AuthToken {
            version: String::new(),
            server_id: String::new(),
            tsid: 0,
            timestamp: 0,
            req_user_agent: String::new(),
            req_referer: String::new(),
            req_remote_addr: String::new(),
            client_domain: String::new(),
            client_id: String::new(),
            unique_id: String::new(),
            login: String::new(),
            email: String::new(),
            settings: Settings::new(),
        }
    }
}
