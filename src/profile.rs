//! Connection profile loading.
//!
//! The surrounding application (an editor extension) hands the crate its
//! connection settings as a JSON blob. The profile carries everything a
//! session needs: endpoint, encoding, credentials and the timing knobs
//! the protocol requires (post-connect grace period, read deadline).
//!
//! # Example
//!
//! ```
//! use mvwire_client::profile::ConnectionProfile;
//!
//! let profile = ConnectionProfile::from_json_str(
//!     r#"{
//!         "host": "mvhost.example",
//!         "port": 9005,
//!         "credentials": { "user": "alice", "password": "secret", "account": "ACCT" }
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(profile.connect_grace_ms, 500);
//! ```

use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec::WireEncoding;
use crate::error::Result;

/// Logon credentials for the database protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// Server user name.
    pub user: String,
    /// Server password.
    pub password: String,
    /// MV account to log onto.
    pub account: String,
}

/// Everything needed to open one session.
///
/// Unknown fields are rejected so a typo in the editor settings fails
/// loudly instead of silently falling back to a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConnectionProfile {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Wire encoding; the database protocol default is ISO-8859-1.
    #[serde(default)]
    pub encoding: WireEncoding,
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Settle delay after connect before the connection is trusted. The
    /// server exhibits a connect race; 500ms is the historical value.
    #[serde(default = "default_connect_grace_ms")]
    pub connect_grace_ms: u64,
    /// Per-read deadline while assembling a response, in milliseconds.
    /// `0` disables the deadline (the legacy behavior; not recommended).
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Logon credentials.
    pub credentials: Credentials,
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_connect_grace_ms() -> u64 {
    500
}

fn default_read_timeout_ms() -> u64 {
    30_000
}

impl ConnectionProfile {
    /// Load a profile from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a profile from a reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// TCP connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Post-connect grace period.
    pub fn connect_grace(&self) -> Duration {
        Duration::from_millis(self.connect_grace_ms)
    }

    /// Read deadline, or `None` when disabled.
    pub fn read_timeout(&self) -> Option<Duration> {
        if self.read_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.read_timeout_ms))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "host": "mvhost",
            "port": 9005,
            "credentials": { "user": "u", "password": "p", "account": "A" }
        }"#
    }

    #[test]
    fn test_minimal_profile_gets_defaults() {
        let profile = ConnectionProfile::from_json_str(minimal_json()).unwrap();
        assert_eq!(profile.encoding, WireEncoding::Iso8859_1);
        assert_eq!(profile.connect_timeout_ms, 10_000);
        assert_eq!(profile.connect_grace_ms, 500);
        assert_eq!(profile.read_timeout_ms, 30_000);
        assert_eq!(profile.read_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_explicit_fields() {
        let profile = ConnectionProfile::from_json_str(
            r#"{
                "host": "mvhost",
                "port": 9005,
                "encoding": "utf-8",
                "connectGraceMs": 50,
                "readTimeoutMs": 0,
                "credentials": { "user": "u", "password": "p", "account": "A" }
            }"#,
        )
        .unwrap();
        assert_eq!(profile.encoding, WireEncoding::Utf8);
        assert_eq!(profile.connect_grace(), Duration::from_millis(50));
        assert_eq!(profile.read_timeout(), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConnectionProfile::from_json_str(
            r#"{
                "host": "mvhost",
                "port": 9005,
                "hostname": "typo",
                "credentials": { "user": "u", "password": "p", "account": "A" }
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_reader() {
        let profile = ConnectionProfile::from_reader(minimal_json().as_bytes()).unwrap();
        assert_eq!(profile.host, "mvhost");
        assert_eq!(profile.credentials.account, "A");
    }
}
