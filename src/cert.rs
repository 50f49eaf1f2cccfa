// src/cert.rs
//! Certificate-based initialization support
//!
//! An engine can be initialized from a certificate instead of a bare key: the
//! public key is extracted, and when the certificate carries a *critical*
//! key-usage extension, the requested operation must be permitted by the
//! declared usage bits.

use crate::enums::OpMode;
use crate::key::Key;

/// Key-usage bits relevant to cipher operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyUsage {
    pub digital_signature: bool,
    /// Permits wrapping of other keys.
    pub key_encipherment: bool,
    /// Permits encryption of application data.
    pub data_encipherment: bool,
}

/// The certificate fields the engine needs; extraction from an encoded
/// certificate happens upstream.
#[derive(Debug, Clone)]
pub struct Certificate {
    subject: String,
    public_key: Key,
    key_usage: Option<KeyUsage>,
    key_usage_critical: bool,
}

impl Certificate {
    pub fn new(subject: impl Into<String>, public_key: Key) -> Self {
        Self {
            subject: subject.into(),
            public_key,
            key_usage: None,
            key_usage_critical: false,
        }
    }

    pub fn with_key_usage(mut self, usage: KeyUsage, critical: bool) -> Self {
        self.key_usage = Some(usage);
        self.key_usage_critical = critical;
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn public_key(&self) -> &Key {
        &self.public_key
    }

    /// Whether the declared key usage permits `op`.
    ///
    /// Only a key-usage extension marked critical restricts anything:
    /// Encrypt needs the data-encipherment bit, Wrap the key-encipherment
    /// bit. Decrypt/Unwrap are never restricted here.
    pub fn permits(&self, op: OpMode) -> bool {
        let Some(usage) = self.key_usage else {
            return true;
        };
        if !self.key_usage_critical {
            return true;
        }
        match op {
            OpMode::Encrypt => usage.data_encipherment,
            OpMode::Wrap => usage.key_encipherment,
            OpMode::Decrypt | OpMode::Unwrap => true,
        }
    }
}
