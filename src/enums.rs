// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for all #[derive(...)] enums that represent
//! caller-visible choices: operation modes, wrapped-key kinds, key formats.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// What an engine instance is initialized to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpMode {
    Encrypt,
    Decrypt,
    Wrap,
    Unwrap,
}

impl OpMode {
    /// Decode from the conventional wire code (1=encrypt .. 4=unwrap).
    ///
    /// Anything outside 1..=4 is rejected with `InvalidParameter`.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(OpMode::Encrypt),
            2 => Ok(OpMode::Decrypt),
            3 => Ok(OpMode::Wrap),
            4 => Ok(OpMode::Unwrap),
            _ => Err(EngineError::InvalidParameter(format!(
                "invalid operation mode: {code}"
            ))),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            OpMode::Encrypt => 1,
            OpMode::Decrypt => 2,
            OpMode::Wrap => 3,
            OpMode::Unwrap => 4,
        }
    }
}

/// Kind of key produced by `unwrap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrappedKeyType {
    Public,
    Private,
    Secret,
}

impl WrappedKeyType {
    /// Decode from the conventional wire code (1=public, 2=private, 3=secret).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(WrappedKeyType::Public),
            2 => Ok(WrappedKeyType::Private),
            3 => Ok(WrappedKeyType::Secret),
            _ => Err(EngineError::InvalidParameter(format!(
                "invalid key type: {code}"
            ))),
        }
    }
}

/// Export format of key material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum KeyFormat {
    #[default]
    Raw,
    Pkcs8,
    X509,
}
