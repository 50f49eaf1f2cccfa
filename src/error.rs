// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no transformation given")]
    NoTransformation,

    #[error("invalid transformation format: {0}")]
    InvalidTransformationFormat(String),

    #[error("no such algorithm: {0}")]
    NoSuchAlgorithm(String),

    #[error("no such padding: {0}")]
    NoSuchPadding(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid algorithm parameter: {0}")]
    InvalidAlgorithmParameter(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("bad arguments: {0}")]
    InvalidArgument(String),

    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    #[error("output buffer too small: need {needed} bytes, have {available}")]
    ShortBuffer { needed: usize, available: usize },

    #[error("illegal block size: {0}")]
    IllegalBlockSize(String),

    #[error("bad padding: {0}")]
    BadPadding(String),

    #[error("provider fault: {0}")]
    ProviderFault(String),
}

impl EngineError {
    /// True for the key/param failures the resolver may swallow while it
    /// keeps scanning other candidates and providers. Everything else is
    /// fatal to a resolution pass.
    pub(crate) fn is_retryable_init_failure(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidKey(_) | EngineError::InvalidAlgorithmParameter(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
