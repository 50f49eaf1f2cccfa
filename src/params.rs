// src/params.rs
//! Algorithm parameter carriers for keyed initialization
//!
//! Callers initialize with exactly one of: nothing, a structured parameter
//! spec, or provider-encoded parameters. The three shapes travel as one
//! tagged union consumed by an exhaustive match in the backend.

/// Structured, algorithm-specific initialization parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParameterSpec {
    /// Plain initialization vector (CBC and friends).
    Iv(Vec<u8>),
    /// IV plus authentication tag length in bits (GCM-style modes).
    IvAndTagLen { iv: Vec<u8>, tag_bits: usize },
}

/// Opaque parameters in a provider-defined encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmParameters {
    pub algorithm: String,
    pub encoded: Vec<u8>,
}

impl AlgorithmParameters {
    pub fn new(algorithm: impl Into<String>, encoded: Vec<u8>) -> Self {
        Self {
            algorithm: algorithm.into(),
            encoded,
        }
    }
}

/// The parameter shape a caller chose for `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineParams {
    /// No parameters; the implementation generates what it needs.
    #[default]
    None,
    Spec(ParameterSpec),
    Encoded(AlgorithmParameters),
}

impl From<ParameterSpec> for EngineParams {
    fn from(spec: ParameterSpec) -> Self {
        EngineParams::Spec(spec)
    }
}

impl From<AlgorithmParameters> for EngineParams {
    fn from(params: AlgorithmParameters) -> Self {
        EngineParams::Encoded(params)
    }
}
