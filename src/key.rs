// src/key.rs
//! Key handles passed to and produced by engine implementations
//!
//! The engine never interprets key material itself; it only routes keys to
//! providers and filters services on key compatibility. Material is zeroized
//! on drop.

use std::fmt;

use zeroize::Zeroize;

use crate::enums::KeyFormat;

/// An opaque key: algorithm label, export format, raw material.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    algorithm: String,
    format: KeyFormat,
    material: Vec<u8>,
}

impl Key {
    pub fn new(algorithm: impl Into<String>, format: KeyFormat, material: Vec<u8>) -> Self {
        Self {
            algorithm: algorithm.into(),
            format,
            material,
        }
    }

    /// Convenience for a raw symmetric key.
    pub fn secret(algorithm: impl Into<String>, material: Vec<u8>) -> Self {
        Self::new(algorithm, KeyFormat::Raw, material)
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    pub fn material(&self) -> &[u8] {
        &self.material
    }

    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}

// Material stays out of logs and error messages.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .field("format", &self.format)
            .field("len", &self.material.len())
            .finish_non_exhaustive()
    }
}
