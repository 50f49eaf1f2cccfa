// src/backend.rs
//! The capability trait every cipher implementation fulfils
//!
//! Providers register constructor closures producing `Box<dyn CipherBackend>`;
//! the engine facade forwards to the bound instance. No algorithm lives in
//! this crate.

use rand::RngCore;

use crate::enums::{OpMode, WrappedKeyType};
use crate::error::{EngineError, Result};
use crate::key::Key;
use crate::params::{AlgorithmParameters, EngineParams};

/// A single stateful cipher implementation.
///
/// Instances are exclusively owned by one engine; implementations need
/// `Send` but never `Sync`.
pub trait CipherBackend: Send {
    /// Configure the block mode after construction. Only called when the
    /// service was registered under a name that does not encode the mode.
    /// Unknown modes fail with `NoSuchAlgorithm`.
    fn set_mode(&mut self, mode: &str) -> Result<()>;

    /// Configure the padding after construction. Unknown paddings fail with
    /// `NoSuchPadding`.
    fn set_padding(&mut self, padding: &str) -> Result<()>;

    /// Keyed initialization. `params` carries whichever parameter shape the
    /// caller chose; match it exhaustively and fail
    /// `InvalidAlgorithmParameter` on a shape the algorithm cannot use.
    fn init(
        &mut self,
        op: OpMode,
        key: &Key,
        params: &EngineParams,
        rng: &mut dyn RngCore,
    ) -> Result<()>;

    /// Process a chunk of data, returning whatever output is ready.
    fn update(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Process a chunk into a caller-supplied buffer, returning the bytes
    /// written. Fails `ShortBuffer` when `output` cannot hold the result.
    fn update_into(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let produced = self.update(input)?;
        write_out(&produced, output)
    }

    /// Supply additional authenticated data (AEAD modes only).
    fn update_aad(&mut self, _aad: &[u8]) -> Result<()> {
        Err(EngineError::ProviderFault(
            "backend does not accept additional authenticated data".to_owned(),
        ))
    }

    /// Finish the operation, processing `input` and any buffered data.
    fn do_final(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Finish into a caller-supplied buffer.
    fn do_final_into(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let produced = self.do_final(input)?;
        write_out(&produced, output)
    }

    /// Wrap a key for transport.
    fn wrap_key(&mut self, _key: &Key) -> Result<Vec<u8>> {
        Err(EngineError::ProviderFault(
            "backend does not support key wrapping".to_owned(),
        ))
    }

    /// Recover a previously wrapped key.
    fn unwrap_key(
        &mut self,
        _wrapped: &[u8],
        _algorithm: &str,
        _key_type: WrappedKeyType,
    ) -> Result<Key> {
        Err(EngineError::ProviderFault(
            "backend does not support key unwrapping".to_owned(),
        ))
    }

    /// Block size in bytes; 0 for stream ciphers.
    fn block_size(&self) -> usize;

    /// Upper bound on the output of the next `update`/`do_final` given
    /// `input_len` further input bytes.
    fn output_size(&self, input_len: usize) -> usize;

    /// IV in use, once one exists (set by params or generated during init).
    fn iv(&self) -> Option<Vec<u8>> {
        None
    }

    /// Parameters in use, in the provider's encoding.
    fn parameters(&self) -> Option<AlgorithmParameters> {
        None
    }
}

fn write_out(produced: &[u8], output: &mut [u8]) -> Result<usize> {
    if output.len() < produced.len() {
        return Err(EngineError::ShortBuffer {
            needed: produced.len(),
            available: output.len(),
        });
    }
    output[..produced.len()].copy_from_slice(produced);
    Ok(produced.len())
}
