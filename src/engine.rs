// src/engine.rs
//! The public stateful cipher engine
//!
//! Enforces the operational state machine, validates arguments, and forwards
//! everything else to the lazily bound implementation.

use std::sync::Arc;

use rand::RngCore;

use crate::binding::{Binding, BindingSlot};
use crate::cert::Certificate;
use crate::config;
use crate::enums::{OpMode, WrappedKeyType};
use crate::error::{EngineError, Result};
use crate::key::Key;
use crate::params::{AlgorithmParameters, EngineParams, ParameterSpec};
use crate::provider::Provider;
use crate::registry::Registry;
use crate::resolve::InitParams;
use crate::transform::TransformSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Uninitialized,
    Initialized(OpMode),
}

/// A stateful encrypt/decrypt/wrap/unwrap engine bound to whichever
/// installed provider can perform its transform.
pub struct CipherEngine {
    transformation: String,
    state: EngineState,
    slot: BindingSlot,
}

impl std::fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherEngine")
            .field("transformation", &self.transformation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CipherEngine {
    /// Resolve `transformation` against the global registry.
    ///
    /// Fails `NoSuchAlgorithm` up front when no installed provider can
    /// perform it structurally; the actual binding stays lazy.
    pub fn new(transformation: &str) -> Result<Self> {
        Self::with_registry(transformation, Registry::global())
    }

    /// Same as [`new`], resolving against a caller-supplied registry.
    ///
    /// [`new`]: CipherEngine::new
    pub fn with_registry(transformation: &str, registry: Arc<Registry>) -> Result<Self> {
        let spec = TransformSpec::parse(transformation)?;
        let slot = BindingSlot::searching(registry, spec, None);
        Self::finish_construction(transformation, slot)
    }

    /// Resolve only against `provider`, ignoring the registry scan order.
    pub fn with_provider(transformation: &str, provider: Arc<Provider>) -> Result<Self> {
        let spec = TransformSpec::parse(transformation)?;
        let slot = BindingSlot::searching(Registry::global(), spec, Some(provider));
        Self::finish_construction(transformation, slot)
    }

    /// Build an engine pinned to an explicit backend/provider pair. No
    /// resolution ever runs; the pair is used as-is.
    pub fn from_parts(
        transformation: &str,
        backend: Box<dyn crate::backend::CipherBackend>,
        provider: Arc<Provider>,
    ) -> Result<Self> {
        let spec = TransformSpec::parse(transformation)?;
        let binding = Binding::new(backend, provider);
        let slot = BindingSlot::pinned(Registry::global(), spec, binding);
        Ok(Self {
            transformation: transformation.to_owned(),
            state: EngineState::Uninitialized,
            slot,
        })
    }

    fn finish_construction(transformation: &str, slot: BindingSlot) -> Result<Self> {
        if config::load().features.probe_on_create {
            slot.probe()?;
        }
        Ok(Self {
            transformation: transformation.to_owned(),
            state: EngineState::Uninitialized,
            slot,
        })
    }

    // ── initialization ──────────────────────────────────────────────

    /// Initialize for `op` with a key and no algorithm parameters.
    pub fn init(&mut self, op: OpMode, key: &Key) -> Result<()> {
        self.init_full(op, key, EngineParams::None, &mut rand::rng())
    }

    /// Initialize with structured algorithm parameters.
    pub fn init_with_spec(&mut self, op: OpMode, key: &Key, spec: ParameterSpec) -> Result<()> {
        self.init_full(op, key, EngineParams::Spec(spec), &mut rand::rng())
    }

    /// Initialize with provider-encoded algorithm parameters.
    pub fn init_with_params(
        &mut self,
        op: OpMode,
        key: &Key,
        params: AlgorithmParameters,
    ) -> Result<()> {
        self.init_full(op, key, EngineParams::Encoded(params), &mut rand::rng())
    }

    /// Initialize from a certificate's public key.
    ///
    /// A critical key-usage extension must permit the requested operation,
    /// otherwise the init fails `InvalidKey` without touching any provider.
    pub fn init_with_certificate(&mut self, op: OpMode, certificate: &Certificate) -> Result<()> {
        if !certificate.permits(op) {
            self.state = EngineState::Uninitialized;
            return Err(EngineError::InvalidKey("wrong key usage".to_owned()));
        }
        self.init_full(
            op,
            certificate.public_key(),
            EngineParams::None,
            &mut rand::rng(),
        )
    }

    /// The full init entry point: explicit parameter shape and random source.
    ///
    /// On failure the engine stays Uninitialized and the error surfaces as
    /// `InvalidKey` unless it is already an `InvalidKey`,
    /// `InvalidAlgorithmParameter`, or `ProviderFault`.
    pub fn init_full(
        &mut self,
        op: OpMode,
        key: &Key,
        params: EngineParams,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        self.state = EngineState::Uninitialized;
        let mut init = InitParams {
            op,
            key,
            params: &params,
            rng,
        };
        match self.slot.ensure_mut(Some(&mut init)) {
            Ok(_) => {
                self.state = EngineState::Initialized(op);
                Ok(())
            }
            Err(
                e @ (EngineError::InvalidKey(_)
                | EngineError::InvalidAlgorithmParameter(_)
                | EngineError::ProviderFault(_)),
            ) => Err(e),
            Err(other) => Err(EngineError::InvalidKey(other.to_string())),
        }
    }

    // ── streaming operations ────────────────────────────────────────

    /// Process a chunk of data. Zero-length input is a no-op returning an
    /// empty vector.
    pub fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.require_crypt_state()?;
        let binding = self.slot.ensure_mut(None)?;
        if input.is_empty() {
            return Ok(Vec::new());
        }
        binding.backend_mut().update(input)
    }

    /// Process a chunk into `output` starting at `output_offset`.
    pub fn update_into(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<usize> {
        self.require_crypt_state()?;
        check_output_offset(output, output_offset)?;
        let binding = self.slot.ensure_mut(None)?;
        if input.is_empty() {
            return Ok(0);
        }
        binding
            .backend_mut()
            .update_into(input, &mut output[output_offset..])
    }

    /// Supply additional authenticated data ahead of the payload. Empty
    /// input is a no-op.
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        self.require_crypt_state()?;
        let binding = self.slot.ensure_mut(None)?;
        if aad.is_empty() {
            return Ok(());
        }
        binding.backend_mut().update_aad(aad)
    }

    /// Finish the operation, consuming `input` plus any buffered data.
    pub fn do_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.require_crypt_state()?;
        let binding = self.slot.ensure_mut(None)?;
        binding.backend_mut().do_final(input)
    }

    /// Finish into `output` starting at `output_offset`, returning the bytes
    /// written.
    pub fn do_final_into(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        output_offset: usize,
    ) -> Result<usize> {
        self.require_crypt_state()?;
        check_output_offset(output, output_offset)?;
        let binding = self.slot.ensure_mut(None)?;
        binding
            .backend_mut()
            .do_final_into(input, &mut output[output_offset..])
    }

    // ── key wrapping ────────────────────────────────────────────────

    pub fn wrap(&mut self, key: &Key) -> Result<Vec<u8>> {
        match self.state {
            EngineState::Uninitialized => {
                return Err(EngineError::IllegalState("cipher not initialized"))
            }
            EngineState::Initialized(OpMode::Wrap) => {}
            EngineState::Initialized(_) => {
                return Err(EngineError::IllegalState(
                    "cipher not initialized for wrapping keys",
                ))
            }
        }
        let binding = self.slot.ensure_mut(None)?;
        binding.backend_mut().wrap_key(key)
    }

    pub fn unwrap_key(
        &mut self,
        wrapped: &[u8],
        algorithm: &str,
        key_type: WrappedKeyType,
    ) -> Result<Key> {
        match self.state {
            EngineState::Uninitialized => {
                return Err(EngineError::IllegalState("cipher not initialized"))
            }
            EngineState::Initialized(OpMode::Unwrap) => {}
            EngineState::Initialized(_) => {
                return Err(EngineError::IllegalState(
                    "cipher not initialized for unwrapping keys",
                ))
            }
        }
        let binding = self.slot.ensure_mut(None)?;
        binding.backend_mut().unwrap_key(wrapped, algorithm, key_type)
    }

    // ── capability getters ──────────────────────────────────────────

    /// The transform string this engine was created with.
    pub fn algorithm(&self) -> &str {
        &self.transformation
    }

    /// The parsed transform.
    pub fn transform(&self) -> &TransformSpec {
        self.slot.spec()
    }

    /// The operation the engine is currently initialized for, if any.
    pub fn op_mode(&self) -> Option<OpMode> {
        match self.state {
            EngineState::Uninitialized => None,
            EngineState::Initialized(op) => Some(op),
        }
    }

    /// The provider the engine is bound to, resolving structurally if no
    /// binding exists yet.
    pub fn provider(&self) -> Result<Arc<Provider>> {
        self.slot.with_binding(|b| Arc::clone(b.provider()))
    }

    /// Block size in bytes; 0 for stream ciphers.
    pub fn block_size(&self) -> Result<usize> {
        self.slot.with_binding(|b| b.backend().block_size())
    }

    /// Upper bound on the output for `input_len` further input bytes.
    /// Requires an initialized engine.
    pub fn output_size(&self, input_len: usize) -> Result<usize> {
        if self.state == EngineState::Uninitialized {
            return Err(EngineError::IllegalState("cipher not initialized"));
        }
        self.slot.with_binding(|b| b.backend().output_size(input_len))
    }

    /// IV in use, once one exists.
    pub fn iv(&self) -> Result<Option<Vec<u8>>> {
        self.slot.with_binding(|b| b.backend().iv())
    }

    /// Algorithm parameters in use, in the provider's encoding.
    pub fn parameters(&self) -> Result<Option<AlgorithmParameters>> {
        self.slot.with_binding(|b| b.backend().parameters())
    }

    fn require_crypt_state(&self) -> Result<()> {
        match self.state {
            EngineState::Uninitialized => Err(EngineError::IllegalState("cipher not initialized")),
            EngineState::Initialized(OpMode::Encrypt | OpMode::Decrypt) => Ok(()),
            EngineState::Initialized(_) => Err(EngineError::IllegalState(
                "cipher not initialized for encryption/decryption",
            )),
        }
    }
}

fn check_output_offset(output: &[u8], output_offset: usize) -> Result<()> {
    if output_offset > output.len() {
        return Err(EngineError::InvalidArgument(format!(
            "output offset {} out of range for buffer of {} bytes",
            output_offset,
            output.len()
        )));
    }
    Ok(())
}
