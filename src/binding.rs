// src/binding.rs
//! Per-engine lazy binding cache
//!
//! Each engine owns one slot holding the (backend, provider) pair it
//! delegates to. The slot resolves on first use and re-resolves whenever new
//! init parameters arrive; getters reuse the cached pair without re-running
//! the provider scan. Engines pinned to an explicit backend bypass
//! resolution entirely.

use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::CipherBackend;
use crate::error::{EngineError, Result};
use crate::provider::Provider;
use crate::registry::Registry;
use crate::resolve::{resolve, InitParams};
use crate::transform::TransformSpec;

/// The resolved (implementation, provider) pair. Replaced wholesale on
/// re-resolution, never mutated in place.
pub struct Binding {
    backend: Box<dyn CipherBackend>,
    provider: Arc<Provider>,
}

impl Binding {
    pub(crate) fn new(backend: Box<dyn CipherBackend>, provider: Arc<Provider>) -> Self {
        Self { backend, provider }
    }

    pub fn backend(&self) -> &dyn CipherBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn CipherBackend {
        self.backend.as_mut()
    }

    pub fn provider(&self) -> &Arc<Provider> {
        &self.provider
    }
}

/// One engine's binding slot plus everything a resolution pass needs.
pub(crate) struct BindingSlot {
    registry: Arc<Registry>,
    spec: TransformSpec,
    pinned_provider: Option<Arc<Provider>>,
    pinned_backend: bool,
    slot: Mutex<Option<Binding>>,
}

impl BindingSlot {
    /// A slot that resolves lazily, optionally restricted to one provider.
    pub(crate) fn searching(
        registry: Arc<Registry>,
        spec: TransformSpec,
        pinned_provider: Option<Arc<Provider>>,
    ) -> Self {
        Self {
            registry,
            spec,
            pinned_provider,
            pinned_backend: false,
            slot: Mutex::new(None),
        }
    }

    /// A slot pre-filled with a caller-supplied pair; never re-resolves.
    pub(crate) fn pinned(registry: Arc<Registry>, spec: TransformSpec, binding: Binding) -> Self {
        Self {
            registry,
            spec,
            pinned_provider: None,
            pinned_backend: true,
            slot: Mutex::new(Some(binding)),
        }
    }

    pub(crate) fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    /// Keyless structural resolution, result discarded. Lets a constructor
    /// fail fast on an unsatisfiable transform while the binding stays lazy.
    pub(crate) fn probe(&self) -> Result<()> {
        if self.pinned_backend {
            return Ok(());
        }
        let snapshot = self.registry.snapshot();
        resolve(&snapshot, self.pinned_provider.as_ref(), &self.spec, None).map(drop)
    }

    /// Exclusive access for the stateful operations.
    ///
    /// Resolves when the slot is empty or when `init` is present (the caller
    /// is (re-)initializing, so the old pair is replaced). With a pinned
    /// backend the keyed init runs directly against it.
    pub(crate) fn ensure_mut(&mut self, init: Option<&mut InitParams<'_>>) -> Result<&mut Binding> {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);

        if self.pinned_backend {
            let Some(binding) = slot.as_mut() else {
                return Err(EngineError::ProviderFault(
                    "pinned backend missing from binding slot".to_owned(),
                ));
            };
            if let Some(params) = init {
                binding
                    .backend_mut()
                    .init(params.op, params.key, params.params, &mut *params.rng)?;
            }
            return Ok(binding);
        }

        if slot.is_none() || init.is_some() {
            let snapshot = self.registry.snapshot();
            let binding = resolve(&snapshot, self.pinned_provider.as_ref(), &self.spec, init)?;
            tracing::debug!(
                transform = %self.spec,
                provider = binding.provider().name(),
                "binding slot updated"
            );
            *slot = Some(binding);
        }
        slot.as_mut().ok_or_else(|| {
            EngineError::ProviderFault("binding unexpectedly absent after resolution".to_owned())
        })
    }

    /// Shared access for capability getters. The lock is held only across
    /// resolution (first use) and the closure, never across engine calls.
    pub(crate) fn with_binding<R>(&self, f: impl FnOnce(&Binding) -> R) -> Result<R> {
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            let snapshot = self.registry.snapshot();
            *guard = Some(resolve(
                &snapshot,
                self.pinned_provider.as_ref(),
                &self.spec,
                None,
            )?);
        }
        match guard.as_ref() {
            Some(binding) => Ok(f(binding)),
            None => Err(EngineError::ProviderFault(
                "binding unexpectedly absent after resolution".to_owned(),
            )),
        }
    }
}
