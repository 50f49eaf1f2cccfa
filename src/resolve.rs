// src/resolve.rs
//! The provider matching algorithm
//!
//! Walks candidate lookup keys against the provider snapshot in priority
//! order, filters on attributes and key compatibility, instantiates and
//! configures the first workable service, and aggregates errors so the
//! caller always sees the most relevant single cause.

use rand::RngCore;

use std::sync::Arc;

use crate::binding::Binding;
use crate::consts::SERVICE_TYPE;
use crate::enums::OpMode;
use crate::error::{EngineError, Result};
use crate::key::Key;
use crate::params::EngineParams;
use crate::provider::{Provider, Service};
use crate::transform::{FieldsNeeded, TransformSpec};

/// Everything a keyed initialization needs, borrowed from the caller for the
/// duration of one resolution pass.
pub struct InitParams<'a> {
    pub op: OpMode,
    pub key: &'a Key,
    pub params: &'a EngineParams,
    pub rng: &'a mut dyn RngCore,
}

/// Resolve `spec` to a configured backend and its owning provider.
///
/// With `pinned` set the scan covers only that provider. `init` being absent
/// makes this a structural probe: attribute matching only, no keyed
/// initialization — capability getters use this before any key is known.
pub(crate) fn resolve(
    providers: &[Arc<Provider>],
    pinned: Option<&Arc<Provider>>,
    spec: &TransformSpec,
    mut init: Option<&mut InitParams<'_>>,
) -> Result<Binding> {
    let candidates = spec.candidates();

    if let Some(provider) = pinned {
        for candidate in &candidates {
            let Some(service) = provider.service(SERVICE_TYPE, &candidate.name) else {
                continue;
            };
            if let Some(binding) =
                try_service(init.as_deref_mut(), spec, candidate.needs, service, provider)?
            {
                return Ok(binding);
            }
        }
        return Err(EngineError::NoSuchAlgorithm(format!(
            "provider {} does not provide {}",
            provider.name(),
            spec
        )));
    }

    // First key/param failure is remembered; later ones are assumed to be
    // the same underlying mismatch and dropped.
    let mut first_failure: Option<EngineError> = None;

    for provider in providers {
        for candidate in &candidates {
            let Some(service) = provider.service(SERVICE_TYPE, &candidate.name) else {
                continue;
            };
            if let Some(params) = init.as_ref() {
                if !service.supports_key(params.key) {
                    tracing::debug!(
                        provider = provider.name(),
                        service = service.name(),
                        key = params.key.algorithm(),
                        "service rejects key, skipping"
                    );
                    continue;
                }
            }
            match try_service(init.as_deref_mut(), spec, candidate.needs, service, provider) {
                Ok(Some(binding)) => {
                    tracing::debug!(
                        provider = provider.name(),
                        service = service.name(),
                        "transform bound"
                    );
                    return Ok(binding);
                }
                Ok(None) => {}
                Err(e) if e.is_retryable_init_failure() => {
                    tracing::debug!(
                        provider = provider.name(),
                        service = service.name(),
                        error = %e,
                        "keyed init failed, trying further providers"
                    );
                    first_failure.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => match init {
            Some(params) => Err(EngineError::InvalidKey(format!(
                "no provider offers {} for a {} key of {} bytes",
                spec,
                params.key.algorithm(),
                params.key.len()
            ))),
            None => Err(EngineError::NoSuchAlgorithm(format!(
                "no provider found for {spec}"
            ))),
        },
    }
}

/// Attribute-match, instantiate, configure, and (when params are present)
/// initialize one service.
///
/// `Ok(None)` means "structurally unusable, keep scanning": an attribute
/// mismatch, or the instance itself refusing the mode/padding it was asked
/// to take on. Key/param rejections and provider faults surface as errors
/// for the caller to classify.
fn try_service(
    init: Option<&mut InitParams<'_>>,
    spec: &TransformSpec,
    needs: FieldsNeeded,
    service: &Arc<Service>,
    provider: &Arc<Provider>,
) -> Result<Option<Binding>> {
    if !service.accepts_mode(spec.mode())? || !service.accepts_padding(spec.padding())? {
        return Ok(None);
    }

    let mut backend = service.instantiate();

    let configured: Result<()> = (|| {
        if needs.needs_mode() {
            if let Some(mode) = spec.mode() {
                backend.set_mode(mode)?;
            }
        }
        if needs.needs_padding() {
            if let Some(padding) = spec.padding() {
                backend.set_padding(padding)?;
            }
        }
        if let Some(params) = init {
            backend.init(params.op, params.key, params.params, &mut *params.rng)?;
        }
        Ok(())
    })();

    match configured {
        Ok(()) => Ok(Some(Binding::new(backend, Arc::clone(provider)))),
        // The service exists under this name but cannot take the requested
        // mode/padding after all; treat exactly like a non-match.
        Err(EngineError::NoSuchAlgorithm(_)) | Err(EngineError::NoSuchPadding(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
