// src/registry.rs
//! Priority-ordered provider registry
//!
//! Read-mostly: many engines snapshot it per resolution, installs are rare.
//! The resolver only ever sees an immutable snapshot, so a concurrent
//! install can never tear a scan in progress.

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::config;
use crate::provider::Provider;

static GLOBAL: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

#[derive(Debug, Default)]
pub struct Registry {
    providers: RwLock<Vec<Arc<Provider>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry most engines resolve against.
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    /// Append a provider at the lowest priority. Replaces an existing
    /// provider of the same name in place, keeping its rank.
    pub fn install(&self, provider: Provider) -> Arc<Provider> {
        let provider = Arc::new(provider);
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = providers.iter_mut().find(|p| p.name() == provider.name()) {
            *slot = Arc::clone(&provider);
        } else {
            providers.push(Arc::clone(&provider));
        }
        tracing::debug!(provider = provider.name(), "provider installed");
        provider
    }

    /// Remove a provider by name. Returns whether anything was removed.
    pub fn uninstall(&self, name: &str) -> bool {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = providers.len();
        providers.retain(|p| p.name() != name);
        before != providers.len()
    }

    pub fn provider(&self, name: &str) -> Option<Arc<Provider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    /// Immutable priority-ordered view for one resolution pass.
    ///
    /// Providers named in the config's preferred list rank first, in the
    /// listed order; everything else keeps installation order after them.
    pub fn snapshot(&self) -> Vec<Arc<Provider>> {
        let mut providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let preferred = &config::load().providers.preferred;
        if !preferred.is_empty() {
            providers.sort_by_key(|p| {
                preferred
                    .iter()
                    .position(|name| name == p.name())
                    .unwrap_or(usize::MAX)
            });
        }
        providers
    }

    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
