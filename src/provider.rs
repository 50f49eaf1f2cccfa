// src/provider.rs
//! Providers and their registered services
//!
//! A provider is an ordered collection of services; a service pairs a lookup
//! name with declared attributes, an optional key filter, and a constructor
//! closure for fresh backend instances.

use std::fmt;
use std::sync::Arc;

use regex::RegexBuilder;

use crate::backend::CipherBackend;
use crate::consts::{ATTRIBUTE_MODES, ATTRIBUTE_PADDINGS, SERVICE_TYPE};
use crate::error::{EngineError, Result};
use crate::key::Key;

pub type BackendFactory = Arc<dyn Fn() -> Box<dyn CipherBackend> + Send + Sync>;
pub type KeyFilter = Arc<dyn Fn(&Key) -> bool + Send + Sync>;

/// One registered implementation: name, attributes, factory.
#[derive(Clone)]
pub struct Service {
    service_type: &'static str,
    name: String,
    supported_modes: Option<String>,
    supported_paddings: Option<String>,
    key_filter: Option<KeyFilter>,
    factory: BackendFactory,
}

impl Service {
    pub fn new(
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn CipherBackend> + Send + Sync + 'static,
    ) -> Self {
        Self {
            service_type: SERVICE_TYPE,
            name: name.into(),
            supported_modes: None,
            supported_paddings: None,
            key_filter: None,
            factory: Arc::new(factory),
        }
    }

    /// Restrict accepted modes to a case-insensitive regex (whole token).
    /// Absent means no restriction.
    pub fn supported_modes(mut self, pattern: impl Into<String>) -> Self {
        self.supported_modes = Some(pattern.into());
        self
    }

    /// Restrict accepted paddings, same semantics as [`supported_modes`].
    ///
    /// [`supported_modes`]: Service::supported_modes
    pub fn supported_paddings(mut self, pattern: impl Into<String>) -> Self {
        self.supported_paddings = Some(pattern.into());
        self
    }

    /// Declare which keys this service can work with. Services without a
    /// filter accept every key.
    pub fn key_filter(mut self, filter: impl Fn(&Key) -> bool + Send + Sync + 'static) -> Self {
        self.key_filter = Some(Arc::new(filter));
        self
    }

    pub fn service_type(&self) -> &str {
        self.service_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attribute value by name, or `None` when the service leaves
    /// the attribute unrestricted.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            ATTRIBUTE_MODES => self.supported_modes.as_deref(),
            ATTRIBUTE_PADDINGS => self.supported_paddings.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn accepts_mode(&self, mode: Option<&str>) -> Result<bool> {
        match_attribute(self.supported_modes.as_deref(), mode)
    }

    pub(crate) fn accepts_padding(&self, padding: Option<&str>) -> Result<bool> {
        match_attribute(self.supported_paddings.as_deref(), padding)
    }

    pub(crate) fn supports_key(&self, key: &Key) -> bool {
        match &self.key_filter {
            Some(filter) => filter(key),
            None => true,
        }
    }

    pub(crate) fn instantiate(&self) -> Box<dyn CipherBackend> {
        (self.factory)()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type", &self.service_type)
            .field("name", &self.name)
            .field("supported_modes", &self.supported_modes)
            .field("supported_paddings", &self.supported_paddings)
            .finish_non_exhaustive()
    }
}

/// No declared pattern, or no requested value, always matches. A pattern a
/// provider cannot even compile is a provider fault and aborts resolution.
fn match_attribute(pattern: Option<&str>, value: Option<&str>) -> Result<bool> {
    let (Some(pattern), Some(value)) = (pattern, value) else {
        return Ok(true);
    };
    let re = RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
        .map_err(|e| EngineError::ProviderFault(format!("bad attribute pattern {pattern:?}: {e}")))?;
    Ok(re.is_match(value))
}

/// A named, ordered source of services.
#[derive(Debug, Clone)]
pub struct Provider {
    name: String,
    info: String,
    services: Vec<Arc<Service>>,
}

impl Provider {
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: info.into(),
            services: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(Arc::new(service));
        self
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(Arc::new(service));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    /// Exact-name lookup. Case is preserved: registration and request must
    /// agree on spelling, only attribute matching is case-insensitive.
    pub fn service(&self, service_type: &str, name: &str) -> Option<&Arc<Service>> {
        self.services
            .iter()
            .find(|s| s.service_type() == service_type && s.name() == name)
    }

    pub fn services(&self) -> &[Arc<Service>] {
        &self.services
    }
}
