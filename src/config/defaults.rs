// src/config/defaults.rs
use super::app::{Features, Providers};

pub fn default_providers() -> Providers {
    Providers {
        preferred: Vec::new(),
    }
}

pub fn default_features() -> Features {
    Features {
        probe_on_create: true,
    }
}
