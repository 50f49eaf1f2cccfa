// src/lib.rs
//! cipher-engine — provider-based transform resolution and dispatch
//!
//! Features:
//! - `"ALG/MODE/PADDING"` transform strings, parsed and normalized
//! - Multi-provider matching with attribute and key-compatibility filtering
//! - Lazy, thread-safe binding to the selected implementation
//! - A uniform stateful API for encrypt, decrypt, key-wrap, key-unwrap
//!
//! No cipher algorithm lives here; implementations are registered by
//! providers behind the [`CipherBackend`] capability trait.

pub mod backend;
pub mod cert;
pub mod config;
pub mod consts;
pub mod engine;
pub mod enums;
pub mod key;
pub mod params;
pub mod provider;
pub mod registry;
pub mod transform;

mod binding;
mod resolve;

pub mod error;

// Re-export everything users need at the crate root
pub use backend::CipherBackend;
pub use binding::Binding;
pub use cert::{Certificate, KeyUsage};
pub use config::load as load_config;
pub use engine::CipherEngine;
pub use enums::{KeyFormat, OpMode, WrappedKeyType};
pub use error::{EngineError, Result};
pub use key::Key;
pub use params::{AlgorithmParameters, EngineParams, ParameterSpec};
pub use provider::{Provider, Service};
pub use registry::Registry;
pub use transform::{Candidate, FieldsNeeded, TransformSpec};
