// src/config/mod.rs
//! Configuration system for cipher-engine
//!
//! Central, lazy-loaded global config with TOML + env override.

pub use app::{load, Config, Features, Providers};

mod app;
mod defaults;
