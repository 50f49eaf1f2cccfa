// src/consts.rs
//! Shared constants — service lookup and attribute names

/// Service type every cipher implementation registers under
pub const SERVICE_TYPE: &str = "transform-engine";

/// Attribute naming the modes a service accepts (case-insensitive regex)
pub const ATTRIBUTE_MODES: &str = "SupportedModes";

/// Attribute naming the paddings a service accepts (case-insensitive regex)
pub const ATTRIBUTE_PADDINGS: &str = "SupportedPaddings";
