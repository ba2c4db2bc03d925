// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing cached value handles.
//!
//! This module builds on the `ConfigSource` port: a `ConfigValue` binds one key of a
//! shared source and resolves it on demand.

pub mod config_value;
pub mod policy;

// Re-export commonly used types
pub use config_value::{
    ConfigValue, MutableOptionalValue, MutableRequiredValue, OptionalValue, RequiredValue,
};
pub use policy::{Immutable, Mutable, Optional, Presence, Required};
