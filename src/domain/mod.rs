// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the types every other layer builds on: keys and key-path
//! resolution, the raw value model backends store, the conversion table between raw
//! values and Rust types, and the error type. It has no knowledge of any backend.

pub mod coercion;
pub mod config_key;
pub mod errors;
pub mod key_path;
pub mod raw_value;

// Re-export commonly used types
pub use coercion::{FromRaw, IntoRaw, ValueEncoding};
pub use config_key::ConfigKey;
pub use errors::{ConfigError, Result};
pub use key_path::{KeyPath, KeyPathResolver, PathSegment};
pub use raw_value::RawValue;
