// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration backends.
//!
//! This module contains concrete implementations of the `ConfigSource` trait
//! defined in the ports layer, one per storage medium.

pub mod map;
pub mod properties;
#[cfg(feature = "yaml")]
pub mod tree;

// Re-export adapters based on feature flags
pub use map::MapSource;
pub use properties::PropertiesSource;
#[cfg(feature = "yaml")]
pub use tree::TreeSource;
