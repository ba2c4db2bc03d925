// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait every backend implements and the extension trait
//! that provides typed access on top of it. Both are implemented for backends in the
//! adapters layer.

pub mod source;

// Re-export commonly used types
pub use source::{ConfigSource, ConfigSourceExt};
