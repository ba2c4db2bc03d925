// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical configuration access layer.
//!
//! This crate provides uniform, type-safe access to configuration stored in different
//! backends, addressed by key paths such as `server.tls.enabled`.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `KeyPathResolver`, `RawValue`, the
//!   `FromRaw`/`IntoRaw` conversion table, errors)
//! - **Ports**: The `ConfigSource` backend contract and its typed extension
//!   `ConfigSourceExt`
//! - **Adapters**: Backends over an in-memory map, flat string properties, and a
//!   nested YAML document
//! - **Service**: `ConfigValue`, a lazily resolved, cached handle for one key
//!
//! # Key Paths
//!
//! Each source is bound to a `KeyPathResolver` which normalizes key strings before
//! they reach the backend:
//!
//! - `Dot` (default): `server.port` addresses a nested path
//! - `Flat`: the whole string is one key
//! - `Env`: `server.port` becomes `SERVER_PORT`
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the nested document backend `TreeSource` (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use pathcfg::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> pathcfg::domain::Result<()> {
//! let source = Arc::new(MapSource::new());
//! source.set_int("server.port", 8080)?;
//! source.set_list("app.users", vec!["alice", "bob"])?;
//!
//! assert_eq!(source.get_int("server.port")?, Some(8080));
//! assert_eq!(source.get_list::<String>("app.users")?, ["alice", "bob"]);
//!
//! let port = RequiredValue::<u16>::new(source, "server.port");
//! assert_eq!(port.get()?, 8080);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{ConfigError, ConfigKey, KeyPathResolver, RawValue, Result};
    pub use crate::ports::{ConfigSource, ConfigSourceExt};
    pub use crate::service::{
        ConfigValue, MutableOptionalValue, MutableRequiredValue, OptionalValue, RequiredValue,
    };

    pub use crate::adapters::{MapSource, PropertiesSource};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::TreeSource;
}
