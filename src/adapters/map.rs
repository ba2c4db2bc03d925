// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory map configuration source adapter.
//!
//! This module provides an adapter that stores raw values in a string-keyed map.
//! Keys are stored exactly as normalized by the bound resolver; no further path
//! expansion takes place, so `a.b` is one key, not a nested entry.

use crate::domain::{ConfigKey, KeyPathResolver, RawValue, Result};
use crate::ports::ConfigSource;
use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Configuration source adapter over a map of raw values.
///
/// Collections and maps are stored natively, so typed reads of lists and maps
/// return exactly what was written.
///
/// # Examples
///
/// ```rust
/// use pathcfg::adapters::MapSource;
/// use pathcfg::domain::KeyPathResolver;
/// use pathcfg::ports::ConfigSourceExt;
///
/// let source = MapSource::new().with_resolver(KeyPathResolver::Env);
/// source.set_int("server.port", 8080).unwrap();
///
/// assert!(source.source().contains_key("SERVER_PORT"));
/// assert_eq!(source.get_int("server.port").unwrap(), Some(8080));
/// ```
#[derive(Debug, Default)]
pub struct MapSource {
    values: RwLock<HashMap<String, RawValue>>,
    resolver: KeyPathResolver,
}

impl MapSource {
    /// Creates an empty map source using the dot resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map source over existing values.
    ///
    /// The keys are taken as already normalized.
    pub fn from_map(values: HashMap<String, RawValue>) -> Self {
        Self {
            values: RwLock::new(values),
            resolver: KeyPathResolver::default(),
        }
    }

    /// Sets the resolver used to normalize keys.
    pub fn with_resolver(mut self, resolver: KeyPathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns a copy of the stored map.
    pub fn source(&self) -> HashMap<String, RawValue> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, RawValue>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, RawValue>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn key_resolver(&self) -> KeyPathResolver {
        self.resolver
    }

    fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
        self.read().get(key.as_str()).cloned()
    }

    fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()> {
        let mut values = self.write();
        match value {
            Some(value) => {
                values.insert(key.to_string(), value);
            }
            None => {
                values.remove(key.as_str());
            }
        }
        Ok(())
    }

    fn keys(&self) -> BTreeSet<String> {
        self.read().keys().cloned().collect()
    }
}
