// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat string-property configuration source adapter.
//!
//! This module provides an adapter over a flat store that only holds strings, in the
//! manner of a `.properties` file. Every write is stringified on the way in:
//!
//! - scalars use their textual form (`8080`, `true`, `3.14`)
//! - lists and sets become comma-joined elements (`alice,bob,carol`)
//! - maps become comma-joined `key=value` pairs (`url=jdbc:x,user=root`)
//!
//! Reads of lists, sets, and maps split the text again. Delimiters inside elements
//! are not escaped, so an element containing `,` (or a map key containing `=`) does
//! not survive a round trip.

use crate::domain::coercion::ValueEncoding;
use crate::domain::{ConfigKey, KeyPathResolver, RawValue, Result};
use crate::ports::ConfigSource;
use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Configuration source adapter over string properties.
///
/// # Examples
///
/// ```rust
/// use pathcfg::adapters::PropertiesSource;
/// use pathcfg::domain::RawValue;
/// use pathcfg::ports::ConfigSourceExt;
///
/// let source = PropertiesSource::new();
/// source.set_list("app.users", vec!["alice", "bob", "carol"]).unwrap();
///
/// assert_eq!(
///     source.get_raw("app.users").unwrap(),
///     Some(RawValue::from("alice,bob,carol"))
/// );
/// assert_eq!(
///     source.get_list::<String>("app.users").unwrap(),
///     ["alice", "bob", "carol"]
/// );
/// ```
#[derive(Debug, Default)]
pub struct PropertiesSource {
    properties: RwLock<HashMap<String, String>>,
    resolver: KeyPathResolver,
}

impl PropertiesSource {
    /// Creates an empty properties source using the dot resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a properties source over existing properties.
    ///
    /// The keys are taken as already normalized.
    pub fn from_properties(properties: HashMap<String, String>) -> Self {
        Self {
            properties: RwLock::new(properties),
            resolver: KeyPathResolver::default(),
        }
    }

    /// Sets the resolver used to normalize keys.
    pub fn with_resolver(mut self, resolver: KeyPathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns a copy of the stored properties.
    pub fn source(&self) -> HashMap<String, String> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.properties.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.properties
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigSource for PropertiesSource {
    fn name(&self) -> &str {
        "properties"
    }

    fn key_resolver(&self) -> KeyPathResolver {
        self.resolver
    }

    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Delimited
    }

    fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
        self.read().get(key.as_str()).cloned().map(RawValue::String)
    }

    fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()> {
        let mut properties = self.write();
        match value {
            Some(value) => {
                properties.insert(key.to_string(), value.to_text());
            }
            None => {
                properties.remove(key.as_str());
            }
        }
        Ok(())
    }

    fn keys(&self) -> BTreeSet<String> {
        self.read().keys().cloned().collect()
    }
}
