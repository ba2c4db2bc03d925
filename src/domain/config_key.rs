// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalized configuration key.
//!
//! This module provides the `ConfigKey` type, a newtype wrapper around the canonical
//! key string produced by a [`KeyPathResolver`](crate::domain::KeyPathResolver).
//! Backends only ever see `ConfigKey`s, so every raw read or write is guaranteed to
//! have gone through key normalization first.

use std::borrow::Borrow;
use std::fmt;

/// A key that has been normalized by a key-path resolver.
///
/// A `ConfigKey` cannot be built from an arbitrary string outside this crate; obtain
/// one through [`KeyPathResolver::normalize_key`](crate::domain::KeyPathResolver::normalize_key).
///
/// # Examples
///
/// ```
/// use pathcfg::domain::KeyPathResolver;
///
/// let key = KeyPathResolver::Env.normalize_key("server.port").unwrap();
/// assert_eq!(key.as_str(), "SERVER_PORT");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    pub(crate) fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
