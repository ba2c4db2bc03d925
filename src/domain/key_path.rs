// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key path parsing and joining strategies.
//!
//! A key string such as `server.tls.enabled` is parsed into a [`KeyPath`], an ordered,
//! non-empty sequence of segments, and re-joined into the canonical key form a backend
//! stores. Three strategies are provided by [`KeyPathResolver`]:
//!
//! - **Flat**: the whole string is one segment
//! - **Dot**: segments are separated by `.`
//! - **Env**: the key is upper-cased and `.` becomes `_` (`server.port` -> `SERVER_PORT`)
//!
//! The env strategy only maps key names; it never reads process environment variables.

use crate::domain::config_key::ConfigKey;
use crate::domain::errors::{ConfigError, Result};
use std::fmt;

/// An ordered, non-empty sequence of key segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Builds a path from segments, failing if there are none or any is empty.
    pub fn new(segments: Vec<String>, key: &str) -> Result<Self> {
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidKeyPath {
                key: key.to_string(),
            });
        }
        Ok(KeyPath(segments))
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Splits the path into its parent segments and its last segment.
    pub fn split_last(&self) -> (&[String], &str) {
        match self.0.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

/// One step of a tree path: an object field or an array index.
///
/// Numeric segments are parsed as [`PathSegment::Index`] but still address a field of
/// that name when the current node is an object; see [`PathSegment::as_field`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field of an object node.
    Field(String),
    /// A zero-based position within an array node.
    Index(usize),
}

impl PathSegment {
    /// Classifies a raw segment. Only canonical decimal numbers (no sign, no
    /// leading zeros) are indices, so `as_field` gives back the input text.
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<usize>() {
            Ok(index) if index.to_string() == segment => PathSegment::Index(index),
            _ => PathSegment::Field(segment.to_string()),
        }
    }

    /// The segment as an object field name.
    pub fn as_field(&self) -> String {
        match self {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Strategy for parsing key strings into paths and joining them back.
///
/// # Examples
///
/// ```
/// use pathcfg::domain::KeyPathResolver;
///
/// let path = KeyPathResolver::Dot.parse("a.b.c").unwrap();
/// assert_eq!(path.segments(), ["a", "b", "c"]);
/// assert_eq!(KeyPathResolver::Dot.join(&path), "a.b.c");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyPathResolver {
    /// The whole key is a single atomic segment.
    Flat,
    /// Segments are separated by `.`.
    #[default]
    Dot,
    /// The key is upper-cased with `.` replaced by `_`, as one segment.
    Env,
}

impl KeyPathResolver {
    /// Parses a key string into a path.
    ///
    /// Fails with `InvalidKeyPath` for an empty key, and for the dot strategy when
    /// any segment is empty (`a..b`, `.a`, `a.`).
    pub fn parse(&self, key: &str) -> Result<KeyPath> {
        let segments = match self {
            KeyPathResolver::Flat => vec![key.to_string()],
            KeyPathResolver::Dot => key.split('.').map(str::to_string).collect(),
            KeyPathResolver::Env => vec![key.to_uppercase().replace('.', "_")],
        };
        KeyPath::new(segments, key)
    }

    /// Joins a path into the canonical key string.
    pub fn join(&self, path: &KeyPath) -> String {
        match self {
            KeyPathResolver::Flat | KeyPathResolver::Env => path.segments()[0].clone(),
            KeyPathResolver::Dot => path.segments().join("."),
        }
    }

    /// Parses then joins a key, yielding the canonical form a backend stores.
    pub fn normalize_key(&self, key: &str) -> Result<ConfigKey> {
        let path = self.parse(key)?;
        Ok(ConfigKey::new(self.join(&path)))
    }
}

impl fmt::Display for KeyPathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyPathResolver::Flat => "flat",
            KeyPathResolver::Dot => "dot",
            KeyPathResolver::Env => "env",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_keeps_whole_key() {
        let path = KeyPathResolver::Flat.parse("a.b.c").unwrap();
        assert_eq!(path.segments(), ["a.b.c"]);
        assert_eq!(KeyPathResolver::Flat.join(&path), "a.b.c");
    }

    #[test]
    fn test_dot_splits_segments() {
        let path = KeyPathResolver::Dot.parse("server.tls.enabled").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.split_last(), (&["server".to_string(), "tls".to_string()][..], "enabled"));
    }

    #[test]
    fn test_env_mangles_key() {
        let key = KeyPathResolver::Env.normalize_key("server.port").unwrap();
        assert_eq!(key.as_str(), "SERVER_PORT");
    }

    #[test]
    fn test_empty_key_is_invalid() {
        for resolver in [KeyPathResolver::Flat, KeyPathResolver::Dot, KeyPathResolver::Env] {
            let err = resolver.normalize_key("").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidKeyPath { .. }));
        }
    }

    #[test]
    fn test_dot_rejects_empty_segments() {
        for key in ["a..b", ".a", "a.", "."] {
            assert!(
                KeyPathResolver::Dot.normalize_key(key).is_err(),
                "expected failure for {}",
                key
            );
        }
    }

    #[test]
    fn test_default_is_dot() {
        assert_eq!(KeyPathResolver::default(), KeyPathResolver::Dot);
    }

    #[test]
    fn test_path_segment_parse() {
        assert_eq!(PathSegment::parse("3"), PathSegment::Index(3));
        assert_eq!(PathSegment::parse("name"), PathSegment::Field("name".into()));
        assert_eq!(PathSegment::parse("-1"), PathSegment::Field("-1".into()));
        assert_eq!(PathSegment::parse("+1"), PathSegment::Field("+1".into()));
        assert_eq!(PathSegment::parse("01"), PathSegment::Field("01".into()));
        assert_eq!(PathSegment::Index(7).as_field(), "7");
    }
}
