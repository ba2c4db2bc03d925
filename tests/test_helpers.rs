// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities and mock implementations for testing.
//!
//! This module provides a mock source that counts backend reads, so tests can check
//! how often a value handle actually goes to the backend.

#![allow(dead_code)]

use pathcfg::domain::{ConfigKey, KeyPathResolver, RawValue, Result};
use pathcfg::ports::ConfigSource;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// A mock configuration source that counts reads.
#[derive(Debug, Default)]
pub struct CountingSource {
    values: RwLock<HashMap<String, RawValue>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingSource {
    /// Creates an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the mock source.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.values
            .write()
            .unwrap()
            .insert(key.into(), value.into());
        self
    }

    /// Returns the number of backend reads so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns the number of backend writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ConfigSource for CountingSource {
    fn name(&self) -> &str {
        "counting-mock"
    }

    fn key_resolver(&self) -> KeyPathResolver {
        KeyPathResolver::Dot
    }

    fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.values.read().unwrap().get(key.as_str()).cloned()
    }

    fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut values = self.values.write().unwrap();
        match value {
            Some(v) => values.insert(key.to_string(), v),
            None => values.remove(key.as_str()),
        };
        Ok(())
    }

    fn keys(&self) -> BTreeSet<String> {
        self.values.read().unwrap().keys().cloned().collect()
    }
}

/// Installs a test-writer tracing subscriber, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathcfg::ports::ConfigSourceExt;

    #[test]
    fn test_mock_source_counts_reads() {
        let source = CountingSource::new().with_value("key", "value");
        assert_eq!(source.reads(), 0);

        assert_eq!(source.get_string("key").unwrap().as_deref(), Some("value"));
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn test_mock_source_counts_writes() {
        let source = CountingSource::new();
        source.set_int("a", 1).unwrap();
        source.remove("a").unwrap();
        assert_eq!(source.writes(), 2);
        assert!(source.keys().is_empty());
    }
}
