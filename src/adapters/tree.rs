// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nested document configuration source adapter.
//!
//! This module provides an adapter over a YAML document tree whose root is a mapping.
//! Keys are dot-paths: each segment names a field of a mapping node, or a zero-based
//! position when the node being addressed is a sequence. Sequences are flattened
//! into the same address space, so `app.users.1` names the second user.

use crate::domain::{ConfigError, ConfigKey, KeyPathResolver, PathSegment, RawValue, Result};
use crate::ports::ConfigSource;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Configuration source adapter over a nested YAML document.
///
/// Writes create intermediate mapping nodes as needed. Reads return native lists and
/// maps for sequence and mapping nodes; null nodes read as absent.
///
/// # Examples
///
/// ```rust
/// use pathcfg::adapters::TreeSource;
/// use pathcfg::ports::{ConfigSource, ConfigSourceExt};
///
/// let source = TreeSource::from_yaml_str("app:\n  users: [alice, bob]\n").unwrap();
/// source.set_int("server.port", 8080).unwrap();
///
/// assert_eq!(source.get_string("app.users.1").unwrap().as_deref(), Some("bob"));
/// assert!(source.keys().contains("server.port"));
/// ```
#[derive(Debug, Default)]
pub struct TreeSource {
    root: RwLock<Mapping>,
    resolver: KeyPathResolver,
}

impl TreeSource {
    /// Creates a source over an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source over an existing root mapping.
    pub fn from_mapping(root: Mapping) -> Self {
        Self {
            root: RwLock::new(root),
            resolver: KeyPathResolver::default(),
        }
    }

    /// Parses a YAML document into a source.
    ///
    /// An empty document yields an empty root. Any root other than a mapping is
    /// rejected.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })?;

        match value {
            Value::Mapping(root) => Ok(Self::from_mapping(root)),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::ParseError {
                message: format!("Document root must be a mapping, found {}", node_kind(&other)),
                source: None,
            }),
        }
    }

    /// Sets the resolver used to normalize keys.
    pub fn with_resolver(mut self, resolver: KeyPathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns an independent deep copy of the document root.
    pub fn source(&self) -> Mapping {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Mapping> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Mapping> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn node_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Mapping keys may be numbers or booleans in the document; a segment matches any key
// with the same text, preferring a string key.
fn field_key(map: &Mapping, field: &str) -> Value {
    let exact = Value::String(field.to_string());
    if map.contains_key(&exact) {
        return exact;
    }
    map.keys()
        .find(|k| key_text(k).as_deref() == Some(field))
        .cloned()
        .unwrap_or(exact)
}

fn to_raw(node: &Value) -> Option<RawValue> {
    match node {
        Value::Null => None,
        Value::Bool(b) => Some(RawValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(RawValue::Int)
            .or_else(|| n.as_f64().map(RawValue::Float)),
        Value::String(s) => Some(RawValue::String(s.clone())),
        Value::Sequence(items) => Some(RawValue::List(items.iter().filter_map(to_raw).collect())),
        Value::Mapping(map) => Some(RawValue::Map(
            map.iter()
                .filter_map(|(k, v)| Some((key_text(k)?, to_raw(v)?)))
                .collect(),
        )),
        Value::Tagged(tagged) => to_raw(&tagged.value),
    }
}

fn child<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Sequence(items), PathSegment::Index(index)) => items.get(*index),
        (Value::Mapping(map), segment) => map.get(&field_key(map, &segment.as_field())),
        (Value::Tagged(tagged), segment) => child(&tagged.value, segment),
        _ => None,
    }
}

fn lookup<'a>(root: &'a Mapping, segments: &[String]) -> Option<&'a Value> {
    let (head, rest) = segments.split_first()?;
    rest.iter().try_fold(root.get(&field_key(root, head))?, |node, segment| {
        child(node, &PathSegment::parse(segment))
    })
}

fn insert(map: &mut Mapping, segments: &[String], node: Value) {
    match segments {
        [] => {}
        [last] => {
            let key = field_key(map, last);
            map.insert(key, node);
        }
        [head, rest @ ..] => {
            let key = field_key(map, head);
            let entry = map.entry(key).or_insert(Value::Null);
            if let Value::Mapping(inner) = entry {
                insert(inner, rest, node);
            } else {
                if !entry.is_null() {
                    tracing::debug!(
                        "Replacing {} node at '{}' with a mapping",
                        node_kind(entry),
                        head
                    );
                }
                let mut inner = Mapping::new();
                insert(&mut inner, rest, node);
                *entry = Value::Mapping(inner);
            }
        }
    }
}

fn remove_from(map: &mut Mapping, segments: &[String]) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    let key = field_key(map, head);
    if rest.is_empty() {
        return map.remove(&key);
    }
    remove_at(map.get_mut(&key)?, rest)
}

// Sequence elements after a removed index shift down by one.
fn remove_at(node: &mut Value, segments: &[String]) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    let segment = PathSegment::parse(head);
    match (node, &segment) {
        (Value::Mapping(map), _) => remove_from(map, segments),
        (Value::Sequence(items), PathSegment::Index(index)) if *index < items.len() => {
            if rest.is_empty() {
                Some(items.remove(*index))
            } else {
                remove_at(&mut items[*index], rest)
            }
        }
        _ => None,
    }
}

fn collect_keys(node: &Value, prefix: &str, keys: &mut BTreeSet<String>) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", prefix, segment)
        }
    };

    match node {
        Value::Mapping(map) => {
            for (k, v) in map {
                if let Some(k) = key_text(k) {
                    collect_keys(v, &join(&k), keys);
                }
            }
        }
        Value::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                collect_keys(v, &join(&i.to_string()), keys);
            }
        }
        Value::Tagged(tagged) => collect_keys(&tagged.value, prefix, keys),
        Value::Null => {}
        _ => {
            keys.insert(prefix.to_string());
        }
    }
}

impl ConfigSource for TreeSource {
    fn name(&self) -> &str {
        "tree"
    }

    fn key_resolver(&self) -> KeyPathResolver {
        self.resolver
    }

    fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
        let path = self.resolver.parse(key.as_str()).ok()?;
        let root = self.read();
        lookup(&root, path.segments()).and_then(to_raw)
    }

    fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()> {
        let path = self.resolver.parse(key.as_str())?;
        match value {
            Some(value) => {
                let node = serde_yaml::to_value(&value).map_err(|e| ConfigError::InvalidArgument {
                    key: key.to_string(),
                    message: format!("value cannot be stored in a YAML document: {}", e),
                })?;
                insert(&mut self.write(), path.segments(), node);
            }
            None => {
                remove_from(&mut self.write(), path.segments());
            }
        }
        Ok(())
    }

    fn keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        for (k, v) in self.read().iter() {
            if let Some(k) = key_text(k) {
                collect_keys(v, &k, &mut keys);
            }
        }
        keys
    }
}
