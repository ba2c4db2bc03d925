// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definitions.
//!
//! This module defines the `ConfigSource` trait, the primary port every backend
//! implements, and the `ConfigSourceExt` extension trait that layers key
//! normalization, typed scalar access, and collection/map access on top of it.
//!
//! `ConfigSource` is small and object-safe: a backend only stores and
//! retrieves [`RawValue`]s under already-normalized [`ConfigKey`]s. Everything else is
//! provided once, for every backend, by `ConfigSourceExt`.

use crate::domain::coercion::{parse_bool, FromRaw, IntoRaw, ValueEncoding};
use crate::domain::{ConfigError, ConfigKey, KeyPathResolver, RawValue, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// A trait for configuration backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and take `&self` for writes, so a single
/// source can be shared through an `Arc` between callers and value handles. Each
/// individual write is atomic; sequences of writes are not.
///
/// # Examples
///
/// ```rust
/// use pathcfg::domain::{ConfigKey, KeyPathResolver, RawValue, Result};
/// use pathcfg::ports::{ConfigSource, ConfigSourceExt};
/// use std::collections::BTreeSet;
///
/// struct Fixed;
///
/// impl ConfigSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn key_resolver(&self) -> KeyPathResolver {
///         KeyPathResolver::Dot
///     }
///
///     fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
///         (key.as_str() == "app.name").then(|| RawValue::from("demo"))
///     }
///
///     fn write_raw(&self, _key: &ConfigKey, _value: Option<RawValue>) -> Result<()> {
///         Ok(())
///     }
///
///     fn keys(&self) -> BTreeSet<String> {
///         BTreeSet::from(["app.name".to_string()])
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.get_string("app.name").unwrap().as_deref(), Some("demo"));
/// assert!(source.contains_key("app.name").unwrap());
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns a short identifier for this backend, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the resolver that turns key strings into this backend's keys.
    fn key_resolver(&self) -> KeyPathResolver;

    /// Returns how this backend physically stores collections and maps.
    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Native
    }

    /// Reads the raw value stored under a normalized key.
    fn read_raw(&self, key: &ConfigKey) -> Option<RawValue>;

    /// Stores a raw value under a normalized key; `None` removes the entry.
    fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()>;

    /// Returns every key currently present, in normalized form.
    fn keys(&self) -> BTreeSet<String>;
}

fn string_form<S, V>(source: &S, key: &str) -> Result<Option<V>>
where
    S: ConfigSource + ?Sized,
    V: FromRaw,
{
    source
        .get_string(key)?
        .map(|text| V::from_text(&text, key))
        .transpose()
}

/// Typed access for every [`ConfigSource`].
///
/// Every method takes a key string and normalizes it with the source's
/// [`KeyPathResolver`] first, failing with `InvalidKeyPath` if that is not possible.
///
/// # Examples
///
/// ```rust
/// use pathcfg::adapters::MapSource;
/// use pathcfg::ports::ConfigSourceExt;
///
/// let source = MapSource::new();
/// source.set_int("server.port", 8080).unwrap();
/// source.set_list("app.users", vec!["alice", "bob"]).unwrap();
///
/// assert_eq!(source.get_int("server.port").unwrap(), Some(8080));
/// assert_eq!(source.get_list::<String>("app.users").unwrap(), ["alice", "bob"]);
/// assert!(source.get_list::<String>("app.missing").unwrap().is_empty());
/// ```
pub trait ConfigSourceExt: ConfigSource {
    /// Normalizes a key string with this source's resolver.
    fn normalize(&self, key: &str) -> Result<ConfigKey> {
        self.key_resolver().normalize_key(key)
    }

    /// Returns true if the normalized key is one of [`ConfigSource::keys`].
    fn contains_key(&self, key: &str) -> Result<bool> {
        let key = self.normalize(key)?;
        Ok(self.keys().contains(key.as_str()))
    }

    /// Returns the raw stored value, if any.
    fn get_raw(&self, key: &str) -> Result<Option<RawValue>> {
        Ok(self.read_raw(&self.normalize(key)?))
    }

    /// Returns the raw stored value, or `default` if absent.
    fn get_raw_or(&self, key: &str, default: RawValue) -> Result<RawValue> {
        Ok(self.get_raw(key)?.unwrap_or(default))
    }

    /// Stores a raw value; `None` removes the entry.
    fn set_raw(&self, key: &str, value: Option<RawValue>) -> Result<()> {
        self.write_raw(&self.normalize(key)?, value)
    }

    /// Removes the entry under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()> {
        self.set_raw(key, None)
    }

    /// Stores any convertible value.
    ///
    /// A null value (e.g. `None`) is rejected with `InvalidArgument`; call
    /// [`remove`](ConfigSourceExt::remove) instead.
    fn set<V: IntoRaw>(&self, key: &str, value: V) -> Result<()> {
        let normalized = self.normalize(key)?;
        match value.into_raw() {
            Some(raw) => self.write_raw(&normalized, Some(raw)),
            None => Err(ConfigError::InvalidArgument {
                key: key.to_string(),
                message: "null is not supported, use remove instead".to_string(),
            }),
        }
    }

    /// Applies [`set`](ConfigSourceExt::set) to each entry in order.
    ///
    /// Not atomic: if an entry fails, the entries before it stay applied.
    fn put_all<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoRaw,
    {
        let mut applied = 0usize;
        for (key, value) in entries {
            self.set(key.as_ref(), value)?;
            applied += 1;
        }
        tracing::trace!("Applied {} entries to source '{}'", applied, self.name());
        Ok(())
    }

    /// Reads a value converted to `V`, or `None` if absent.
    fn get<V: FromRaw>(&self, key: &str) -> Result<Option<V>> {
        let encoding = self.encoding();
        self.get_raw(key)?
            .map(|raw| V::from_raw(raw, key, encoding))
            .transpose()
    }

    /// Reads a value converted to the type of `default`, substituting `default`
    /// when absent.
    fn get_or<V: FromRaw>(&self, key: &str, default: V) -> Result<V> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Reads an ordered list; an absent key yields an empty list.
    fn get_list<E: FromRaw>(&self, key: &str) -> Result<Vec<E>> {
        Ok(self.get::<Vec<E>>(key)?.unwrap_or_default())
    }

    /// Reads a set; an absent key yields an empty set.
    fn get_set<E: FromRaw + Eq + Hash>(&self, key: &str) -> Result<HashSet<E>> {
        Ok(self.get::<HashSet<E>>(key)?.unwrap_or_default())
    }

    /// Reads a map; an absent key yields an empty map.
    fn get_map<K, V>(&self, key: &str) -> Result<HashMap<K, V>>
    where
        K: FromRaw + Eq + Hash,
        V: FromRaw,
    {
        Ok(self.get::<HashMap<K, V>>(key)?.unwrap_or_default())
    }

    /// Stores an ordered list.
    fn set_list<E: IntoRaw>(&self, key: &str, value: Vec<E>) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a set.
    fn set_set<E: IntoRaw>(&self, key: &str, value: HashSet<E>) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a map.
    fn set_map<K: ToString, V: IntoRaw>(&self, key: &str, value: HashMap<K, V>) -> Result<()> {
        self.set(key, value)
    }

    /// Reads the string form of a scalar value.
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.get::<String>(key)
    }

    /// Reads the string form, substituting `default` when absent.
    fn get_string_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .get_string(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Reads a boolean; absent or unparsable text yields `false`.
    fn get_bool(&self, key: &str) -> Result<bool> {
        Ok(self
            .get_string(key)?
            .and_then(|text| parse_bool(&text))
            .unwrap_or(false))
    }

    /// Reads a boolean, substituting `default` when absent.
    fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(string_form(self, key)?.unwrap_or(default))
    }

    /// Reads the first character of the string form.
    fn get_char(&self, key: &str) -> Result<Option<char>> {
        string_form(self, key)
    }

    /// Reads a character, substituting `default` when absent.
    fn get_char_or(&self, key: &str, default: char) -> Result<char> {
        Ok(self.get_char(key)?.unwrap_or(default))
    }

    /// Reads a signed byte.
    fn get_byte(&self, key: &str) -> Result<Option<i8>> {
        string_form(self, key)
    }

    /// Reads a signed byte, substituting `default` when absent.
    fn get_byte_or(&self, key: &str, default: i8) -> Result<i8> {
        Ok(self.get_byte(key)?.unwrap_or(default))
    }

    /// Reads a 16-bit integer.
    fn get_short(&self, key: &str) -> Result<Option<i16>> {
        string_form(self, key)
    }

    /// Reads a 16-bit integer, substituting `default` when absent.
    fn get_short_or(&self, key: &str, default: i16) -> Result<i16> {
        Ok(self.get_short(key)?.unwrap_or(default))
    }

    /// Reads a 32-bit integer.
    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        string_form(self, key)
    }

    /// Reads a 32-bit integer, substituting `default` when absent.
    fn get_int_or(&self, key: &str, default: i32) -> Result<i32> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }

    /// Reads a 64-bit integer.
    fn get_long(&self, key: &str) -> Result<Option<i64>> {
        string_form(self, key)
    }

    /// Reads a 64-bit integer, substituting `default` when absent.
    fn get_long_or(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self.get_long(key)?.unwrap_or(default))
    }

    /// Reads a single-precision float.
    fn get_float(&self, key: &str) -> Result<Option<f32>> {
        string_form(self, key)
    }

    /// Reads a single-precision float, substituting `default` when absent.
    fn get_float_or(&self, key: &str, default: f32) -> Result<f32> {
        Ok(self.get_float(key)?.unwrap_or(default))
    }

    /// Reads a double-precision float.
    fn get_double(&self, key: &str) -> Result<Option<f64>> {
        string_form(self, key)
    }

    /// Reads a double-precision float, substituting `default` when absent.
    fn get_double_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.get_double(key)?.unwrap_or(default))
    }

    /// Stores a string.
    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a boolean.
    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a character.
    fn set_char(&self, key: &str, value: char) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a signed byte.
    fn set_byte(&self, key: &str, value: i8) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a 16-bit integer.
    fn set_short(&self, key: &str, value: i16) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a 32-bit integer.
    fn set_int(&self, key: &str, value: i32) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a 64-bit integer.
    fn set_long(&self, key: &str, value: i64) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a single-precision float.
    fn set_float(&self, key: &str, value: f32) -> Result<()> {
        self.set(key, value)
    }

    /// Stores a double-precision float.
    fn set_double(&self, key: &str, value: f64) -> Result<()> {
        self.set(key, value)
    }
}

impl<S: ConfigSource + ?Sized> ConfigSourceExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, RwLock};

    // Minimal flat backend for exercising the provided methods
    #[derive(Default)]
    struct TestSource {
        values: RwLock<HashMap<String, RawValue>>,
        encoding: ValueEncoding,
    }

    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            "test-source"
        }

        fn key_resolver(&self) -> KeyPathResolver {
            KeyPathResolver::Dot
        }

        fn encoding(&self) -> ValueEncoding {
            self.encoding
        }

        fn read_raw(&self, key: &ConfigKey) -> Option<RawValue> {
            self.values.read().unwrap().get(key.as_str()).cloned()
        }

        fn write_raw(&self, key: &ConfigKey, value: Option<RawValue>) -> Result<()> {
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

    #[test]
    fn test_invalid_key_is_rejected_everywhere() {
        let source = TestSource::default();
        assert!(matches!(
            source.get_raw("a..b").unwrap_err(),
            ConfigError::InvalidKeyPath { .. }
        ));
        assert!(source.set("", 1_i32).is_err());
        assert!(source.contains_key(".").is_err());
    }

    #[test]
    fn test_set_null_is_invalid_argument() {
        let source = TestSource::default();
        let err = source.set("foo", None::<String>).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));
    }

    #[test]
    fn test_set_raw_none_removes() {
        let source = TestSource::default();
        source.set_string("a", "x").unwrap();
        source.set_raw("a", None).unwrap();
        assert!(!source.contains_key("a").unwrap());
    }

    #[test]
    fn test_get_raw_or_default() {
        let source = TestSource::default();
        let raw = source.get_raw_or("missing", RawValue::from(7_i32)).unwrap();
        assert_eq!(raw, RawValue::Int(7));
    }

    #[test]
    fn test_get_infers_type_from_default() {
        let source = TestSource::default();
        source.set_string("port", "8080").unwrap();
        assert_eq!(source.get_or("port", 0_u16).unwrap(), 8080);
        assert_eq!(source.get_or("missing", 42_u16).unwrap(), 42);
    }

    #[test]
    fn test_scalar_accessors_derive_from_string() {
        let source = TestSource::default();
        source.set_int("n", 12).unwrap();
        assert_eq!(source.get_long("n").unwrap(), Some(12));
        assert_eq!(source.get_double("n").unwrap(), Some(12.0));
        assert_eq!(source.get_byte("n").unwrap(), Some(12));
        assert_eq!(source.get_string("n").unwrap().as_deref(), Some("12"));
    }

    #[test]
    fn test_scalar_parse_failure_is_format_error() {
        let source = TestSource::default();
        source.set_string("n", "twelve").unwrap();
        assert!(matches!(
            source.get_int("n").unwrap_err(),
            ConfigError::FormatError { .. }
        ));
        assert!(matches!(
            source.get_int_or("n", 1).unwrap_err(),
            ConfigError::FormatError { .. }
        ));
    }

    #[test]
    fn test_defaults_apply_only_when_absent() {
        let source = TestSource::default();
        assert_eq!(source.get_int_or("x", 5).unwrap(), 5);
        assert_eq!(source.get_string_or("x", "d").unwrap(), "d");
        assert_eq!(source.get_char_or("x", 'z').unwrap(), 'z');
        assert_eq!(source.get_short_or("x", -3).unwrap(), -3);
        assert_eq!(source.get_float_or("x", 0.5).unwrap(), 0.5);
        assert!(source.get_bool_or("x", true).unwrap());
    }

    #[test]
    fn test_get_bool_is_parse_or_false() {
        let source = TestSource::default();
        source.set_string("flag", "maybe").unwrap();
        assert!(!source.get_bool("flag").unwrap());
        assert!(!source.get_bool("absent").unwrap());
        assert!(source.get_bool_or("flag", true).is_err());

        source.set_bool("flag", true).unwrap();
        assert!(source.get_bool("flag").unwrap());
    }

    #[test]
    fn test_get_bool_only_accepts_true_and_false() {
        let source = TestSource {
            encoding: ValueEncoding::Delimited,
            ..Default::default()
        };
        source.set_string("a", "yes").unwrap();
        source.set_string("b", "1").unwrap();
        source.set_string("c", "TRUE").unwrap();

        assert!(!source.get_bool("a").unwrap());
        assert!(!source.get_bool("b").unwrap());
        assert!(source.get_bool("c").unwrap());
        assert!(matches!(
            source.get::<bool>("a").unwrap_err(),
            ConfigError::FormatError { .. }
        ));
        assert!(source.get_bool_or("b", true).is_err());
    }

    #[test]
    fn test_get_char_empty_string_is_format_error() {
        let source = TestSource::default();
        source.set_string("c", "").unwrap();
        assert!(matches!(
            source.get_char("c").unwrap_err(),
            ConfigError::FormatError { .. }
        ));
        assert!(matches!(
            source.get_char_or("c", 'z').unwrap_err(),
            ConfigError::FormatError { .. }
        ));
        assert_eq!(source.get_char_or("absent", 'z').unwrap(), 'z');
    }

    #[test]
    fn test_get_char_first_character() {
        let source = TestSource::default();
        source.set_string("c", "xyz").unwrap();
        assert_eq!(source.get_char("c").unwrap(), Some('x'));
    }

    #[test]
    fn test_get_list_absent_is_empty() {
        let source = TestSource::default();
        assert!(source.get_list::<String>("nope").unwrap().is_empty());
        assert!(source.get_set::<String>("nope").unwrap().is_empty());
        assert!(source.get_map::<String, String>("nope").unwrap().is_empty());
    }

    #[test]
    fn test_get_list_from_scalar_is_mismatch() {
        let source = TestSource::default();
        source.set_int("n", 1).unwrap();
        assert!(matches!(
            source.get_list::<i32>("n").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_delimited_encoding_splits_strings() {
        let source = TestSource {
            encoding: ValueEncoding::Delimited,
            ..Default::default()
        };
        source.set_string("l", "1, 2, 3").unwrap();
        assert_eq!(source.get_list::<i32>("l").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_put_all_is_not_atomic() {
        let source = TestSource::default();
        let entries = vec![("a", Some(1_i32)), ("b", None), ("c", Some(3))];
        assert!(source.put_all(entries).is_err());
        assert!(source.contains_key("a").unwrap());
        assert!(!source.contains_key("c").unwrap());
    }

    #[test]
    fn test_usable_as_trait_object() {
        let source: Arc<dyn ConfigSource> = Arc::new(TestSource::default());
        source.set_int("a.b", 1).unwrap();
        assert_eq!(source.get::<i32>("a.b").unwrap(), Some(1));
    }

    #[test]
    fn test_config_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn ConfigSource>>();
    }
}
