// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type coercion between raw backend values and Rust types.
//!
//! Reads go through [`FromRaw`], writes through [`IntoRaw`]. The set of supported
//! target types is closed at compile time: asking for a type without a `FromRaw`
//! implementation does not compile, while shapes a type cannot be built from fail at
//! runtime with `TypeMismatch`, `FormatError`, or `UnsupportedType`.
//!
//! | Raw shape                     | Target           | Rule                                  |
//! |-------------------------------|------------------|---------------------------------------|
//! | already the target kind       | any              | pass through (integers range-checked) |
//! | string                        | scalar           | parse the canonical text form         |
//! | list                          | `Vec`/sets       | element-wise cast                     |
//! | map                           | maps             | entry-wise cast of key and value      |
//! | string, delimited encoding    | `Vec`/sets/maps  | split on `,` (and `=` for maps)       |
//! | anything else                 | any              | `TypeMismatch`                        |

use crate::domain::errors::{ConfigError, Result};
use crate::domain::raw_value::{RawValue, ENTRY_SEPARATOR, LIST_DELIMITER};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// How a backend physically stores collections and maps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Collections and maps are stored as native lists and maps.
    #[default]
    Native,
    /// Everything is stored as text; collections and maps are `,`-delimited.
    Delimited,
}

/// Conversion from a raw backend value into a Rust type.
pub trait FromRaw: Sized {
    /// The name used for this type in error messages.
    fn type_name() -> &'static str;

    /// Casts a native value of the matching shape, failing with `TypeMismatch`
    /// for any other shape. Used for elements of native collections.
    fn cast(raw: RawValue, key: &str) -> Result<Self>;

    /// Parses a textual token. Types without a textual form fail with
    /// `UnsupportedType`.
    fn from_text(_text: &str, key: &str) -> Result<Self> {
        Err(ConfigError::UnsupportedType {
            key: key.to_string(),
            target_type: Self::type_name().to_string(),
        })
    }

    /// Applies the full coercion table.
    fn from_raw(raw: RawValue, key: &str, _encoding: ValueEncoding) -> Result<Self> {
        match raw {
            RawValue::String(text) => Self::from_text(&text, key),
            other => Self::cast(other, key),
        }
    }
}

/// Conversion from a Rust value into a raw backend value.
///
/// `None` stands for null: `Option::None` and collections elements that are null.
pub trait IntoRaw {
    /// Converts the value, returning `None` for null.
    fn into_raw(self) -> Option<RawValue>;
}

/// Parses a boolean literal, case-insensitively.
///
/// Only `true` and `false` are literals; `yes`, `on` or `1` are not.
pub fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Splits delimited text into trimmed, non-empty tokens.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Splits delimited text into trimmed `key=value` pairs, dropping tokens without
/// a separator.
pub fn split_entries(text: &str) -> impl Iterator<Item = (&str, &str)> {
    split_tokens(text).filter_map(|token| match token.split_once(ENTRY_SEPARATOR) {
        Some((k, v)) => Some((k.trim(), v.trim())),
        None => {
            tracing::debug!("Dropping malformed map entry without '{}': {}", ENTRY_SEPARATOR, token);
            None
        }
    })
}

impl FromRaw for RawValue {
    fn type_name() -> &'static str {
        "raw"
    }

    fn cast(raw: RawValue, _key: &str) -> Result<Self> {
        Ok(raw)
    }

    fn from_text(text: &str, _key: &str) -> Result<Self> {
        Ok(RawValue::String(text.to_string()))
    }

    fn from_raw(raw: RawValue, _key: &str, _encoding: ValueEncoding) -> Result<Self> {
        Ok(raw)
    }
}

impl FromRaw for String {
    fn type_name() -> &'static str {
        "string"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        match raw {
            RawValue::String(s) => Ok(s),
            other if other.is_scalar() => Ok(other.to_text()),
            other => Err(ConfigError::mismatch(key, "string", other.shape())),
        }
    }

    fn from_text(text: &str, _key: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl FromRaw for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        match raw {
            RawValue::Bool(b) => Ok(b),
            other => Err(ConfigError::mismatch(key, "bool", other.shape())),
        }
    }

    fn from_text(text: &str, key: &str) -> Result<Self> {
        parse_bool(text)
            .ok_or_else(|| ConfigError::format(key, "bool", format!("not a boolean literal: {}", text)))
    }
}

impl FromRaw for char {
    fn type_name() -> &'static str {
        "char"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        match raw {
            RawValue::String(s) => Self::from_text(&s, key),
            other => Err(ConfigError::mismatch(key, "char", other.shape())),
        }
    }

    /// Takes the first character of the text.
    fn from_text(text: &str, key: &str) -> Result<Self> {
        text.chars()
            .next()
            .ok_or_else(|| ConfigError::format(key, "char", "empty string"))
    }
}

macro_rules! integer_from_raw {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl FromRaw for $ty {
                fn type_name() -> &'static str {
                    $name
                }

                fn cast(raw: RawValue, key: &str) -> Result<Self> {
                    match raw {
                        RawValue::Int(n) => <$ty>::try_from(n)
                            .map_err(|e| ConfigError::from_conversion_error(key, $name, e)),
                        other => Err(ConfigError::mismatch(key, $name, other.shape())),
                    }
                }

                fn from_text(text: &str, key: &str) -> Result<Self> {
                    text.parse::<$ty>()
                        .map_err(|e| ConfigError::from_parse_int_error(key, $name, e))
                }
            }
        )+
    };
}

integer_from_raw!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
);

macro_rules! float_from_raw {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl FromRaw for $ty {
                fn type_name() -> &'static str {
                    $name
                }

                fn cast(raw: RawValue, key: &str) -> Result<Self> {
                    match raw {
                        RawValue::Float(f) => Ok(f as $ty),
                        RawValue::Int(n) => Ok(n as $ty),
                        other => Err(ConfigError::mismatch(key, $name, other.shape())),
                    }
                }

                fn from_text(text: &str, key: &str) -> Result<Self> {
                    text.parse::<$ty>()
                        .map_err(|e| ConfigError::from_parse_float_error(key, $name, e))
                }
            }
        )+
    };
}

float_from_raw!(f32 => "f32", f64 => "f64");

fn elements<E: FromRaw>(
    raw: RawValue,
    key: &str,
    encoding: ValueEncoding,
    expected: &str,
) -> Result<Vec<E>> {
    match raw {
        RawValue::List(items) => items.into_iter().map(|item| E::cast(item, key)).collect(),
        RawValue::String(text) if encoding == ValueEncoding::Delimited => split_tokens(&text)
            .map(|token| E::from_text(token, key))
            .collect(),
        other => Err(ConfigError::mismatch(key, expected, other.shape())),
    }
}

fn entries<K: FromRaw, V: FromRaw>(
    raw: RawValue,
    key: &str,
    encoding: ValueEncoding,
) -> Result<Vec<(K, V)>> {
    match raw {
        RawValue::Map(map) => map
            .into_iter()
            .map(|(k, v)| Ok((K::from_text(&k, key)?, V::cast(v, key)?)))
            .collect(),
        RawValue::String(text) if encoding == ValueEncoding::Delimited => split_entries(&text)
            .map(|(k, v)| Ok((K::from_text(k, key)?, V::from_text(v, key)?)))
            .collect(),
        other => Err(ConfigError::mismatch(key, "map", other.shape())),
    }
}

impl<E: FromRaw> FromRaw for Vec<E> {
    fn type_name() -> &'static str {
        "list"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        elements(raw, key, ValueEncoding::Native, "list")
    }

    fn from_raw(raw: RawValue, key: &str, encoding: ValueEncoding) -> Result<Self> {
        elements(raw, key, encoding, "list")
    }
}

impl<E: FromRaw + Eq + Hash> FromRaw for HashSet<E> {
    fn type_name() -> &'static str {
        "set"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        Self::from_raw(raw, key, ValueEncoding::Native)
    }

    fn from_raw(raw: RawValue, key: &str, encoding: ValueEncoding) -> Result<Self> {
        Ok(elements(raw, key, encoding, "set")?.into_iter().collect())
    }
}

impl<E: FromRaw + Ord> FromRaw for BTreeSet<E> {
    fn type_name() -> &'static str {
        "set"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        Self::from_raw(raw, key, ValueEncoding::Native)
    }

    fn from_raw(raw: RawValue, key: &str, encoding: ValueEncoding) -> Result<Self> {
        Ok(elements(raw, key, encoding, "set")?.into_iter().collect())
    }
}

impl<K: FromRaw + Eq + Hash, V: FromRaw> FromRaw for HashMap<K, V> {
    fn type_name() -> &'static str {
        "map"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        Self::from_raw(raw, key, ValueEncoding::Native)
    }

    fn from_raw(raw: RawValue, key: &str, encoding: ValueEncoding) -> Result<Self> {
        Ok(entries(raw, key, encoding)?.into_iter().collect())
    }
}

impl<K: FromRaw + Ord, V: FromRaw> FromRaw for BTreeMap<K, V> {
    fn type_name() -> &'static str {
        "map"
    }

    fn cast(raw: RawValue, key: &str) -> Result<Self> {
        Self::from_raw(raw, key, ValueEncoding::Native)
    }

    fn from_raw(raw: RawValue, key: &str, encoding: ValueEncoding) -> Result<Self> {
        Ok(entries(raw, key, encoding)?.into_iter().collect())
    }
}

impl IntoRaw for RawValue {
    fn into_raw(self) -> Option<RawValue> {
        Some(self)
    }
}

impl<T: IntoRaw> IntoRaw for Option<T> {
    fn into_raw(self) -> Option<RawValue> {
        self.and_then(IntoRaw::into_raw)
    }
}

macro_rules! scalar_into_raw {
    ($($ty:ty),+) => {
        $(
            impl IntoRaw for $ty {
                fn into_raw(self) -> Option<RawValue> {
                    Some(RawValue::from(self))
                }
            }
        )+
    };
}

scalar_into_raw!(bool, char, i8, i16, i32, i64, u8, u16, u32, f32, f64, String, &str);

fn list_into_raw<T: IntoRaw>(items: impl IntoIterator<Item = T>) -> Option<RawValue> {
    Some(RawValue::List(
        items.into_iter().filter_map(IntoRaw::into_raw).collect(),
    ))
}

fn map_into_raw<K: ToString, V: IntoRaw>(
    entries: impl IntoIterator<Item = (K, V)>,
) -> Option<RawValue> {
    Some(RawValue::Map(
        entries
            .into_iter()
            .filter_map(|(k, v)| v.into_raw().map(|v| (k.to_string(), v)))
            .collect(),
    ))
}

impl<T: IntoRaw> IntoRaw for Vec<T> {
    fn into_raw(self) -> Option<RawValue> {
        list_into_raw(self)
    }
}

impl<T: IntoRaw + Clone> IntoRaw for &[T] {
    fn into_raw(self) -> Option<RawValue> {
        list_into_raw(self.iter().cloned())
    }
}

impl<T: IntoRaw> IntoRaw for HashSet<T> {
    fn into_raw(self) -> Option<RawValue> {
        list_into_raw(self)
    }
}

impl<T: IntoRaw> IntoRaw for BTreeSet<T> {
    fn into_raw(self) -> Option<RawValue> {
        list_into_raw(self)
    }
}

impl<K: ToString, V: IntoRaw> IntoRaw for HashMap<K, V> {
    fn into_raw(self) -> Option<RawValue> {
        map_into_raw(self)
    }
}

impl<K: ToString, V: IntoRaw> IntoRaw for BTreeMap<K, V> {
    fn into_raw(self) -> Option<RawValue> {
        map_into_raw(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_parses_to_integer() {
        let n = i32::from_raw(RawValue::from("8080"), "k", ValueEncoding::Native).unwrap();
        assert_eq!(n, 8080);
    }

    #[test]
    fn test_malformed_integer_is_format_error() {
        let err = i32::from_raw(RawValue::from("80x"), "k", ValueEncoding::Native).unwrap_err();
        assert!(matches!(err, ConfigError::FormatError { .. }));
    }

    #[test]
    fn test_integer_range_is_checked() {
        let err = i8::from_raw(RawValue::Int(300), "k", ValueEncoding::Native).unwrap_err();
        assert!(matches!(err, ConfigError::FormatError { .. }));
        assert_eq!(
            i16::from_raw(RawValue::Int(-300), "k", ValueEncoding::Native).unwrap(),
            -300
        );
    }

    #[test]
    fn test_float_accepts_integer() {
        assert_eq!(f64::cast(RawValue::Int(2), "k").unwrap(), 2.0);
        assert_eq!(f32::cast(RawValue::Float(0.5), "k").unwrap(), 0.5);
    }

    #[test]
    fn test_bool_literals() {
        for text in ["true", "TRUE", "True"] {
            assert!(bool::from_text(text, "k").unwrap());
        }
        for text in ["false", "FALSE", "False"] {
            assert!(!bool::from_text(text, "k").unwrap());
        }
        for text in ["maybe", "yes", "on", "1", "no", "0"] {
            assert!(bool::from_text(text, "k").is_err(), "{}", text);
        }
    }

    #[test]
    fn test_char_takes_first() {
        assert_eq!(char::from_text("xyz", "k").unwrap(), 'x');
        assert!(char::from_text("", "k").is_err());
    }

    #[test]
    fn test_string_from_scalar() {
        assert_eq!(String::cast(RawValue::Int(5), "k").unwrap(), "5");
        assert!(matches!(
            String::cast(RawValue::List(vec![]), "k").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_bool_from_integer_is_mismatch() {
        let err = bool::from_raw(RawValue::Int(1), "k", ValueEncoding::Native).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn test_native_list_casts_elements() {
        let raw = RawValue::from(vec![1_i32, 2, 3]);
        let list: Vec<i64> = Vec::from_raw(raw, "k", ValueEncoding::Native).unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_native_list_rejects_incompatible_element() {
        let raw = RawValue::List(vec![RawValue::Int(1), RawValue::Bool(true)]);
        let err = Vec::<i32>::from_raw(raw, "k", ValueEncoding::Native).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn test_delimited_list_splits_and_trims() {
        let raw = RawValue::from(" 1, 2,,3 ,");
        let list: Vec<i32> = Vec::from_raw(raw, "k", ValueEncoding::Delimited).unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_string_is_not_a_list_natively() {
        let err = Vec::<String>::from_raw(RawValue::from("a,b"), "k", ValueEncoding::Native)
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }

    #[test]
    fn test_delimited_set_collapses_duplicates() {
        let raw = RawValue::from("a,b,a");
        let set: BTreeSet<String> = BTreeSet::from_raw(raw, "k", ValueEncoding::Delimited).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_delimited_map_drops_malformed_tokens() {
        let raw = RawValue::from("a=1,b");
        let map: HashMap<String, String> =
            HashMap::from_raw(raw, "k", ValueEncoding::Delimited).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_delimited_map_splits_on_first_separator() {
        let raw = RawValue::from("url=jdbc:x?a=b");
        let map: BTreeMap<String, String> =
            BTreeMap::from_raw(raw, "k", ValueEncoding::Delimited).unwrap();
        assert_eq!(map["url"], "jdbc:x?a=b");
    }

    #[test]
    fn test_nested_list_in_delimited_text_is_unsupported() {
        let raw = RawValue::from("1,2");
        let err = Vec::<Vec<i32>>::from_raw(raw, "k", ValueEncoding::Delimited).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedType { .. }));
    }

    #[test]
    fn test_native_map_parses_keys() {
        let mut map = BTreeMap::new();
        map.insert("1".to_string(), RawValue::from("one"));
        let parsed: HashMap<i32, String> =
            HashMap::from_raw(RawValue::Map(map), "k", ValueEncoding::Native).unwrap();
        assert_eq!(parsed[&1], "one");
    }

    #[test]
    fn test_into_raw_drops_null_elements() {
        let raw = vec![Some(1_i32), None, Some(3)].into_raw().unwrap();
        assert_eq!(raw, RawValue::from(vec![1_i32, 3]));
        assert_eq!(None::<String>.into_raw(), None);
    }

    #[test]
    fn test_map_into_raw() {
        let mut map = HashMap::new();
        map.insert("port", 8080_i32);
        let raw = map.into_raw().unwrap();
        assert_eq!(raw.to_text(), "port=8080");
    }
}
