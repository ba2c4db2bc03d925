// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-native value representation.
//!
//! This module provides the `RawValue` type, the shape a backend hands back before any
//! type coercion happens. An absent entry is represented as `Option::None` by the
//! callers, so `RawValue` itself is always present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The delimiter used to encode collections and maps as text.
pub const LIST_DELIMITER: char = ',';

/// The separator between key and value of an encoded map entry.
pub const ENTRY_SEPARATOR: char = '=';

/// A stored configuration value in its backend-native shape.
///
/// Scalars are widened to the largest matching kind (`i64` for integers, `f64` for
/// floats); narrowing happens during coercion. `RawValue` serializes untagged, so a
/// `RawValue` round-trips through any serde format as the plain value.
///
/// # Examples
///
/// ```
/// use pathcfg::domain::RawValue;
///
/// let users = RawValue::from(vec!["alice", "bob"]);
/// assert_eq!(users.shape(), "list");
/// assert_eq!(users.to_text(), "alice,bob");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An ordered sequence of values.
    List(Vec<RawValue>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Names the shape of this value for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
        }
    }

    /// Returns true for boolean, numeric, and string values.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, RawValue::List(_) | RawValue::Map(_))
    }

    /// Returns the inner string if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value in its flat textual form.
    ///
    /// Lists become comma-joined elements and maps become comma-joined `key=value`
    /// pairs. Delimiters inside elements are not escaped, so an element containing a
    /// `,` cannot be told apart from two elements once encoded.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::String(s) => s.clone(),
            RawValue::List(items) => items
                .iter()
                .map(RawValue::to_text)
                .collect::<Vec<_>>()
                .join(&LIST_DELIMITER.to_string()),
            RawValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{}{}{}", k, ENTRY_SEPARATOR, v.to_text()))
                .collect::<Vec<_>>()
                .join(&LIST_DELIMITER.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

macro_rules! raw_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::$variant(value.into())
                }
            }
        )+
    };
}

raw_from!(Bool: bool);
raw_from!(Int: i8, i16, i32, i64, u8, u16, u32);
raw_from!(Float: f64);

// Widen through the shortest decimal text so that 0.1f32 becomes 0.1, not
// 0.10000000149011612.
impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        RawValue::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}
raw_from!(String: String, &str);

impl From<char> for RawValue {
    fn from(value: char) -> Self {
        RawValue::String(value.to_string())
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<BTreeMap<String, T>> for RawValue {
    fn from(entries: BTreeMap<String, T>) -> Self {
        RawValue::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
