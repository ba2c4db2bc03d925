// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policies for value handles.
//!
//! A [`ConfigValue`](crate::service::ConfigValue) is parameterized along two axes:
//!
//! - **Presence**: what an absent backend entry resolves to. [`Required`] fails with
//!   `MissingRequiredValue`; [`Optional`] resolves to `None`.
//! - **Mutability**: whether the cache can be overwritten directly. Only handles
//!   marked [`Mutable`] expose `set`.

use crate::domain::{ConfigError, Result};

/// Decides how a resolved backend read becomes a cached value.
pub trait Presence<T> {
    /// The type held in the cache and returned by `get`.
    type Output: Clone;

    /// Turns a backend read into the cached value.
    fn resolve(value: Option<T>, key: &str) -> Result<Self::Output>;

    /// Wraps a directly assigned value for the cache.
    fn wrap(value: T) -> Self::Output;
}

/// An absent entry is an error, raised on first resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct Required;

/// An absent entry resolves to `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Optional;

impl<T: Clone> Presence<T> for Required {
    type Output = T;

    fn resolve(value: Option<T>, key: &str) -> Result<T> {
        value.ok_or_else(|| ConfigError::MissingRequiredValue {
            key: key.to_string(),
        })
    }

    fn wrap(value: T) -> T {
        value
    }
}

impl<T: Clone> Presence<T> for Optional {
    type Output = Option<T>;

    fn resolve(value: Option<T>, _key: &str) -> Result<Option<T>> {
        Ok(value)
    }

    fn wrap(value: T) -> Option<T> {
        Some(value)
    }
}

/// The cache changes only through `clear`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immutable;

/// The cache can also be overwritten with `set`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mutable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fails_on_absent() {
        let err = <Required as Presence<i32>>::resolve(None, "server.port").unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredValue { ref key } if key == "server.port"));
        assert_eq!(<Required as Presence<i32>>::resolve(Some(1), "k").unwrap(), 1);
    }

    #[test]
    fn test_optional_never_fails() {
        assert_eq!(<Optional as Presence<i32>>::resolve(None, "k").unwrap(), None);
        assert_eq!(<Optional as Presence<i32>>::wrap(3), Some(3));
    }
}
