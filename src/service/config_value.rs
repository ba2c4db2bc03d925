// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazily resolved, cached configuration value handles.
//!
//! A [`ConfigValue`] is bound to one source and one key. Its cache starts out
//! unresolved; the first [`get`](ConfigValue::get) reads the source and fixes the
//! result until [`clear`](ConfigValue::clear) resets it. Backend writes made after
//! resolution are not observed until then.
//!
//! The cache is a single [`ArcSwap`] slot. Resolution publishes its result with a
//! compare-and-swap, so threads racing on a first `get` all return whichever value
//! won; the losers may have read the source speculatively.

use crate::domain::coercion::FromRaw;
use crate::domain::Result;
use crate::ports::{ConfigSource, ConfigSourceExt};
use crate::service::policy::{Immutable, Mutable, Optional, Presence, Required};
use arc_swap::{ArcSwap, Guard};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug)]
enum Slot<V> {
    Unresolved,
    Resolved(V),
}

/// A cached, lazily resolved typed handle for one key.
///
/// `P` is the presence policy ([`Required`] or [`Optional`]) and `M` the mutability
/// policy ([`Immutable`] or [`Mutable`]). The aliases [`RequiredValue`],
/// [`MutableRequiredValue`], [`OptionalValue`] and [`MutableOptionalValue`] name the
/// four combinations.
///
/// # Examples
///
/// ```rust
/// use pathcfg::adapters::MapSource;
/// use pathcfg::ports::ConfigSourceExt;
/// use pathcfg::service::{OptionalValue, RequiredValue};
/// use std::sync::Arc;
///
/// let source = Arc::new(MapSource::new());
/// source.set_int("server.port", 8080).unwrap();
///
/// let port = RequiredValue::<u16>::new(source.clone(), "server.port");
/// assert_eq!(port.get().unwrap(), 8080);
///
/// // The cache holds until cleared
/// source.set_int("server.port", 9090).unwrap();
/// assert_eq!(port.get().unwrap(), 8080);
/// port.clear();
/// assert_eq!(port.get().unwrap(), 9090);
///
/// let host = OptionalValue::<String>::new(source, "server.host");
/// assert_eq!(host.get().unwrap(), None);
/// ```
pub struct ConfigValue<T, P = Required, M = Immutable>
where
    P: Presence<T>,
{
    source: Arc<dyn ConfigSource>,
    key: String,
    slot: ArcSwap<Slot<P::Output>>,
    _policy: PhantomData<fn() -> (T, P, M)>,
}

/// A value that must be present; its cache changes only through `clear`.
pub type RequiredValue<T> = ConfigValue<T, Required, Immutable>;

/// A value that must be present and whose cache can be overwritten.
pub type MutableRequiredValue<T> = ConfigValue<T, Required, Mutable>;

/// A value that may be absent; its cache changes only through `clear`.
pub type OptionalValue<T> = ConfigValue<T, Optional, Immutable>;

/// A value that may be absent and whose cache can be overwritten.
pub type MutableOptionalValue<T> = ConfigValue<T, Optional, Mutable>;

impl<T, P, M> ConfigValue<T, P, M>
where
    P: Presence<T>,
{
    /// Binds a handle to `key` in `source`.
    ///
    /// Nothing is read yet; a missing or malformed key is reported by the first
    /// [`get`](ConfigValue::get).
    pub fn new(source: Arc<dyn ConfigSource>, key: impl Into<String>) -> Self {
        Self {
            source,
            key: key.into(),
            slot: ArcSwap::from_pointee(Slot::Unresolved),
            _policy: PhantomData,
        }
    }

    /// Returns the key this handle is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the source this handle reads from.
    pub fn source(&self) -> &dyn ConfigSource {
        self.source.as_ref()
    }

    /// Returns true once a value is cached.
    pub fn is_resolved(&self) -> bool {
        matches!(**self.slot.load(), Slot::Resolved(_))
    }

    /// Returns the cached value, resolving it from the source first if needed.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredValue` for a [`Required`] handle whose key is absent,
    /// and any key or conversion error from the source read. A failed resolution
    /// leaves the cache unresolved.
    pub fn get(&self) -> Result<P::Output>
    where
        T: FromRaw,
    {
        let mut current = self.slot.load_full();
        loop {
            if let Slot::Resolved(value) = &*current {
                return Ok(value.clone());
            }

            let value = P::resolve(self.source.get::<T>(&self.key)?, &self.key)?;
            let next = Arc::new(Slot::Resolved(value.clone()));
            let previous = self.slot.compare_and_swap(&current, next);
            if Arc::ptr_eq(&previous, &current) {
                tracing::trace!(
                    "Resolved '{}' from source '{}'",
                    self.key,
                    self.source.name()
                );
                return Ok(value);
            }

            tracing::debug!("Lost resolution race for '{}', retrying", self.key);
            current = Guard::into_inner(previous);
        }
    }

    /// Resets the cache so the next `get` reads the source again.
    pub fn clear(&self) {
        self.slot.store(Arc::new(Slot::Unresolved));
    }
}

impl<T, P> ConfigValue<T, P, Mutable>
where
    P: Presence<T>,
{
    /// Overwrites the cache with `value` without writing to the source.
    ///
    /// The handle and the source disagree from here on until the caller writes the
    /// source or calls `clear`.
    pub fn set(&self, value: T) {
        self.slot.store(Arc::new(Slot::Resolved(P::wrap(value))));
    }
}

/// Renders `ConfigValue[key=<k>,value=<v>]` without resolving.
///
/// The cached value is shown in its `Debug` form, so strings are quoted
/// (`value="v"`) and optional handles show `Some(..)` or `None`. An unresolved
/// handle shows `value=<not loaded>`.
impl<T, P, M> fmt::Display for ConfigValue<T, P, M>
where
    P: Presence<T>,
    P::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &**self.slot.load() {
            Slot::Resolved(value) => write!(f, "ConfigValue[key={},value={:?}]", self.key, value),
            Slot::Unresolved => write!(f, "ConfigValue[key={},value=<not loaded>]", self.key),
        }
    }
}

impl<T, P, M> fmt::Debug for ConfigValue<T, P, M>
where
    P: Presence<T>,
    P::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValue")
            .field("key", &self.key)
            .field("source", &self.source.name())
            .field("slot", &**self.slot.load())
            .finish()
    }
}
