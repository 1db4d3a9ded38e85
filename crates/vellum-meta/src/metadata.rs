//! The metadata store.
//!
//! [`Metadata`] is an insertion-ordered, case-insensitive key/value store
//! whose slots may hold deferred computations. Typed accessors resolve
//! computed chains against the store itself, then coerce the concrete value
//! through the store's [`ConversionTable`].
//!
//! The store is built for a single-writer configuration phase followed by a
//! read-only execution phase: mutation takes `&mut self`, reads take
//! `&self`, and no internal locking is provided. Concurrent reads are safe
//! once mutation has ceased, provided computed evaluators are themselves
//! side-effect-free.

use std::any::{Any, TypeId};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::convert::ConversionTable;
use crate::error::MetadataError;
use crate::key::{Key, KeyQuery};
use crate::value::{Value, ValueKind};

/// Expansion cap for chained computed values. A chain longer than this is
/// treated as cyclic and fails with [`MetadataError::CyclicComputation`].
const MAX_RESOLVE_DEPTH: usize = 128;

/// An ordered, case-insensitive key/value store with lazily computed values.
///
/// Keys compare case-insensitively; the casing of the first write wins and
/// is what [`keys`](Metadata::keys) yields. Values are type-erased, and
/// retrieval through [`try_get`](Metadata::try_get) /
/// [`get`](Metadata::get) applies the store's conversion table when the
/// stored type differs from the requested one.
#[derive(Debug, Clone)]
pub struct Metadata {
    entries: IndexMap<Key, Value>,
    conversions: ConversionTable,
}

impl Metadata {
    /// Create an empty store seeded with [`ConversionTable::standard`].
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            conversions: ConversionTable::standard(),
        }
    }

    /// Create an empty store with an explicit conversion table.
    ///
    /// This is how a settings layer installs its own defaults; there is no
    /// process-wide conversion registry.
    pub fn with_conversions(conversions: ConversionTable) -> Self {
        Self {
            entries: IndexMap::new(),
            conversions,
        }
    }

    /// Case-insensitive existence check. Never resolves computed values.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&KeyQuery(key))
    }

    /// The unresolved slot for `key`, if present.
    ///
    /// Computed values are returned as-is; this is the introspection
    /// surface and the only accessor that never evaluates anything.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(&KeyQuery(key))
    }

    /// Retrieve `key` as a `T`, resolving computed chains and applying
    /// conversions.
    ///
    /// - Absent key: `Ok(None)` — never an error.
    /// - Computed slot: evaluated against this store, repeatedly, until a
    ///   concrete value appears (capped, see
    ///   [`MetadataError::CyclicComputation`]).
    /// - A conversion registered for (stored type, `T`) is applied if
    ///   present; otherwise a direct downcast is attempted.
    /// - Neither applies: `Err(InvalidCast)`, so "key missing" and "wrong
    ///   type" stay distinguishable.
    pub fn try_get<T>(&self, key: &str) -> Result<Option<T>, MetadataError>
    where
        T: Any + Send + Sync + Clone,
    {
        let Some(slot) = self.raw(key) else {
            return Ok(None);
        };
        let (value, type_name) = self.resolve_slot(key, slot)?;
        self.convert_resolved(key, &value, type_name).map(Some)
    }

    /// Strict form of [`try_get`](Metadata::try_get): an absent key is
    /// [`MetadataError::KeyNotFound`].
    pub fn get<T>(&self, key: &str) -> Result<T, MetadataError>
    where
        T: Any + Send + Sync + Clone,
    {
        self.try_get(key)?.ok_or_else(|| MetadataError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// A filtered view containing only the listed keys.
    ///
    /// The view shares the original's value slots (computed entries stay
    /// lazy and resolve against the view) and its conversion table as of
    /// now. Entry order and casing follow this store, not the argument.
    pub fn get_metadata(&self, keys: &[&str]) -> Metadata {
        let mut entries = IndexMap::new();
        for (key, value) in &self.entries {
            if keys.iter().any(|requested| key.matches(requested)) {
                entries.insert(key.clone(), value.clone());
            }
        }
        Metadata {
            entries,
            conversions: self.conversions.clone(),
        }
    }

    /// Insert or overwrite a slot, returning the previous one if any.
    ///
    /// On overwrite the entry keeps its position and the casing it was
    /// first written with.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(Key::new(key), value.into())
    }

    /// Remove a slot, preserving the order of the remaining entries.
    ///
    /// Returns the removed slot, or `None` if the key was absent (a no-op,
    /// not an error).
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(&KeyQuery(key))
    }

    /// Remove all entries. The conversion table is untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The store's conversion table.
    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    /// Mutable access to the conversion table.
    pub fn conversions_mut(&mut self) -> &mut ConversionTable {
        &mut self.conversions
    }

    /// Register a conversion from `S` to `T` on this store's table.
    ///
    /// A later registration for the same pair replaces the earlier one.
    pub fn register_conversion<S, T, F>(&mut self, f: F)
    where
        S: Any,
        T: Any + Send + Sync,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.conversions.register(f);
    }

    /// Keys in insertion order, original casing. Never resolves anything.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(Key::as_str)
    }

    /// Resolved values in insertion order.
    ///
    /// Every computed value is expanded before being yielded, which is why
    /// items are `Result`: resolution can hit the cycle cap.
    pub fn values(&self) -> impl Iterator<Item = Result<Value, MetadataError>> + '_ {
        self.entries.iter().map(move |(key, value)| {
            self.resolve_slot(key.as_str(), value)
                .map(|(value, type_name)| Value(ValueKind::Plain { value, type_name }))
        })
    }

    /// Resolved `(key, value)` pairs in insertion order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&str, Result<Value, MetadataError>)> + '_ {
        self.entries.iter().map(move |(key, value)| {
            let resolved = self
                .resolve_slot(key.as_str(), value)
                .map(|(value, type_name)| Value(ValueKind::Plain { value, type_name }));
            (key.as_str(), resolved)
        })
    }

    /// Unresolved `(key, slot)` pairs in insertion order.
    pub fn raw_iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Expand a computed chain until a concrete value appears.
    fn resolve_slot(
        &self,
        key: &str,
        slot: &Value,
    ) -> Result<(Arc<dyn Any + Send + Sync>, &'static str), MetadataError> {
        let mut current = slot.clone();
        for _ in 0..MAX_RESOLVE_DEPTH {
            match current.0 {
                ValueKind::Plain { value, type_name } => return Ok((value, type_name)),
                ValueKind::Computed(eval) => current = (*eval)(self),
            }
        }
        Err(MetadataError::CyclicComputation {
            key: key.to_string(),
            limit: MAX_RESOLVE_DEPTH,
        })
    }

    /// Coerce a resolved value to `T`: registered conversion first, direct
    /// downcast second.
    fn convert_resolved<T>(
        &self,
        key: &str,
        value: &Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    ) -> Result<T, MetadataError>
    where
        T: Any + Send + Sync + Clone,
    {
        let invalid_cast = || MetadataError::InvalidCast {
            key: key.to_string(),
            from: type_name,
            to: std::any::type_name::<T>(),
        };

        let source: &dyn Any = value.as_ref();
        if let Some(conversion) = self.conversions.lookup(source.type_id(), TypeId::of::<T>()) {
            let converted = (**conversion)(source).ok_or_else(invalid_cast)?;
            return converted
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|_| invalid_cast());
        }
        source.downcast_ref::<T>().cloned().ok_or_else(invalid_cast)
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Metadata {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        metadata.extend(iter);
        metadata
    }
}
