//! Type conversions consulted during typed metadata retrieval.
//!
//! A [`ConversionTable`] maps a (source type, target type) pair to a
//! conversion function. Typed accessors consult the table after resolving a
//! slot to a concrete value: a registered conversion wins over a direct
//! downcast, and a missing entry falls back to the downcast.
//!
//! Each store owns its table; there is no process-wide registry. Stores
//! created with [`Metadata::new`](crate::Metadata::new) start from
//! [`ConversionTable::standard`] and may be extended per store.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Erased conversion function. `None` means the conversion itself failed
/// (for example an unparsable string), which surfaces as `InvalidCast`.
pub(crate) type ErasedConversion =
    Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Registry of conversions keyed by (source, target) runtime type.
///
/// Cloning the table shares the registered functions, so a view derived
/// from a store converts exactly like the store did at the time the view
/// was taken.
#[derive(Clone, Default)]
pub struct ConversionTable {
    conversions: HashMap<(TypeId, TypeId), ErasedConversion>,
}

impl ConversionTable {
    /// An empty table: typed reads only succeed on exact type matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default conversions a freshly created store is seeded with.
    ///
    /// Covers the primitive types the `From<T> for Value` impls normalize
    /// to: stringification of numbers and booleans, integer widening, and
    /// fallible parsing back out of strings. Deliberately does not convert
    /// between `bool` and numbers.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(|v: &i64| v.to_string());
        table.register(|v: &f64| v.to_string());
        table.register(|v: &bool| v.to_string());
        table.register(|v: &i64| *v as f64);
        table.register_fallible(|v: &String| v.parse::<i64>().ok());
        table.register_fallible(|v: &String| v.parse::<f64>().ok());
        table.register_fallible(|v: &String| v.parse::<bool>().ok());
        table
    }

    /// Register a conversion from `S` to `T`.
    ///
    /// A later registration for the same `(S, T)` pair replaces the earlier
    /// one.
    pub fn register<S, T, F>(&mut self, f: F)
    where
        S: Any,
        T: Any + Send + Sync,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.register_fallible(move |source: &S| Some(f(source)));
    }

    /// Register a conversion from `S` to `T` that may fail.
    ///
    /// Returning `None` makes the retrieval fail with an invalid-cast error
    /// rather than falling back to a direct downcast.
    pub fn register_fallible<S, T, F>(&mut self, f: F)
    where
        S: Any,
        T: Any + Send + Sync,
        F: Fn(&S) -> Option<T> + Send + Sync + 'static,
    {
        let erased: ErasedConversion = Arc::new(move |value: &dyn Any| {
            let source = value.downcast_ref::<S>()?;
            f(source).map(|converted| Box::new(converted) as Box<dyn Any + Send + Sync>)
        });
        self.conversions
            .insert((TypeId::of::<S>(), TypeId::of::<T>()), erased);
    }

    /// Whether a conversion is registered for the pair.
    pub fn contains(&self, from: TypeId, to: TypeId) -> bool {
        self.conversions.contains_key(&(from, to))
    }

    /// Number of registered conversions.
    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    /// Whether the table has no registered conversions.
    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }

    pub(crate) fn lookup(&self, from: TypeId, to: TypeId) -> Option<&ErasedConversion> {
        self.conversions.get(&(from, to))
    }
}

impl fmt::Debug for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionTable")
            .field("conversions", &self.conversions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply<T: Any>(table: &ConversionTable, value: &dyn Any) -> Option<T> {
        let conversion = table.lookup(value.type_id(), TypeId::of::<T>())?;
        let converted = (**conversion)(value)?;
        converted.downcast::<T>().ok().map(|boxed| *boxed)
    }

    #[test]
    fn test_empty_table() {
        let table = ConversionTable::new();
        assert!(table.is_empty());
        assert!(!table.contains(TypeId::of::<i64>(), TypeId::of::<String>()));
    }

    #[test]
    fn test_register_and_apply() {
        let mut table = ConversionTable::new();
        table.register(|v: &i64| format!("N{v}"));

        assert!(table.contains(TypeId::of::<i64>(), TypeId::of::<String>()));
        assert_eq!(apply::<String>(&table, &5i64), Some("N5".to_string()));
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let mut table = ConversionTable::new();
        table.register(|v: &i64| format!("first {v}"));
        table.register(|v: &i64| format!("second {v}"));

        assert_eq!(apply::<String>(&table, &1i64), Some("second 1".to_string()));
    }

    #[test]
    fn test_fallible_conversion_failure() {
        let mut table = ConversionTable::new();
        table.register_fallible(|v: &String| v.parse::<i64>().ok());

        assert_eq!(apply::<i64>(&table, &"42".to_string()), Some(42));
        assert_eq!(apply::<i64>(&table, &"not a number".to_string()), None);
    }

    #[test]
    fn test_standard_set() {
        let table = ConversionTable::standard();

        assert_eq!(apply::<String>(&table, &7i64), Some("7".to_string()));
        assert_eq!(apply::<f64>(&table, &7i64), Some(7.0));
        assert_eq!(apply::<String>(&table, &true), Some("true".to_string()));
        assert_eq!(apply::<i64>(&table, &"12".to_string()), Some(12));
        assert_eq!(apply::<bool>(&table, &"true".to_string()), Some(true));

        // No bridge between bool and numbers
        assert!(!table.contains(TypeId::of::<bool>(), TypeId::of::<i64>()));
        assert!(!table.contains(TypeId::of::<i64>(), TypeId::of::<bool>()));
    }

    #[test]
    fn test_clone_shares_registrations() {
        let mut table = ConversionTable::new();
        table.register(|v: &i64| format!("N{v}"));

        let copy = table.clone();
        assert_eq!(apply::<String>(&copy, &3i64), Some("N3".to_string()));

        // Extending the copy does not touch the original
        let mut copy = copy;
        copy.register(|v: &bool| format!("B{v}"));
        assert!(!table.contains(TypeId::of::<bool>(), TypeId::of::<String>()));
    }
}
