//! Metadata value slots.
//!
//! A [`Value`] is either a concrete value of any runtime type, or a
//! *computed* value: a deferred evaluation that produces another value when
//! given the store it is being read from. Computed values may themselves
//! yield further computed values; typed accessors expand the chain until a
//! concrete value appears.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::metadata::Metadata;

/// Evaluation function for computed values.
///
/// The store passed in is the one the value is being resolved against, which
/// lets a computed value look up sibling keys (including other computed
/// ones). Evaluators must be side-effect-free and thread-safe if the store
/// is read concurrently.
pub type ComputedFn = dyn Fn(&Metadata) -> Value + Send + Sync;

#[derive(Clone)]
pub(crate) enum ValueKind {
    Plain {
        value: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    },
    Computed(Arc<ComputedFn>),
}

/// A single metadata slot.
///
/// Cloning a value clones the `Arc` handle, not the underlying data, so
/// slots can be shared between a store and views derived from it.
#[derive(Clone)]
pub struct Value(pub(crate) ValueKind);

impl Value {
    /// Store a concrete value with its exact runtime type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(ValueKind::Plain {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Store a deferred evaluation.
    pub fn computed(f: impl Fn(&Metadata) -> Value + Send + Sync + 'static) -> Self {
        Self(ValueKind::Computed(Arc::new(f)))
    }

    /// Whether this slot still holds an unexpanded computation.
    pub fn is_computed(&self) -> bool {
        matches!(self.0, ValueKind::Computed(_))
    }

    /// The stored type's name, for diagnostics.
    ///
    /// Computed slots report `"computed"` until they are resolved.
    pub fn type_name(&self) -> &'static str {
        match &self.0 {
            ValueKind::Plain { type_name, .. } => type_name,
            ValueKind::Computed(_) => "computed",
        }
    }

    /// Borrow the concrete value if it is a `T`.
    ///
    /// Returns `None` for computed slots; this does no resolution and no
    /// conversion. Use the store's typed accessors for both.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.0 {
            ValueKind::Plain { value, .. } => value.downcast_ref(),
            ValueKind::Computed(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ValueKind::Plain { value, type_name } => {
                if let Some(v) = value.downcast_ref::<String>() {
                    write!(f, "{v:?}")
                } else if let Some(v) = value.downcast_ref::<i64>() {
                    write!(f, "{v}")
                } else if let Some(v) = value.downcast_ref::<f64>() {
                    write!(f, "{v}")
                } else if let Some(v) = value.downcast_ref::<bool>() {
                    write!(f, "{v}")
                } else {
                    write!(f, "<{type_name}>")
                }
            }
            ValueKind::Computed(_) => f.write_str("<computed>"),
        }
    }
}

// The `From` impls normalize primitives so the default conversions in
// `ConversionTable::standard` only need to know about `i64`, `f64`, `bool`
// and `String`. `Value::new` never changes the stored type.

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
