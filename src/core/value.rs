//! Type-erased values stored in states and carried by actions.

use crate::error::{Result, StoreError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, immutable value of any thread-safe type.
///
/// The runtime type is recorded at construction so that typed retrieval can
/// report what was actually stored. Cloning a `Value` only bumps a reference
/// count.
///
/// # Example
///
/// ```rust
/// use unistate::core::Value;
///
/// let value = Value::new(42_i32);
///
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
/// assert!(value.downcast::<String>().is_err());
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a value, recording its runtime type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Name of the stored runtime type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the stored value is exactly a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the stored value as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Borrow the stored value as a `T`, failing with
    /// [`StoreError::TypeMismatch`] otherwise.
    pub fn try_ref<T: Any>(&self) -> Result<&T> {
        self.downcast_ref::<T>().ok_or_else(|| self.mismatch::<T>())
    }

    /// Clone the stored value out as a `T`.
    pub fn downcast<T: Any + Clone>(&self) -> Result<T> {
        self.try_ref::<T>().cloned()
    }

    /// Whether two values share the same allocation.
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&a.inner), Arc::as_ptr(&b.inner))
    }

    fn mismatch<T: Any>(&self) -> StoreError {
        StoreError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: self.type_name,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({self})")
    }
}

/// Renders common scalar types by value and anything else by type name.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! show {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = self.downcast_ref::<$ty>() {
                        return write!(f, "{v}");
                    }
                )*
            };
        }
        show!(String, &'static str, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
        write!(f, "<{}>", self.type_name)
    }
}
