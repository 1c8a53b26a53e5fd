//! Type-erased instances handed across the resolution pipeline.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

// Type-erased Arc for storage. The erased value is always an `Arc<T>`, which
// lets unsized `T` (trait objects) share the same storage shape as sized ones.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A resolved instance whose static type has been erased.
///
/// Returned by the untyped resolution methods. The instance remembers the
/// `TypeKey` it was produced for and can be turned back into `Arc<T>`.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Instance, TypeKey};
/// use std::sync::Arc;
///
/// let instance = Instance::new(Arc::new(7u32));
/// assert_eq!(instance.type_key(), TypeKey::of::<u32>());
/// assert_eq!(*instance.downcast::<u32>().unwrap(), 7);
/// assert!(instance.downcast::<String>().is_err());
/// ```
#[derive(Clone)]
pub struct Instance {
    key: TypeKey,
    value: AnyArc,
}

impl Instance {
    /// Wraps a shared value, tagging it with `T`'s key.
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// The key of the type this instance was produced for.
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Checks whether the instance holds an `Arc<T>`.
    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    /// Recovers the typed `Arc<T>`.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Identity comparison of the underlying allocation.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type", &self.key.type_name()).finish()
    }
}
