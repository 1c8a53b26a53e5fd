//! Runtime type descriptors used as registry and cache keys.

use std::any::TypeId;
use std::fmt;

/// Runtime descriptor of a type that can be requested from the container.
///
/// A `TypeKey` identifies both concrete types (`Car`, `String`) and trait
/// objects (`dyn Vehicle`). The `TypeId` drives equality and hashing, the
/// name only exists for diagnostics.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::TypeKey;
///
/// trait Vehicle: Send + Sync {}
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key, TypeKey::of::<String>());
/// assert_ne!(key, TypeKey::of::<dyn Vehicle>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Descriptor for `T`, which may be unsized (`dyn Trait`, `str`).
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name, as returned by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// The type name with module paths stripped, e.g. `dyn Vehicle` or
    /// `Arc<Car>`. Intended for log lines.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();
        for ch in self.name.chars() {
            match ch {
                ':' => segment.clear(),
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                    out.push_str(&segment);
                    segment.clear();
                    out.push(ch);
                }
                _ => segment.push(ch),
            }
        }
        out.push_str(&segment);
        out
    }

    /// Checks whether this key describes `T`.
    #[inline(always)]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

// TypeId-only comparison, the name is diagnostic
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
