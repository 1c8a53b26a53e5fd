//! Instance scope definitions.

/// Scope controlling whether a binding's instances are shared.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Container, IocContainer, ReadOnlyIocContainer, Injectable, Constructor, Scope};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|| Clock)]
///     }
/// }
///
/// let container = Container::new();
/// container.register_type::<Clock>(Scope::Singleton).unwrap();
///
/// let a = container.get_instance::<Clock>().unwrap();
/// let b = container.get_instance::<Clock>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// New instance per resolution, never cached
    #[default]
    Transient,
    /// One instance per binding, created lazily on first resolution
    ///
    /// The instance is held by the container until it is disposed. A
    /// contextual singleton binding owns its own instance, separate from an
    /// unconditional singleton binding for the same requested type.
    Singleton,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Transient => f.write_str("transient"),
            Scope::Singleton => f.write_str("singleton"),
        }
    }
}
