//! Binding descriptors for introspection and diagnostics.

use crate::binding::When;
use crate::key::TypeKey;
use crate::scope::Scope;

/// How a binding produces its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// The requested type is constructed directly
    SelfType,
    /// A different concrete type is constructed and upcast
    Type,
    /// A user factory is invoked
    Factory,
}

/// Snapshot of one registered binding.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Container, Constructor, Injectable, IocContainer, Scope, TargetKind, When};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|| Clock)]
///     }
/// }
/// struct Scheduler;
///
/// let container = Container::new();
/// container.register_type::<Clock>(Scope::Singleton).unwrap();
/// container
///     .register_type_when::<Clock>(When::injected_into::<Scheduler>(), Scope::Transient)
///     .unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
/// assert_eq!(descriptors[0].scope, Scope::Singleton);
/// assert_eq!(descriptors[0].target, TargetKind::SelfType);
/// assert!(!descriptors[0].is_conditional());
/// assert!(descriptors[1].is_conditional());
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The requested (contract) type
    pub requested: TypeKey,
    /// Construction strategy
    pub target: TargetKind,
    /// Concrete type built by the binding, `None` for factories
    pub implementation: Option<TypeKey>,
    pub scope: Scope,
    /// Injection-site condition, if any
    pub condition: Option<When>,
    /// Registration order
    pub sequence: u64,
    /// Whether a singleton instance is currently stored
    pub has_instance: bool,
}

impl BindingDescriptor {
    /// Get the requested type name
    pub fn type_name(&self) -> &'static str {
        self.requested.type_name()
    }

    /// Get the implementation type name, if the binding has one
    pub fn implementation_name(&self) -> Option<&'static str> {
        self.implementation.map(|key| key.type_name())
    }

    /// Check if the binding only applies at specific injection sites
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

impl std::fmt::Display for BindingDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ", self.requested.short_name())?;
        match (self.target, self.implementation) {
            (TargetKind::Factory, _) | (_, None) => f.write_str("<factory>")?,
            (_, Some(implementation)) => f.write_str(&implementation.short_name())?,
        }
        write!(f, " ({})", self.scope)?;
        if let Some(condition) = &self.condition {
            write!(f, " {}", condition)?;
        }
        Ok(())
    }
}
