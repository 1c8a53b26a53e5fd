//! Registration traits: the mutating half of the container facade.

use std::sync::Arc;

use crate::binding::{Binding, When};
use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::injectable::{Implements, Injectable};
use crate::scope::Scope;
use crate::traits::ReadOnlyIocContainer;

/// Object-safe registration and teardown.
pub trait RegistrarCore: Send + Sync {
    /// Adds a binding. Registering the same type again accumulates bindings.
    ///
    /// # Errors
    ///
    /// `ContainerDisposed` once [`dispose`](Self::dispose) has run.
    fn bind(&self, binding: Binding) -> DiResult<()>;

    /// Releases every singleton and binding and runs disposal hooks. Later
    /// registration and resolution calls fail with `ContainerDisposed`.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// The full container facade: typed registration on top of
/// [`ReadOnlyIocContainer`].
///
/// Application code written against this trait does not depend on a concrete
/// container type.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{implements, Constructor, Container, Injectable, IocContainer,
///     ReadOnlyIocContainer, Scope, When};
/// use std::sync::Arc;
///
/// trait Vehicle: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct Car;
/// impl Vehicle for Car {
///     fn name(&self) -> &'static str { "car" }
/// }
/// impl Injectable for Car {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|| Car)] }
/// }
///
/// struct Motorcycle;
/// impl Vehicle for Motorcycle {
///     fn name(&self) -> &'static str { "motorcycle" }
/// }
/// impl Injectable for Motorcycle {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|| Motorcycle)] }
/// }
///
/// implements!(Car => dyn Vehicle);
/// implements!(Motorcycle => dyn Vehicle);
///
/// struct Rider {
///     vehicle: Arc<dyn Vehicle>,
/// }
/// impl Injectable for Rider {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| Rider { vehicle })]
///     }
/// }
///
/// fn configure(container: &impl IocContainer) -> ioc_abstractions::DiResult<()> {
///     container.register_type_to::<dyn Vehicle, Car>(Scope::Transient)?;
///     container.register_type_to_when::<dyn Vehicle, Motorcycle>(
///         When::injected_into::<Rider>(),
///         Scope::Transient,
///     )?;
///     Ok(())
/// }
///
/// let container = Container::new();
/// configure(&container).unwrap();
///
/// assert_eq!(container.resolve::<dyn Vehicle>().unwrap().name(), "car");
/// assert_eq!(container.get_instance::<Rider>().unwrap().vehicle.name(), "motorcycle");
/// ```
pub trait IocContainer: ReadOnlyIocContainer + RegistrarCore {
    /// Binds `T` to itself.
    fn register_type<T: Injectable>(&self, scope: Scope) -> DiResult<()> {
        self.bind(Binding::to_self::<T>().in_scope(scope))
    }

    /// Binds `T` to itself, only at the given injection site.
    fn register_type_when<T: Injectable>(&self, when: When, scope: Scope) -> DiResult<()> {
        self.bind(Binding::to_self::<T>().in_scope(scope).when(when))
    }

    /// Binds `T` to the concrete type `U`.
    fn register_type_to<T, U>(&self, scope: Scope) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
        U: Injectable + Implements<T>,
    {
        self.bind(Binding::to::<T, U>().in_scope(scope))
    }

    /// Binds `T` to the concrete type `U`, only at the given injection site.
    fn register_type_to_when<T, U>(&self, when: When, scope: Scope) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
        U: Injectable + Implements<T>,
    {
        self.bind(Binding::to::<T, U>().in_scope(scope).when(when))
    }

    /// Binds `T` to a factory.
    fn register_factory<T, F>(&self, factory: F, scope: Scope) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.bind(Binding::to_factory::<T, F>(factory).in_scope(scope))
    }

    /// Binds `T` to a factory, only at the given injection site.
    fn register_factory_when<T, F>(&self, factory: F, when: When, scope: Scope) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        self.bind(Binding::to_factory::<T, F>(factory).in_scope(scope).when(when))
    }
}

impl<C: ReadOnlyIocContainer + RegistrarCore + ?Sized> IocContainer for C {}
