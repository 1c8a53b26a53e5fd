//! Resolver traits: the read-only half of the container facade.

use std::sync::Arc;

use crate::arguments::Arguments;
use crate::error::DiResult;
use crate::injectable::{Activator, Injectable};
use crate::instance::Instance;
use crate::key::TypeKey;

/// A single resolution request: what to build and with which explicit
/// constructor arguments.
///
/// A request built with [`Request::constructible`] also carries the
/// constructors of the requested type, so the type can be built even when
/// nothing is bound to it.
pub struct Request {
    key: TypeKey,
    arguments: Arguments,
    activator: Option<fn() -> Activator>,
}

impl Request {
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            arguments: Arguments::new(),
            activator: None,
        }
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>())
    }

    pub fn constructible<T: Injectable>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            arguments: Arguments::new(),
            activator: Some(Activator::of::<T>),
        }
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub(crate) fn into_parts(self) -> (TypeKey, Arguments, Option<fn() -> Activator>) {
        (self.key, self.arguments, self.activator)
    }
}

/// Core resolver trait for object-safe resolution.
///
/// This is the capability every container backend must provide. Most callers
/// use the generic methods of [`ReadOnlyIocContainer`], which every
/// `ResolverCore` gets for free.
pub trait ResolverCore: Send + Sync {
    /// Resolves one request.
    ///
    /// # Errors
    ///
    /// * `UnresolvedType` - nothing bound and the type is not constructible
    /// * `UnsatisfiableConstructor` / `AmbiguousConstructor` - constructor selection failed
    /// * `CyclicDependency` - the type is needed by its own construction
    /// * `ContainerDisposed` - the container was disposed
    fn resolve_request(&self, request: Request) -> DiResult<Instance>;
}

/// Typed resolution methods of the container facade.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{implements, Arguments, Constructor, Container, Injectable,
///     IocContainer, ReadOnlyIocContainer, Scope, TypeKey};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Polite {
///     name: Arc<String>,
/// }
///
/// impl Greeter for Polite {
///     fn greet(&self) -> String {
///         format!("Good day, {}", self.name)
///     }
/// }
///
/// impl Injectable for Polite {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|name: Arc<String>| Polite { name })]
///     }
/// }
/// implements!(Polite => dyn Greeter);
///
/// let container = Container::new();
/// container.register_type_to::<dyn Greeter, Polite>(Scope::Transient).unwrap();
///
/// // Concrete type with an explicit constructor argument
/// let polite = container
///     .get_instance_with::<Polite>(Arguments::new().with("Ada".to_string()))
///     .unwrap();
/// assert_eq!(polite.greet(), "Good day, Ada");
///
/// // Trait object, same argument passed untyped
/// let greeter = container
///     .resolve_with::<dyn Greeter>(Arguments::new().with("Bob".to_string()))
///     .unwrap();
/// assert_eq!(greeter.greet(), "Good day, Bob");
///
/// // Untyped lookup
/// let instance = container
///     .get_instance_of_with(TypeKey::of::<dyn Greeter>(), Arguments::new().with("Cy".to_string()))
///     .unwrap();
/// assert_eq!(instance.downcast::<dyn Greeter>().unwrap().greet(), "Good day, Cy");
/// ```
pub trait ReadOnlyIocContainer: ResolverCore {
    /// Resolves a concrete type, constructing it directly when nothing is bound.
    fn get_instance<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.get_instance_with::<T>(Arguments::new())
    }

    /// Like [`get_instance`](Self::get_instance), with explicit constructor arguments.
    fn get_instance_with<T: Injectable>(&self, arguments: Arguments) -> DiResult<Arc<T>> {
        self.resolve_request(Request::constructible::<T>().with_arguments(arguments))?
            .downcast::<T>()
    }

    /// Resolves any bound type, including trait objects.
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve_with::<T>(Arguments::new())
    }

    /// Like [`resolve`](Self::resolve), with explicit constructor arguments.
    fn resolve_with<T: ?Sized + Send + Sync + 'static>(&self, arguments: Arguments) -> DiResult<Arc<T>> {
        self.resolve_request(Request::of::<T>().with_arguments(arguments))?
            .downcast::<T>()
    }

    /// Resolves a type known only at runtime.
    fn get_instance_of(&self, key: TypeKey) -> DiResult<Instance> {
        self.get_instance_of_with(key, Arguments::new())
    }

    /// Like [`get_instance_of`](Self::get_instance_of), with explicit constructor arguments.
    fn get_instance_of_with(&self, key: TypeKey, arguments: Arguments) -> DiResult<Instance> {
        self.resolve_request(Request::new(key).with_arguments(arguments))
    }
}

impl<R: ResolverCore + ?Sized> ReadOnlyIocContainer for R {}
