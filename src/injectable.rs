//! Compile-time constructor wiring.
//!
//! Rust has no runtime reflection, so a concrete type advertises how it can be
//! built by implementing [`Injectable`]: a list of [`Constructor`]s, each made
//! from a plain closure whose parameters are [`Dependency`] types. The
//! container inspects the declared parameter types to pick a constructor and
//! then feeds it resolved instances.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::TypeKey;

/// A concrete type the container can construct on its own.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Container, Constructor, Injectable, ReadOnlyIocContainer};
/// use std::sync::Arc;
///
/// struct Engine;
/// impl Injectable for Engine {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|| Engine)]
///     }
/// }
///
/// struct Car {
///     label: String,
/// }
///
/// impl Injectable for Car {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![
///             Constructor::new(|_engine: Arc<Engine>| Car { label: "car".into() }),
///             Constructor::new(|_engine: Arc<Engine>, label: Arc<String>| Car {
///                 label: label.to_string(),
///             }),
///         ]
///     }
/// }
///
/// let container = Container::new();
/// container.get_instance::<Engine>().unwrap(); // makes Engine known to the container
/// let car = container.get_instance::<Car>().unwrap();
/// assert_eq!(car.label, "car");
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The public constructors of the type.
    fn constructors() -> Vec<Constructor<Self>>;

    /// Types this type counts as when matching `When::injected_into`
    /// conditions, in addition to itself.
    fn ancestors() -> Vec<TypeKey> {
        Vec::new()
    }
}

/// States that `Self` may be handed out where `I` is requested.
///
/// Every type implements `Implements<Self>`. Trait objects are covered with
/// the [`implements!`](crate::implements) macro.
pub trait Implements<I: ?Sized + Send + Sync + 'static>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    #[inline(always)]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declares that a concrete type implements one or more trait-object
/// contracts, so it can be the target of `register_type_to`.
///
/// ```rust
/// use ioc_abstractions::implements;
///
/// trait Vehicle: Send + Sync {}
/// struct Car;
/// impl Vehicle for Car {}
///
/// implements!(Car => dyn Vehicle);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty => $($iface:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$iface> for $ty {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$iface> {
                    self
                }
            }
        )+
    };
}

/// A concrete dependency that the container may construct without a binding.
///
/// Declaring a constructor parameter as `Inject<T>` instead of `Arc<T>`
/// carries `T`'s constructors along with the parameter, so an unregistered
/// `T` can still be built. Bindings for `T` and explicit arguments of type `T`
/// take precedence as usual.
pub struct Inject<T: Injectable>(Arc<T>);

impl<T: Injectable> Inject<T> {
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T: Injectable> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Injectable> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Injectable> From<Inject<T>> for Arc<T> {
    fn from(inject: Inject<T>) -> Self {
        inject.0
    }
}

/// Description of one constructor parameter.
#[derive(Clone, Copy)]
pub struct Parameter {
    key: TypeKey,
    activator: Option<fn() -> Activator>,
}

impl Parameter {
    /// A parameter satisfied by bindings or explicit arguments only.
    pub fn bound<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            activator: None,
        }
    }

    /// A parameter that can fall back to constructing `T` itself.
    pub fn constructible<T: Injectable>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            activator: Some(Activator::of::<T>),
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Whether the parameter carries its own constructors.
    pub fn is_constructible(&self) -> bool {
        self.activator.is_some()
    }

    pub(crate) fn activator(&self) -> Option<fn() -> Activator> {
        self.activator
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("type", &self.key.type_name())
            .field("constructible", &self.is_constructible())
            .finish()
    }
}

/// A type usable as a constructor closure parameter.
pub trait Dependency: Sized + Send + Sync + 'static {
    fn parameter() -> Parameter;

    fn from_instance(instance: &Instance) -> DiResult<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Dependency for Arc<T> {
    fn parameter() -> Parameter {
        Parameter::bound::<T>()
    }

    fn from_instance(instance: &Instance) -> DiResult<Self> {
        instance.downcast::<T>()
    }
}

impl<T: Injectable> Dependency for Inject<T> {
    fn parameter() -> Parameter {
        Parameter::constructible::<T>()
    }

    fn from_instance(instance: &Instance) -> DiResult<Self> {
        instance.downcast::<T>().map(Inject)
    }
}

type Invoke<T> = Box<dyn Fn(&[Instance]) -> DiResult<T> + Send + Sync>;

/// One public constructor of an [`Injectable`] type.
///
/// Built from a closure whose parameters are annotated [`Dependency`] types,
/// with up to eight parameters.
///
/// ```rust
/// use ioc_abstractions::{Constructor, TypeKey};
/// use std::sync::Arc;
///
/// struct Greeting(String);
///
/// let ctor = Constructor::new(|name: Arc<String>| Greeting(format!("hi {}", name)));
/// assert_eq!(ctor.arity(), 1);
/// assert_eq!(ctor.parameters()[0].type_key(), TypeKey::of::<String>());
/// ```
pub struct Constructor<T> {
    params: Vec<Parameter>,
    invoke: Invoke<T>,
}

impl<T: 'static> Constructor<T> {
    pub fn new<Args, F>(f: F) -> Self
    where
        F: IntoConstructor<T, Args>,
    {
        f.into_constructor()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    /// Invokes the constructor with instances ordered like its parameters.
    pub fn invoke(&self, args: &[Instance]) -> DiResult<T> {
        (self.invoke)(args)
    }
}

impl<T: Send + Sync + 'static> Constructor<T> {
    fn erase(self) -> ErasedConstructor {
        let invoke = self.invoke;
        ErasedConstructor {
            params: self.params,
            invoke: Box::new(move |args: &[Instance]| {
                invoke(args).map(|value| Instance::new(Arc::new(value)))
            }),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").field("params", &self.params).finish()
    }
}

/// Conversion of a closure into a [`Constructor`].
///
/// Implemented for `Fn(A1, .., An) -> T` where every `Ai: Dependency`.
pub trait IntoConstructor<T, Args>: Send + Sync + 'static {
    fn into_constructor(self) -> Constructor<T>;
}

macro_rules! impl_into_constructor {
    ($($arg:ident => $var:ident),*) => {
        impl<T, F, $($arg,)*> IntoConstructor<T, ($($arg,)*)> for F
        where
            T: 'static,
            F: Fn($($arg),*) -> T + Send + Sync + 'static,
            $($arg: Dependency,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn into_constructor(self) -> Constructor<T> {
                let params: Vec<Parameter> = vec![$($arg::parameter()),*];
                let arity = params.len();
                Constructor {
                    params,
                    invoke: Box::new(move |args: &[Instance]| {
                        if args.len() != arity {
                            return Err(DiError::TypeMismatch(std::any::type_name::<T>()));
                        }
                        let mut args = args.iter();
                        $(
                            let $var = match args.next() {
                                Some(instance) => $arg::from_instance(instance)?,
                                None => return Err(DiError::TypeMismatch(std::any::type_name::<$arg>())),
                            };
                        )*
                        Ok((self)($($var),*))
                    }),
                }
            }
        }
    };
}

impl_into_constructor!();
impl_into_constructor!(A1 => a1);
impl_into_constructor!(A1 => a1, A2 => a2);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6, A7 => a7);
impl_into_constructor!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6, A7 => a7, A8 => a8);

pub(crate) struct ErasedConstructor {
    pub(crate) params: Vec<Parameter>,
    invoke: Box<dyn Fn(&[Instance]) -> DiResult<Instance> + Send + Sync>,
}

impl ErasedConstructor {
    pub(crate) fn invoke(&self, args: &[Instance]) -> DiResult<Instance> {
        (self.invoke)(args)
    }
}

/// Type-erased recipe for building one concrete type.
pub struct Activator {
    pub(crate) concrete: TypeKey,
    pub(crate) ancestors: Vec<TypeKey>,
    pub(crate) constructors: Vec<ErasedConstructor>,
}

impl Activator {
    pub(crate) fn of<T: Injectable>() -> Activator {
        Activator {
            concrete: TypeKey::of::<T>(),
            ancestors: T::ancestors(),
            constructors: T::constructors().into_iter().map(Constructor::erase).collect(),
        }
    }
}

impl fmt::Debug for Activator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activator")
            .field("concrete", &self.concrete.type_name())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
