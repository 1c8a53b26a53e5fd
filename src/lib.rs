//! # ioc-abstractions
//!
//! A small inversion-of-control facade with a built-in container.
//!
//! Application code is written against the [`IocContainer`] and
//! [`ReadOnlyIocContainer`] traits; [`Container`] is the implementation that
//! ships with the crate.
//!
//! ## Features
//!
//! - **Constructor selection**: the satisfiable constructor with the most
//!   parameters wins, ties are reported instead of guessed
//! - **Contextual bindings**: bind a contract differently depending on which
//!   type it is injected into
//! - **Scopes**: transient and singleton bindings
//! - **Explicit arguments**: pass values for constructor parameters at the
//!   call site
//! - **Cycle detection**: dependency cycles fail with the full path
//! - **Thread-safe**: `Container` is `Send + Sync` and cheap to clone
//!
//! ## Quick Start
//!
//! ```rust
//! use ioc_abstractions::{implements, Constructor, Container, Injectable,
//!     IocContainer, ReadOnlyIocContainer, Scope, TypeKey, When};
//! use std::sync::Arc;
//!
//! trait Vehicle: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! struct Car;
//! impl Vehicle for Car {
//!     fn name(&self) -> &'static str { "car" }
//! }
//! impl Injectable for Car {
//!     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|| Car)] }
//! }
//!
//! struct Motorcycle;
//! impl Vehicle for Motorcycle {
//!     fn name(&self) -> &'static str { "motorcycle" }
//! }
//! impl Injectable for Motorcycle {
//!     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|| Motorcycle)] }
//! }
//!
//! implements!(Car => dyn Vehicle);
//! implements!(Motorcycle => dyn Vehicle);
//!
//! struct Person {
//!     vehicle: Arc<dyn Vehicle>,
//! }
//! impl Injectable for Person {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| Person { vehicle })]
//!     }
//! }
//!
//! struct SuperCoolPerson {
//!     vehicle: Arc<dyn Vehicle>,
//! }
//! impl Injectable for SuperCoolPerson {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| SuperCoolPerson { vehicle })]
//!     }
//!
//!     fn ancestors() -> Vec<TypeKey> {
//!         vec![TypeKey::of::<Person>()]
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
//! container
//!     .register_type_to_when::<dyn Vehicle, Motorcycle>(
//!         When::injected_into::<SuperCoolPerson>(),
//!         Scope::Transient,
//!     )
//!     .unwrap();
//!
//! let person = container.get_instance::<Person>().unwrap();
//! let cool = container.get_instance::<SuperCoolPerson>().unwrap();
//! assert_eq!(person.vehicle.name(), "car");
//! assert_eq!(cool.vehicle.name(), "motorcycle");
//! ```
//!
//! ## Scopes
//!
//! - **Transient**: a new instance on every resolution (default)
//! - **Singleton**: one instance per binding, released on [`dispose`](RegistrarCore::dispose)
//!
//! ## Constructors
//!
//! Rust has no runtime reflection, so constructible types implement
//! [`Injectable`] and list their constructors as closures. Parameters are
//! `Arc<T>` (served by bindings, explicit arguments, or types the container
//! already knows) or [`Inject<T>`] (additionally buildable on the spot).
//!
//! ## Feature flags
//!
//! - `diagnostics`: [`Container::to_debug_string`]
//! - `config`: serde support for [`ContainerOptions`] and [`Scope`]
//! - `tracing`: `TracingObserver`
//! - `parking-lot`, `ahash`, `smallvec`, `once-cell`: performance backends,
//!   all enabled by `performance`

pub mod arguments;
pub mod binding;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod injectable;
pub mod instance;
pub mod key;
pub mod observer;
pub mod scope;
pub mod traits;

mod internal;

pub use arguments::{Argument, Arguments};
pub use binding::{Binding, When};
pub use config::{ContainerOptions, DEFAULT_MAX_DEPTH};
pub use container::{Container, ResolverContext};
pub use descriptors::{BindingDescriptor, TargetKind};
pub use error::{DiError, DiResult};
pub use injectable::{Constructor, Dependency, Implements, Inject, Injectable, IntoConstructor, Parameter};
pub use instance::Instance;
pub use key::TypeKey;
pub use observer::{LoggingObserver, MetricsObserver, ResolutionObserver};
pub use scope::Scope;
pub use traits::{Dispose, IocContainer, ReadOnlyIocContainer, RegistrarCore, Request, ResolverCore};

#[cfg(feature = "tracing")]
pub use observer::TracingObserver;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }
    impl Injectable for English {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|| English)]
        }
    }
    crate::implements!(English => dyn Greeter);

    #[test]
    fn test_singleton_resolution() {
        let container = Container::new();
        container.register_type_to::<dyn Greeter, English>(Scope::Singleton).unwrap();

        let a = container.resolve::<dyn Greeter>().unwrap();
        let b = container.resolve::<dyn Greeter>().unwrap();
        assert_eq!(a.greet(), "hello");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_transient_resolution() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();

        let container = Container::new();
        container
            .register_factory::<String, _>(
                move |_| {
                    let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(Arc::new(format!("instance-{}", n)))
                },
                Scope::Transient,
            )
            .unwrap();

        let a = container.resolve::<String>().unwrap();
        let b = container.resolve::<String>().unwrap();
        assert_eq!(a.as_str(), "instance-1");
        assert_eq!(b.as_str(), "instance-2");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_facade_is_object_safe_at_the_core() {
        let container = Container::new();
        container.register_type::<English>(Scope::Transient).unwrap();

        let resolver: &dyn ResolverCore = &container;
        let instance = resolver.resolve_request(Request::of::<English>()).unwrap();
        assert!(instance.is::<English>());

        let registrar: &dyn RegistrarCore = &container;
        registrar.dispose();
        assert!(container.is_disposed());
    }

    #[test]
    fn test_unbound_trait_is_unresolved() {
        let container = Container::new();
        let err = container.resolve::<dyn Greeter>().err();
        assert_eq!(err, Some(DiError::UnresolvedType(std::any::type_name::<dyn Greeter>())));
    }
}
