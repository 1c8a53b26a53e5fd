//! The built-in container implementing the facade traits.
//!
//! [`Container`] owns the binding registry, the singleton slots embedded in
//! each binding, and the disposal hooks registered by factories. Handles are
//! cheap to clone and share one state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::binding::{Binding, Registry};
use crate::config::ContainerOptions;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::{DisposeBag, InjectionChain, Mutex, RwLock};
use crate::observer::{Observers, ResolutionObserver};
use crate::traits::{RegistrarCore, Request, ResolverCore};

mod context;
mod resolver;

pub use context::ResolverContext;

/// Dependency-injection container.
///
/// Registration and resolution go through the [`IocContainer`] and
/// [`ReadOnlyIocContainer`] traits, so code configured against the facade
/// works with any backend.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync`. Registry lookups take a read lock that is
/// released before any constructor runs, and nothing waits on a singleton
/// slot while holding it. Singleton construction is serialized per binding.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{implements, Arguments, Constructor, Container, Injectable,
///     IocContainer, ReadOnlyIocContainer, Scope, When};
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
/// implements!(Car => dyn Vehicle);
///
/// struct Person {
///     name: Option<Arc<String>>,
///     vehicle: Arc<dyn Vehicle>,
/// }
///
/// impl Injectable for Person {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![
///             Constructor::new(|vehicle: Arc<dyn Vehicle>| Person { name: None, vehicle }),
///             Constructor::new(|name: Arc<String>, vehicle: Arc<dyn Vehicle>| Person {
///                 name: Some(name),
///                 vehicle,
///             }),
///         ]
///     }
/// }
///
/// let container = Container::new();
/// container.register_type_to::<dyn Vehicle, Car>(Scope::Singleton).unwrap();
///
/// let anonymous = container.get_instance::<Person>().unwrap();
/// assert!(anonymous.name.is_none());
///
/// let bob = container
///     .get_instance_with::<Person>(Arguments::new().with("Bob".to_string()))
///     .unwrap();
/// assert_eq!(bob.name.as_deref().map(String::as_str), Some("Bob"));
/// assert!(Arc::ptr_eq(&anonymous.vehicle, &bob.vehicle));
/// ```
///
/// [`IocContainer`]: crate::IocContainer
/// [`ReadOnlyIocContainer`]: crate::ReadOnlyIocContainer
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: RwLock<Registry>,
    disposers: Mutex<DisposeBag>,
    disposed: AtomicBool,
    observers: Observers,
    options: ContainerOptions,
}

impl Container {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container with the given options.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                disposers: Mutex::new(DisposeBag::default()),
                disposed: AtomicBool::new(false),
                observers: Observers::new(),
                options,
            }),
        }
    }

    pub fn options(&self) -> ContainerOptions {
        self.inner.options
    }

    /// Attaches an observer. Observers see every later registration and
    /// resolution, nested resolutions included.
    pub fn add_observer(&self, observer: Arc<dyn ResolutionObserver>) {
        self.inner.observers.add(observer);
    }

    /// Snapshot of all bindings in registration order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        // Slots are inspected after the registry lock is released.
        let bindings: Vec<Arc<Binding>> = self.inner.registry.read().iter().cloned().collect();
        let mut descriptors: Vec<_> = bindings.iter().map(|b| b.descriptor()).collect();
        descriptors.sort_by_key(|d| d.sequence);
        descriptors
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.inner.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable dump of the binding registry.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str(&format!(
            "Options: max_depth={}, self_binding={}\n",
            self.inner.options.max_depth, self.inner.options.self_binding
        ));
        if self.inner.is_disposed() {
            s.push_str("State: disposed\n");
        }
        s.push_str("Bindings:\n");
        for descriptor in self.descriptors() {
            s.push_str(&format!("  #{} {}", descriptor.sequence, descriptor));
            if descriptor.has_instance {
                s.push_str(" [cached]");
            }
            s.push('\n');
        }
        s
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.len())
            .field("disposed", &self.is_disposed())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_request(&self, request: Request) -> DiResult<Instance> {
        let (key, arguments, activator) = request.into_parts();
        let mut chain = InjectionChain::new(self.inner.options.max_depth);
        self.inner.resolve(&mut chain, key, &arguments, activator)
    }
}

impl RegistrarCore for Container {
    fn bind(&self, binding: Binding) -> DiResult<()> {
        self.inner.bind(binding)
    }

    fn dispose(&self) {
        self.inner.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl ContainerInner {
    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_live(&self) -> DiResult<()> {
        if self.is_disposed() {
            return Err(DiError::ContainerDisposed);
        }
        Ok(())
    }

    /// Runs `f` over the registry, or fails with `ContainerDisposed`.
    ///
    /// `dispose` flips the flag under the write lock, so a reader that sees
    /// the container live under the read lock also sees every binding.
    pub(crate) fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> DiResult<R> {
        let registry = self.registry.read();
        self.ensure_live()?;
        Ok(f(&registry))
    }

    fn bind(&self, binding: Binding) -> DiResult<()> {
        let mut registry = self.registry.write();
        // Checked under the write lock so a concurrent dispose cannot miss it.
        self.ensure_live()?;
        let binding = registry.insert(binding);
        drop(registry);

        if self.observers.has_observers() {
            self.observers.bound(&binding.descriptor());
        }
        Ok(())
    }

    /// Queues a disposal hook. Runs it right away when the container is
    /// already disposed.
    pub(crate) fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        let mut bag = self.disposers.lock();
        if self.is_disposed() {
            drop(bag);
            hook();
            return;
        }
        bag.push(hook);
    }

    fn dispose(&self) {
        let released = {
            let mut registry = self.registry.write();
            if self.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
            registry.take()
        };

        let mut hooks = self.disposers.lock().take();
        hooks.run_all_reverse();

        let count = released.len();
        // Singletons are dropped here, outside every lock.
        drop(released);
        self.observers.disposed(count);
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        self.dispose();
    }
}
