//! Diagnostic observers for resolution and registration events.
//!
//! Observers are called synchronously from inside the container. Keep
//! implementations cheap; queue expensive work elsewhere.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::descriptors::BindingDescriptor;
use crate::error::DiError;
use crate::internal::RwLock;
use crate::key::TypeKey;

/// Observer trait for container events.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{Container, DiError, ResolutionObserver, TypeKey};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct Trace;
///
/// impl ResolutionObserver for Trace {
///     fn resolving(&self, key: TypeKey, depth: usize) {
///         println!("{:indent$}resolving {}", "", key.short_name(), indent = depth * 2);
///     }
///
///     fn resolved(&self, key: TypeKey, duration: Duration) {
///         println!("resolved {} in {:?}", key.short_name(), duration);
///     }
///
///     fn resolution_failed(&self, key: TypeKey, error: &DiError) {
///         eprintln!("failed {}: {}", key.short_name(), error);
///     }
/// }
///
/// let container = Container::new();
/// container.add_observer(Arc::new(Trace));
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a type is looked up. `depth` is the number of types
    /// already under construction in this call.
    fn resolving(&self, key: TypeKey, depth: usize);

    /// Called after a type was produced.
    fn resolved(&self, key: TypeKey, duration: Duration);

    /// Called when resolving a type failed. Nested failures are reported at
    /// every level they propagate through.
    fn resolution_failed(&self, key: TypeKey, error: &DiError);

    /// Called after a binding was registered.
    fn bound(&self, _descriptor: &BindingDescriptor) {}

    /// Called once when the container is disposed.
    fn disposed(&self, _released_bindings: usize) {}
}

/// The observers attached to one container.
#[derive(Default)]
pub(crate) struct Observers {
    active: AtomicBool,
    list: RwLock<Vec<Arc<dyn ResolutionObserver>>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self, observer: Arc<dyn ResolutionObserver>) {
        self.list.write().push(observer);
        self.active.store(true, Ordering::Release);
    }

    #[inline(always)]
    pub(crate) fn has_observers(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn each(&self, f: impl Fn(&dyn ResolutionObserver)) {
        if !self.has_observers() {
            return;
        }
        // Clone the list so observers may resolve from the container.
        let list: Vec<_> = self.list.read().clone();
        for observer in &list {
            f(observer.as_ref());
        }
    }

    pub(crate) fn resolving(&self, key: TypeKey, depth: usize) {
        self.each(|o| o.resolving(key, depth));
    }

    pub(crate) fn resolved(&self, key: TypeKey, duration: Duration) {
        self.each(|o| o.resolved(key, duration));
    }

    pub(crate) fn resolution_failed(&self, key: TypeKey, error: &DiError) {
        self.each(|o| o.resolution_failed(key, error));
    }

    pub(crate) fn bound(&self, descriptor: &BindingDescriptor) {
        self.each(|o| o.bound(descriptor));
    }

    pub(crate) fn disposed(&self, released_bindings: usize) {
        self.each(|o| o.disposed(released_bindings));
    }
}

/// Observer that writes events to stdout (and failures to stderr).
///
/// Useful during development. For production use, consider the
/// `TracingObserver` (feature `tracing`) or a custom observer that integrates
/// with your logging stack.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::with_prefix("[app]")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a logging observer with the default `[ioc]` prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ioc]".to_string(),
        }
    }

    /// Creates a logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn resolving(&self, key: TypeKey, depth: usize) {
        println!("{} {:indent$}Resolving: {}", self.prefix, "", key.short_name(), indent = depth * 2);
    }

    fn resolved(&self, key: TypeKey, duration: Duration) {
        println!("{} Resolved: {} in {:?}", self.prefix, key.short_name(), duration);
    }

    fn resolution_failed(&self, key: TypeKey, error: &DiError) {
        eprintln!("{} FAILED {}: {}", self.prefix, key.short_name(), error);
    }

    fn bound(&self, descriptor: &BindingDescriptor) {
        println!("{} Bound: {}", self.prefix, descriptor);
    }

    fn disposed(&self, released_bindings: usize) {
        println!("{} Disposed ({} bindings released)", self.prefix, released_bindings);
    }
}

/// Observer that counts resolutions, failures and time spent.
///
/// ```
/// use ioc_abstractions::{Constructor, Container, Injectable, MetricsObserver, ReadOnlyIocContainer};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::new(|| Clock)] }
/// }
///
/// let metrics = Arc::new(MetricsObserver::new());
/// let container = Container::new();
/// container.add_observer(metrics.clone());
///
/// container.get_instance::<Clock>().unwrap();
/// assert_eq!(metrics.resolution_count(), 1);
/// assert_eq!(metrics.failure_count(), 0);
/// ```
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    failure_count: AtomicU64,
    binding_count: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            resolution_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            binding_count: AtomicU64::new(0),
            total_resolution_nanos: AtomicU64::new(0),
        }
    }

    /// Gets the number of successful resolutions, nested ones included.
    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn binding_count(&self) -> u64 {
        self.binding_count.load(Ordering::Relaxed)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_nanos.load(Ordering::Relaxed))
    }

    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        let total = self.total_resolution_nanos.load(Ordering::Relaxed);
        Some(Duration::from_nanos(total / count))
    }

    /// Resets all counters.
    pub fn reset(&self) {
        self.resolution_count.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.binding_count.store(0, Ordering::Relaxed);
        self.total_resolution_nanos.store(0, Ordering::Relaxed);
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for MetricsObserver {
    fn resolving(&self, _key: TypeKey, _depth: usize) {}

    fn resolved(&self, _key: TypeKey, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_resolution_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn resolution_failed(&self, _key: TypeKey, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    fn bound(&self, _descriptor: &BindingDescriptor) {
        self.binding_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Observer that emits `tracing` events under the `ioc_abstractions` target.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl ResolutionObserver for TracingObserver {
    fn resolving(&self, key: TypeKey, depth: usize) {
        tracing::trace!(target: "ioc_abstractions", service = key.type_name(), depth, "resolving");
    }

    fn resolved(&self, key: TypeKey, duration: Duration) {
        tracing::debug!(
            target: "ioc_abstractions",
            service = key.type_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: TypeKey, error: &DiError) {
        tracing::warn!(target: "ioc_abstractions", service = key.type_name(), %error, "resolution failed");
    }

    fn bound(&self, descriptor: &BindingDescriptor) {
        tracing::debug!(
            target: "ioc_abstractions",
            requested = descriptor.type_name(),
            implementation = descriptor.implementation_name().unwrap_or("<factory>"),
            scope = %descriptor.scope,
            conditional = descriptor.is_conditional(),
            "bound"
        );
    }

    fn disposed(&self, released_bindings: usize) {
        tracing::info!(target: "ioc_abstractions", released_bindings, "container disposed");
    }
}
