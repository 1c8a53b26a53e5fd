//! Disposal trait for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this for services that need structured teardown (flushing
/// buffers, closing connections). Hooks registered through
/// [`ResolverContext::register_disposer`](crate::ResolverContext::register_disposer)
/// run in LIFO order when the container is disposed.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{Container, Dispose, IocContainer, ReadOnlyIocContainer, RegistrarCore, Scope};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Connection {
///     closed: AtomicBool,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&self) {
///         self.closed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// let container = Container::new();
/// container
///     .register_factory::<Connection, _>(
///         |ctx| {
///             let connection = Arc::new(Connection { closed: AtomicBool::new(false) });
///             ctx.register_disposer(connection.clone());
///             Ok(connection)
///         },
///         Scope::Singleton,
///     )
///     .unwrap();
///
/// let connection = container.resolve::<Connection>().unwrap();
/// container.dispose();
/// assert!(connection.closed.load(Ordering::SeqCst));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}
