//! Resolver context for factory functions.

use std::sync::Arc;

use super::ContainerInner;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::internal::{InjectionChain, Mutex};
use crate::key::TypeKey;
use crate::traits::{Dispose, Request, ResolverCore};

/// Context passed to factory functions for resolving dependencies.
///
/// Resolutions made through the context continue the current injection
/// chain: contextual bindings see the factory's type as the requester, and
/// cycles through the factory are detected.
///
/// # Examples
///
/// ```
/// use ioc_abstractions::{Container, IocContainer, ReadOnlyIocContainer, Scope};
/// use std::sync::Arc;
///
/// struct Settings {
///     url: String,
/// }
///
/// struct Client {
///     settings: Arc<Settings>,
/// }
///
/// let container = Container::new();
/// container
///     .register_factory::<Settings, _>(
///         |_| Ok(Arc::new(Settings { url: "postgres://localhost".to_string() })),
///         Scope::Singleton,
///     )
///     .unwrap();
/// container
///     .register_factory::<Client, _>(
///         |ctx| Ok(Arc::new(Client { settings: ctx.resolve::<Settings>()? })),
///         Scope::Transient,
///     )
///     .unwrap();
///
/// let client = container.resolve::<Client>().unwrap();
/// assert_eq!(client.settings.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    container: &'a ContainerInner,
    chain: Mutex<&'a mut InjectionChain>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a ContainerInner, chain: &'a mut InjectionChain) -> Self {
        Self {
            container,
            chain: Mutex::new(chain),
        }
    }

    /// Registers a service to be disposed with the container, in LIFO order.
    pub fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.container.push_disposer(Box::new(move || service.dispose()));
    }

    /// The type being produced by the running factory.
    pub fn requested(&self) -> Option<TypeKey> {
        self.chain.lock().requester().map(|frame| frame.requested)
    }

    /// The concrete type whose construction asked for the factory's product,
    /// `None` for a top-level request.
    pub fn requester(&self) -> Option<TypeKey> {
        self.chain.lock().parent().map(|frame| frame.concrete)
    }

    /// Number of types currently under construction, the factory's own
    /// type included.
    pub fn depth(&self) -> usize {
        self.chain.lock().depth()
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_request(&self, request: Request) -> DiResult<Instance> {
        let (key, arguments, activator) = request.into_parts();
        let mut chain = self.chain.lock();
        self.container.resolve(&mut **chain, key, &arguments, activator)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DiError;
    use crate::injectable::{Constructor, Injectable};
    use crate::key::TypeKey;
    use crate::traits::{IocContainer, ReadOnlyIocContainer};
    use crate::{Container, Scope};
    use std::sync::{Arc, Mutex};

    struct Host {
        label: Arc<String>,
    }
    impl Injectable for Host {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|label: Arc<String>| Host { label })]
        }
    }

    #[test]
    fn factory_sees_requester_and_depth() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let container = Container::new();
        container
            .register_factory::<String, _>(
                move |ctx| {
                    log.lock().unwrap().push((ctx.requested(), ctx.requester(), ctx.depth()));
                    Ok(Arc::new("label".to_string()))
                },
                Scope::Transient,
            )
            .unwrap();

        container.resolve::<String>().unwrap();
        let host = container.get_instance::<Host>().unwrap();
        assert_eq!(host.label.as_str(), "label");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (Some(TypeKey::of::<String>()), None, 1));
        assert_eq!(seen[1], (Some(TypeKey::of::<String>()), Some(TypeKey::of::<Host>()), 2));
    }

    #[test]
    fn factory_cycle_is_detected() {
        let container = Container::new();
        container
            .register_factory::<String, _>(|ctx| ctx.resolve::<String>(), Scope::Transient)
            .unwrap();

        let err = container.resolve::<String>().unwrap_err();
        assert!(matches!(err, DiError::CyclicDependency(ref path) if path.len() == 2));
    }
}
