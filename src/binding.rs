//! Binding rules and the registry that selects among them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::container::ResolverContext;
use crate::descriptors::{BindingDescriptor, TargetKind};
use crate::error::DiResult;
use crate::injectable::{Activator, Implements, Injectable};
use crate::instance::Instance;
use crate::internal::Frame;
use crate::key::TypeKey;
use crate::scope::Scope;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

#[cfg(feature = "ahash")]
type Map<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
type Map<K, V> = HashMap<K, V>;

pub(crate) type Factory =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<Instance> + Send + Sync>;

type Upcast = fn(&Instance) -> DiResult<Instance>;

fn upcast_instance<T, U>(instance: &Instance) -> DiResult<Instance>
where
    T: ?Sized + Send + Sync + 'static,
    U: Injectable + Implements<T>,
{
    let concrete = instance.downcast::<U>()?;
    Ok(Instance::new(<U as Implements<T>>::upcast(concrete)))
}

/// Condition restricting a binding to one injection site.
///
/// `When::injected_into::<X>()` applies while constructing `X` or any type
/// that lists `X` among its [`Injectable::ancestors`] (or was requested as
/// `X`); `When::injected_exactly_into::<X>()` applies only while constructing
/// `X` itself.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{When, TypeKey};
///
/// struct Garage;
///
/// let when = When::injected_exactly_into::<Garage>();
/// assert!(when.is_exact());
/// assert_eq!(when.target(), TypeKey::of::<Garage>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct When {
    target: TypeKey,
    exact: bool,
}

impl When {
    pub fn new(target: TypeKey, exact: bool) -> Self {
        Self { target, exact }
    }

    pub fn injected_into<X: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<X>(), false)
    }

    pub fn injected_exactly_into<X: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<X>(), true)
    }

    pub fn target(&self) -> TypeKey {
        self.target
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    fn matches(&self, requester: &Frame) -> bool {
        if self.exact {
            requester.concrete == self.target
        } else {
            requester.is_a(self.target)
        }
    }
}

impl fmt::Display for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "when injected exactly into {}", self.target)
        } else {
            write!(f, "when injected into {}", self.target)
        }
    }
}

pub(crate) enum Target {
    /// Requested type constructs itself
    SelfType(Arc<Activator>),
    /// A different concrete type, upcast to the requested one
    Type { activator: Arc<Activator>, upcast: Upcast },
    Factory(Factory),
}

/// Singleton storage embedded in each binding.
///
/// Reads of a populated slot never wait on a running construction.
pub(crate) struct SingletonSlot {
    #[cfg(feature = "once-cell")]
    cell: OnceCell<Instance>,
    #[cfg(not(feature = "once-cell"))]
    value: crate::internal::RwLock<Option<Instance>>,
    #[cfg(not(feature = "once-cell"))]
    init: crate::internal::Mutex<()>,
}

impl SingletonSlot {
    fn new() -> Self {
        Self {
            #[cfg(feature = "once-cell")]
            cell: OnceCell::new(),
            #[cfg(not(feature = "once-cell"))]
            value: crate::internal::RwLock::new(None),
            #[cfg(not(feature = "once-cell"))]
            init: crate::internal::Mutex::new(()),
        }
    }

    /// Returns the stored instance or builds it. Construction is serialized
    /// per slot.
    pub(crate) fn get_or_try_init<F>(&self, init: F) -> DiResult<Instance>
    where
        F: FnOnce() -> DiResult<Instance>,
    {
        #[cfg(feature = "once-cell")]
        {
            self.cell.get_or_try_init(init).cloned()
        }

        #[cfg(not(feature = "once-cell"))]
        {
            if let Some(value) = self.get() {
                return Ok(value);
            }
            let _building = self.init.lock();
            if let Some(value) = self.get() {
                return Ok(value);
            }
            let value = init()?;
            *self.value.write() = Some(value.clone());
            Ok(value)
        }
    }

    #[cfg(not(feature = "once-cell"))]
    fn get(&self) -> Option<Instance> {
        self.value.read().as_ref().cloned()
    }

    pub(crate) fn is_initialized(&self) -> bool {
        #[cfg(feature = "once-cell")]
        {
            self.cell.get().is_some()
        }

        #[cfg(not(feature = "once-cell"))]
        {
            self.value.read().is_some()
        }
    }
}

/// One registration rule: requested type, construction strategy, scope and
/// optional injection-site condition.
///
/// Bindings are immutable once handed to the container. The builder methods
/// mirror the registration calls of [`IocContainer`](crate::IocContainer).
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{implements, Binding, Constructor, Container, Injectable,
///     ReadOnlyIocContainer, RegistrarCore, Scope, When};
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
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|| Car)]
///     }
/// }
/// implements!(Car => dyn Vehicle);
///
/// let container = Container::new();
/// container
///     .bind(Binding::to::<dyn Vehicle, Car>().in_scope(Scope::Singleton))
///     .unwrap();
///
/// let vehicle = container.resolve::<dyn Vehicle>().unwrap();
/// assert_eq!(vehicle.name(), "car");
/// ```
pub struct Binding {
    requested: TypeKey,
    target: Target,
    scope: Scope,
    condition: Option<When>,
    sequence: u64,
    slot: SingletonSlot,
}

impl Binding {
    fn with_target(requested: TypeKey, target: Target) -> Self {
        Self {
            requested,
            target,
            scope: Scope::Transient,
            condition: None,
            sequence: 0,
            slot: SingletonSlot::new(),
        }
    }

    /// Binds `T` to its own constructors.
    pub fn to_self<T: Injectable>() -> Self {
        Self::with_target(TypeKey::of::<T>(), Target::SelfType(Arc::new(Activator::of::<T>())))
    }

    /// Binds `T` to the concrete type `U`.
    pub fn to<T, U>() -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        U: Injectable + Implements<T>,
    {
        Self::with_target(
            TypeKey::of::<T>(),
            Target::Type {
                activator: Arc::new(Activator::of::<U>()),
                upcast: upcast_instance::<T, U>,
            },
        )
    }

    /// Binds `T` to a factory. The factory result is returned as is.
    pub fn to_factory<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        let factory: Factory =
            Arc::new(move |ctx: &ResolverContext<'_>| factory(ctx).map(Instance::new));
        Self::with_target(TypeKey::of::<T>(), Target::Factory(factory))
    }

    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn when(mut self, condition: When) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn requested(&self) -> TypeKey {
        self.requested
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn condition(&self) -> Option<When> {
        self.condition
    }

    /// Registration order within the owning container.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) fn slot(&self) -> &SingletonSlot {
        &self.slot
    }

    /// Precedence tier for the given requester, `None` when not applicable.
    /// 3 = exact condition, 2 = condition, 1 = unconditional.
    pub(crate) fn tier(&self, requester: Option<&Frame>) -> Option<u8> {
        match (&self.condition, requester) {
            (None, _) => Some(1),
            (Some(_), None) => None,
            (Some(when), Some(frame)) if when.matches(frame) => {
                Some(if when.is_exact() { 3 } else { 2 })
            }
            (Some(_), Some(_)) => None,
        }
    }

    pub(crate) fn activator(&self) -> Option<&Arc<Activator>> {
        match &self.target {
            Target::SelfType(activator) | Target::Type { activator, .. } => Some(activator),
            Target::Factory(_) => None,
        }
    }

    pub fn descriptor(&self) -> BindingDescriptor {
        let (target, implementation) = match &self.target {
            Target::SelfType(a) => (TargetKind::SelfType, Some(a.concrete)),
            Target::Type { activator, .. } => (TargetKind::Type, Some(activator.concrete)),
            Target::Factory(_) => (TargetKind::Factory, None),
        };
        BindingDescriptor {
            requested: self.requested,
            target,
            implementation,
            scope: self.scope,
            condition: self.condition,
            sequence: self.sequence,
            has_instance: self.scope == Scope::Singleton && self.slot.is_initialized(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("requested", &self.requested.type_name())
            .field("scope", &self.scope)
            .field("condition", &self.condition)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Binding registry plus the catalog of concrete types the container has
/// seen and may construct without a binding.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: Map<TypeKey, Vec<Arc<Binding>>>,
    catalog: Map<TypeKey, Arc<Activator>>,
    next_sequence: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a binding; earlier bindings for the same type are kept.
    pub(crate) fn insert(&mut self, mut binding: Binding) -> Arc<Binding> {
        self.next_sequence += 1;
        binding.sequence = self.next_sequence;

        if let Some(activator) = binding.activator() {
            self.catalog
                .entry(activator.concrete)
                .or_insert_with(|| activator.clone());
        }

        let binding = Arc::new(binding);
        self.bindings
            .entry(binding.requested)
            .or_default()
            .push(binding.clone());
        binding
    }

    /// Most specific applicable binding for `key`; the latest wins within a tier.
    pub(crate) fn find(&self, key: TypeKey, requester: Option<&Frame>) -> Option<Arc<Binding>> {
        let candidates = self.bindings.get(&key)?;
        let mut best: Option<(u8, &Arc<Binding>)> = None;
        for binding in candidates.iter().rev() {
            let Some(tier) = binding.tier(requester) else {
                continue;
            };
            if best.map_or(true, |(current, _)| tier > current) {
                best = Some((tier, binding));
            }
            if tier == 3 {
                break;
            }
        }
        best.map(|(_, binding)| binding.clone())
    }

    pub(crate) fn has_applicable(&self, key: TypeKey, requester: Option<&Frame>) -> bool {
        self.bindings
            .get(&key)
            .map_or(false, |list| list.iter().any(|b| b.tier(requester).is_some()))
    }

    pub(crate) fn remember(&mut self, activator: Arc<Activator>) {
        self.catalog.entry(activator.concrete).or_insert(activator);
    }

    pub(crate) fn constructible(&self, key: TypeKey) -> Option<Arc<Activator>> {
        self.catalog.get(&key).cloned()
    }

    pub(crate) fn is_constructible(&self, key: TypeKey) -> bool {
        self.catalog.contains_key(&key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<Binding>> {
        self.bindings.values().flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Moves every binding (and with them every singleton) and the catalog
    /// out, leaving the registry empty.
    pub(crate) fn take(&mut self) -> Registry {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injectable::Constructor;

    struct Owner;
    struct Other;

    struct Thing;
    impl Injectable for Thing {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|| Thing)]
        }
    }

    fn frame<T: 'static>() -> Frame {
        Frame {
            requested: TypeKey::of::<T>(),
            concrete: TypeKey::of::<T>(),
            ancestors: Vec::new(),
        }
    }

    #[test]
    fn later_unconditional_binding_wins() {
        let mut registry = Registry::new();
        let first = registry.insert(Binding::to_self::<Thing>());
        let second = registry.insert(Binding::to_self::<Thing>());
        assert!(first.sequence() < second.sequence());

        let found = registry.find(TypeKey::of::<Thing>(), None).unwrap();
        assert!(Arc::ptr_eq(&found, &second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tiers_rank_exact_over_contextual_over_unconditional() {
        let mut registry = Registry::new();
        let exact = registry.insert(
            Binding::to_self::<Thing>().when(When::injected_exactly_into::<Owner>()),
        );
        let contextual =
            registry.insert(Binding::to_self::<Thing>().when(When::injected_into::<Owner>()));
        let plain = registry.insert(Binding::to_self::<Thing>());

        let key = TypeKey::of::<Thing>();
        let owner = frame::<Owner>();
        assert!(Arc::ptr_eq(&registry.find(key, Some(&owner)).unwrap(), &exact));
        assert!(Arc::ptr_eq(&registry.find(key, Some(&frame::<Other>())).unwrap(), &plain));
        assert!(Arc::ptr_eq(&registry.find(key, None).unwrap(), &plain));

        let derived = Frame {
            requested: TypeKey::of::<Other>(),
            concrete: TypeKey::of::<Other>(),
            ancestors: vec![TypeKey::of::<Owner>()],
        };
        assert!(Arc::ptr_eq(&registry.find(key, Some(&derived)).unwrap(), &contextual));
    }

    #[test]
    fn conditional_only_bindings_do_not_apply_at_top_level() {
        let mut registry = Registry::new();
        registry.insert(Binding::to_self::<Thing>().when(When::injected_into::<Owner>()));
        assert!(registry.find(TypeKey::of::<Thing>(), None).is_none());
        assert!(!registry.has_applicable(TypeKey::of::<Thing>(), None));
        assert!(registry.has_applicable(TypeKey::of::<Thing>(), Some(&frame::<Owner>())));
    }

    #[test]
    fn slot_state_is_readable_while_construction_runs() {
        use std::sync::Barrier;
        use std::thread;

        let slot = Arc::new(SingletonSlot::new());
        let started = Arc::new(Barrier::new(2));
        let finish = Arc::new(Barrier::new(2));

        let builder = {
            let (slot, started, finish) = (slot.clone(), started.clone(), finish.clone());
            thread::spawn(move || {
                slot.get_or_try_init(|| {
                    started.wait();
                    finish.wait();
                    Ok(Instance::new(Arc::new(Thing)))
                })
                .unwrap()
            })
        };

        started.wait();
        assert!(!slot.is_initialized());
        finish.wait();
        let built = builder.join().unwrap();

        assert!(slot.is_initialized());
        let hit = thread::spawn({
            let slot = slot.clone();
            move || slot.get_or_try_init(|| panic!("populated slot rebuilt")).unwrap()
        })
        .join()
        .unwrap();
        assert!(hit.ptr_eq(&built));
    }

    #[test]
    fn bound_concrete_types_enter_the_catalog() {
        let mut registry = Registry::new();
        assert!(!registry.is_constructible(TypeKey::of::<Thing>()));
        registry.insert(Binding::to_self::<Thing>());
        assert!(registry.is_constructible(TypeKey::of::<Thing>()));

        let taken = registry.take();
        assert!(!registry.is_constructible(TypeKey::of::<Thing>()));
        assert_eq!(registry.len(), 0);
        assert_eq!(taken.len(), 1);
    }
}
