//! Resolution: binding selection, constructor selection and recursive
//! activation.

use std::sync::Arc;
use std::time::Instant;

use super::{ContainerInner, ResolverContext};
use crate::arguments::Arguments;
use crate::binding::{Binding, Registry, Target};
use crate::error::{DiError, DiResult};
use crate::injectable::{Activator, ErasedConstructor, Parameter};
use crate::instance::Instance;
use crate::internal::{Frame, InjectionChain};
use crate::key::TypeKey;
use crate::scope::Scope;

type Fallback = Option<fn() -> Activator>;

impl ContainerInner {
    /// Resolves `key` on top of `chain`. `arguments` only apply to the
    /// constructor of `key` itself; `fallback` builds `key` when nothing is
    /// bound to it.
    pub(crate) fn resolve(
        &self,
        chain: &mut InjectionChain,
        key: TypeKey,
        arguments: &Arguments,
        fallback: Fallback,
    ) -> DiResult<Instance> {
        if !self.observers.has_observers() {
            return self.resolve_uninstrumented(chain, key, arguments, fallback);
        }

        let start = Instant::now();
        self.observers.resolving(key, chain.depth());
        let result = self.resolve_uninstrumented(chain, key, arguments, fallback);
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(err) => self.observers.resolution_failed(key, err),
        }
        result
    }

    fn resolve_uninstrumented(
        &self,
        chain: &mut InjectionChain,
        key: TypeKey,
        arguments: &Arguments,
        fallback: Fallback,
    ) -> DiResult<Instance> {
        self.ensure_live()?;
        chain.check(key)?;

        let binding = self.with_registry(|registry| registry.find(key, chain.requester()))?;
        if let Some(binding) = binding {
            return self.activate(chain, &binding, arguments);
        }

        match self.self_activator(key, fallback)? {
            Some(activator) => self.construct(chain, key, &activator, arguments),
            None => Err(DiError::UnresolvedType(key.type_name())),
        }
    }

    /// Activator used when no binding applies: a type the container already
    /// knows, or the one carried by the request. The latter is remembered.
    fn self_activator(
        &self,
        key: TypeKey,
        fallback: Fallback,
    ) -> DiResult<Option<Arc<Activator>>> {
        if !self.options.self_binding {
            return Ok(None);
        }

        let known = self.with_registry(|registry| registry.constructible(key))?;
        if known.is_some() {
            return Ok(known);
        }

        let activator = match fallback {
            Some(activator) => Arc::new(activator()),
            None => return Ok(None),
        };
        if activator.concrete != key {
            return Ok(None);
        }

        let mut registry = self.registry.write();
        self.ensure_live()?;
        registry.remember(activator.clone());
        Ok(Some(activator))
    }

    fn activate(
        &self,
        chain: &mut InjectionChain,
        binding: &Binding,
        arguments: &Arguments,
    ) -> DiResult<Instance> {
        match binding.scope() {
            Scope::Singleton => {
                let instance = binding
                    .slot()
                    .get_or_try_init(|| self.build(chain, binding, arguments))?;
                // The slot of a binding released by dispose stays private.
                self.ensure_live()?;
                Ok(instance)
            }
            Scope::Transient => self.build(chain, binding, arguments),
        }
    }

    fn build(
        &self,
        chain: &mut InjectionChain,
        binding: &Binding,
        arguments: &Arguments,
    ) -> DiResult<Instance> {
        let requested = binding.requested();
        match binding.target() {
            Target::SelfType(activator) => self.construct(chain, requested, activator, arguments),
            Target::Type { activator, upcast } => {
                let concrete = self.construct(chain, requested, activator, arguments)?;
                upcast(&concrete)
            }
            Target::Factory(factory) => chain.enter(Frame::factory(requested), |chain| {
                let ctx = ResolverContext::new(self, chain);
                (factory)(&ctx)
            }),
        }
    }

    /// Builds `activator.concrete` for a request of `requested`.
    fn construct(
        &self,
        chain: &mut InjectionChain,
        requested: TypeKey,
        activator: &Activator,
        arguments: &Arguments,
    ) -> DiResult<Instance> {
        if activator.concrete != requested {
            chain.check_concrete(requested, activator.concrete)?;
        }

        let frame = Frame {
            requested,
            concrete: activator.concrete,
            ancestors: activator.ancestors.clone(),
        };

        chain.enter(frame, |chain| {
            let constructor = self.select_constructor(chain, activator, arguments)?;

            let mut values = Vec::with_capacity(constructor.params.len());
            for param in &constructor.params {
                let key = param.type_key();
                let value = match arguments.find(key) {
                    Some(argument) => argument.instance().clone(),
                    None => self.resolve(chain, key, &Arguments::new(), param.activator())?,
                };
                values.push(value);
            }

            constructor.invoke(&values)
        })
    }

    /// Picks the satisfiable constructor with the most parameters.
    ///
    /// Must run with the frame of the type being built on top of `chain`, so
    /// contextual bindings see the right requester.
    fn select_constructor<'c>(
        &self,
        chain: &InjectionChain,
        activator: &'c Activator,
        arguments: &Arguments,
    ) -> DiResult<&'c ErasedConstructor> {
        let registry = self.registry.read();
        self.ensure_live()?;
        let requester = chain.requester();

        let mut best: Option<&ErasedConstructor> = None;
        let mut tied = false;
        for constructor in &activator.constructors {
            let satisfiable = constructor
                .params
                .iter()
                .all(|param| self.can_supply(&registry, param, requester, arguments));
            if !satisfiable {
                continue;
            }

            match best {
                Some(current) if current.params.len() > constructor.params.len() => {}
                Some(current) if current.params.len() == constructor.params.len() => tied = true,
                _ => {
                    best = Some(constructor);
                    tied = false;
                }
            }
        }
        drop(registry);

        let name = activator.concrete.type_name();
        match best {
            None => Err(DiError::UnsatisfiableConstructor(name)),
            Some(constructor) if tied => {
                Err(DiError::AmbiguousConstructor(name, constructor.params.len()))
            }
            Some(constructor) => Ok(constructor),
        }
    }

    /// Shallow check: an argument, an applicable binding, or a way to build
    /// the parameter type directly. Nested dependencies are not inspected.
    fn can_supply(
        &self,
        registry: &Registry,
        param: &Parameter,
        requester: Option<&Frame>,
        arguments: &Arguments,
    ) -> bool {
        let key = param.type_key();
        if arguments.find(key).is_some() || registry.has_applicable(key, requester) {
            return true;
        }
        self.options.self_binding && (param.is_constructible() || registry.is_constructible(key))
    }
}
