//! Constructor selection and explicit arguments.

mod common;

use common::{Car, Motorcycle, NamedPerson, Vehicle};
use ioc_abstractions::{
    Argument, Arguments, Constructor, Container, DiError, Injectable, IocContainer,
    ReadOnlyIocContainer, Scope, TypeKey,
};
use std::sync::Arc;

fn container_with_car() -> Container {
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
}

#[test]
fn named_person_uses_longest_satisfiable_constructor() {
    let container = container_with_car();

    let bob = container
        .get_instance_with::<NamedPerson>(Arguments::new().with("Bob".to_string()))
        .unwrap();
    assert_eq!(bob.name.as_deref().map(String::as_str), Some("Bob"));
    assert_eq!(bob.to_string(), "Bob is driving a car.");

    let anonymous = container.get_instance::<NamedPerson>().unwrap();
    assert!(anonymous.name.is_none());
}

#[test]
fn bound_string_also_satisfies_the_longer_constructor() {
    let container = container_with_car();
    container
        .register_factory::<String, _>(|_| Ok(Arc::new("Alice".to_string())), Scope::Singleton)
        .unwrap();

    let alice = container.get_instance::<NamedPerson>().unwrap();
    assert_eq!(alice.name.as_deref().map(String::as_str), Some("Alice"));

    // Explicit arguments shadow the binding.
    let bob = container
        .get_instance_with::<NamedPerson>(Arguments::new().with("Bob".to_string()))
        .unwrap();
    assert_eq!(bob.name.as_deref().map(String::as_str), Some("Bob"));
}

#[test]
fn explicit_argument_shadows_binding_for_trait_objects() {
    let container = container_with_car();
    let motorcycle: Arc<dyn Vehicle> = Arc::new(Motorcycle);

    let person = container
        .get_instance_with::<NamedPerson>(Arguments::new().with_shared(motorcycle.clone()))
        .unwrap();
    assert!(Arc::ptr_eq(&person.vehicle, &motorcycle));
}

#[test]
fn first_matching_argument_covers_every_parameter_of_its_type() {
    struct Route {
        from: Arc<String>,
        to: Arc<String>,
    }

    impl Injectable for Route {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|from: Arc<String>, to: Arc<String>| Route { from, to })]
        }
    }

    let container = Container::new();
    let route = container
        .get_instance_with::<Route>(
            Arguments::new().with("Berlin".to_string()).with("Paris".to_string()),
        )
        .unwrap();
    assert_eq!(route.from.as_str(), "Berlin");
    assert_eq!(route.to.as_str(), "Berlin");
}

#[test]
fn unsatisfiable_when_no_constructor_qualifies() {
    let container = Container::new();
    let err = container.get_instance::<NamedPerson>().err();
    assert_eq!(
        err,
        Some(DiError::UnsatisfiableConstructor(std::any::type_name::<NamedPerson>()))
    );
}

#[test]
fn type_without_constructors_is_unsatisfiable() {
    struct Opaque;
    impl Injectable for Opaque {
        fn constructors() -> Vec<Constructor<Self>> {
            Vec::new()
        }
    }

    let container = Container::new();
    assert!(matches!(
        container.get_instance::<Opaque>(),
        Err(DiError::UnsatisfiableConstructor(_))
    ));
}

#[test]
fn equal_arity_constructors_are_ambiguous() {
    struct Ticket {
        label: String,
    }

    impl Injectable for Ticket {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![
                Constructor::new(|n: Arc<u32>| Ticket { label: format!("#{}", n) }),
                Constructor::new(|s: Arc<String>| Ticket { label: s.to_string() }),
            ]
        }
    }

    let container = Container::new();
    let both = Arguments::new().with(7u32).with("vip".to_string());
    let err = container.get_instance_with::<Ticket>(both).err();
    assert_eq!(err, Some(DiError::AmbiguousConstructor(std::any::type_name::<Ticket>(), 1)));

    // With only one of them the choice is clear.
    let numbered = container
        .get_instance_with::<Ticket>(Arguments::new().with(7u32))
        .unwrap();
    assert_eq!(numbered.label, "#7");
}

#[test]
fn longer_constructor_resolves_ambiguity_between_shorter_ones() {
    struct Badge {
        arity: usize,
    }

    impl Injectable for Badge {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![
                Constructor::new(|_n: Arc<u32>| Badge { arity: 1 }),
                Constructor::new(|_s: Arc<String>| Badge { arity: 1 }),
                Constructor::new(|_n: Arc<u32>, _s: Arc<String>| Badge { arity: 2 }),
            ]
        }
    }

    let container = Container::new();
    let badge = container
        .get_instance_with::<Badge>(Arguments::new().with(1u32).with("x".to_string()))
        .unwrap();
    assert_eq!(badge.arity, 2);
}

#[test]
fn untyped_resolution_with_arguments() {
    let container = container_with_car();
    let args: Arguments = vec![Argument::new("Carol".to_string())].into();

    container.get_instance::<NamedPerson>().unwrap();
    let instance = container
        .get_instance_of_with(TypeKey::of::<NamedPerson>(), args)
        .unwrap();
    let carol = instance.downcast::<NamedPerson>().unwrap();
    assert_eq!(carol.name.as_deref().map(String::as_str), Some("Carol"));
}

#[test]
fn arguments_do_not_leak_into_nested_dependencies() {
    struct Badge {
        owner: Arc<String>,
    }

    impl Injectable for Badge {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|owner: Arc<String>| Badge { owner })]
        }
    }

    struct Employee {
        name: Arc<String>,
        badge: Arc<Badge>,
    }

    impl Injectable for Employee {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(
                |name: Arc<String>, badge: ioc_abstractions::Inject<Badge>| Employee {
                    name,
                    badge: badge.into_inner(),
                },
            )]
        }
    }

    let container = Container::new();
    container
        .register_factory::<String, _>(|_| Ok(Arc::new("security".to_string())), Scope::Transient)
        .unwrap();

    let employee = container
        .get_instance_with::<Employee>(Arguments::new().with("Dana".to_string()))
        .unwrap();
    assert_eq!(employee.name.as_str(), "Dana");
    assert_eq!(employee.badge.owner.as_str(), "security");
}
