//! Contextual (injection-site) binding selection.

mod common;

use common::{Bicycle, Car, Motorcycle, NamedPerson, Person, SuperCoolPerson, Vehicle};
use ioc_abstractions::{Container, DiError, IocContainer, ReadOnlyIocContainer, Scope, When};
use std::sync::Arc;

fn vehicles() -> Container {
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Motorcycle>(
            When::injected_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();
    container
}

#[test]
fn contextual_binding_applies_only_at_its_site() {
    let container = vehicles();

    assert_eq!(container.get_instance::<Person>().unwrap().vehicle.name(), "car");
    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "motorcycle");
    assert_eq!(container.resolve::<dyn Vehicle>().unwrap().name(), "car");
}

#[test]
fn contextual_binding_never_applies_at_top_level() {
    let container = Container::new();
    container
        .register_type_to_when::<dyn Vehicle, Motorcycle>(
            When::injected_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();

    assert!(matches!(container.resolve::<dyn Vehicle>(), Err(DiError::UnresolvedType(_))));
    assert!(matches!(
        container.get_instance::<Person>(),
        Err(DiError::UnsatisfiableConstructor(_))
    ));
    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "motorcycle");
}

#[test]
fn non_exact_condition_matches_ancestors() {
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Bicycle>(When::injected_into::<Person>(), Scope::Transient)
        .unwrap();

    // Both declare `Person` as an ancestor.
    assert_eq!(container.get_instance::<Person>().unwrap().vehicle.name(), "bicycle");
    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "bicycle");
    assert_eq!(container.get_instance::<NamedPerson>().unwrap().vehicle.name(), "bicycle");
}

#[test]
fn exact_condition_ignores_ancestors() {
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Bicycle>(
            When::injected_exactly_into::<Person>(),
            Scope::Transient,
        )
        .unwrap();

    assert_eq!(container.get_instance::<Person>().unwrap().vehicle.name(), "bicycle");
    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "car");
}

#[test]
fn exact_beats_non_exact_regardless_of_order() {
    let container = Container::new();
    container
        .register_type_to_when::<dyn Vehicle, Motorcycle>(
            When::injected_exactly_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Bicycle>(When::injected_into::<Person>(), Scope::Transient)
        .unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Car>(
            When::injected_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();

    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "motorcycle");
    assert_eq!(container.get_instance::<Person>().unwrap().vehicle.name(), "bicycle");
}

#[test]
fn latest_binding_wins_within_a_tier() {
    let container = vehicles();
    container
        .register_type_to_when::<dyn Vehicle, Bicycle>(
            When::injected_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();

    assert_eq!(container.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "bicycle");
}

#[test]
fn condition_matches_requested_type_of_requester() {
    struct Fleet {
        vehicle: Arc<dyn Vehicle>,
    }

    // A factory frame counts as the requested type.
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Bicycle>(When::injected_into::<Fleet>(), Scope::Transient)
        .unwrap();
    container
        .register_factory::<Fleet, _>(
            |ctx| Ok(Arc::new(Fleet { vehicle: ctx.resolve::<dyn Vehicle>()? })),
            Scope::Transient,
        )
        .unwrap();

    assert_eq!(container.resolve::<Fleet>().unwrap().vehicle.name(), "bicycle");
}

#[test]
fn contextual_singletons_are_separate_from_unconditional_ones() {
    let container = Container::new();
    container.register_type_to::<dyn Vehicle, Car>(Scope::Singleton).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Car>(When::injected_into::<SuperCoolPerson>(), Scope::Singleton)
        .unwrap();

    let plain_a = container.get_instance::<Person>().unwrap();
    let plain_b = container.get_instance::<Person>().unwrap();
    let cool_a = container.get_instance::<SuperCoolPerson>().unwrap();
    let cool_b = container.get_instance::<SuperCoolPerson>().unwrap();

    assert!(Arc::ptr_eq(&plain_a.vehicle, &plain_b.vehicle));
    assert!(Arc::ptr_eq(&cool_a.vehicle, &cool_b.vehicle));
    assert!(!Arc::ptr_eq(&plain_a.vehicle, &cool_a.vehicle));
}
