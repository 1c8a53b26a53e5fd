//! The people-and-vehicles walkthrough shipped as `demos/console.rs`.

mod common;

use common::{Car, Motorcycle, NamedPerson, Person, SuperCoolPerson, Vehicle};
use ioc_abstractions::{
    Arguments, Container, IocContainer, ReadOnlyIocContainer, RegistrarCore, ResolverCore, Scope,
    When,
};

fn configure(container: &impl IocContainer) {
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient).unwrap();
    container
        .register_type_to_when::<dyn Vehicle, Motorcycle>(
            When::injected_into::<SuperCoolPerson>(),
            Scope::Transient,
        )
        .unwrap();
}

#[test]
fn test_walkthrough_output() {
    let container = Container::new();
    configure(&container);

    let person = container.get_instance::<Person>().unwrap();
    let cool = container.get_instance::<SuperCoolPerson>().unwrap();
    let bob = container
        .get_instance_with::<NamedPerson>(Arguments::new().with("Bob".to_string()))
        .unwrap();

    assert_eq!(person.to_string(), "The person is driving a car.");
    assert_eq!(cool.to_string(), "The person is driving a motorcycle.");
    assert_eq!(bob.to_string(), "Bob is driving a car.");

    container.dispose();
}

#[test]
fn test_walkthrough_through_object_safe_resolver() {
    let container = Container::new();
    configure(&container);

    // Consumers can hold the resolver half only.
    let resolver: &dyn ResolverCore = &container;
    assert_eq!(resolver.get_instance::<Person>().unwrap().vehicle.name(), "car");
    assert_eq!(resolver.get_instance::<SuperCoolPerson>().unwrap().vehicle.name(), "motorcycle");
}
