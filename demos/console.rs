//! Console walkthrough - people picking vehicles through contextual bindings
//!
//! This example demonstrates:
//! - Mapping a trait to a default implementation
//! - Overriding that mapping for one injection site
//! - Constructor selection driven by an explicit argument
//! - Attaching an observer (`--verbose`)
//!
//! Run with `cargo run --example console -- --verbose` to see every resolution.

use ioc_abstractions::*;
use std::fmt;
use std::sync::Arc;

trait Vehicle: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Car;

impl Vehicle for Car {
    fn name(&self) -> &'static str {
        "car"
    }
}

impl Injectable for Car {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|| Car)]
    }
}

struct Motorcycle;

impl Vehicle for Motorcycle {
    fn name(&self) -> &'static str {
        "motorcycle"
    }
}

impl Injectable for Motorcycle {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|| Motorcycle)]
    }
}

implements!(Car => dyn Vehicle);
implements!(Motorcycle => dyn Vehicle);

struct Person {
    vehicle: Arc<dyn Vehicle>,
}

impl Injectable for Person {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| Person { vehicle })]
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The person is driving a {}.", self.vehicle.name())
    }
}

/// Gets a motorcycle through a contextual binding.
struct SuperCoolPerson {
    vehicle: Arc<dyn Vehicle>,
}

impl Injectable for SuperCoolPerson {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| SuperCoolPerson { vehicle })]
    }

    fn ancestors() -> Vec<TypeKey> {
        vec![TypeKey::of::<Person>()]
    }
}

impl fmt::Display for SuperCoolPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The person is driving a {}.", self.vehicle.name())
    }
}

struct NamedPerson {
    name: Option<Arc<String>>,
    vehicle: Arc<dyn Vehicle>,
}

impl Injectable for NamedPerson {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(|vehicle: Arc<dyn Vehicle>| NamedPerson { name: None, vehicle }),
            Constructor::new(|name: Arc<String>, vehicle: Arc<dyn Vehicle>| NamedPerson {
                name: Some(name),
                vehicle,
            }),
        ]
    }
}

impl fmt::Display for NamedPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} is driving a {}.", name, self.vehicle.name()),
            None => write!(f, "Someone is driving a {}.", self.vehicle.name()),
        }
    }
}

fn configure(container: &impl IocContainer) -> DiResult<()> {
    container.register_type_to::<dyn Vehicle, Car>(Scope::Transient)?;
    container.register_type_to_when::<dyn Vehicle, Motorcycle>(
        When::injected_into::<SuperCoolPerson>(),
        Scope::Transient,
    )?;
    Ok(())
}

fn run(container: &Container) -> DiResult<()> {
    configure(container)?;

    let person = container.get_instance::<Person>()?;
    println!("{}", person);

    let cool = container.get_instance::<SuperCoolPerson>()?;
    println!("{}", cool);

    let bob = container.get_instance_with::<NamedPerson>(Arguments::new().with("Bob".to_string()))?;
    println!("{}", bob);

    Ok(())
}

fn main() {
    let verbose = std::env::args().skip(1).any(|arg| arg == "--verbose" || arg == "-v");

    let options = match ContainerOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Invalid container options: {}", e);
            std::process::exit(2);
        }
    };

    let container = Container::with_options(options);
    if verbose {
        container.add_observer(Arc::new(LoggingObserver::new()));
    }

    if let Err(e) = run(&container) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    container.dispose();
}
