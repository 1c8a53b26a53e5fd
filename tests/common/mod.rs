//! Sample domain shared by the integration tests: people driving vehicles.
#![allow(dead_code)]

use ioc_abstractions::{implements, Constructor, Injectable, TypeKey};
use std::sync::Arc;

pub trait Vehicle: Send + Sync {
    fn name(&self) -> &'static str;
}

pub struct Car;

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

pub struct Motorcycle;

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

pub struct Bicycle;

impl Vehicle for Bicycle {
    fn name(&self) -> &'static str {
        "bicycle"
    }
}

impl Injectable for Bicycle {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|| Bicycle)]
    }
}

implements!(Car => dyn Vehicle);
implements!(Motorcycle => dyn Vehicle);
implements!(Bicycle => dyn Vehicle);

pub struct Person {
    pub vehicle: Arc<dyn Vehicle>,
}

impl Injectable for Person {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| Person { vehicle })]
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The person is driving a {}.", self.vehicle.name())
    }
}

/// A person that "is a" `Person` for contextual bindings.
pub struct SuperCoolPerson {
    pub vehicle: Arc<dyn Vehicle>,
}

impl Injectable for SuperCoolPerson {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|vehicle: Arc<dyn Vehicle>| SuperCoolPerson { vehicle })]
    }

    fn ancestors() -> Vec<TypeKey> {
        vec![TypeKey::of::<Person>()]
    }
}

impl std::fmt::Display for SuperCoolPerson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The person is driving a {}.", self.vehicle.name())
    }
}

pub struct NamedPerson {
    pub name: Option<Arc<String>>,
    pub vehicle: Arc<dyn Vehicle>,
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

    fn ancestors() -> Vec<TypeKey> {
        vec![TypeKey::of::<Person>()]
    }
}

impl std::fmt::Display for NamedPerson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} is driving a {}.", name, self.vehicle.name()),
            None => write!(f, " is driving a {}.", self.vehicle.name()),
        }
    }
}
