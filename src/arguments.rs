//! Explicit constructor arguments supplied by the caller of a resolution.

use std::sync::Arc;

use crate::instance::Instance;
use crate::key::TypeKey;

/// One explicit constructor argument: a value tagged with its type.
///
/// An argument matches a constructor parameter whose declared type has the
/// same [`TypeKey`], and shadows any binding registered for that type.
#[derive(Clone, Debug)]
pub struct Argument {
    instance: Instance,
}

impl Argument {
    /// Argument holding an owned value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// Argument holding an already shared value, possibly a trait object.
    pub fn shared<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            instance: Instance::new(value),
        }
    }

    /// Argument built from a previously resolved instance.
    pub fn from_instance(instance: Instance) -> Self {
        Self { instance }
    }

    pub fn type_key(&self) -> TypeKey {
        self.instance.type_key()
    }

    pub(crate) fn instance(&self) -> &Instance {
        &self.instance
    }
}

/// Ordered, heterogeneous list of explicit constructor arguments.
///
/// Arguments only apply to the top-level type being resolved; nested
/// dependencies never see them. When several arguments share a type, the
/// first one wins.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Arguments, TypeKey};
///
/// let args = Arguments::new().with(String::from("Bob")).with(42u8);
/// assert_eq!(args.len(), 2);
/// assert!(args.find(TypeKey::of::<String>()).is_some());
/// assert!(args.find(TypeKey::of::<u64>()).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    items: Vec<Argument>,
}

impl Arguments {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an owned value.
    pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.items.push(Argument::new(value));
        self
    }

    /// Appends a shared value.
    pub fn with_shared<T: ?Sized + Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.items.push(Argument::shared(value));
        self
    }

    pub fn push(&mut self, argument: Argument) {
        self.items.push(argument);
    }

    /// First argument whose type matches `key`.
    pub fn find(&self, key: TypeKey) -> Option<&Argument> {
        self.items.iter().find(|arg| arg.type_key() == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.items.iter()
    }
}

impl From<Vec<Argument>> for Arguments {
    fn from(items: Vec<Argument>) -> Self {
        Self { items }
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn first_argument_of_a_type_wins() {
        let args = Arguments::new().with(1u32).with(2u32);
        let found = args.find(TypeKey::of::<u32>()).unwrap();
        assert_eq!(*found.instance().downcast::<u32>().unwrap(), 1);
    }

    #[test]
    fn shared_trait_object_is_tagged_with_the_trait() {
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        let args = Arguments::new().with_shared(greeter);
        let found = args.find(TypeKey::of::<dyn Greeter>()).unwrap();
        let greeter = found.instance().downcast::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
    }
}
