//! Core traits of the container facade.

mod dispose;
mod registrar;
mod resolver;

pub use dispose::Dispose;
pub use registrar::{IocContainer, RegistrarCore};
pub use resolver::{ReadOnlyIocContainer, Request, ResolverCore};
