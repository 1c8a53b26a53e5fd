//! Error types for the inversion-of-control container.

use std::fmt;

/// Dependency injection errors
///
/// Every failure is a configuration error surfaced synchronously to the caller
/// of a registration or resolution method. Nothing is retried and no partially
/// constructed object is ever returned.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{Container, DiError, ReadOnlyIocContainer};
///
/// trait Vehicle: Send + Sync {}
///
/// let container = Container::new();
/// match container.resolve::<dyn Vehicle>() {
///     Err(DiError::UnresolvedType(name)) => assert!(name.contains("Vehicle")),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ioc_abstractions::DiError;
///
/// let cyclic = DiError::CyclicDependency(vec!["A", "B", "A"]);
/// assert_eq!(cyclic.to_string(), "Cyclic dependency: A -> B -> A");
/// assert_eq!(DiError::ContainerDisposed.to_string(), "Container has been disposed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No binding exists and the type is not directly constructible
    UnresolvedType(&'static str),
    /// A binding was found but none of the type's constructors can be satisfied
    UnsatisfiableConstructor(&'static str),
    /// Two or more satisfiable constructors share the winning parameter count
    AmbiguousConstructor(&'static str, usize),
    /// A type is required, directly or transitively, by its own construction (includes path)
    CyclicDependency(Vec<&'static str>),
    /// The container was disposed before the call
    ContainerDisposed,
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// Container options could not be read
    InvalidOptions(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::UnresolvedType(name) => write!(f, "Unable to resolve type: {}", name),
            DiError::UnsatisfiableConstructor(name) => {
                write!(f, "No constructor of {} can be satisfied", name)
            }
            DiError::AmbiguousConstructor(name, arity) => write!(
                f,
                "Ambiguous constructors for {}: several satisfiable constructors take {} parameters",
                name, arity
            ),
            DiError::CyclicDependency(path) => {
                write!(f, "Cyclic dependency: {}", path.join(" -> "))
            }
            DiError::ContainerDisposed => f.write_str("Container has been disposed"),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::InvalidOptions(msg) => write!(f, "Invalid container options: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// # Examples
///
/// ```rust
/// use ioc_abstractions::{DiResult, DiError};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::UnresolvedType("u32"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
